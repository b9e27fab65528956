use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 成绩记录
//
// 每个 (学生, 开课实例, 评分阶段) 一行；评分阶段为空表示该课程的汇总成绩。
// total_score / percentage / grade_label / grade_point 均由三项原始分数推导，
// 每次写入时重新计算。
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct Grade {
    pub id: i64,
    pub student_id: i64,
    pub subject_instance_id: i64,
    pub grading_period_id: Option<i64>,
    // 平时成绩 / 期中 / 期末，均为 0-100
    pub classwork_score: Option<f64>,
    pub midterm_score: Option<f64>,
    pub final_score: Option<f64>,
    pub total_score: f64,
    pub percentage: f64,
    pub grade_label: String,
    pub grade_point: Option<f64>,
    pub remarks: Option<String>,
    pub updated_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 参与 GPA 计算的一行成绩（已关联学分与学期信息）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeContribution {
    pub grade_id: i64,
    pub subject_instance_id: i64,
    pub grading_period_id: Option<i64>,
    pub subject_code: String,
    pub subject_name: String,
    pub credits: f64,
    pub grade_label: String,
    pub grade_point: f64,
    pub semester_id: i64,
    pub semester_number: i32,
    pub academic_year_id: i64,
    pub academic_year_start: i32,
}
