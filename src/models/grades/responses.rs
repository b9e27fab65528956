use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::entities::{Grade, GradeContribution};

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeListResponse {
    pub items: Vec<Grade>,
}

/// 学期 GPA
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GpaResponse {
    pub student_id: i64,
    pub semester_id: i64,
    pub gpa: f64,
    pub total_credits: f64,
    pub grades: Vec<GradeContribution>,
}

/// GPAX 中单个学期的汇总
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct SemesterGpa {
    pub semester_id: i64,
    pub semester_number: i32,
    pub academic_year_id: i64,
    pub academic_year_start: i32,
    pub gpa: f64,
    pub total_credits: f64,
}

/// 累计 GPAX
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GpaxResponse {
    pub student_id: i64,
    pub gpax: f64,
    pub total_credits: f64,
    pub semesters: Vec<SemesterGpa>,
    // 有多行成绩参与计算的开课实例（学分被重复计入）
    pub multi_period_subject_instances: Vec<i64>,
}

/// 批量录入中单行的结果
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct BulkUpsertRowResult {
    pub index: usize,
    pub student_id: i64,
    pub subject_instance_id: i64,
    pub success: bool,
    pub created: bool,
    pub grade: Option<Grade>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct BulkUpsertResponse {
    pub succeeded: usize,
    pub failed: usize,
    pub results: Vec<BulkUpsertRowResult>,
}
