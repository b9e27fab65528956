use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 学年
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/calendar.ts")]
pub struct AcademicYear {
    pub id: i64,
    pub name: String,
    // 起始年份，用于排序
    pub start_year: i32,
    pub is_current: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 学期
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/calendar.ts")]
pub struct Semester {
    pub id: i64,
    pub academic_year_id: i64,
    // 学年内的学期序号（1, 2, ...）
    pub number: i32,
    pub name: String,
    pub is_current: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 评分阶段（学期内的子区间）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/calendar.ts")]
pub struct GradingPeriod {
    pub id: i64,
    pub semester_id: i64,
    pub name: String,
    pub sequence: i32,
}
