use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 科目（课程目录）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/catalog.ts")]
pub struct Subject {
    pub id: i64,
    pub code: String,
    pub name: String,
    // 学分权重
    pub credits: f64,
}

// 开课实例：某科目在某学期开设
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/catalog.ts")]
pub struct SubjectInstance {
    pub id: i64,
    pub subject_id: i64,
    pub semester_id: i64,
    pub teacher_id: Option<i64>,
}

// 选课记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/catalog.ts")]
pub struct Enrollment {
    pub id: i64,
    pub student_id: i64,
    pub subject_instance_id: i64,
    pub enrolled_at: chrono::DateTime<chrono::Utc>,
}
