use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct Assignment {
    pub id: i64,
    pub subject_instance_id: i64,
    pub title: String,
    pub description: Option<String>,
    // 作业最高分数
    pub max_score: f64,
    // 作业权重
    pub weight: f64,
    // 截止时间
    pub due_date: DateTime<Utc>,
    // 是否允许迟交
    pub allow_late_submission: bool,
    // 迟交扣分比例（按得分本身的百分比，一次性扣除）
    pub late_penalty_percent: f64,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Assignment {
    /// 在给定时间提交是否算迟交
    pub fn is_late_at(&self, now: DateTime<Utc>) -> bool {
        now > self.due_date
    }
}
