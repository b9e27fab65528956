//! 作答答案实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "exam_answers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub attempt_id: i64,
    pub question_id: i64,
    // JSON 格式的作答内容
    #[sea_orm(column_type = "Text")]
    pub answer: String,
    pub is_correct: Option<bool>,
    pub points: Option<f64>,
    pub answered_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::exam_attempts::Entity",
        from = "Column::AttemptId",
        to = "super::exam_attempts::Column::Id"
    )]
    Attempt,
}

impl Related<super::exam_attempts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attempt.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_answer(self) -> crate::models::attempts::entities::AttemptAnswer {
        use crate::models::attempts::entities::AttemptAnswer;
        use chrono::{DateTime, Utc};

        AttemptAnswer {
            question_id: self.question_id,
            answer: serde_json::from_str(&self.answer)
                .unwrap_or(serde_json::Value::String(self.answer)),
            is_correct: self.is_correct,
            points: self.points,
            answered_at: DateTime::<Utc>::from_timestamp(self.answered_at, 0).unwrap_or_default(),
        }
    }
}
