//! 题目实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "questions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub bank_id: i64,
    pub question_type: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    // JSON 格式的标准答案
    #[sea_orm(column_type = "Text")]
    pub answer_key: String,
    pub points: f64,
    pub difficulty: String,
    pub created_by: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::question_banks::Entity",
        from = "Column::BankId",
        to = "super::question_banks::Column::Id"
    )]
    Bank,
    #[sea_orm(has_many = "super::exam_questions::Entity")]
    ExamQuestions,
}

impl Related<super::question_banks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bank.def()
    }
}

impl Related<super::exam_questions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExamQuestions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// 转换为业务实体，题型或答案无法解析时返回错误
    pub fn into_question(
        self,
    ) -> crate::errors::Result<crate::models::questions::entities::Question> {
        use crate::errors::LmsError;
        use crate::models::questions::entities::{AnswerKey, Difficulty, Question, QuestionType};
        use chrono::{DateTime, Utc};

        let question_type = self
            .question_type
            .parse::<QuestionType>()
            .map_err(LmsError::serialization)?;
        let answer_key: AnswerKey = serde_json::from_str(&self.answer_key)?;

        Ok(Question {
            id: self.id,
            bank_id: self.bank_id,
            question_type,
            content: self.content,
            answer_key,
            points: self.points,
            difficulty: self.difficulty.parse::<Difficulty>().unwrap_or_default(),
            created_by: self.created_by,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        })
    }
}
