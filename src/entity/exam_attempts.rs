//! 考试作答实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "exam_attempts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub exam_id: i64,
    pub student_id: i64,
    pub attempt_number: i32,
    pub status: String,
    // 进行中时为 "{exam_id}:{student_id}"，交卷后清空；唯一索引保证同一学生同一考试至多一个进行中的作答
    #[sea_orm(unique)]
    pub active_slot: Option<String>,
    pub started_at: i64,
    pub submitted_at: Option<i64>,
    pub score: Option<f64>,
    pub correct_count: Option<i32>,
    pub total_questions: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::exams::Entity",
        from = "Column::ExamId",
        to = "super::exams::Column::Id"
    )]
    Exam,
    #[sea_orm(has_many = "super::exam_answers::Entity")]
    Answers,
}

impl Related<super::exams::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Exam.def()
    }
}

impl Related<super::exam_answers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Answers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn active_slot(exam_id: i64, student_id: i64) -> String {
    format!("{exam_id}:{student_id}")
}

impl Model {
    pub fn summary(&self) -> crate::models::attempts::entities::AttemptSummary {
        use crate::models::attempts::entities::{AttemptStatus, AttemptSummary};

        AttemptSummary {
            id: self.id,
            attempt_number: self.attempt_number,
            status: self
                .status
                .parse::<AttemptStatus>()
                .unwrap_or(AttemptStatus::Graded),
        }
    }

    pub fn into_attempt(
        self,
        answers: Vec<super::exam_answers::Model>,
    ) -> crate::models::attempts::entities::ExamAttempt {
        use crate::models::attempts::entities::{AnswerSheet, AttemptStatus, ExamAttempt};
        use chrono::{DateTime, Utc};

        let answers: AnswerSheet = answers
            .into_iter()
            .map(|a| (a.question_id, a.into_answer()))
            .collect();

        ExamAttempt {
            id: self.id,
            exam_id: self.exam_id,
            student_id: self.student_id,
            attempt_number: self.attempt_number,
            status: self
                .status
                .parse::<AttemptStatus>()
                .unwrap_or(AttemptStatus::Graded),
            started_at: DateTime::<Utc>::from_timestamp(self.started_at, 0).unwrap_or_default(),
            submitted_at: self
                .submitted_at
                .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
            score: self.score,
            correct_count: self.correct_count,
            total_questions: self.total_questions,
            answers,
        }
    }
}
