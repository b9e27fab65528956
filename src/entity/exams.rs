//! 考试实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "exams")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub subject_instance_id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub max_score: f64,
    pub passing_score: Option<f64>,
    pub start_time: i64,
    pub end_time: i64,
    pub duration_minutes: i32,
    pub max_attempts: i32,
    pub shuffle_questions: bool,
    pub shuffle_options: bool,
    pub is_published: bool,
    pub published_at: Option<i64>,
    pub created_by: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::subject_instances::Entity",
        from = "Column::SubjectInstanceId",
        to = "super::subject_instances::Column::Id"
    )]
    SubjectInstance,
    #[sea_orm(has_many = "super::exam_questions::Entity")]
    ExamQuestions,
    #[sea_orm(has_many = "super::exam_attempts::Entity")]
    Attempts,
}

impl Related<super::subject_instances::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubjectInstance.def()
    }
}

impl Related<super::exam_questions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExamQuestions.def()
    }
}

impl Related<super::exam_attempts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attempts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_exam(self) -> crate::models::exams::entities::Exam {
        use crate::models::exams::entities::Exam;
        use chrono::{DateTime, Utc};

        Exam {
            id: self.id,
            subject_instance_id: self.subject_instance_id,
            title: self.title,
            description: self.description,
            max_score: self.max_score,
            passing_score: self.passing_score,
            start_time: DateTime::<Utc>::from_timestamp(self.start_time, 0).unwrap_or_default(),
            end_time: DateTime::<Utc>::from_timestamp(self.end_time, 0).unwrap_or_default(),
            duration_minutes: self.duration_minutes,
            max_attempts: self.max_attempts,
            shuffle_questions: self.shuffle_questions,
            shuffle_options: self.shuffle_options,
            is_published: self.is_published,
            published_at: self
                .published_at
                .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
            created_by: self.created_by,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
