//! 成绩实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "grades")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub subject_instance_id: i64,
    pub grading_period_id: Option<i64>,
    // 评分阶段 ID，整体成绩行为 0；(student_id, subject_instance_id, period_key) 唯一
    pub period_key: i64,
    pub classwork_score: Option<f64>,
    pub midterm_score: Option<f64>,
    pub final_score: Option<f64>,
    pub total_score: f64,
    pub percentage: f64,
    pub grade_label: String,
    pub grade_point: Option<f64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub remarks: Option<String>,
    pub updated_by: Option<i64>,
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
    #[sea_orm(
        belongs_to = "super::grading_periods::Entity",
        from = "Column::GradingPeriodId",
        to = "super::grading_periods::Column::Id"
    )]
    GradingPeriod,
}

impl Related<super::subject_instances::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubjectInstance.def()
    }
}

impl Related<super::grading_periods::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GradingPeriod.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn period_key(grading_period_id: Option<i64>) -> i64 {
    grading_period_id.unwrap_or(0)
}

impl Model {
    pub fn component_scores(&self) -> crate::grading::score::ComponentScores {
        crate::grading::score::ComponentScores {
            classwork: self.classwork_score,
            midterm: self.midterm_score,
            final_exam: self.final_score,
        }
    }

    pub fn into_grade(self) -> crate::models::grades::entities::Grade {
        use crate::models::grades::entities::Grade;
        use chrono::{DateTime, Utc};

        Grade {
            id: self.id,
            student_id: self.student_id,
            subject_instance_id: self.subject_instance_id,
            grading_period_id: self.grading_period_id,
            classwork_score: self.classwork_score,
            midterm_score: self.midterm_score,
            final_score: self.final_score,
            total_score: self.total_score,
            percentage: self.percentage,
            grade_label: self.grade_label,
            grade_point: self.grade_point,
            remarks: self.remarks,
            updated_by: self.updated_by,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
