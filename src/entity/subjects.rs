//! 科目实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "subjects")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
    pub credits: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::subject_instances::Entity")]
    SubjectInstances,
    #[sea_orm(has_many = "super::question_banks::Entity")]
    QuestionBanks,
}

impl Related<super::subject_instances::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubjectInstances.def()
    }
}

impl Related<super::question_banks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QuestionBanks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_subject(self) -> crate::models::catalog::entities::Subject {
        crate::models::catalog::entities::Subject {
            id: self.id,
            code: self.code,
            name: self.name,
            credits: self.credits,
        }
    }
}
