//! 作业存储操作

use chrono::{DateTime, Utc};

use super::SeaOrmStorage;
use crate::entity::assignments::{ActiveModel, Column, Entity as Assignments};
use crate::errors::{LmsError, Result};
use crate::models::assignments::{entities::Assignment, requests::CreateAssignmentRequest};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建作业
    pub async fn create_assignment_impl(
        &self,
        created_by: i64,
        req: CreateAssignmentRequest,
        now: DateTime<Utc>,
    ) -> Result<Assignment> {
        if self
            .get_subject_instance_by_id_impl(req.subject_instance_id)
            .await?
            .is_none()
        {
            return Err(LmsError::not_found(format!(
                "Subject instance {} not found",
                req.subject_instance_id
            )));
        }

        let model = ActiveModel {
            subject_instance_id: Set(req.subject_instance_id),
            title: Set(req.title),
            description: Set(req.description),
            max_score: Set(req.max_score),
            weight: Set(req.weight.unwrap_or(1.0)),
            due_date: Set(req.due_date.timestamp()),
            allow_late_submission: Set(req.allow_late.unwrap_or(false)),
            late_penalty_percent: Set(req.late_penalty_percent.unwrap_or(0.0)),
            is_published: Set(false),
            published_at: Set(None),
            created_by: Set(created_by),
            created_at: Set(now.timestamp()),
            updated_at: Set(now.timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("创建作业失败: {e}")))?;

        Ok(result.into_assignment())
    }

    /// 通过 ID 获取作业
    pub async fn get_assignment_by_id_impl(&self, id: i64) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作业失败: {e}")))?;

        Ok(result.map(|m| m.into_assignment()))
    }

    /// 发布作业，重复发布保持原发布时间
    pub async fn publish_assignment_impl(
        &self,
        id: i64,
        now: DateTime<Utc>,
    ) -> Result<Option<Assignment>> {
        let Some(existing) = Assignments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作业失败: {e}")))?
        else {
            return Ok(None);
        };

        if existing.is_published {
            return Ok(Some(existing.into_assignment()));
        }

        let mut model: ActiveModel = existing.into();
        model.is_published = Set(true);
        model.published_at = Set(Some(now.timestamp()));
        model.updated_at = Set(now.timestamp());

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("发布作业失败: {e}")))?;

        Ok(Some(result.into_assignment()))
    }

    /// 学生可见的作业
    pub async fn list_assignments_for_student_impl(
        &self,
        student_id: i64,
    ) -> Result<Vec<Assignment>> {
        let instance_ids = self.enrolled_instance_ids(student_id).await?;
        if instance_ids.is_empty() {
            return Ok(Vec::new());
        }

        let results = Assignments::find()
            .filter(Column::SubjectInstanceId.is_in(instance_ids))
            .filter(Column::IsPublished.eq(true))
            .order_by_asc(Column::DueDate)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作业列表失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_assignment()).collect())
    }
}
