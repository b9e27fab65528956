//! 科目与选课存储操作

use chrono::{DateTime, Utc};

use super::SeaOrmStorage;
use crate::entity::enrollments::{
    ActiveModel as EnrollmentActiveModel, Column as EnrollmentColumn, Entity as Enrollments,
};
use crate::entity::subject_instances::{ActiveModel, Column, Entity as SubjectInstances};
use crate::entity::subjects::{ActiveModel as SubjectActiveModel, Entity as Subjects};
use crate::errors::{LmsError, Result};
use crate::models::catalog::{
    entities::{Enrollment, Subject, SubjectInstance},
    requests::{CreateSubjectInstanceRequest, CreateSubjectRequest},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建科目
    pub async fn create_subject_impl(&self, req: CreateSubjectRequest) -> Result<Subject> {
        let model = SubjectActiveModel {
            code: Set(req.code),
            name: Set(req.name),
            credits: Set(req.credits),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            if super::is_unique_violation(&e) {
                LmsError::conflict("Subject code already exists")
            } else {
                LmsError::database_operation(format!("创建科目失败: {e}"))
            }
        })?;

        Ok(result.into_subject())
    }

    /// 创建开课实例
    pub async fn create_subject_instance_impl(
        &self,
        req: CreateSubjectInstanceRequest,
    ) -> Result<SubjectInstance> {
        let subject = Subjects::find_by_id(req.subject_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询科目失败: {e}")))?;
        if subject.is_none() {
            return Err(LmsError::not_found(format!(
                "Subject {} not found",
                req.subject_id
            )));
        }
        if self.get_semester_by_id_impl(req.semester_id).await?.is_none() {
            return Err(LmsError::not_found(format!(
                "Semester {} not found",
                req.semester_id
            )));
        }

        let model = ActiveModel {
            subject_id: Set(req.subject_id),
            semester_id: Set(req.semester_id),
            teacher_id: Set(req.teacher_id),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("创建开课实例失败: {e}")))?;

        Ok(result.into_subject_instance())
    }

    /// 通过 ID 获取开课实例
    pub async fn get_subject_instance_by_id_impl(
        &self,
        id: i64,
    ) -> Result<Option<SubjectInstance>> {
        let result = SubjectInstances::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询开课实例失败: {e}")))?;

        Ok(result.map(|m| m.into_subject_instance()))
    }

    /// 学生选课
    pub async fn enroll_student_impl(
        &self,
        subject_instance_id: i64,
        student_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Enrollment> {
        if self
            .get_subject_instance_by_id_impl(subject_instance_id)
            .await?
            .is_none()
        {
            return Err(LmsError::not_found(format!(
                "Subject instance {subject_instance_id} not found"
            )));
        }

        let model = EnrollmentActiveModel {
            student_id: Set(student_id),
            subject_instance_id: Set(subject_instance_id),
            enrolled_at: Set(now.timestamp()),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            if super::is_unique_violation(&e) {
                LmsError::conflict("Student is already enrolled")
            } else {
                LmsError::database_operation(format!("选课失败: {e}"))
            }
        })?;

        Ok(result.into_enrollment())
    }

    /// 学生是否已选该开课实例
    pub async fn is_enrolled_impl(
        &self,
        student_id: i64,
        subject_instance_id: i64,
    ) -> Result<bool> {
        let count = Enrollments::find()
            .filter(EnrollmentColumn::StudentId.eq(student_id))
            .filter(EnrollmentColumn::SubjectInstanceId.eq(subject_instance_id))
            .count(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询选课记录失败: {e}")))?;

        Ok(count > 0)
    }

    /// 学生已选的开课实例 ID
    pub(crate) async fn enrolled_instance_ids(&self, student_id: i64) -> Result<Vec<i64>> {
        let enrollments = Enrollments::find()
            .filter(EnrollmentColumn::StudentId.eq(student_id))
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询选课记录失败: {e}")))?;

        Ok(enrollments
            .into_iter()
            .map(|e| e.subject_instance_id)
            .collect())
    }

    /// 学生已选的开课实例
    pub async fn list_enrolled_subject_instances_impl(
        &self,
        student_id: i64,
    ) -> Result<Vec<SubjectInstance>> {
        let ids = self.enrolled_instance_ids(student_id).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let results = SubjectInstances::find()
            .filter(Column::Id.is_in(ids))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询开课实例失败: {e}")))?;

        Ok(results
            .into_iter()
            .map(|m| m.into_subject_instance())
            .collect())
    }
}
