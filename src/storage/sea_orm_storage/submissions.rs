//! 作业提交存储操作

use chrono::{DateTime, Utc};

use super::SeaOrmStorage;
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions, Model};
use crate::errors::{LmsError, Result};
use crate::grading::submission as submission_rules;
use crate::models::submissions::{
    entities::{Submission, SubmissionStatus},
    requests::{CreateSubmissionRequest, GradeSubmissionRequest},
};
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    async fn find_submission_model(&self, id: i64) -> Result<Option<Model>> {
        Submissions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询提交失败: {e}")))
    }

    /// 提交作业
    pub async fn submit_assignment_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
        req: CreateSubmissionRequest,
        now: DateTime<Utc>,
    ) -> Result<Submission> {
        let assignment = self
            .get_assignment_by_id_impl(assignment_id)
            .await?
            .ok_or_else(|| LmsError::not_found(format!("Assignment {assignment_id} not found")))?;

        let existing = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询提交失败: {e}")))?;

        let prior = existing.as_ref().map(|m| {
            (
                m.id,
                m.status
                    .parse::<SubmissionStatus>()
                    .unwrap_or(SubmissionStatus::Submitted),
            )
        });
        let plan = submission_rules::plan_submit(&assignment, prior, now)?;

        let files = match req.files {
            Some(files) => Some(serde_json::to_string(&files)?),
            None => None,
        };

        let saved = match plan.existing_id {
            Some(id) => {
                // 以状态仍可重新提交为条件更新，并发的另一次重新提交得到 Conflict
                let result = Submissions::update_many()
                    .col_expr(Column::Content, Expr::value(req.content))
                    .col_expr(Column::Files, Expr::value(files))
                    .col_expr(
                        Column::Status,
                        Expr::value(SubmissionStatus::Submitted.to_string()),
                    )
                    .col_expr(Column::SubmittedAt, Expr::value(now.timestamp()))
                    .col_expr(Column::IsLate, Expr::value(plan.is_late))
                    .col_expr(Column::UpdatedAt, Expr::value(now.timestamp()))
                    .filter(Column::Id.eq(id))
                    .filter(Column::Status.is_in([
                        SubmissionStatus::PENDING,
                        SubmissionStatus::RETURNED,
                    ]))
                    .exec(&self.db)
                    .await
                    .map_err(|e| LmsError::database_operation(format!("更新提交失败: {e}")))?;

                if result.rows_affected == 0 {
                    return Err(LmsError::conflict(
                        "Submission was resubmitted concurrently and is awaiting review",
                    ));
                }

                self.find_submission_model(id)
                    .await?
                    .ok_or_else(|| LmsError::not_found(format!("Submission {id} not found")))?
            }
            None => {
                let model = ActiveModel {
                    assignment_id: Set(assignment_id),
                    student_id: Set(student_id),
                    content: Set(req.content),
                    files: Set(files),
                    status: Set(SubmissionStatus::Submitted.to_string()),
                    submitted_at: Set(now.timestamp()),
                    is_late: Set(plan.is_late),
                    score: Set(None),
                    feedback: Set(None),
                    graded_by: Set(None),
                    graded_at: Set(None),
                    updated_at: Set(now.timestamp()),
                    ..Default::default()
                };
                model.insert(&self.db).await.map_err(|e| {
                    if super::is_unique_violation(&e) {
                        LmsError::conflict("Submission already exists")
                    } else {
                        LmsError::database_operation(format!("创建提交失败: {e}"))
                    }
                })?
            }
        };

        tracing::info!(
            "Student {} submitted assignment {} (late: {})",
            student_id,
            assignment_id,
            plan.is_late
        );
        Ok(saved.into_submission())
    }

    /// 通过 ID 获取提交
    pub async fn get_submission_by_id_impl(&self, id: i64) -> Result<Option<Submission>> {
        Ok(self
            .find_submission_model(id)
            .await?
            .map(|m| m.into_submission()))
    }

    /// 列出作业的全部提交
    pub async fn list_assignment_submissions_impl(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<Submission>> {
        let results = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .order_by_asc(Column::SubmittedAt)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询提交列表失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_submission()).collect())
    }

    /// 批改提交，迟交时按比例扣分
    pub async fn grade_submission_impl(
        &self,
        id: i64,
        grader_id: i64,
        req: GradeSubmissionRequest,
        now: DateTime<Utc>,
    ) -> Result<Submission> {
        let model = self
            .find_submission_model(id)
            .await?
            .ok_or_else(|| LmsError::not_found(format!("Submission {id} not found")))?;
        let assignment = self
            .get_assignment_by_id_impl(model.assignment_id)
            .await?
            .ok_or_else(|| {
                LmsError::not_found(format!("Assignment {} not found", model.assignment_id))
            })?;

        submission_rules::validate_score(req.score, assignment.max_score)?;
        let final_score = submission_rules::apply_late_penalty(
            req.score,
            model.is_late,
            assignment.late_penalty_percent,
        );

        let mut active: ActiveModel = model.into();
        active.score = Set(Some(final_score));
        active.feedback = Set(req.feedback);
        active.status = Set(SubmissionStatus::Graded.to_string());
        active.graded_by = Set(Some(grader_id));
        active.graded_at = Set(Some(now.timestamp()));
        active.updated_at = Set(now.timestamp());

        let result = active
            .update(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("批改提交失败: {e}")))?;

        tracing::info!(
            "Submission {} graded by {}: {} -> {}",
            id,
            grader_id,
            req.score,
            final_score
        );
        Ok(result.into_submission())
    }

    /// 退回提交，保留已有分数
    pub async fn return_submission_impl(
        &self,
        id: i64,
        feedback: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Submission> {
        let model = self
            .find_submission_model(id)
            .await?
            .ok_or_else(|| LmsError::not_found(format!("Submission {id} not found")))?;

        let mut active: ActiveModel = model.into();
        active.status = Set(SubmissionStatus::Returned.to_string());
        active.feedback = Set(feedback);
        active.updated_at = Set(now.timestamp());

        let result = active
            .update(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("退回提交失败: {e}")))?;

        tracing::info!("Submission {} returned for revision", id);
        Ok(result.into_submission())
    }
}
