//! 考试存储操作

use chrono::{DateTime, Utc};

use super::SeaOrmStorage;
use crate::entity::exam_questions::{
    ActiveModel as ExamQuestionActiveModel, Column as ExamQuestionColumn, Entity as ExamQuestions,
};
use crate::entity::exams::{ActiveModel, Column, Entity as Exams};
use crate::entity::questions::Entity as Questions;
use crate::errors::{LmsError, Result};
use crate::grading::auto_grade::GradingItem;
use crate::models::exams::{
    entities::{Exam, ExamQuestion},
    requests::{AddExamQuestionRequest, CreateExamRequest},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    /// 创建考试
    pub async fn create_exam_impl(
        &self,
        created_by: i64,
        req: CreateExamRequest,
        now: DateTime<Utc>,
    ) -> Result<Exam> {
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
            passing_score: Set(req.passing_score),
            start_time: Set(req.start_time.timestamp()),
            end_time: Set(req.end_time.timestamp()),
            duration_minutes: Set(req.duration_minutes),
            max_attempts: Set(req.max_attempts.unwrap_or(1)),
            shuffle_questions: Set(req.shuffle_questions.unwrap_or(false)),
            shuffle_options: Set(req.shuffle_options.unwrap_or(false)),
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
            .map_err(|e| LmsError::database_operation(format!("创建考试失败: {e}")))?;

        Ok(result.into_exam())
    }

    /// 通过 ID 获取考试
    pub async fn get_exam_by_id_impl(&self, id: i64) -> Result<Option<Exam>> {
        let result = Exams::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询考试失败: {e}")))?;

        Ok(result.map(|m| m.into_exam()))
    }

    /// 向考试添加题目，缺省顺序追加到末尾
    pub async fn add_exam_question_impl(
        &self,
        exam_id: i64,
        req: AddExamQuestionRequest,
    ) -> Result<ExamQuestion> {
        let exam = self
            .get_exam_by_id_impl(exam_id)
            .await?
            .ok_or_else(|| LmsError::not_found(format!("Exam {exam_id} not found")))?;
        // 已发布考试的题目集合固定
        if exam.is_published {
            return Err(LmsError::invalid_state(
                "Questions cannot be added to a published exam",
            ));
        }
        if self.get_question_by_id_impl(req.question_id).await?.is_none() {
            return Err(LmsError::not_found(format!(
                "Question {} not found",
                req.question_id
            )));
        }

        let sort_order = match req.sort_order {
            Some(order) => order,
            None => {
                let max_order = ExamQuestions::find()
                    .filter(ExamQuestionColumn::ExamId.eq(exam_id))
                    .select_only()
                    .column_as(ExamQuestionColumn::SortOrder.max(), "max_order")
                    .into_tuple::<Option<i32>>()
                    .one(&self.db)
                    .await
                    .map_err(|e| {
                        LmsError::database_operation(format!("查询题目顺序失败: {e}"))
                    })?
                    .flatten();
                max_order.map_or(0, |o| o + 1)
            }
        };

        let model = ExamQuestionActiveModel {
            exam_id: Set(exam_id),
            question_id: Set(req.question_id),
            points: Set(req.points),
            sort_order: Set(sort_order),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            if super::is_unique_violation(&e) {
                LmsError::conflict("Question is already part of this exam")
            } else {
                LmsError::database_operation(format!("添加考试题目失败: {e}"))
            }
        })?;

        Ok(result.into_exam_question())
    }

    /// 列出考试题目（按顺序）
    pub async fn list_exam_questions_impl(&self, exam_id: i64) -> Result<Vec<ExamQuestion>> {
        let results = ExamQuestions::find()
            .filter(ExamQuestionColumn::ExamId.eq(exam_id))
            .order_by_asc(ExamQuestionColumn::SortOrder)
            .order_by_asc(ExamQuestionColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询考试题目失败: {e}")))?;

        Ok(results
            .into_iter()
            .map(|m| m.into_exam_question())
            .collect())
    }

    /// 考试题目数
    pub(crate) async fn count_exam_questions(&self, exam_id: i64) -> Result<u64> {
        ExamQuestions::find()
            .filter(ExamQuestionColumn::ExamId.eq(exam_id))
            .count(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询考试题目数失败: {e}")))
    }

    /// 考试题目及其题目内容（按顺序）
    pub async fn load_grading_items_impl(&self, exam_id: i64) -> Result<Vec<GradingItem>> {
        let rows = ExamQuestions::find()
            .filter(ExamQuestionColumn::ExamId.eq(exam_id))
            .order_by_asc(ExamQuestionColumn::SortOrder)
            .order_by_asc(ExamQuestionColumn::Id)
            .find_also_related(Questions)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询考试题目失败: {e}")))?;

        let mut items = Vec::with_capacity(rows.len());
        for (link, question) in rows {
            let Some(question) = question else {
                tracing::warn!(
                    "Exam {} references missing question {}",
                    exam_id,
                    link.question_id
                );
                continue;
            };
            items.push(GradingItem {
                exam_question: link.into_exam_question(),
                question: question.into_question()?,
            });
        }
        Ok(items)
    }

    /// 发布考试，至少需要一道题目
    pub async fn publish_exam_impl(&self, id: i64, now: DateTime<Utc>) -> Result<Option<Exam>> {
        let Some(existing) = Exams::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询考试失败: {e}")))?
        else {
            return Ok(None);
        };

        if existing.is_published {
            return Ok(Some(existing.into_exam()));
        }
        if self.count_exam_questions(id).await? == 0 {
            return Err(LmsError::validation("Exam has no questions"));
        }

        let mut model: ActiveModel = existing.into();
        model.is_published = Set(true);
        model.published_at = Set(Some(now.timestamp()));
        model.updated_at = Set(now.timestamp());

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("发布考试失败: {e}")))?;

        Ok(Some(result.into_exam()))
    }

    /// 学生可见的考试
    pub async fn list_exams_for_student_impl(&self, student_id: i64) -> Result<Vec<Exam>> {
        let instance_ids = self.enrolled_instance_ids(student_id).await?;
        if instance_ids.is_empty() {
            return Ok(Vec::new());
        }

        let results = Exams::find()
            .filter(Column::SubjectInstanceId.is_in(instance_ids))
            .filter(Column::IsPublished.eq(true))
            .order_by_asc(Column::StartTime)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询考试列表失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_exam()).collect())
    }
}
