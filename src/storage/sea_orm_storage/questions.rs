//! 题库存储操作

use chrono::{DateTime, Utc};

use super::SeaOrmStorage;
use crate::entity::exam_questions::{Column as ExamQuestionColumn, Entity as ExamQuestions};
use crate::entity::exams::Entity as Exams;
use crate::entity::question_banks::{ActiveModel as BankActiveModel, Entity as QuestionBanks};
use crate::entity::questions::{ActiveModel, Column, Entity as Questions};
use crate::errors::{LmsError, Result};
use crate::models::questions::{
    entities::{Question, QuestionBank},
    requests::{CreateQuestionBankRequest, CreateQuestionRequest, UpdateQuestionRequest},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建题库
    pub async fn create_question_bank_impl(
        &self,
        created_by: i64,
        req: CreateQuestionBankRequest,
        now: DateTime<Utc>,
    ) -> Result<QuestionBank> {
        let model = BankActiveModel {
            subject_id: Set(req.subject_id),
            name: Set(req.name),
            description: Set(req.description),
            created_by: Set(created_by),
            created_at: Set(now.timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("创建题库失败: {e}")))?;

        Ok(result.into_question_bank())
    }

    /// 通过 ID 获取题库
    pub async fn get_question_bank_by_id_impl(&self, id: i64) -> Result<Option<QuestionBank>> {
        let result = QuestionBanks::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询题库失败: {e}")))?;

        Ok(result.map(|m| m.into_question_bank()))
    }

    /// 创建题目
    pub async fn create_question_impl(
        &self,
        bank_id: i64,
        created_by: i64,
        req: CreateQuestionRequest,
        now: DateTime<Utc>,
    ) -> Result<Question> {
        req.answer_key
            .validate_for(req.question_type)
            .map_err(LmsError::validation)?;

        let model = ActiveModel {
            bank_id: Set(bank_id),
            question_type: Set(req.question_type.to_string()),
            content: Set(req.content),
            answer_key: Set(serde_json::to_string(&req.answer_key)?),
            points: Set(req.points.unwrap_or(1.0)),
            difficulty: Set(req.difficulty.unwrap_or_default().to_string()),
            created_by: Set(created_by),
            created_at: Set(now.timestamp()),
            updated_at: Set(now.timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("创建题目失败: {e}")))?;

        result.into_question()
    }

    /// 通过 ID 获取题目
    pub async fn get_question_by_id_impl(&self, id: i64) -> Result<Option<Question>> {
        let result = Questions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询题目失败: {e}")))?;

        result.map(|m| m.into_question()).transpose()
    }

    /// 列出题库中的题目
    pub async fn list_bank_questions_impl(&self, bank_id: i64) -> Result<Vec<Question>> {
        let results = Questions::find()
            .filter(Column::BankId.eq(bank_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询题目列表失败: {e}")))?;

        results.into_iter().map(|m| m.into_question()).collect()
    }

    /// 题目是否已被某个已发布的考试引用
    pub(crate) async fn question_in_published_exam(&self, question_id: i64) -> Result<bool> {
        let links = ExamQuestions::find()
            .filter(ExamQuestionColumn::QuestionId.eq(question_id))
            .find_also_related(Exams)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询题目引用失败: {e}")))?;

        Ok(links
            .into_iter()
            .any(|(_, exam)| exam.is_some_and(|e| e.is_published)))
    }

    /// 更新题目
    pub async fn update_question_impl(
        &self,
        id: i64,
        req: UpdateQuestionRequest,
        now: DateTime<Utc>,
    ) -> Result<Option<Question>> {
        let Some(existing) = Questions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询题目失败: {e}")))?
        else {
            return Ok(None);
        };

        if self.question_in_published_exam(id).await? {
            return Err(LmsError::conflict(
                "Question is used by a published exam and can no longer be edited",
            ));
        }

        // 合并后再校验题型与答案形态
        let current = existing.clone().into_question()?;
        let question_type = req.question_type.unwrap_or(current.question_type);
        let answer_key = req.answer_key.unwrap_or(current.answer_key);
        answer_key
            .validate_for(question_type)
            .map_err(LmsError::validation)?;

        let mut model: ActiveModel = existing.into();
        model.question_type = Set(question_type.to_string());
        model.answer_key = Set(serde_json::to_string(&answer_key)?);
        if let Some(content) = req.content {
            model.content = Set(content);
        }
        if let Some(points) = req.points {
            model.points = Set(points);
        }
        if let Some(difficulty) = req.difficulty {
            model.difficulty = Set(difficulty.to_string());
        }
        model.updated_at = Set(now.timestamp());

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("更新题目失败: {e}")))?;

        result.into_question().map(Some)
    }
}
