//! 考试作答存储操作
//!
//! 并发保护依赖数据库约束：
//! - `active_slot` 唯一索引保证同一学生同一考试至多一个进行中的作答
//! - (exam_id, student_id, attempt_number) 唯一索引保证作答编号不重复
//! - (attempt_id, question_id) 唯一索引保证每题一行答案
//! - 交卷以 `status = in_progress` 为条件更新，只有一次能成功
//! - 保存答案先锁定进行中的作答行，与交卷互斥

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use super::SeaOrmStorage;
use crate::entity::exam_answers::{
    ActiveModel as AnswerActiveModel, Column as AnswerColumn, Entity as ExamAnswers,
    Model as AnswerModel,
};
use crate::entity::exam_attempts::{self, ActiveModel, Column, Entity as ExamAttempts, Model};
use crate::entity::exam_questions::{Column as ExamQuestionColumn, Entity as ExamQuestions};
use crate::errors::{LmsError, Result};
use crate::grading::attempt::{self as attempt_rules, StartDecision};
use crate::grading::auto_grade::grade_answer_sheet;
use crate::models::attempts::entities::{AttemptAnswer, AttemptStatus, ExamAttempt};
use crate::storage::StartAttemptOutcome;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

// 并发开始作答时的最大重试次数
const START_RETRIES: usize = 3;
// 并发首次保存同一题时的最大重试次数
const ANSWER_RETRIES: usize = 2;

impl SeaOrmStorage {
    async fn find_attempt_model(&self, id: i64) -> Result<Option<Model>> {
        ExamAttempts::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作答失败: {e}")))
    }

    async fn find_active_attempt(&self, exam_id: i64, student_id: i64) -> Result<Option<Model>> {
        ExamAttempts::find()
            .filter(Column::ActiveSlot.eq(exam_attempts::active_slot(exam_id, student_id)))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询进行中的作答失败: {e}")))
    }

    async fn load_answers(&self, attempt_ids: Vec<i64>) -> Result<Vec<AnswerModel>> {
        if attempt_ids.is_empty() {
            return Ok(Vec::new());
        }
        ExamAnswers::find()
            .filter(AnswerColumn::AttemptId.is_in(attempt_ids))
            .order_by_asc(AnswerColumn::QuestionId)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作答答案失败: {e}")))
    }

    async fn with_answers(&self, model: Model) -> Result<ExamAttempt> {
        let answers = self.load_answers(vec![model.id]).await?;
        Ok(model.into_attempt(answers))
    }

    /// 开始作答
    pub async fn start_attempt_impl(
        &self,
        exam_id: i64,
        student_id: i64,
        now: DateTime<Utc>,
    ) -> Result<StartAttemptOutcome> {
        let exam = self
            .get_exam_by_id_impl(exam_id)
            .await?
            .ok_or_else(|| LmsError::not_found(format!("Exam {exam_id} not found")))?;

        if !self
            .is_enrolled_impl(student_id, exam.subject_instance_id)
            .await?
        {
            return Err(LmsError::not_found(format!(
                "Student {student_id} is not enrolled in the subject of exam {exam_id}"
            )));
        }

        let question_count = self.count_exam_questions(exam_id).await? as usize;

        for _ in 0..START_RETRIES {
            let prior = ExamAttempts::find()
                .filter(Column::ExamId.eq(exam_id))
                .filter(Column::StudentId.eq(student_id))
                .order_by_asc(Column::AttemptNumber)
                .all(&self.db)
                .await
                .map_err(|e| LmsError::database_operation(format!("查询作答记录失败: {e}")))?;
            let summaries: Vec<_> = prior.iter().map(|m| m.summary()).collect();

            match attempt_rules::plan_start(&exam, &summaries, question_count, now)? {
                StartDecision::Resume(id) => {
                    let model = prior
                        .into_iter()
                        .find(|m| m.id == id)
                        .ok_or_else(|| LmsError::not_found(format!("Attempt {id} not found")))?;
                    tracing::info!(
                        "Resumed attempt {} for exam {} student {}",
                        id,
                        exam_id,
                        student_id
                    );
                    return Ok(StartAttemptOutcome {
                        attempt: self.with_answers(model).await?,
                        resumed: true,
                    });
                }
                StartDecision::Create {
                    attempt_number,
                    total_questions,
                } => {
                    let model = ActiveModel {
                        exam_id: Set(exam_id),
                        student_id: Set(student_id),
                        attempt_number: Set(attempt_number),
                        status: Set(AttemptStatus::InProgress.to_string()),
                        active_slot: Set(Some(exam_attempts::active_slot(exam_id, student_id))),
                        started_at: Set(now.timestamp()),
                        submitted_at: Set(None),
                        score: Set(None),
                        correct_count: Set(None),
                        total_questions: Set(total_questions),
                        ..Default::default()
                    };

                    match model.insert(&self.db).await {
                        Ok(created) => {
                            tracing::info!(
                                "Started attempt {} (#{}) for exam {} student {}",
                                created.id,
                                attempt_number,
                                exam_id,
                                student_id
                            );
                            return Ok(StartAttemptOutcome {
                                attempt: created.into_attempt(Vec::new()),
                                resumed: false,
                            });
                        }
                        Err(e) if super::is_unique_violation(&e) => {
                            // 并发请求已创建了作答：返回胜出者的进行中作答，否则重新判定
                            if let Some(active) =
                                self.find_active_attempt(exam_id, student_id).await?
                            {
                                tracing::debug!(
                                    "Concurrent start for exam {} student {} resolved to attempt {}",
                                    exam_id,
                                    student_id,
                                    active.id
                                );
                                return Ok(StartAttemptOutcome {
                                    attempt: self.with_answers(active).await?,
                                    resumed: true,
                                });
                            }
                        }
                        Err(e) => {
                            return Err(LmsError::database_operation(format!(
                                "创建作答失败: {e}"
                            )));
                        }
                    }
                }
            }
        }

        Err(LmsError::conflict(
            "Attempt could not be started due to concurrent requests, please retry",
        ))
    }

    /// 通过 ID 获取作答（含答案）
    pub async fn get_attempt_by_id_impl(&self, id: i64) -> Result<Option<ExamAttempt>> {
        match self.find_attempt_model(id).await? {
            Some(model) => self.with_answers(model).await.map(Some),
            None => Ok(None),
        }
    }

    /// 学生在某考试下的全部作答
    pub async fn list_student_attempts_impl(
        &self,
        exam_id: i64,
        student_id: i64,
    ) -> Result<Vec<ExamAttempt>> {
        let attempts = ExamAttempts::find()
            .filter(Column::ExamId.eq(exam_id))
            .filter(Column::StudentId.eq(student_id))
            .order_by_asc(Column::AttemptNumber)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作答记录失败: {e}")))?;

        let answers = self
            .load_answers(attempts.iter().map(|a| a.id).collect())
            .await?;
        let mut grouped: HashMap<i64, Vec<AnswerModel>> = HashMap::new();
        for answer in answers {
            grouped.entry(answer.attempt_id).or_default().push(answer);
        }

        Ok(attempts
            .into_iter()
            .map(|a| {
                let answers = grouped.remove(&a.id).unwrap_or_default();
                a.into_attempt(answers)
            })
            .collect())
    }

    /// 保存单题答案
    ///
    /// 同一题重复保存时覆盖，并发写入以最后一次为准。写入与交卷在作答行上互斥：
    /// 事务先对 `status = in_progress` 的作答行执行一次空更新取得行锁，
    /// 作答已交卷时返回状态错误，不会改写已判分的答案。
    pub async fn save_attempt_answer_impl(
        &self,
        attempt_id: i64,
        question_id: i64,
        answer: serde_json::Value,
        now: DateTime<Utc>,
        grace: Duration,
    ) -> Result<AttemptAnswer> {
        let attempt = self
            .find_attempt_model(attempt_id)
            .await?
            .ok_or_else(|| LmsError::not_found(format!("Attempt {attempt_id} not found")))?;
        let exam = self
            .get_exam_by_id_impl(attempt.exam_id)
            .await?
            .ok_or_else(|| LmsError::not_found(format!("Exam {} not found", attempt.exam_id)))?;

        attempt_rules::ensure_answerable(attempt.summary().status, &exam, now, grace)?;

        let in_exam = ExamQuestions::find()
            .filter(ExamQuestionColumn::ExamId.eq(exam.id))
            .filter(ExamQuestionColumn::QuestionId.eq(question_id))
            .count(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询考试题目失败: {e}")))?;
        if in_exam == 0 {
            return Err(LmsError::not_found(format!(
                "Question {question_id} is not part of exam {}",
                exam.id
            )));
        }

        let raw = serde_json::to_string(&answer)?;
        let mut last_err = None;
        for _ in 0..ANSWER_RETRIES {
            match self
                .write_answer_locked(attempt_id, question_id, &raw, now)
                .await
            {
                Ok(saved) => {
                    tracing::debug!(
                        "Saved answer for attempt {} question {}",
                        attempt_id,
                        question_id
                    );
                    return Ok(saved.into_answer());
                }
                // 另一个请求先插入了这一题：事务已回滚，重试时走更新分支
                Err(AnswerWriteError::Duplicate(e)) => last_err = Some(e),
                Err(AnswerWriteError::Other(e)) => return Err(e),
            }
        }

        Err(LmsError::database_operation(format!(
            "保存答案失败: {}",
            last_err.unwrap_or_default()
        )))
    }

    /// 在单个事务内锁定进行中的作答并写入答案
    async fn write_answer_locked(
        &self,
        attempt_id: i64,
        question_id: i64,
        raw: &str,
        now: DateTime<Utc>,
    ) -> std::result::Result<AnswerModel, AnswerWriteError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LmsError::database_operation(format!("开启事务失败: {e}")))?;

        lock_in_progress(&txn, attempt_id).await?;

        let existing = ExamAnswers::find()
            .filter(AnswerColumn::AttemptId.eq(attempt_id))
            .filter(AnswerColumn::QuestionId.eq(question_id))
            .one(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询答案失败: {e}")))?;

        let saved = match existing {
            Some(existing) => {
                let mut model: AnswerActiveModel = existing.into();
                model.answer = Set(raw.to_string());
                model.is_correct = Set(None);
                model.points = Set(None);
                model.answered_at = Set(now.timestamp());
                model
                    .update(&txn)
                    .await
                    .map_err(|e| LmsError::database_operation(format!("更新答案失败: {e}")))?
            }
            None => {
                let model = AnswerActiveModel {
                    attempt_id: Set(attempt_id),
                    question_id: Set(question_id),
                    answer: Set(raw.to_string()),
                    is_correct: Set(None),
                    points: Set(None),
                    answered_at: Set(now.timestamp()),
                    ..Default::default()
                };
                match model.insert(&txn).await {
                    Ok(inserted) => inserted,
                    Err(e) if super::is_unique_violation(&e) => {
                        return Err(AnswerWriteError::Duplicate(e.to_string()));
                    }
                    Err(e) => {
                        return Err(LmsError::database_operation(format!("保存答案失败: {e}")).into());
                    }
                }
            }
        };

        txn.commit()
            .await
            .map_err(|e| LmsError::database_operation(format!("提交事务失败: {e}")))?;
        Ok(saved)
    }

    /// 交卷并自动判分
    ///
    /// 状态翻转与读取答案在同一事务内：翻转成功后读到的答案即为最终答案，
    /// 此后的保存请求都会因作答不再进行中而失败。
    pub async fn submit_attempt_impl(
        &self,
        attempt_id: i64,
        now: DateTime<Utc>,
    ) -> Result<ExamAttempt> {
        let model = self
            .find_attempt_model(attempt_id)
            .await?
            .ok_or_else(|| LmsError::not_found(format!("Attempt {attempt_id} not found")))?;
        attempt_rules::ensure_submittable(model.summary().status)?;

        // 已发布考试的题目集合不再变化，可在事务外读取
        let items = self.load_grading_items_impl(model.exam_id).await?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LmsError::database_operation(format!("开启事务失败: {e}")))?;

        let flipped = ExamAttempts::update_many()
            .col_expr(Column::Status, Expr::value(AttemptStatus::Graded.to_string()))
            .col_expr(Column::ActiveSlot, Expr::value(Option::<String>::None))
            .col_expr(Column::SubmittedAt, Expr::value(now.timestamp()))
            .filter(Column::Id.eq(attempt_id))
            .filter(Column::Status.eq(AttemptStatus::InProgress.to_string()))
            .exec(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("更新作答状态失败: {e}")))?;

        if flipped.rows_affected == 0 {
            return Err(LmsError::invalid_state(format!(
                "Attempt {attempt_id} has already been submitted"
            )));
        }

        let answers = ExamAnswers::find()
            .filter(AnswerColumn::AttemptId.eq(attempt_id))
            .order_by_asc(AnswerColumn::QuestionId)
            .all(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作答答案失败: {e}")))?;
        let sheet = model.into_attempt(answers).answers;
        let outcome = grade_answer_sheet(&items, &sheet);

        ExamAttempts::update_many()
            .col_expr(Column::Score, Expr::value(outcome.score))
            .col_expr(Column::CorrectCount, Expr::value(outcome.correct_count))
            .filter(Column::Id.eq(attempt_id))
            .exec(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("写入得分失败: {e}")))?;

        // 先把全部答案标记为错误，再写入判对的题目
        ExamAnswers::update_many()
            .col_expr(AnswerColumn::IsCorrect, Expr::value(false))
            .col_expr(AnswerColumn::Points, Expr::value(0.0_f64))
            .filter(AnswerColumn::AttemptId.eq(attempt_id))
            .exec(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("写入判分结果失败: {e}")))?;

        for result in outcome.results.iter().filter(|r| r.is_correct) {
            ExamAnswers::update_many()
                .col_expr(AnswerColumn::IsCorrect, Expr::value(true))
                .col_expr(AnswerColumn::Points, Expr::value(result.points))
                .filter(AnswerColumn::AttemptId.eq(attempt_id))
                .filter(AnswerColumn::QuestionId.eq(result.question_id))
                .exec(&txn)
                .await
                .map_err(|e| LmsError::database_operation(format!("写入判分结果失败: {e}")))?;
        }

        txn.commit()
            .await
            .map_err(|e| LmsError::database_operation(format!("提交事务失败: {e}")))?;

        tracing::info!(
            "Graded attempt {}: score {} ({} of {} correct)",
            attempt_id,
            outcome.score,
            outcome.correct_count,
            items.len()
        );

        self.get_attempt_by_id_impl(attempt_id)
            .await?
            .ok_or_else(|| LmsError::not_found(format!("Attempt {attempt_id} not found")))
    }
}

/// 写答案的失败分类：唯一冲突可整体重试
enum AnswerWriteError {
    Duplicate(String),
    Other(LmsError),
}

impl From<LmsError> for AnswerWriteError {
    fn from(err: LmsError) -> Self {
        AnswerWriteError::Other(err)
    }
}

/// 对进行中的作答行做一次空更新以取得写锁，再在锁内确认状态
async fn lock_in_progress(txn: &DatabaseTransaction, attempt_id: i64) -> Result<()> {
    let in_progress = AttemptStatus::InProgress.to_string();
    ExamAttempts::update_many()
        .col_expr(Column::Status, Expr::value(in_progress.clone()))
        .filter(Column::Id.eq(attempt_id))
        .filter(Column::Status.eq(in_progress.clone()))
        .exec(txn)
        .await
        .map_err(|e| LmsError::database_operation(format!("锁定作答失败: {e}")))?;

    let locked = ExamAttempts::find_by_id(attempt_id)
        .filter(Column::Status.eq(in_progress))
        .one(txn)
        .await
        .map_err(|e| LmsError::database_operation(format!("查询作答失败: {e}")))?;

    match locked {
        Some(_) => Ok(()),
        None => Err(LmsError::invalid_state(format!(
            "Attempt {attempt_id} is no longer in progress"
        ))),
    }
}
