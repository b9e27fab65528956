//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod assignments;
mod attempts;
mod calendar;
mod catalog;
mod exams;
mod grades;
mod questions;
mod submissions;

#[cfg(test)]
mod tests;

use crate::config::AppConfig;
use crate::errors::{LmsError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, SqlErr};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| LmsError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// 基于已有连接构建存储并运行迁移
    pub async fn from_connection(db: DatabaseConnection) -> Result<Self> {
        Migrator::up(&db, None)
            .await
            .map_err(|e| LmsError::database_operation(format!("数据库迁移失败: {e}")))?;
        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| LmsError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| LmsError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| LmsError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(LmsError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

/// 是否为唯一约束冲突
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

// Storage trait 实现
use crate::grading::auto_grade::GradingItem;
use crate::models::{
    assignments::{entities::Assignment, requests::CreateAssignmentRequest},
    attempts::entities::{AttemptAnswer, ExamAttempt},
    calendar::{
        entities::{AcademicYear, GradingPeriod, Semester},
        requests::{CreateAcademicYearRequest, CreateGradingPeriodRequest, CreateSemesterRequest},
    },
    catalog::{
        entities::{Enrollment, Subject, SubjectInstance},
        requests::{CreateSubjectInstanceRequest, CreateSubjectRequest},
    },
    exams::{
        entities::{Exam, ExamQuestion},
        requests::{AddExamQuestionRequest, CreateExamRequest},
    },
    grades::{
        entities::{Grade, GradeContribution},
        requests::{CreateGradeRequest, UpdateGradeRequest},
        responses::BulkUpsertResponse,
    },
    questions::{
        entities::{Question, QuestionBank},
        requests::{CreateQuestionBankRequest, CreateQuestionRequest, UpdateQuestionRequest},
    },
    submissions::{
        entities::Submission,
        requests::{CreateSubmissionRequest, GradeSubmissionRequest},
    },
};
use crate::storage::{StartAttemptOutcome, Storage};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
impl Storage for SeaOrmStorage {
    // 校历模块
    async fn create_academic_year(&self, req: CreateAcademicYearRequest) -> Result<AcademicYear> {
        self.create_academic_year_impl(req).await
    }

    async fn list_academic_years(&self) -> Result<Vec<AcademicYear>> {
        self.list_academic_years_impl().await
    }

    async fn set_current_academic_year(&self, id: i64) -> Result<Option<AcademicYear>> {
        self.set_current_academic_year_impl(id).await
    }

    async fn create_semester(&self, req: CreateSemesterRequest) -> Result<Semester> {
        self.create_semester_impl(req).await
    }

    async fn get_semester_by_id(&self, id: i64) -> Result<Option<Semester>> {
        self.get_semester_by_id_impl(id).await
    }

    async fn set_current_semester(&self, id: i64) -> Result<Option<Semester>> {
        self.set_current_semester_impl(id).await
    }

    async fn get_current_semester(&self) -> Result<Option<Semester>> {
        self.get_current_semester_impl().await
    }

    async fn create_grading_period(
        &self,
        req: CreateGradingPeriodRequest,
    ) -> Result<GradingPeriod> {
        self.create_grading_period_impl(req).await
    }

    async fn list_grading_periods(&self, semester_id: i64) -> Result<Vec<GradingPeriod>> {
        self.list_grading_periods_impl(semester_id).await
    }

    // 科目与选课模块
    async fn create_subject(&self, req: CreateSubjectRequest) -> Result<Subject> {
        self.create_subject_impl(req).await
    }

    async fn create_subject_instance(
        &self,
        req: CreateSubjectInstanceRequest,
    ) -> Result<SubjectInstance> {
        self.create_subject_instance_impl(req).await
    }

    async fn get_subject_instance_by_id(&self, id: i64) -> Result<Option<SubjectInstance>> {
        self.get_subject_instance_by_id_impl(id).await
    }

    async fn enroll_student(
        &self,
        subject_instance_id: i64,
        student_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Enrollment> {
        self.enroll_student_impl(subject_instance_id, student_id, now)
            .await
    }

    async fn is_enrolled(&self, student_id: i64, subject_instance_id: i64) -> Result<bool> {
        self.is_enrolled_impl(student_id, subject_instance_id).await
    }

    async fn list_enrolled_subject_instances(
        &self,
        student_id: i64,
    ) -> Result<Vec<SubjectInstance>> {
        self.list_enrolled_subject_instances_impl(student_id).await
    }

    // 题库模块
    async fn create_question_bank(
        &self,
        created_by: i64,
        req: CreateQuestionBankRequest,
        now: DateTime<Utc>,
    ) -> Result<QuestionBank> {
        self.create_question_bank_impl(created_by, req, now).await
    }

    async fn get_question_bank_by_id(&self, id: i64) -> Result<Option<QuestionBank>> {
        self.get_question_bank_by_id_impl(id).await
    }

    async fn create_question(
        &self,
        bank_id: i64,
        created_by: i64,
        req: CreateQuestionRequest,
        now: DateTime<Utc>,
    ) -> Result<Question> {
        self.create_question_impl(bank_id, created_by, req, now)
            .await
    }

    async fn get_question_by_id(&self, id: i64) -> Result<Option<Question>> {
        self.get_question_by_id_impl(id).await
    }

    async fn list_bank_questions(&self, bank_id: i64) -> Result<Vec<Question>> {
        self.list_bank_questions_impl(bank_id).await
    }

    async fn update_question(
        &self,
        id: i64,
        req: UpdateQuestionRequest,
        now: DateTime<Utc>,
    ) -> Result<Option<Question>> {
        self.update_question_impl(id, req, now).await
    }

    // 考试模块
    async fn create_exam(
        &self,
        created_by: i64,
        req: CreateExamRequest,
        now: DateTime<Utc>,
    ) -> Result<Exam> {
        self.create_exam_impl(created_by, req, now).await
    }

    async fn get_exam_by_id(&self, id: i64) -> Result<Option<Exam>> {
        self.get_exam_by_id_impl(id).await
    }

    async fn add_exam_question(
        &self,
        exam_id: i64,
        req: AddExamQuestionRequest,
    ) -> Result<ExamQuestion> {
        self.add_exam_question_impl(exam_id, req).await
    }

    async fn list_exam_questions(&self, exam_id: i64) -> Result<Vec<ExamQuestion>> {
        self.list_exam_questions_impl(exam_id).await
    }

    async fn load_grading_items(&self, exam_id: i64) -> Result<Vec<GradingItem>> {
        self.load_grading_items_impl(exam_id).await
    }

    async fn publish_exam(&self, id: i64, now: DateTime<Utc>) -> Result<Option<Exam>> {
        self.publish_exam_impl(id, now).await
    }

    async fn list_exams_for_student(&self, student_id: i64) -> Result<Vec<Exam>> {
        self.list_exams_for_student_impl(student_id).await
    }

    // 作答模块
    async fn start_attempt(
        &self,
        exam_id: i64,
        student_id: i64,
        now: DateTime<Utc>,
    ) -> Result<StartAttemptOutcome> {
        self.start_attempt_impl(exam_id, student_id, now).await
    }

    async fn get_attempt_by_id(&self, id: i64) -> Result<Option<ExamAttempt>> {
        self.get_attempt_by_id_impl(id).await
    }

    async fn list_student_attempts(
        &self,
        exam_id: i64,
        student_id: i64,
    ) -> Result<Vec<ExamAttempt>> {
        self.list_student_attempts_impl(exam_id, student_id).await
    }

    async fn save_attempt_answer(
        &self,
        attempt_id: i64,
        question_id: i64,
        answer: serde_json::Value,
        now: DateTime<Utc>,
        grace: chrono::Duration,
    ) -> Result<AttemptAnswer> {
        self.save_attempt_answer_impl(attempt_id, question_id, answer, now, grace)
            .await
    }

    async fn submit_attempt(&self, attempt_id: i64, now: DateTime<Utc>) -> Result<ExamAttempt> {
        self.submit_attempt_impl(attempt_id, now).await
    }

    // 作业模块
    async fn create_assignment(
        &self,
        created_by: i64,
        req: CreateAssignmentRequest,
        now: DateTime<Utc>,
    ) -> Result<Assignment> {
        self.create_assignment_impl(created_by, req, now).await
    }

    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>> {
        self.get_assignment_by_id_impl(id).await
    }

    async fn publish_assignment(&self, id: i64, now: DateTime<Utc>) -> Result<Option<Assignment>> {
        self.publish_assignment_impl(id, now).await
    }

    async fn list_assignments_for_student(&self, student_id: i64) -> Result<Vec<Assignment>> {
        self.list_assignments_for_student_impl(student_id).await
    }

    // 作业提交模块
    async fn submit_assignment(
        &self,
        assignment_id: i64,
        student_id: i64,
        req: CreateSubmissionRequest,
        now: DateTime<Utc>,
    ) -> Result<Submission> {
        self.submit_assignment_impl(assignment_id, student_id, req, now)
            .await
    }

    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>> {
        self.get_submission_by_id_impl(id).await
    }

    async fn list_assignment_submissions(&self, assignment_id: i64) -> Result<Vec<Submission>> {
        self.list_assignment_submissions_impl(assignment_id).await
    }

    async fn grade_submission(
        &self,
        id: i64,
        grader_id: i64,
        req: GradeSubmissionRequest,
        now: DateTime<Utc>,
    ) -> Result<Submission> {
        self.grade_submission_impl(id, grader_id, req, now).await
    }

    async fn return_submission(
        &self,
        id: i64,
        feedback: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Submission> {
        self.return_submission_impl(id, feedback, now).await
    }

    // 成绩模块
    async fn create_grade(
        &self,
        req: CreateGradeRequest,
        updated_by: i64,
        now: DateTime<Utc>,
    ) -> Result<Grade> {
        self.create_grade_impl(req, updated_by, now).await
    }

    async fn get_grade_by_id(&self, id: i64) -> Result<Option<Grade>> {
        self.get_grade_by_id_impl(id).await
    }

    async fn update_grade(
        &self,
        id: i64,
        req: UpdateGradeRequest,
        updated_by: i64,
        now: DateTime<Utc>,
    ) -> Result<Option<Grade>> {
        self.update_grade_impl(id, req, updated_by, now).await
    }

    async fn bulk_upsert_grades(
        &self,
        rows: Vec<CreateGradeRequest>,
        updated_by: i64,
        now: DateTime<Utc>,
    ) -> Result<BulkUpsertResponse> {
        self.bulk_upsert_grades_impl(rows, updated_by, now).await
    }

    async fn list_student_grades(
        &self,
        student_id: i64,
        subject_instance_id: Option<i64>,
    ) -> Result<Vec<Grade>> {
        self.list_student_grades_impl(student_id, subject_instance_id)
            .await
    }

    async fn list_grade_contributions(
        &self,
        student_id: i64,
        semester_id: Option<i64>,
    ) -> Result<Vec<GradeContribution>> {
        self.list_grade_contributions_impl(student_id, semester_id)
            .await
    }
}
