use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

use crate::errors::Result;
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

pub mod sea_orm_storage;

/// 开始作答的结果
#[derive(Debug, Clone)]
pub struct StartAttemptOutcome {
    pub attempt: ExamAttempt,
    // 返回的是已有的进行中作答
    pub resumed: bool,
}

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 校历管理方法
    // 创建学年
    async fn create_academic_year(&self, req: CreateAcademicYearRequest) -> Result<AcademicYear>;
    // 列出学年（按起始年份升序）
    async fn list_academic_years(&self) -> Result<Vec<AcademicYear>>;
    // 设为当前学年（清除其余学年的当前标记）
    async fn set_current_academic_year(&self, id: i64) -> Result<Option<AcademicYear>>;
    // 创建学期
    async fn create_semester(&self, req: CreateSemesterRequest) -> Result<Semester>;
    // 通过ID获取学期
    async fn get_semester_by_id(&self, id: i64) -> Result<Option<Semester>>;
    // 设为当前学期，同时把所属学年设为当前学年
    async fn set_current_semester(&self, id: i64) -> Result<Option<Semester>>;
    // 获取当前学期
    async fn get_current_semester(&self) -> Result<Option<Semester>>;
    // 创建评分阶段
    async fn create_grading_period(&self, req: CreateGradingPeriodRequest)
    -> Result<GradingPeriod>;
    // 列出学期内的评分阶段
    async fn list_grading_periods(&self, semester_id: i64) -> Result<Vec<GradingPeriod>>;

    /// 科目与选课方法
    // 创建科目
    async fn create_subject(&self, req: CreateSubjectRequest) -> Result<Subject>;
    // 创建开课实例
    async fn create_subject_instance(
        &self,
        req: CreateSubjectInstanceRequest,
    ) -> Result<SubjectInstance>;
    // 通过ID获取开课实例
    async fn get_subject_instance_by_id(&self, id: i64) -> Result<Option<SubjectInstance>>;
    // 学生选课
    async fn enroll_student(
        &self,
        subject_instance_id: i64,
        student_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Enrollment>;
    // 学生是否选了某开课实例
    async fn is_enrolled(&self, student_id: i64, subject_instance_id: i64) -> Result<bool>;
    // 学生已选的开课实例
    async fn list_enrolled_subject_instances(&self, student_id: i64)
    -> Result<Vec<SubjectInstance>>;

    /// 题库方法
    // 创建题库
    async fn create_question_bank(
        &self,
        created_by: i64,
        req: CreateQuestionBankRequest,
        now: DateTime<Utc>,
    ) -> Result<QuestionBank>;
    // 通过ID获取题库
    async fn get_question_bank_by_id(&self, id: i64) -> Result<Option<QuestionBank>>;
    // 创建题目
    async fn create_question(
        &self,
        bank_id: i64,
        created_by: i64,
        req: CreateQuestionRequest,
        now: DateTime<Utc>,
    ) -> Result<Question>;
    // 通过ID获取题目
    async fn get_question_by_id(&self, id: i64) -> Result<Option<Question>>;
    // 列出题库中的题目
    async fn list_bank_questions(&self, bank_id: i64) -> Result<Vec<Question>>;
    // 更新题目（已被发布的考试引用时拒绝）
    async fn update_question(
        &self,
        id: i64,
        req: UpdateQuestionRequest,
        now: DateTime<Utc>,
    ) -> Result<Option<Question>>;

    /// 考试方法
    // 创建考试
    async fn create_exam(
        &self,
        created_by: i64,
        req: CreateExamRequest,
        now: DateTime<Utc>,
    ) -> Result<Exam>;
    // 通过ID获取考试
    async fn get_exam_by_id(&self, id: i64) -> Result<Option<Exam>>;
    // 向考试添加题目
    async fn add_exam_question(
        &self,
        exam_id: i64,
        req: AddExamQuestionRequest,
    ) -> Result<ExamQuestion>;
    // 列出考试题目（按顺序）
    async fn list_exam_questions(&self, exam_id: i64) -> Result<Vec<ExamQuestion>>;
    // 考试题目及题目内容（按顺序）
    async fn load_grading_items(&self, exam_id: i64) -> Result<Vec<GradingItem>>;
    // 发布考试
    async fn publish_exam(&self, id: i64, now: DateTime<Utc>) -> Result<Option<Exam>>;
    // 学生可见的考试（已发布且已选课）
    async fn list_exams_for_student(&self, student_id: i64) -> Result<Vec<Exam>>;

    /// 作答方法
    // 开始作答（已有进行中的作答时原样返回）
    async fn start_attempt(
        &self,
        exam_id: i64,
        student_id: i64,
        now: DateTime<Utc>,
    ) -> Result<StartAttemptOutcome>;
    // 通过ID获取作答（含答案）
    async fn get_attempt_by_id(&self, id: i64) -> Result<Option<ExamAttempt>>;
    // 学生在某考试下的全部作答
    async fn list_student_attempts(&self, exam_id: i64, student_id: i64)
    -> Result<Vec<ExamAttempt>>;
    // 保存单题答案（按题目覆盖），结束时间之后 `grace` 内仍接受
    async fn save_attempt_answer(
        &self,
        attempt_id: i64,
        question_id: i64,
        answer: serde_json::Value,
        now: DateTime<Utc>,
        grace: Duration,
    ) -> Result<AttemptAnswer>;
    // 交卷并自动判分
    async fn submit_attempt(&self, attempt_id: i64, now: DateTime<Utc>) -> Result<ExamAttempt>;

    /// 作业方法
    // 创建作业
    async fn create_assignment(
        &self,
        created_by: i64,
        req: CreateAssignmentRequest,
        now: DateTime<Utc>,
    ) -> Result<Assignment>;
    // 通过ID获取作业
    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>>;
    // 发布作业
    async fn publish_assignment(&self, id: i64, now: DateTime<Utc>) -> Result<Option<Assignment>>;
    // 学生可见的作业（已发布且已选课）
    async fn list_assignments_for_student(&self, student_id: i64) -> Result<Vec<Assignment>>;

    /// 作业提交方法
    // 提交作业（待提交/被退回时原地更新）
    async fn submit_assignment(
        &self,
        assignment_id: i64,
        student_id: i64,
        req: CreateSubmissionRequest,
        now: DateTime<Utc>,
    ) -> Result<Submission>;
    // 通过ID获取提交
    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>>;
    // 列出作业的全部提交
    async fn list_assignment_submissions(&self, assignment_id: i64) -> Result<Vec<Submission>>;
    // 批改提交
    async fn grade_submission(
        &self,
        id: i64,
        grader_id: i64,
        req: GradeSubmissionRequest,
        now: DateTime<Utc>,
    ) -> Result<Submission>;
    // 退回提交
    async fn return_submission(
        &self,
        id: i64,
        feedback: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Submission>;

    /// 成绩方法
    // 录入成绩
    async fn create_grade(
        &self,
        req: CreateGradeRequest,
        updated_by: i64,
        now: DateTime<Utc>,
    ) -> Result<Grade>;
    // 通过ID获取成绩
    async fn get_grade_by_id(&self, id: i64) -> Result<Option<Grade>>;
    // 更新成绩
    async fn update_grade(
        &self,
        id: i64,
        req: UpdateGradeRequest,
        updated_by: i64,
        now: DateTime<Utc>,
    ) -> Result<Option<Grade>>;
    // 批量录入（逐行创建或更新，互不影响）
    async fn bulk_upsert_grades(
        &self,
        rows: Vec<CreateGradeRequest>,
        updated_by: i64,
        now: DateTime<Utc>,
    ) -> Result<BulkUpsertResponse>;
    // 列出学生成绩
    async fn list_student_grades(
        &self,
        student_id: i64,
        subject_instance_id: Option<i64>,
    ) -> Result<Vec<Grade>>;
    // 参与 GPA 计算的成绩行（绩点非空），可限定学期
    async fn list_grade_contributions(
        &self,
        student_id: i64,
        semester_id: Option<i64>,
    ) -> Result<Vec<GradeContribution>>;
}

/// 按配置创建存储后端（启动时运行迁移）
pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
