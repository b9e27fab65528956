use sea_orm_migration::prelude::*;

use crate::m20260301_000001_create_calendar_tables::{GradingPeriods, SubjectInstances, Subjects};

#[derive(DeriveMigrationName)]
pub struct Migration;

fn id_col<T: IntoIden + 'static>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .big_integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建题库表
        manager
            .create_table(
                Table::create()
                    .table(QuestionBanks::Table)
                    .if_not_exists()
                    .col(id_col(QuestionBanks::Id))
                    .col(
                        ColumnDef::new(QuestionBanks::SubjectId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(QuestionBanks::Name).string().not_null())
                    .col(ColumnDef::new(QuestionBanks::Description).text().null())
                    .col(
                        ColumnDef::new(QuestionBanks::CreatedBy)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(QuestionBanks::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(QuestionBanks::Table, QuestionBanks::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建题目表
        manager
            .create_table(
                Table::create()
                    .table(Questions::Table)
                    .if_not_exists()
                    .col(id_col(Questions::Id))
                    .col(ColumnDef::new(Questions::BankId).big_integer().not_null())
                    .col(ColumnDef::new(Questions::QuestionType).string().not_null())
                    .col(ColumnDef::new(Questions::Content).text().not_null())
                    .col(ColumnDef::new(Questions::AnswerKey).text().not_null())
                    .col(
                        ColumnDef::new(Questions::Points)
                            .double()
                            .not_null()
                            .default(1.0),
                    )
                    .col(ColumnDef::new(Questions::Difficulty).string().not_null())
                    .col(ColumnDef::new(Questions::CreatedBy).big_integer().not_null())
                    .col(ColumnDef::new(Questions::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Questions::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Questions::Table, Questions::BankId)
                            .to(QuestionBanks::Table, QuestionBanks::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建考试表
        manager
            .create_table(
                Table::create()
                    .table(Exams::Table)
                    .if_not_exists()
                    .col(id_col(Exams::Id))
                    .col(
                        ColumnDef::new(Exams::SubjectInstanceId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Exams::Title).string().not_null())
                    .col(ColumnDef::new(Exams::Description).text().null())
                    .col(ColumnDef::new(Exams::MaxScore).double().not_null())
                    .col(ColumnDef::new(Exams::PassingScore).double().null())
                    .col(ColumnDef::new(Exams::StartTime).big_integer().not_null())
                    .col(ColumnDef::new(Exams::EndTime).big_integer().not_null())
                    .col(ColumnDef::new(Exams::DurationMinutes).integer().not_null())
                    .col(
                        ColumnDef::new(Exams::MaxAttempts)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Exams::ShuffleQuestions)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Exams::ShuffleOptions)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Exams::IsPublished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Exams::PublishedAt).big_integer().null())
                    .col(ColumnDef::new(Exams::CreatedBy).big_integer().not_null())
                    .col(ColumnDef::new(Exams::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Exams::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Exams::Table, Exams::SubjectInstanceId)
                            .to(SubjectInstances::Table, SubjectInstances::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建考试题目关联表
        manager
            .create_table(
                Table::create()
                    .table(ExamQuestions::Table)
                    .if_not_exists()
                    .col(id_col(ExamQuestions::Id))
                    .col(ColumnDef::new(ExamQuestions::ExamId).big_integer().not_null())
                    .col(
                        ColumnDef::new(ExamQuestions::QuestionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ExamQuestions::Points).double().null())
                    .col(
                        ColumnDef::new(ExamQuestions::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ExamQuestions::Table, ExamQuestions::ExamId)
                            .to(Exams::Table, Exams::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ExamQuestions::Table, ExamQuestions::QuestionId)
                            .to(Questions::Table, Questions::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建作答表
        manager
            .create_table(
                Table::create()
                    .table(ExamAttempts::Table)
                    .if_not_exists()
                    .col(id_col(ExamAttempts::Id))
                    .col(ColumnDef::new(ExamAttempts::ExamId).big_integer().not_null())
                    .col(
                        ColumnDef::new(ExamAttempts::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExamAttempts::AttemptNumber)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ExamAttempts::Status).string().not_null())
                    .col(ColumnDef::new(ExamAttempts::ActiveSlot).string().null())
                    .col(
                        ColumnDef::new(ExamAttempts::StartedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ExamAttempts::SubmittedAt).big_integer().null())
                    .col(ColumnDef::new(ExamAttempts::Score).double().null())
                    .col(ColumnDef::new(ExamAttempts::CorrectCount).integer().null())
                    .col(
                        ColumnDef::new(ExamAttempts::TotalQuestions)
                            .integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ExamAttempts::Table, ExamAttempts::ExamId)
                            .to(Exams::Table, Exams::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建答案表
        manager
            .create_table(
                Table::create()
                    .table(ExamAnswers::Table)
                    .if_not_exists()
                    .col(id_col(ExamAnswers::Id))
                    .col(
                        ColumnDef::new(ExamAnswers::AttemptId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExamAnswers::QuestionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ExamAnswers::Answer).text().not_null())
                    .col(ColumnDef::new(ExamAnswers::IsCorrect).boolean().null())
                    .col(ColumnDef::new(ExamAnswers::Points).double().null())
                    .col(
                        ColumnDef::new(ExamAnswers::AnsweredAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ExamAnswers::Table, ExamAnswers::AttemptId)
                            .to(ExamAttempts::Table, ExamAttempts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建作业表
        manager
            .create_table(
                Table::create()
                    .table(Assignments::Table)
                    .if_not_exists()
                    .col(id_col(Assignments::Id))
                    .col(
                        ColumnDef::new(Assignments::SubjectInstanceId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Assignments::Title).string().not_null())
                    .col(ColumnDef::new(Assignments::Description).text().null())
                    .col(ColumnDef::new(Assignments::MaxScore).double().not_null())
                    .col(
                        ColumnDef::new(Assignments::Weight)
                            .double()
                            .not_null()
                            .default(1.0),
                    )
                    .col(ColumnDef::new(Assignments::DueDate).big_integer().not_null())
                    .col(
                        ColumnDef::new(Assignments::AllowLateSubmission)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Assignments::LatePenaltyPercent)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Assignments::IsPublished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Assignments::PublishedAt).big_integer().null())
                    .col(ColumnDef::new(Assignments::CreatedBy).big_integer().not_null())
                    .col(ColumnDef::new(Assignments::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Assignments::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Assignments::Table, Assignments::SubjectInstanceId)
                            .to(SubjectInstances::Table, SubjectInstances::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建提交表
        manager
            .create_table(
                Table::create()
                    .table(Submissions::Table)
                    .if_not_exists()
                    .col(id_col(Submissions::Id))
                    .col(
                        ColumnDef::new(Submissions::AssignmentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Submissions::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(Submissions::Content).text().null())
                    .col(ColumnDef::new(Submissions::Files).text().null())
                    .col(ColumnDef::new(Submissions::Status).string().not_null())
                    .col(
                        ColumnDef::new(Submissions::SubmittedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Submissions::IsLate)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Submissions::Score).double().null())
                    .col(ColumnDef::new(Submissions::Feedback).text().null())
                    .col(ColumnDef::new(Submissions::GradedBy).big_integer().null())
                    .col(ColumnDef::new(Submissions::GradedAt).big_integer().null())
                    .col(ColumnDef::new(Submissions::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Submissions::Table, Submissions::AssignmentId)
                            .to(Assignments::Table, Assignments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建成绩表
        manager
            .create_table(
                Table::create()
                    .table(Grades::Table)
                    .if_not_exists()
                    .col(id_col(Grades::Id))
                    .col(ColumnDef::new(Grades::StudentId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Grades::SubjectInstanceId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Grades::GradingPeriodId).big_integer().null())
                    // 评分阶段为空时取 0，唯一索引不受 NULL 影响
                    .col(
                        ColumnDef::new(Grades::PeriodKey)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Grades::ClassworkScore).double().null())
                    .col(ColumnDef::new(Grades::MidtermScore).double().null())
                    .col(ColumnDef::new(Grades::FinalScore).double().null())
                    .col(ColumnDef::new(Grades::TotalScore).double().not_null())
                    .col(ColumnDef::new(Grades::Percentage).double().not_null())
                    .col(ColumnDef::new(Grades::GradeLabel).string().not_null())
                    .col(ColumnDef::new(Grades::GradePoint).double().null())
                    .col(ColumnDef::new(Grades::Remarks).text().null())
                    .col(ColumnDef::new(Grades::UpdatedBy).big_integer().null())
                    .col(ColumnDef::new(Grades::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Grades::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Grades::Table, Grades::SubjectInstanceId)
                            .to(SubjectInstances::Table, SubjectInstances::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Grades::Table, Grades::GradingPeriodId)
                            .to(GradingPeriods::Table, GradingPeriods::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_questions_bank_id")
                    .table(Questions::Table)
                    .col(Questions::BankId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_exam_questions_exam_question")
                    .table(ExamQuestions::Table)
                    .col(ExamQuestions::ExamId)
                    .col(ExamQuestions::QuestionId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 同一学生同一考试至多一个进行中的作答（NULL 不参与唯一性比较）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_exam_attempts_active_slot")
                    .table(ExamAttempts::Table)
                    .col(ExamAttempts::ActiveSlot)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_exam_attempts_exam_student_number")
                    .table(ExamAttempts::Table)
                    .col(ExamAttempts::ExamId)
                    .col(ExamAttempts::StudentId)
                    .col(ExamAttempts::AttemptNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_exam_answers_attempt_question")
                    .table(ExamAnswers::Table)
                    .col(ExamAnswers::AttemptId)
                    .col(ExamAnswers::QuestionId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_assignments_subject_instance_id")
                    .table(Assignments::Table)
                    .col(Assignments::SubjectInstanceId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_submissions_assignment_student")
                    .table(Submissions::Table)
                    .col(Submissions::AssignmentId)
                    .col(Submissions::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 一个学生在一个开课实例的每个评分阶段（含汇总行）只有一行成绩
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_grades_student_instance_period")
                    .table(Grades::Table)
                    .col(Grades::StudentId)
                    .col(Grades::SubjectInstanceId)
                    .col(Grades::PeriodKey)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(Grades::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Submissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Assignments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ExamAnswers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ExamAttempts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ExamQuestions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Exams::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Questions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(QuestionBanks::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum QuestionBanks {
    #[sea_orm(iden = "question_banks")]
    Table,
    Id,
    SubjectId,
    Name,
    Description,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Questions {
    #[sea_orm(iden = "questions")]
    Table,
    Id,
    BankId,
    QuestionType,
    Content,
    AnswerKey,
    Points,
    Difficulty,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Exams {
    #[sea_orm(iden = "exams")]
    Table,
    Id,
    SubjectInstanceId,
    Title,
    Description,
    MaxScore,
    PassingScore,
    StartTime,
    EndTime,
    DurationMinutes,
    MaxAttempts,
    ShuffleQuestions,
    ShuffleOptions,
    IsPublished,
    PublishedAt,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ExamQuestions {
    #[sea_orm(iden = "exam_questions")]
    Table,
    Id,
    ExamId,
    QuestionId,
    Points,
    SortOrder,
}

#[derive(DeriveIden)]
enum ExamAttempts {
    #[sea_orm(iden = "exam_attempts")]
    Table,
    Id,
    ExamId,
    StudentId,
    AttemptNumber,
    Status,
    ActiveSlot,
    StartedAt,
    SubmittedAt,
    Score,
    CorrectCount,
    TotalQuestions,
}

#[derive(DeriveIden)]
enum ExamAnswers {
    #[sea_orm(iden = "exam_answers")]
    Table,
    Id,
    AttemptId,
    QuestionId,
    Answer,
    IsCorrect,
    Points,
    AnsweredAt,
}

#[derive(DeriveIden)]
enum Assignments {
    #[sea_orm(iden = "assignments")]
    Table,
    Id,
    SubjectInstanceId,
    Title,
    Description,
    MaxScore,
    Weight,
    DueDate,
    AllowLateSubmission,
    LatePenaltyPercent,
    IsPublished,
    PublishedAt,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Submissions {
    #[sea_orm(iden = "submissions")]
    Table,
    Id,
    AssignmentId,
    StudentId,
    Content,
    Files,
    Status,
    SubmittedAt,
    IsLate,
    Score,
    Feedback,
    GradedBy,
    GradedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Grades {
    #[sea_orm(iden = "grades")]
    Table,
    Id,
    StudentId,
    SubjectInstanceId,
    GradingPeriodId,
    PeriodKey,
    ClassworkScore,
    MidtermScore,
    FinalScore,
    TotalScore,
    Percentage,
    GradeLabel,
    GradePoint,
    Remarks,
    UpdatedBy,
    CreatedAt,
    UpdatedAt,
}
