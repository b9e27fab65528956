use chrono::{DateTime, Duration, Utc};
use sea_orm::{ConnectOptions, Database};
use serde_json::json;

use super::SeaOrmStorage;
use crate::errors::LmsError;
use crate::grading::gpa;
use crate::models::assignments::requests::CreateAssignmentRequest;
use crate::models::attempts::entities::AttemptStatus;
use crate::models::calendar::requests::{
    CreateAcademicYearRequest, CreateGradingPeriodRequest, CreateSemesterRequest,
};
use crate::models::catalog::requests::{CreateSubjectInstanceRequest, CreateSubjectRequest};
use crate::models::exams::requests::{AddExamQuestionRequest, CreateExamRequest};
use crate::models::grades::requests::{CreateGradeRequest, UpdateGradeRequest};
use crate::models::questions::entities::{AnswerKey, AnswerOption, QuestionType};
use crate::models::questions::requests::{CreateQuestionBankRequest, CreateQuestionRequest};
use crate::models::submissions::entities::SubmissionStatus;
use crate::models::submissions::requests::{CreateSubmissionRequest, GradeSubmissionRequest};

const TEACHER: i64 = 1;
const STUDENT: i64 = 100;

struct Fixture {
    storage: SeaOrmStorage,
    semester_id: i64,
    subject_id: i64,
    instance_id: i64,
}

async fn memory_storage() -> SeaOrmStorage {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await.expect("connect sqlite");
    SeaOrmStorage::from_connection(db)
        .await
        .expect("run migrations")
}

async fn fixture() -> Fixture {
    let storage = memory_storage().await;
    let year = storage
        .create_academic_year_impl(CreateAcademicYearRequest {
            name: "2025-2026".into(),
            start_year: 2025,
        })
        .await
        .unwrap();
    let semester = storage
        .create_semester_impl(CreateSemesterRequest {
            academic_year_id: year.id,
            number: 1,
            name: "Fall".into(),
        })
        .await
        .unwrap();
    let subject = storage
        .create_subject_impl(CreateSubjectRequest {
            code: "MATH101".into(),
            name: "Mathematics".into(),
            credits: 3.0,
        })
        .await
        .unwrap();
    let instance = storage
        .create_subject_instance_impl(CreateSubjectInstanceRequest {
            subject_id: subject.id,
            semester_id: semester.id,
            teacher_id: Some(TEACHER),
        })
        .await
        .unwrap();
    storage
        .enroll_student_impl(instance.id, STUDENT, Utc::now())
        .await
        .unwrap();

    Fixture {
        storage,
        semester_id: semester.id,
        subject_id: subject.id,
        instance_id: instance.id,
    }
}

fn single_choice(content: &str) -> CreateQuestionRequest {
    CreateQuestionRequest {
        question_type: QuestionType::SingleChoice,
        content: content.into(),
        answer_key: AnswerKey::Options {
            options: vec![
                AnswerOption {
                    id: "a".into(),
                    text: "right".into(),
                    is_correct: true,
                },
                AnswerOption {
                    id: "b".into(),
                    text: "wrong".into(),
                    is_correct: false,
                },
            ],
        },
        points: Some(1.0),
        difficulty: None,
    }
}

/// 发布一场含两道单选题的考试，返回 (考试 ID, [题目 ID])
async fn published_exam(fx: &Fixture, max_attempts: i32, now: DateTime<Utc>) -> (i64, Vec<i64>) {
    let bank = fx
        .storage
        .create_question_bank_impl(
            TEACHER,
            CreateQuestionBankRequest {
                subject_id: fx.subject_id,
                name: "Unit 1".into(),
                description: None,
            },
            now,
        )
        .await
        .unwrap();
    let exam = fx
        .storage
        .create_exam_impl(
            TEACHER,
            CreateExamRequest {
                subject_instance_id: fx.instance_id,
                title: "Quiz".into(),
                description: None,
                max_score: 2.0,
                passing_score: Some(1.0),
                start_time: now - Duration::hours(1),
                end_time: now + Duration::hours(1),
                duration_minutes: 30,
                max_attempts: Some(max_attempts),
                shuffle_questions: None,
                shuffle_options: None,
            },
            now,
        )
        .await
        .unwrap();

    let mut question_ids = Vec::new();
    for content in ["Q1", "Q2"] {
        let question = fx
            .storage
            .create_question_impl(bank.id, TEACHER, single_choice(content), now)
            .await
            .unwrap();
        fx.storage
            .add_exam_question_impl(
                exam.id,
                AddExamQuestionRequest {
                    question_id: question.id,
                    points: None,
                    sort_order: None,
                },
            )
            .await
            .unwrap();
        question_ids.push(question.id);
    }
    fx.storage.publish_exam_impl(exam.id, now).await.unwrap();
    (exam.id, question_ids)
}

fn grade_row(instance_id: i64, period: Option<i64>, score: f64) -> CreateGradeRequest {
    CreateGradeRequest {
        student_id: STUDENT,
        subject_instance_id: instance_id,
        grading_period_id: period,
        classwork_score: Some(score),
        midterm_score: Some(score),
        final_score: Some(score),
        remarks: None,
    }
}

#[tokio::test]
async fn test_exam_attempt_end_to_end() {
    let fx = fixture().await;
    let now = Utc::now();
    let (exam_id, questions) = published_exam(&fx, 1, now).await;

    let started = fx
        .storage
        .start_attempt_impl(exam_id, STUDENT, now)
        .await
        .unwrap();
    assert!(!started.resumed);
    assert_eq!(started.attempt.attempt_number, 1);
    assert_eq!(started.attempt.total_questions, 2);

    let attempt_id = started.attempt.id;
    let grace = Duration::seconds(30);
    fx.storage
        .save_attempt_answer_impl(attempt_id, questions[0], json!("a"), now, grace)
        .await
        .unwrap();
    fx.storage
        .save_attempt_answer_impl(attempt_id, questions[1], json!("a"), now, grace)
        .await
        .unwrap();
    // 覆盖第二题答案
    fx.storage
        .save_attempt_answer_impl(attempt_id, questions[1], json!("b"), now, grace)
        .await
        .unwrap();

    let graded = fx.storage.submit_attempt_impl(attempt_id, now).await.unwrap();
    assert_eq!(graded.status, AttemptStatus::Graded);
    assert_eq!(graded.score, Some(1.0));
    assert_eq!(graded.correct_count, Some(1));
    assert_eq!(graded.total_questions, 2);
    assert_eq!(graded.answers.len(), 2);
    assert_eq!(graded.answers[&questions[0]].is_correct, Some(true));
    assert_eq!(graded.answers[&questions[1]].is_correct, Some(false));
    assert_eq!(graded.answers[&questions[1]].points, Some(0.0));

    let again = fx.storage.start_attempt_impl(exam_id, STUDENT, now).await;
    assert!(matches!(again, Err(LmsError::AttemptLimit(_))));
}

#[tokio::test]
async fn test_start_attempt_resumes_in_progress() {
    let fx = fixture().await;
    let now = Utc::now();
    let (exam_id, _) = published_exam(&fx, 2, now).await;

    let first = fx
        .storage
        .start_attempt_impl(exam_id, STUDENT, now)
        .await
        .unwrap();
    let second = fx
        .storage
        .start_attempt_impl(exam_id, STUDENT, now)
        .await
        .unwrap();
    assert!(second.resumed);
    assert_eq!(first.attempt.id, second.attempt.id);

    let attempts = fx
        .storage
        .list_student_attempts_impl(exam_id, STUDENT)
        .await
        .unwrap();
    assert_eq!(attempts.len(), 1);
}

#[tokio::test]
async fn test_attempt_ceiling_and_numbering() {
    let fx = fixture().await;
    let now = Utc::now();
    let (exam_id, _) = published_exam(&fx, 2, now).await;

    for expected in 1..=2 {
        let started = fx
            .storage
            .start_attempt_impl(exam_id, STUDENT, now)
            .await
            .unwrap();
        assert_eq!(started.attempt.attempt_number, expected);
        fx.storage
            .submit_attempt_impl(started.attempt.id, now)
            .await
            .unwrap();
    }

    let third = fx.storage.start_attempt_impl(exam_id, STUDENT, now).await;
    assert!(matches!(third, Err(LmsError::AttemptLimit(_))));
}

#[tokio::test]
async fn test_submit_twice_is_state_error() {
    let fx = fixture().await;
    let now = Utc::now();
    let (exam_id, questions) = published_exam(&fx, 1, now).await;

    let started = fx
        .storage
        .start_attempt_impl(exam_id, STUDENT, now)
        .await
        .unwrap();
    let attempt_id = started.attempt.id;
    fx.storage.submit_attempt_impl(attempt_id, now).await.unwrap();

    let resubmit = fx.storage.submit_attempt_impl(attempt_id, now).await;
    assert!(matches!(resubmit, Err(LmsError::InvalidState(_))));

    let late_answer = fx
        .storage
        .save_attempt_answer_impl(attempt_id, questions[0], json!("a"), now, Duration::zero())
        .await;
    assert!(matches!(late_answer, Err(LmsError::InvalidState(_))));
}

#[tokio::test]
async fn test_unanswered_exam_scores_zero() {
    let fx = fixture().await;
    let now = Utc::now();
    let (exam_id, _) = published_exam(&fx, 1, now).await;

    let started = fx
        .storage
        .start_attempt_impl(exam_id, STUDENT, now)
        .await
        .unwrap();
    let graded = fx
        .storage
        .submit_attempt_impl(started.attempt.id, now)
        .await
        .unwrap();
    assert_eq!(graded.score, Some(0.0));
    assert_eq!(graded.correct_count, Some(0));
}

#[tokio::test]
async fn test_unenrolled_student_cannot_start() {
    let fx = fixture().await;
    let now = Utc::now();
    let (exam_id, _) = published_exam(&fx, 1, now).await;

    let result = fx.storage.start_attempt_impl(exam_id, 999, now).await;
    assert!(matches!(result, Err(LmsError::NotFound(_))));
}

#[tokio::test]
async fn test_submission_lifecycle_with_late_penalty() {
    let fx = fixture().await;
    let now = Utc::now();
    let assignment = fx
        .storage
        .create_assignment_impl(
            TEACHER,
            CreateAssignmentRequest {
                subject_instance_id: fx.instance_id,
                title: "Essay".into(),
                description: None,
                max_score: 100.0,
                weight: None,
                due_date: now - Duration::days(1),
                allow_late: Some(true),
                late_penalty_percent: Some(10.0),
            },
            now,
        )
        .await
        .unwrap();

    let unpublished = fx
        .storage
        .submit_assignment_impl(
            assignment.id,
            STUDENT,
            CreateSubmissionRequest {
                content: Some("draft".into()),
                files: None,
            },
            now,
        )
        .await;
    assert!(matches!(unpublished, Err(LmsError::Validation(_))));

    fx.storage
        .publish_assignment_impl(assignment.id, now)
        .await
        .unwrap();
    let submission = fx
        .storage
        .submit_assignment_impl(
            assignment.id,
            STUDENT,
            CreateSubmissionRequest {
                content: Some("final".into()),
                files: Some(vec!["report.pdf".into()]),
            },
            now,
        )
        .await
        .unwrap();
    assert!(submission.is_late);
    assert_eq!(submission.status, SubmissionStatus::Submitted);
    assert_eq!(submission.files, vec!["report.pdf".to_string()]);

    let duplicate = fx
        .storage
        .submit_assignment_impl(
            assignment.id,
            STUDENT,
            CreateSubmissionRequest {
                content: Some("again".into()),
                files: None,
            },
            now,
        )
        .await;
    assert!(matches!(duplicate, Err(LmsError::Conflict(_))));

    let over_max = fx
        .storage
        .grade_submission_impl(
            submission.id,
            TEACHER,
            GradeSubmissionRequest {
                score: 101.0,
                feedback: None,
            },
            now,
        )
        .await;
    assert!(matches!(over_max, Err(LmsError::Validation(_))));

    let graded = fx
        .storage
        .grade_submission_impl(
            submission.id,
            TEACHER,
            GradeSubmissionRequest {
                score: 80.0,
                feedback: Some("ok".into()),
            },
            now,
        )
        .await
        .unwrap();
    assert_eq!(graded.status, SubmissionStatus::Graded);
    assert_eq!(graded.score, Some(72.0));
    assert_eq!(graded.graded_by, Some(TEACHER));

    let returned = fx
        .storage
        .return_submission_impl(submission.id, Some("revise".into()), now)
        .await
        .unwrap();
    assert_eq!(returned.status, SubmissionStatus::Returned);
    assert_eq!(returned.score, Some(72.0));

    let resubmitted = fx
        .storage
        .submit_assignment_impl(
            assignment.id,
            STUDENT,
            CreateSubmissionRequest {
                content: Some("revised".into()),
                files: None,
            },
            now,
        )
        .await
        .unwrap();
    assert_eq!(resubmitted.id, submission.id);
    assert_eq!(resubmitted.status, SubmissionStatus::Submitted);
    assert_eq!(resubmitted.content.as_deref(), Some("revised"));
}

#[tokio::test]
async fn test_late_submission_rejected_when_not_allowed() {
    let fx = fixture().await;
    let now = Utc::now();
    let assignment = fx
        .storage
        .create_assignment_impl(
            TEACHER,
            CreateAssignmentRequest {
                subject_instance_id: fx.instance_id,
                title: "Worksheet".into(),
                description: None,
                max_score: 10.0,
                weight: None,
                due_date: now - Duration::minutes(1),
                allow_late: Some(false),
                late_penalty_percent: None,
            },
            now,
        )
        .await
        .unwrap();
    fx.storage
        .publish_assignment_impl(assignment.id, now)
        .await
        .unwrap();

    let result = fx
        .storage
        .submit_assignment_impl(
            assignment.id,
            STUDENT,
            CreateSubmissionRequest {
                content: Some("late".into()),
                files: None,
            },
            now,
        )
        .await;
    assert!(matches!(result, Err(LmsError::Validation(_))));
}

#[tokio::test]
async fn test_grade_create_update_recomputes() {
    let fx = fixture().await;
    let now = Utc::now();

    let grade = fx
        .storage
        .create_grade_impl(grade_row(fx.instance_id, None, 80.0), TEACHER, now)
        .await
        .unwrap();
    assert_eq!(grade.grade_label, "A");
    assert_eq!(grade.grade_point, Some(4.0));

    let duplicate = fx
        .storage
        .create_grade_impl(grade_row(fx.instance_id, None, 70.0), TEACHER, now)
        .await;
    assert!(matches!(duplicate, Err(LmsError::Conflict(_))));

    let updated = fx
        .storage
        .update_grade_impl(
            grade.id,
            UpdateGradeRequest {
                final_score: Some(40.0),
                ..Default::default()
            },
            TEACHER,
            now,
        )
        .await
        .unwrap()
        .unwrap();
    // 80*0.3 + 80*0.2 + 40*0.5 = 60
    assert_eq!(updated.classwork_score, Some(80.0));
    assert_eq!(updated.total_score, 60.0);
    assert_eq!(updated.grade_label, "C");
    assert_eq!(updated.grade_point, Some(2.0));

    let invalid = fx
        .storage
        .update_grade_impl(
            grade.id,
            UpdateGradeRequest {
                midterm_score: Some(120.0),
                ..Default::default()
            },
            TEACHER,
            now,
        )
        .await;
    assert!(matches!(invalid, Err(LmsError::Validation(_))));
}

#[tokio::test]
async fn test_grade_period_must_match_semester() {
    let fx = fixture().await;
    let now = Utc::now();
    let other_year = fx
        .storage
        .create_academic_year_impl(CreateAcademicYearRequest {
            name: "2026-2027".into(),
            start_year: 2026,
        })
        .await
        .unwrap();
    let other_semester = fx
        .storage
        .create_semester_impl(CreateSemesterRequest {
            academic_year_id: other_year.id,
            number: 1,
            name: "Fall".into(),
        })
        .await
        .unwrap();
    let foreign_period = fx
        .storage
        .create_grading_period_impl(CreateGradingPeriodRequest {
            semester_id: other_semester.id,
            name: "Midterm".into(),
            sequence: None,
        })
        .await
        .unwrap();

    let result = fx
        .storage
        .create_grade_impl(
            grade_row(fx.instance_id, Some(foreign_period.id), 70.0),
            TEACHER,
            now,
        )
        .await;
    assert!(matches!(result, Err(LmsError::Validation(_))));
}

#[tokio::test]
async fn test_bulk_upsert_matches_null_period_and_continues_on_error() {
    let fx = fixture().await;
    let now = Utc::now();

    let first = fx
        .storage
        .bulk_upsert_grades_impl(vec![grade_row(fx.instance_id, None, 70.0)], TEACHER, now)
        .await
        .unwrap();
    assert_eq!(first.succeeded, 1);
    assert!(first.results[0].created);

    let mut invalid = grade_row(fx.instance_id, None, 50.0);
    invalid.final_score = Some(150.0);
    let second = fx
        .storage
        .bulk_upsert_grades_impl(
            vec![grade_row(fx.instance_id, None, 90.0), invalid],
            TEACHER,
            now,
        )
        .await
        .unwrap();
    assert_eq!(second.succeeded, 1);
    assert_eq!(second.failed, 1);
    assert!(!second.results[0].created);
    assert!(second.results[1].error.is_some());

    let grades = fx
        .storage
        .list_student_grades_impl(STUDENT, Some(fx.instance_id))
        .await
        .unwrap();
    assert_eq!(grades.len(), 1);
    assert_eq!(grades[0].grade_label, "A");
}

#[tokio::test]
async fn test_gpa_from_stored_grades() {
    let fx = fixture().await;
    let now = Utc::now();
    let science = fx
        .storage
        .create_subject_impl(CreateSubjectRequest {
            code: "SCI102".into(),
            name: "Science".into(),
            credits: 2.0,
        })
        .await
        .unwrap();
    let science_instance = fx
        .storage
        .create_subject_instance_impl(CreateSubjectInstanceRequest {
            subject_id: science.id,
            semester_id: fx.semester_id,
            teacher_id: None,
        })
        .await
        .unwrap();

    fx.storage
        .create_grade_impl(grade_row(fx.instance_id, None, 80.0), TEACHER, now)
        .await
        .unwrap();
    fx.storage
        .create_grade_impl(grade_row(science_instance.id, None, 65.0), TEACHER, now)
        .await
        .unwrap();

    let rows = fx
        .storage
        .list_grade_contributions_impl(STUDENT, Some(fx.semester_id))
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);

    // (4.0*3 + 2.5*2) / 5 = 3.4
    let result = gpa::semester_gpa(STUDENT, fx.semester_id, rows);
    assert_eq!(result.gpa, 3.4);
    assert_eq!(result.total_credits, 5.0);

    let empty = fx
        .storage
        .list_grade_contributions_impl(STUDENT, Some(fx.semester_id + 1))
        .await
        .unwrap();
    assert!(empty.is_empty());
}

#[tokio::test]
async fn test_concurrent_start_yields_single_attempt() {
    let fx = fixture().await;
    let now = Utc::now();
    let (exam_id, _) = published_exam(&fx, 3, now).await;

    let (a, b, c) = tokio::join!(
        fx.storage.start_attempt_impl(exam_id, STUDENT, now),
        fx.storage.start_attempt_impl(exam_id, STUDENT, now),
        fx.storage.start_attempt_impl(exam_id, STUDENT, now),
    );
    let ids: Vec<i64> = [a, b, c]
        .into_iter()
        .map(|r| r.unwrap().attempt.id)
        .collect();
    assert!(ids.iter().all(|id| *id == ids[0]));

    let attempts = fx
        .storage
        .list_student_attempts_impl(exam_id, STUDENT)
        .await
        .unwrap();
    assert_eq!(attempts.len(), 1);
    assert_eq!(attempts[0].status, AttemptStatus::InProgress);
}

#[tokio::test]
async fn test_concurrent_first_answers_keep_one_row() {
    let fx = fixture().await;
    let now = Utc::now();
    let (exam_id, questions) = published_exam(&fx, 1, now).await;
    let attempt_id = fx
        .storage
        .start_attempt_impl(exam_id, STUDENT, now)
        .await
        .unwrap()
        .attempt
        .id;

    let grace = Duration::zero();
    let (a, b) = tokio::join!(
        fx.storage
            .save_attempt_answer_impl(attempt_id, questions[0], json!("a"), now, grace),
        fx.storage
            .save_attempt_answer_impl(attempt_id, questions[0], json!("b"), now, grace),
    );
    a.unwrap();
    b.unwrap();

    let attempt = fx
        .storage
        .get_attempt_by_id_impl(attempt_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(attempt.answers.len(), 1);
    let stored = &attempt.answers[&questions[0]].answer;
    assert!(*stored == json!("a") || *stored == json!("b"));
}

#[tokio::test]
async fn test_autosave_racing_submit_never_rewrites_graded_answers() {
    let fx = fixture().await;
    let now = Utc::now();
    let rounds = 5;
    let (exam_id, questions) = published_exam(&fx, rounds, now).await;
    let grace = Duration::zero();

    for _ in 0..rounds {
        let attempt_id = fx
            .storage
            .start_attempt_impl(exam_id, STUDENT, now)
            .await
            .unwrap()
            .attempt
            .id;
        for question in &questions {
            fx.storage
                .save_attempt_answer_impl(attempt_id, *question, json!("a"), now, grace)
                .await
                .unwrap();
        }

        let (save, submit) = tokio::join!(
            fx.storage
                .save_attempt_answer_impl(attempt_id, questions[0], json!("b"), now, grace),
            fx.storage.submit_attempt_impl(attempt_id, now),
        );
        submit.unwrap();

        let graded = fx
            .storage
            .get_attempt_by_id_impl(attempt_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(graded.status, AttemptStatus::Graded);
        assert!(graded.answers.values().all(|a| a.is_correct.is_some()));

        let first = &graded.answers[&questions[0]];
        match save {
            // 保存先完成：交卷按新答案判分
            Ok(_) => {
                assert_eq!(first.answer, json!("b"));
                assert_eq!(first.is_correct, Some(false));
                assert_eq!(graded.score, Some(1.0));
            }
            // 交卷先完成：保存被拒绝，判分结果不变
            Err(e) => {
                assert!(matches!(e, LmsError::InvalidState(_)), "{e}");
                assert_eq!(first.answer, json!("a"));
                assert_eq!(first.is_correct, Some(true));
                assert_eq!(graded.score, Some(2.0));
            }
        }
        let awarded: f64 = graded.answers.values().filter_map(|a| a.points).sum();
        assert_eq!(graded.score, Some(awarded));
    }
}

#[tokio::test]
async fn test_concurrent_resubmits_conflict() {
    let fx = fixture().await;
    let now = Utc::now();
    let assignment = fx
        .storage
        .create_assignment_impl(
            TEACHER,
            CreateAssignmentRequest {
                subject_instance_id: fx.instance_id,
                title: "Lab report".into(),
                description: None,
                max_score: 100.0,
                weight: None,
                due_date: now + Duration::days(1),
                allow_late: Some(false),
                late_penalty_percent: None,
            },
            now,
        )
        .await
        .unwrap();
    fx.storage
        .publish_assignment_impl(assignment.id, now)
        .await
        .unwrap();

    let body = |text: &str| CreateSubmissionRequest {
        content: Some(text.into()),
        files: None,
    };
    let submission = fx
        .storage
        .submit_assignment_impl(assignment.id, STUDENT, body("v1"), now)
        .await
        .unwrap();
    fx.storage
        .return_submission_impl(submission.id, Some("revise".into()), now)
        .await
        .unwrap();

    let (a, b) = tokio::join!(
        fx.storage
            .submit_assignment_impl(assignment.id, STUDENT, body("v2"), now),
        fx.storage
            .submit_assignment_impl(assignment.id, STUDENT, body("v3"), now),
    );
    let (winner, loser) = match (a, b) {
        (Ok(won), Err(lost)) | (Err(lost), Ok(won)) => (won, lost),
        (a, b) => panic!("expected exactly one resubmit to succeed: {a:?} / {b:?}"),
    };
    assert!(matches!(loser, LmsError::Conflict(_)));

    let stored = fx
        .storage
        .get_submission_by_id_impl(submission.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, SubmissionStatus::Submitted);
    assert_eq!(stored.content, winner.content);
}

#[tokio::test]
async fn test_concurrent_null_period_grades_stay_unique() {
    let fx = fixture().await;
    let now = Utc::now();

    let (a, b) = tokio::join!(
        fx.storage
            .create_grade_impl(grade_row(fx.instance_id, None, 90.0), TEACHER, now),
        fx.storage
            .create_grade_impl(grade_row(fx.instance_id, None, 40.0), TEACHER, now),
    );
    assert_eq!([&a, &b].iter().filter(|r| r.is_ok()).count(), 1);
    assert!(
        matches!(a, Err(LmsError::Conflict(_))) || matches!(b, Err(LmsError::Conflict(_)))
    );

    let (x, y) = tokio::join!(
        fx.storage.bulk_upsert_grades_impl(
            vec![grade_row(fx.instance_id, None, 70.0)],
            TEACHER,
            now
        ),
        fx.storage.bulk_upsert_grades_impl(
            vec![grade_row(fx.instance_id, None, 80.0)],
            TEACHER,
            now
        ),
    );
    assert_eq!(x.unwrap().succeeded, 1);
    assert_eq!(y.unwrap().succeeded, 1);

    let grades = fx
        .storage
        .list_student_grades_impl(STUDENT, Some(fx.instance_id))
        .await
        .unwrap();
    assert_eq!(grades.len(), 1);
    assert_eq!(grades[0].grading_period_id, None);
}
