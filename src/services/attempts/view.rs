//! 作答视图：去掉标准答案，按需打乱题目与选项顺序

use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::errors::{LmsError, Result};
use crate::grading::auto_grade::GradingItem;
use crate::models::attempts::entities::{AttemptStatus, ExamAttempt};
use crate::models::attempts::responses::{AttemptView, PresentedQuestion};
use crate::models::exams::entities::Exam;
use crate::storage::Storage;

/// 组装作答视图
///
/// 打乱以作答 ID 为种子，同一次作答每次看到的顺序一致。
pub fn build_attempt_view(
    exam: &Exam,
    items: &[GradingItem],
    attempt: ExamAttempt,
) -> AttemptView {
    let seed = attempt.id as u64;

    let mut questions: Vec<PresentedQuestion> = items
        .iter()
        .map(|item| {
            let mut options = item.question.answer_key.presentable_options();
            if exam.shuffle_options {
                let option_seed = seed ^ (item.question.id as u64).rotate_left(32);
                let mut rng = StdRng::seed_from_u64(option_seed);
                options.shuffle(&mut rng);
            }
            PresentedQuestion {
                question_id: item.question.id,
                question_type: item.question.question_type,
                content: item.question.content.clone(),
                points: item.points(),
                options,
            }
        })
        .collect();

    if exam.shuffle_questions {
        let mut rng = StdRng::seed_from_u64(seed);
        questions.shuffle(&mut rng);
    }

    let passed = match (attempt.status, attempt.score) {
        (AttemptStatus::Graded, Some(score)) => exam.passed(score),
        _ => None,
    };

    AttemptView {
        deadline: exam.attempt_deadline(attempt.started_at),
        passed,
        questions,
        attempt,
    }
}

/// 读取考试与题目后组装视图
pub async fn load_attempt_view(
    storage: &Arc<dyn Storage>,
    attempt: ExamAttempt,
) -> Result<AttemptView> {
    let exam = storage
        .get_exam_by_id(attempt.exam_id)
        .await?
        .ok_or_else(|| LmsError::not_found(format!("Exam {} not found", attempt.exam_id)))?;
    let items = storage.load_grading_items(exam.id).await?;
    Ok(build_attempt_view(&exam, &items, attempt))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attempts::entities::AnswerSheet;
    use crate::models::exams::entities::ExamQuestion;
    use crate::models::questions::entities::{
        AnswerKey, AnswerOption, Difficulty, Question, QuestionType,
    };
    use chrono::{Duration, TimeZone, Utc};

    fn exam(shuffle: bool) -> Exam {
        let start = Utc.with_ymd_and_hms(2026, 5, 4, 8, 0, 0).unwrap();
        Exam {
            id: 1,
            subject_instance_id: 1,
            title: "Quiz".into(),
            description: None,
            max_score: 10.0,
            passing_score: Some(3.0),
            start_time: start,
            end_time: start + Duration::hours(1),
            duration_minutes: 30,
            max_attempts: 2,
            shuffle_questions: shuffle,
            shuffle_options: shuffle,
            is_published: true,
            published_at: Some(start),
            created_by: 1,
            created_at: start,
            updated_at: start,
        }
    }

    fn items(count: i64) -> Vec<GradingItem> {
        let now = Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap();
        (1..=count)
            .map(|id| GradingItem {
                exam_question: ExamQuestion {
                    id: id * 10,
                    exam_id: 1,
                    question_id: id,
                    points: if id == 1 { Some(4.0) } else { None },
                    sort_order: id as i32,
                },
                question: Question {
                    id,
                    bank_id: 1,
                    question_type: QuestionType::SingleChoice,
                    content: format!("Q{id}"),
                    answer_key: AnswerKey::Options {
                        options: (0..4)
                            .map(|o| AnswerOption {
                                id: format!("{id}-{o}"),
                                text: format!("option {o}"),
                                is_correct: o == 0,
                            })
                            .collect(),
                    },
                    points: 1.0,
                    difficulty: Difficulty::Easy,
                    created_by: 1,
                    created_at: now,
                    updated_at: now,
                },
            })
            .collect()
    }

    fn attempt(exam: &Exam, id: i64) -> ExamAttempt {
        ExamAttempt {
            id,
            exam_id: exam.id,
            student_id: 9,
            attempt_number: 1,
            status: AttemptStatus::InProgress,
            started_at: exam.start_time + Duration::minutes(45),
            submitted_at: None,
            score: None,
            correct_count: None,
            total_questions: 6,
            answers: AnswerSheet::new(),
        }
    }

    #[test]
    fn test_view_keeps_order_without_shuffle() {
        let exam = exam(false);
        let view = build_attempt_view(&exam, &items(6), attempt(&exam, 3));

        let order: Vec<i64> = view.questions.iter().map(|q| q.question_id).collect();
        assert_eq!(order, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(view.questions[0].points, 4.0);
        assert_eq!(view.questions[1].points, 1.0);
        assert_eq!(view.questions[0].options[0].id, "1-0");
        // 截止时间受窗口结束限制
        assert_eq!(view.deadline, exam.end_time);
        assert_eq!(view.passed, None);
    }

    #[test]
    fn test_shuffle_is_stable_per_attempt() {
        let exam = exam(true);
        let first = build_attempt_view(&exam, &items(6), attempt(&exam, 42));
        let again = build_attempt_view(&exam, &items(6), attempt(&exam, 42));

        let ids = |v: &AttemptView| v.questions.iter().map(|q| q.question_id).collect::<Vec<_>>();
        assert_eq!(ids(&first), ids(&again));

        let mut sorted = ids(&first);
        sorted.sort();
        assert_eq!(sorted, vec![1, 2, 3, 4, 5, 6]);

        for q in &first.questions {
            assert_eq!(q.options.len(), 4);
        }
    }

    #[test]
    fn test_passed_reported_after_grading() {
        let exam = exam(false);
        let mut graded = attempt(&exam, 5);
        graded.status = AttemptStatus::Graded;
        graded.score = Some(4.0);
        let view = build_attempt_view(&exam, &items(2), graded);
        assert_eq!(view.passed, Some(true));

        let mut failed = attempt(&exam, 6);
        failed.status = AttemptStatus::Graded;
        failed.score = Some(1.0);
        let view = build_attempt_view(&exam, &items(2), failed);
        assert_eq!(view.passed, Some(false));
    }
}
