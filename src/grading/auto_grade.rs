//! 自动判分
//!
//! 选择/判断题：提交的选项 ID 集合必须与标准答案中标记正确的选项 ID 集合完全一致。
//! 单选题提交单个 ID（字符串、数字或布尔值均可），多选题提交 ID 数组。
//! 填空/简答题：去除首尾空白并忽略大小写后，与主答案或任一替代答案相等即为正确。
//! 论述/连线题：自动判分一律记 0 分。

use std::collections::BTreeSet;

use serde_json::Value;

use crate::models::attempts::entities::AnswerSheet;
use crate::models::exams::entities::ExamQuestion;
use crate::models::questions::entities::{AnswerKey, Question, QuestionType};

/// 判断单题作答是否正确
pub fn is_correct(question_type: QuestionType, key: &AnswerKey, answer: &Value) -> bool {
    match key {
        AnswerKey::Options { options } if question_type.is_choice() => {
            let expected: BTreeSet<String> = options
                .iter()
                .filter(|o| o.is_correct)
                .map(|o| o.id.trim().to_string())
                .collect();
            // 标准答案没有正确选项时任何作答都判错
            if expected.is_empty() {
                return false;
            }
            selected_option_ids(answer).is_some_and(|given| given == expected)
        }
        AnswerKey::Text {
            correct,
            alternatives,
        } if question_type.is_text() => {
            let Some(given) = answer_text(answer) else {
                return false;
            };
            let given = normalize_text(&given);
            std::iter::once(correct)
                .chain(alternatives.iter())
                .any(|accepted| normalize_text(accepted) == given)
        }
        _ => false,
    }
}

fn scalar_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// 把提交的作答规整为选项 ID 集合，无法识别时返回 None
fn selected_option_ids(answer: &Value) -> Option<BTreeSet<String>> {
    let ids: BTreeSet<String> = match answer {
        Value::Array(items) => items.iter().map(scalar_id).collect::<Option<_>>()?,
        other => BTreeSet::from([scalar_id(other)?]),
    };
    (!ids.is_empty()).then_some(ids)
}

fn answer_text(answer: &Value) -> Option<String> {
    match answer {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn normalize_text(s: &str) -> String {
    s.trim().to_lowercase()
}

/// 待判分的一道考试题
#[derive(Debug, Clone)]
pub struct GradingItem {
    pub exam_question: ExamQuestion,
    pub question: Question,
}

impl GradingItem {
    pub fn points(&self) -> f64 {
        self.exam_question.effective_points(&self.question)
    }
}

/// 单题判分结果
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionResult {
    pub question_id: i64,
    pub answered: bool,
    pub is_correct: bool,
    pub points: f64,
}

/// 整卷判分结果
#[derive(Debug, Clone, PartialEq)]
pub struct GradingOutcome {
    pub score: f64,
    pub correct_count: i32,
    pub results: Vec<QuestionResult>,
}

/// 按考试题目顺序逐题判分；未作答的题目记错、0 分。
/// 答卷中不属于该考试的题目被忽略。
pub fn grade_answer_sheet(items: &[GradingItem], sheet: &AnswerSheet) -> GradingOutcome {
    let mut score = 0.0;
    let mut correct_count = 0;
    let mut results = Vec::with_capacity(items.len());

    for item in items {
        let question_id = item.question.id;
        let recorded = sheet.get(&question_id);
        let correct = recorded.is_some_and(|a| {
            is_correct(item.question.question_type, &item.question.answer_key, &a.answer)
        });
        let points = if correct { item.points() } else { 0.0 };

        if correct {
            correct_count += 1;
            score += points;
        }
        results.push(QuestionResult {
            question_id,
            answered: recorded.is_some(),
            is_correct: correct,
            points,
        });
    }

    GradingOutcome {
        score: super::round2(score),
        correct_count,
        results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attempts::entities::AttemptAnswer;
    use crate::models::questions::entities::{AnswerOption, Difficulty};
    use chrono::Utc;
    use serde_json::json;

    fn choice_key(ids: &[(&str, bool)]) -> AnswerKey {
        AnswerKey::Options {
            options: ids
                .iter()
                .map(|(id, correct)| AnswerOption {
                    id: id.to_string(),
                    text: id.to_uppercase(),
                    is_correct: *correct,
                })
                .collect(),
        }
    }

    fn question(id: i64, question_type: QuestionType, answer_key: AnswerKey) -> Question {
        let now = Utc::now();
        Question {
            id,
            bank_id: 1,
            question_type,
            content: format!("Q{id}"),
            answer_key,
            points: 1.0,
            difficulty: Difficulty::Medium,
            created_by: 1,
            created_at: now,
            updated_at: now,
        }
    }

    fn item(question: Question, points: Option<f64>, sort_order: i32) -> GradingItem {
        GradingItem {
            exam_question: ExamQuestion {
                id: question.id * 10,
                exam_id: 1,
                question_id: question.id,
                points,
                sort_order,
            },
            question,
        }
    }

    fn sheet(entries: &[(i64, Value)]) -> AnswerSheet {
        entries
            .iter()
            .map(|(qid, answer)| {
                (
                    *qid,
                    AttemptAnswer {
                        question_id: *qid,
                        answer: answer.clone(),
                        is_correct: None,
                        points: None,
                        answered_at: Utc::now(),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_single_choice() {
        let key = choice_key(&[("a", false), ("b", true), ("c", false)]);
        assert!(is_correct(QuestionType::SingleChoice, &key, &json!("b")));
        assert!(is_correct(QuestionType::SingleChoice, &key, &json!(" b ")));
        assert!(is_correct(QuestionType::SingleChoice, &key, &json!(["b"])));
        assert!(!is_correct(QuestionType::SingleChoice, &key, &json!("a")));
        assert!(!is_correct(QuestionType::SingleChoice, &key, &json!(null)));
        assert!(!is_correct(QuestionType::SingleChoice, &key, &json!([])));
    }

    #[test]
    fn test_true_false_accepts_bool() {
        let key = choice_key(&[("true", true), ("false", false)]);
        assert!(is_correct(QuestionType::TrueFalse, &key, &json!(true)));
        assert!(is_correct(QuestionType::TrueFalse, &key, &json!("true")));
        assert!(!is_correct(QuestionType::TrueFalse, &key, &json!(false)));
    }

    #[test]
    fn test_numeric_option_ids() {
        let key = choice_key(&[("1", false), ("2", true)]);
        assert!(is_correct(QuestionType::SingleChoice, &key, &json!(2)));
        assert!(!is_correct(QuestionType::SingleChoice, &key, &json!(1)));
    }

    #[test]
    fn test_multiple_choice_requires_exact_set() {
        let key = choice_key(&[("a", true), ("b", false), ("c", true)]);
        assert!(is_correct(QuestionType::MultipleChoice, &key, &json!(["c", "a"])));
        assert!(!is_correct(QuestionType::MultipleChoice, &key, &json!(["a"])));
        assert!(!is_correct(
            QuestionType::MultipleChoice,
            &key,
            &json!(["a", "b", "c"])
        ));
        assert!(!is_correct(
            QuestionType::MultipleChoice,
            &key,
            &json!(["a", {"id": "c"}])
        ));
    }

    #[test]
    fn test_key_without_correct_option_never_matches() {
        let key = choice_key(&[("a", false), ("b", false)]);
        assert!(!is_correct(QuestionType::SingleChoice, &key, &json!("a")));
        assert!(!is_correct(QuestionType::SingleChoice, &key, &json!([])));
    }

    #[test]
    fn test_text_match_ignores_case_and_outer_whitespace() {
        let key = AnswerKey::Text {
            correct: "Photosynthesis".into(),
            alternatives: vec!["photo synthesis".into()],
        };
        assert!(is_correct(QuestionType::FillBlank, &key, &json!("  photosynthesis ")));
        assert!(is_correct(QuestionType::ShortAnswer, &key, &json!("PHOTO SYNTHESIS")));
        assert!(!is_correct(QuestionType::FillBlank, &key, &json!("photo  synthesis")));
        assert!(!is_correct(QuestionType::FillBlank, &key, &json!(null)));

        let numeric = AnswerKey::Text {
            correct: "42".into(),
            alternatives: vec![],
        };
        assert!(is_correct(QuestionType::FillBlank, &numeric, &json!(42)));
    }

    #[test]
    fn test_manual_types_score_zero() {
        assert!(!is_correct(QuestionType::Essay, &AnswerKey::Manual, &json!("anything")));
        assert!(!is_correct(QuestionType::Matching, &AnswerKey::Manual, &json!(["a"])));
        // 题型与答案形态不符时也不判对
        let key = choice_key(&[("a", true), ("b", false)]);
        assert!(!is_correct(QuestionType::FillBlank, &key, &json!("a")));
    }

    #[test]
    fn test_two_single_choice_one_right() {
        let items = vec![
            item(
                question(1, QuestionType::SingleChoice, choice_key(&[("a", true), ("b", false)])),
                None,
                0,
            ),
            item(
                question(2, QuestionType::SingleChoice, choice_key(&[("a", false), ("b", true)])),
                None,
                1,
            ),
        ];
        let outcome = grade_answer_sheet(&items, &sheet(&[(1, json!("a")), (2, json!("a"))]));
        assert_eq!(outcome.score, 1.0);
        assert_eq!(outcome.correct_count, 1);
        assert!(outcome.results[0].is_correct);
        assert!(!outcome.results[1].is_correct);
        assert_eq!(outcome.results[1].points, 0.0);
    }

    #[test]
    fn test_unanswered_and_pinned_points() {
        let items = vec![
            item(
                question(1, QuestionType::SingleChoice, choice_key(&[("a", true), ("b", false)])),
                Some(2.5),
                0,
            ),
            item(
                question(
                    2,
                    QuestionType::FillBlank,
                    AnswerKey::Text {
                        correct: "x".into(),
                        alternatives: vec![],
                    },
                ),
                None,
                1,
            ),
            item(question(3, QuestionType::Essay, AnswerKey::Manual), Some(5.0), 2),
        ];
        let outcome = grade_answer_sheet(
            &items,
            &sheet(&[(1, json!("a")), (3, json!("long text")), (99, json!("stray"))]),
        );
        assert_eq!(outcome.score, 2.5);
        assert_eq!(outcome.correct_count, 1);
        assert_eq!(outcome.results.len(), 3);
        assert!(!outcome.results[1].answered);
        assert!(!outcome.results[1].is_correct);
        assert!(outcome.results[2].answered);
        assert_eq!(outcome.results[2].points, 0.0);
    }

    #[test]
    fn test_grading_independent_of_answer_order() {
        let items: Vec<GradingItem> = (1..=4)
            .map(|i| {
                let key = choice_key(&[("a", true), ("b", false)]);
                item(
                    question(i, QuestionType::SingleChoice, key),
                    Some(0.1 * i as f64),
                    i as i32,
                )
            })
            .collect();

        let forward = sheet(&[(1, json!("a")), (2, json!("b")), (3, json!("a")), (4, json!("a"))]);
        let reverse = sheet(&[(4, json!("a")), (3, json!("a")), (2, json!("b")), (1, json!("a"))]);

        let first = grade_answer_sheet(&items, &forward);
        let second = grade_answer_sheet(&items, &reverse);
        assert_eq!(first, second);
        assert_eq!(first.correct_count, 3);
        assert_eq!(first.score, 0.8);
    }
}
