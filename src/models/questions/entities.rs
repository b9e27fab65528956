use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 题型
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub enum QuestionType {
    SingleChoice,   // 单选
    MultipleChoice, // 多选
    TrueFalse,      // 判断
    FillBlank,      // 填空
    ShortAnswer,    // 简答
    Essay,          // 论述（人工批改）
    Matching,       // 连线（人工批改）
}

impl QuestionType {
    pub const SINGLE_CHOICE: &'static str = "single_choice";
    pub const MULTIPLE_CHOICE: &'static str = "multiple_choice";
    pub const TRUE_FALSE: &'static str = "true_false";
    pub const FILL_BLANK: &'static str = "fill_blank";
    pub const SHORT_ANSWER: &'static str = "short_answer";
    pub const ESSAY: &'static str = "essay";
    pub const MATCHING: &'static str = "matching";

    /// 选项类题型（答案为选项 ID）
    pub fn is_choice(&self) -> bool {
        matches!(
            self,
            QuestionType::SingleChoice | QuestionType::MultipleChoice | QuestionType::TrueFalse
        )
    }

    /// 文本比对类题型
    pub fn is_text(&self) -> bool {
        matches!(self, QuestionType::FillBlank | QuestionType::ShortAnswer)
    }
}

impl<'de> Deserialize<'de> for QuestionType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            QuestionType::SingleChoice => QuestionType::SINGLE_CHOICE,
            QuestionType::MultipleChoice => QuestionType::MULTIPLE_CHOICE,
            QuestionType::TrueFalse => QuestionType::TRUE_FALSE,
            QuestionType::FillBlank => QuestionType::FILL_BLANK,
            QuestionType::ShortAnswer => QuestionType::SHORT_ANSWER,
            QuestionType::Essay => QuestionType::ESSAY,
            QuestionType::Matching => QuestionType::MATCHING,
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            QuestionType::SINGLE_CHOICE => Ok(QuestionType::SingleChoice),
            QuestionType::MULTIPLE_CHOICE => Ok(QuestionType::MultipleChoice),
            QuestionType::TRUE_FALSE => Ok(QuestionType::TrueFalse),
            QuestionType::FILL_BLANK => Ok(QuestionType::FillBlank),
            QuestionType::SHORT_ANSWER => Ok(QuestionType::ShortAnswer),
            QuestionType::ESSAY => Ok(QuestionType::Essay),
            QuestionType::MATCHING => Ok(QuestionType::Matching),
            _ => Err(format!("Invalid question type: {s}")),
        }
    }
}

// 难度
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(format!("Invalid difficulty: {s}")),
        }
    }
}

// 选项
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct AnswerOption {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

// 答案（标准答案的形态由题型决定）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub enum AnswerKey {
    /// 单选/多选/判断：带正确标记的选项列表
    Options { options: Vec<AnswerOption> },
    /// 填空/简答：主答案 + 可接受的替代答案
    Text {
        correct: String,
        #[serde(default)]
        alternatives: Vec<String>,
    },
    /// 论述/连线：无标准答案
    Manual,
}

impl AnswerKey {
    /// 校验答案形态与题型匹配
    pub fn validate_for(&self, question_type: QuestionType) -> Result<(), String> {
        match (question_type, self) {
            (qt, AnswerKey::Options { options }) if qt.is_choice() => {
                if options.len() < 2 {
                    return Err("Choice questions need at least two options".into());
                }
                let mut ids = HashSet::new();
                for option in options {
                    if option.id.trim().is_empty() {
                        return Err("Option id must not be empty".into());
                    }
                    if !ids.insert(option.id.trim()) {
                        return Err(format!("Duplicate option id: {}", option.id));
                    }
                }
                let correct = options.iter().filter(|o| o.is_correct).count();
                match qt {
                    QuestionType::MultipleChoice if correct == 0 => {
                        Err("Multiple choice questions need at least one correct option".into())
                    }
                    QuestionType::SingleChoice | QuestionType::TrueFalse if correct != 1 => {
                        Err(format!(
                            "{qt} questions need exactly one correct option, found {correct}"
                        ))
                    }
                    _ => Ok(()),
                }
            }
            (qt, AnswerKey::Text { correct, .. }) if qt.is_text() => {
                if correct.trim().is_empty() {
                    Err("Correct answer must not be empty".into())
                } else {
                    Ok(())
                }
            }
            (QuestionType::Essay | QuestionType::Matching, AnswerKey::Manual) => Ok(()),
            (qt, _) => Err(format!("Answer key shape does not match question type {qt}")),
        }
    }

    /// 去掉正确标记后可展示给学生的选项
    pub fn presentable_options(&self) -> Vec<PresentedOption> {
        match self {
            AnswerKey::Options { options } => options
                .iter()
                .map(|o| PresentedOption {
                    id: o.id.clone(),
                    text: o.text.clone(),
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

// 展示给学生的选项（不含正确标记）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct PresentedOption {
    pub id: String,
    pub text: String,
}

// 题库
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct QuestionBank {
    pub id: i64,
    pub subject_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_by: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 题目
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct Question {
    pub id: i64,
    pub bank_id: i64,
    pub question_type: QuestionType,
    pub content: String,
    pub answer_key: AnswerKey,
    // 默认分值
    pub points: f64,
    pub difficulty: Difficulty,
    pub created_by: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(correct: &[bool]) -> AnswerKey {
        AnswerKey::Options {
            options: correct
                .iter()
                .enumerate()
                .map(|(i, c)| AnswerOption {
                    id: format!("o{i}"),
                    text: format!("option {i}"),
                    is_correct: *c,
                })
                .collect(),
        }
    }

    #[test]
    fn test_question_type_parse() {
        assert_eq!(
            "fill_blank".parse::<QuestionType>().unwrap(),
            QuestionType::FillBlank
        );
        assert_eq!(QuestionType::TrueFalse.to_string(), "true_false");
        assert!("multi".parse::<QuestionType>().is_err());
    }

    #[test]
    fn test_single_choice_requires_exactly_one_correct() {
        assert!(
            options(&[true, false])
                .validate_for(QuestionType::SingleChoice)
                .is_ok()
        );
        assert!(
            options(&[true, true])
                .validate_for(QuestionType::SingleChoice)
                .is_err()
        );
        assert!(
            options(&[false, false])
                .validate_for(QuestionType::TrueFalse)
                .is_err()
        );
        assert!(
            options(&[true, true, false])
                .validate_for(QuestionType::MultipleChoice)
                .is_ok()
        );
    }

    #[test]
    fn test_key_shape_must_match_type() {
        let text = AnswerKey::Text {
            correct: "Paris".into(),
            alternatives: vec![],
        };
        assert!(text.validate_for(QuestionType::ShortAnswer).is_ok());
        assert!(text.validate_for(QuestionType::SingleChoice).is_err());
        assert!(AnswerKey::Manual.validate_for(QuestionType::Essay).is_ok());
        assert!(AnswerKey::Manual.validate_for(QuestionType::FillBlank).is_err());
    }

    #[test]
    fn test_duplicate_option_ids_rejected() {
        let key = AnswerKey::Options {
            options: vec![
                AnswerOption {
                    id: "a".into(),
                    text: "A".into(),
                    is_correct: true,
                },
                AnswerOption {
                    id: "a".into(),
                    text: "B".into(),
                    is_correct: false,
                },
            ],
        };
        assert!(key.validate_for(QuestionType::SingleChoice).is_err());
    }

    #[test]
    fn test_answer_key_json_shape() {
        let key: AnswerKey = serde_json::from_str(
            r#"{"kind":"text","correct":"H2O","alternatives":["water"]}"#,
        )
        .unwrap();
        assert_eq!(
            key,
            AnswerKey::Text {
                correct: "H2O".into(),
                alternatives: vec!["water".into()]
            }
        );
        assert!(options(&[true, false]).presentable_options().len() == 2);
    }
}
