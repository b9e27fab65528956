//! 成绩推导：加权总分与等级

use serde::{Deserialize, Serialize};

use crate::errors::{LmsError, Result};

pub const CLASSWORK_WEIGHT: f64 = 0.30;
pub const MIDTERM_WEIGHT: f64 = 0.20;
pub const FINAL_WEIGHT: f64 = 0.50;

/// 等级表中的一行
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradeBand {
    pub min_percentage: f64,
    pub label: &'static str,
    pub point: f64,
}

const fn band(min_percentage: f64, label: &'static str, point: f64) -> GradeBand {
    GradeBand {
        min_percentage,
        label,
        point,
    }
}

/// 按最低百分比降序排列，取第一行满足 min <= 百分比 的等级
pub const GRADE_SCALE: [GradeBand; 8] = [
    band(80.0, "A", 4.0),
    band(75.0, "B+", 3.5),
    band(70.0, "B", 3.0),
    band(65.0, "C+", 2.5),
    band(60.0, "C", 2.0),
    band(55.0, "D+", 1.5),
    band(50.0, "D", 1.0),
    band(0.0, "F", 0.0),
];

const LOWEST_BAND: GradeBand = GRADE_SCALE[GRADE_SCALE.len() - 1];

pub fn band_for(percentage: f64) -> GradeBand {
    GRADE_SCALE
        .iter()
        .copied()
        .find(|band| band.min_percentage <= percentage)
        .unwrap_or(LOWEST_BAND)
}

/// 三项原始分数，缺省按 0 计
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentScores {
    pub classwork: Option<f64>,
    pub midterm: Option<f64>,
    pub final_exam: Option<f64>,
}

impl ComponentScores {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("classwork_score", self.classwork),
            ("midterm_score", self.midterm),
            ("final_score", self.final_exam),
        ] {
            match value {
                Some(v) if !(0.0..=100.0).contains(&v) => {
                    return Err(LmsError::validation(format!(
                        "{name} must be between 0 and 100, got {v}"
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// 覆盖式合并：`patch` 中有值的字段替换当前值
    pub fn merged(&self, patch: &ComponentScores) -> ComponentScores {
        ComponentScores {
            classwork: patch.classwork.or(self.classwork),
            midterm: patch.midterm.or(self.midterm),
            final_exam: patch.final_exam.or(self.final_exam),
        }
    }
}

/// 由原始分数推导出的字段
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedGrade {
    pub total_score: f64,
    pub percentage: f64,
    pub grade_label: &'static str,
    pub grade_point: f64,
}

pub fn derive(scores: &ComponentScores) -> DerivedGrade {
    let total = scores.classwork.unwrap_or(0.0) * CLASSWORK_WEIGHT
        + scores.midterm.unwrap_or(0.0) * MIDTERM_WEIGHT
        + scores.final_exam.unwrap_or(0.0) * FINAL_WEIGHT;
    // 消除浮点误差（如 79.99999999999999），保留足够精度以免跨越等级边界
    let total_score = (total * 1e6).round() / 1e6;
    // 原始分数已是 0-100 的百分制
    let percentage = total_score;
    let band = band_for(percentage);

    DerivedGrade {
        total_score,
        percentage,
        grade_label: band.label,
        grade_point: band.point,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(c: Option<f64>, m: Option<f64>, f: Option<f64>) -> ComponentScores {
        ComponentScores {
            classwork: c,
            midterm: m,
            final_exam: f,
        }
    }

    #[test]
    fn test_band_boundaries() {
        let expected = [
            (80.0, "A"),
            (75.0, "B+"),
            (70.0, "B"),
            (65.0, "C+"),
            (60.0, "C"),
            (55.0, "D+"),
            (50.0, "D"),
        ];
        for (percentage, label) in expected {
            assert_eq!(band_for(percentage).label, label, "at {percentage}");
        }
        assert_eq!(band_for(49.999).label, "F");
        assert_eq!(band_for(79.99).label, "B+");
        assert_eq!(band_for(100.0).point, 4.0);
        assert_eq!(band_for(0.0).label, "F");
        assert_eq!(band_for(-5.0).label, "F");
    }

    #[test]
    fn test_weighted_total() {
        assert_eq!(derive(&scores(Some(100.0), Some(0.0), Some(0.0))).total_score, 30.0);
        assert_eq!(derive(&scores(Some(0.0), Some(0.0), Some(100.0))).total_score, 50.0);
        assert_eq!(derive(&scores(None, Some(100.0), None)).total_score, 20.0);

        let empty = derive(&ComponentScores::default());
        assert_eq!(empty.total_score, 0.0);
        assert_eq!(empty.grade_label, "F");
        assert_eq!(empty.grade_point, 0.0);
    }

    #[test]
    fn test_uniform_scores_land_on_threshold() {
        for threshold in [80.0, 75.0, 70.0, 65.0, 60.0, 55.0, 50.0] {
            let derived = derive(&scores(Some(threshold), Some(threshold), Some(threshold)));
            assert_eq!(derived.percentage, threshold);
            assert_eq!(derived.grade_label, band_for(threshold).label);
        }
    }

    #[test]
    fn test_derived_follows_inputs() {
        let derived = derive(&scores(Some(90.0), Some(80.0), Some(70.0)));
        // 27 + 16 + 35
        assert_eq!(derived.total_score, 78.0);
        assert_eq!(derived.percentage, 78.0);
        assert_eq!(derived.grade_label, "B+");
        assert_eq!(derived.grade_point, 3.5);
    }

    #[test]
    fn test_component_range() {
        assert!(scores(Some(0.0), Some(100.0), None).validate().is_ok());
        assert!(scores(Some(100.1), None, None).validate().is_err());
        assert!(scores(None, Some(-1.0), None).validate().is_err());
        assert!(scores(None, None, Some(f64::NAN)).validate().is_err());
    }

    #[test]
    fn test_merge_keeps_stored_values() {
        let stored = scores(Some(60.0), Some(70.0), None);
        let merged = stored.merged(&scores(None, None, Some(90.0)));
        assert_eq!(merged, scores(Some(60.0), Some(70.0), Some(90.0)));
    }
}
