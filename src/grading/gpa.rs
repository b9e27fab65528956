//! GPA / GPAX 学分加权汇总
//!
//! 同一开课实例在多个评分阶段各有一行成绩时，每行都会独立计入学分，
//! 不做去重；这类开课实例会在 GPAX 结果中单独列出。

use std::collections::{BTreeMap, HashMap};

use crate::models::grades::entities::GradeContribution;
use crate::models::grades::responses::{GpaResponse, GpaxResponse, SemesterGpa};

use super::round2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedAverage {
    pub gpa: f64,
    pub total_credits: f64,
}

/// Σ(绩点 × 学分) / Σ(学分)，没有学分时为 0
pub fn weighted_average<'a, I>(rows: I) -> WeightedAverage
where
    I: IntoIterator<Item = &'a GradeContribution>,
{
    let mut weighted = 0.0;
    let mut credits = 0.0;
    for row in rows {
        weighted += row.grade_point * row.credits;
        credits += row.credits;
    }

    let gpa = if credits > 0.0 {
        round2(weighted / credits)
    } else {
        0.0
    };
    WeightedAverage {
        gpa,
        total_credits: round2(credits),
    }
}

/// 单学期 GPA
pub fn semester_gpa(
    student_id: i64,
    semester_id: i64,
    grades: Vec<GradeContribution>,
) -> GpaResponse {
    let summary = weighted_average(&grades);
    GpaResponse {
        student_id,
        semester_id,
        gpa: summary.gpa,
        total_credits: summary.total_credits,
        grades,
    }
}

/// 累计 GPAX 及按学期的分解，学期按 (学年, 学期序号) 升序
pub fn cumulative_gpax(student_id: i64, grades: &[GradeContribution]) -> GpaxResponse {
    let overall = weighted_average(grades);

    let mut by_semester: BTreeMap<(i32, i32, i64), Vec<&GradeContribution>> = BTreeMap::new();
    for row in grades {
        by_semester
            .entry((row.academic_year_start, row.semester_number, row.semester_id))
            .or_default()
            .push(row);
    }

    let semesters = by_semester
        .into_iter()
        .map(|((academic_year_start, semester_number, semester_id), rows)| {
            let academic_year_id = rows[0].academic_year_id;
            let summary = weighted_average(rows);
            SemesterGpa {
                semester_id,
                semester_number,
                academic_year_id,
                academic_year_start,
                gpa: summary.gpa,
                total_credits: summary.total_credits,
            }
        })
        .collect();

    GpaxResponse {
        student_id,
        gpax: overall.gpa,
        total_credits: overall.total_credits,
        semesters,
        multi_period_subject_instances: multi_row_instances(grades),
    }
}

/// 贡献了多行成绩的开课实例（升序）
pub fn multi_row_instances(grades: &[GradeContribution]) -> Vec<i64> {
    let mut counts: HashMap<i64, usize> = HashMap::new();
    for row in grades {
        *counts.entry(row.subject_instance_id).or_default() += 1;
    }
    let mut ids: Vec<i64> = counts
        .into_iter()
        .filter(|(_, n)| *n > 1)
        .map(|(id, _)| id)
        .collect();
    ids.sort_unstable();
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    // semester: (semester_id, 学年起始年, 学期序号)
    fn row(
        id: i64,
        instance: i64,
        period: Option<i64>,
        credits: f64,
        point: f64,
        semester: (i64, i32, i32),
    ) -> GradeContribution {
        GradeContribution {
            grade_id: id,
            subject_instance_id: instance,
            grading_period_id: period,
            subject_code: format!("S{instance}"),
            subject_name: format!("Subject {instance}"),
            credits,
            grade_label: "X".into(),
            grade_point: point,
            semester_id: semester.0,
            semester_number: semester.2,
            academic_year_id: i64::from(semester.1),
            academic_year_start: semester.1,
        }
    }

    #[test]
    fn test_empty_semester() {
        let gpa = semester_gpa(5, 2, Vec::new());
        assert_eq!(gpa.gpa, 0.0);
        assert_eq!(gpa.total_credits, 0.0);
        assert!(gpa.grades.is_empty());
    }

    #[test]
    fn test_credit_weighting_and_rounding() {
        let rows = vec![
            row(1, 1, None, 3.0, 4.0, (1, 2025, 1)),
            row(2, 2, None, 2.0, 2.5, (1, 2025, 1)),
            row(3, 3, None, 1.0, 3.5, (1, 2025, 1)),
        ];
        // (12 + 5 + 3.5) / 6 = 3.41666...
        let gpa = semester_gpa(5, 1, rows);
        assert_eq!(gpa.gpa, 3.42);
        assert_eq!(gpa.total_credits, 6.0);
        assert_eq!(gpa.grades.len(), 3);
    }

    #[test]
    fn test_gpax_orders_semesters_chronologically() {
        let rows = vec![
            row(1, 10, None, 3.0, 2.0, (7, 2026, 1)),
            row(2, 11, None, 3.0, 4.0, (4, 2025, 2)),
            row(3, 12, None, 2.0, 3.0, (3, 2025, 1)),
        ];
        let gpax = cumulative_gpax(5, &rows);
        let order: Vec<i64> = gpax.semesters.iter().map(|s| s.semester_id).collect();
        assert_eq!(order, vec![3, 4, 7]);
        // (6 + 12 + 6) / 8
        assert_eq!(gpax.gpax, 3.0);
        assert_eq!(gpax.total_credits, 8.0);
        assert!(gpax.multi_period_subject_instances.is_empty());
    }

    #[test]
    fn test_multi_period_rows_count_twice() {
        let rows = vec![
            row(1, 1, Some(1), 3.0, 4.0, (1, 2025, 1)),
            row(2, 1, Some(2), 3.0, 2.0, (1, 2025, 1)),
            row(3, 2, None, 1.0, 1.0, (1, 2025, 1)),
        ];
        let gpax = cumulative_gpax(5, &rows);
        assert_eq!(gpax.total_credits, 7.0);
        // (12 + 6 + 1) / 7 = 2.714...
        assert_eq!(gpax.gpax, 2.71);
        assert_eq!(gpax.multi_period_subject_instances, vec![1]);
    }
}
