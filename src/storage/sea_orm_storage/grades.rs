//! 成绩存储操作

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::SeaOrmStorage;
use crate::entity::academic_years::Entity as AcademicYears;
use crate::entity::grades::{self, ActiveModel, Column, Entity as Grades, Model};
use crate::entity::semesters::Entity as Semesters;
use crate::entity::subject_instances::{Column as InstanceColumn, Entity as SubjectInstances};
use crate::entity::subjects::Entity as Subjects;
use crate::errors::{LmsError, Result};
use crate::grading::score::{self, ComponentScores};
use crate::models::grades::{
    entities::{Grade, GradeContribution},
    requests::{CreateGradeRequest, UpdateGradeRequest},
    responses::{BulkUpsertResponse, BulkUpsertRowResult},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 按 (学生, 开课实例, 评分阶段) 查找成绩行
    async fn find_grade_by_key(
        &self,
        student_id: i64,
        subject_instance_id: i64,
        grading_period_id: Option<i64>,
    ) -> Result<Option<Model>> {
        Grades::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::SubjectInstanceId.eq(subject_instance_id))
            .filter(Column::PeriodKey.eq(grades::period_key(grading_period_id)))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询成绩失败: {e}")))
    }

    /// 校验开课实例存在，且评分阶段属于该实例所在学期
    async fn check_grade_scope(
        &self,
        subject_instance_id: i64,
        grading_period_id: Option<i64>,
    ) -> Result<()> {
        let instance = self
            .get_subject_instance_by_id_impl(subject_instance_id)
            .await?
            .ok_or_else(|| {
                LmsError::not_found(format!("Subject instance {subject_instance_id} not found"))
            })?;

        if let Some(period_id) = grading_period_id {
            let period = self
                .get_grading_period_by_id_impl(period_id)
                .await?
                .ok_or_else(|| {
                    LmsError::not_found(format!("Grading period {period_id} not found"))
                })?;
            if period.semester_id != instance.semester_id {
                return Err(LmsError::validation(format!(
                    "Grading period {period_id} does not belong to the semester of subject instance {subject_instance_id}"
                )));
            }
        }
        Ok(())
    }

    async fn insert_grade(
        &self,
        req: CreateGradeRequest,
        updated_by: i64,
        now: DateTime<Utc>,
    ) -> Result<Model> {
        let scores = ComponentScores {
            classwork: req.classwork_score,
            midterm: req.midterm_score,
            final_exam: req.final_score,
        };
        let derived = score::derive(&scores);

        let model = ActiveModel {
            student_id: Set(req.student_id),
            subject_instance_id: Set(req.subject_instance_id),
            grading_period_id: Set(req.grading_period_id),
            period_key: Set(grades::period_key(req.grading_period_id)),
            classwork_score: Set(scores.classwork),
            midterm_score: Set(scores.midterm),
            final_score: Set(scores.final_exam),
            total_score: Set(derived.total_score),
            percentage: Set(derived.percentage),
            grade_label: Set(derived.grade_label.to_string()),
            grade_point: Set(Some(derived.grade_point)),
            remarks: Set(req.remarks),
            updated_by: Set(Some(updated_by)),
            created_at: Set(now.timestamp()),
            updated_at: Set(now.timestamp()),
            ..Default::default()
        };

        model.insert(&self.db).await.map_err(|e| {
            if super::is_unique_violation(&e) {
                LmsError::conflict("Grade already exists for this student and period")
            } else {
                LmsError::database_operation(format!("创建成绩失败: {e}"))
            }
        })
    }

    /// 合并原始分数后重新推导全部派生字段
    async fn apply_grade_update(
        &self,
        existing: Model,
        req: UpdateGradeRequest,
        updated_by: i64,
        now: DateTime<Utc>,
    ) -> Result<Model> {
        let patch = ComponentScores {
            classwork: req.classwork_score,
            midterm: req.midterm_score,
            final_exam: req.final_score,
        };
        patch.validate()?;
        let scores = existing.component_scores().merged(&patch);
        let derived = score::derive(&scores);
        let remarks = req.remarks.or_else(|| existing.remarks.clone());

        let mut model: ActiveModel = existing.into();
        model.classwork_score = Set(scores.classwork);
        model.midterm_score = Set(scores.midterm);
        model.final_score = Set(scores.final_exam);
        model.total_score = Set(derived.total_score);
        model.percentage = Set(derived.percentage);
        model.grade_label = Set(derived.grade_label.to_string());
        model.grade_point = Set(Some(derived.grade_point));
        model.remarks = Set(remarks);
        model.updated_by = Set(Some(updated_by));
        model.updated_at = Set(now.timestamp());

        model
            .update(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("更新成绩失败: {e}")))
    }

    /// 录入成绩
    pub async fn create_grade_impl(
        &self,
        req: CreateGradeRequest,
        updated_by: i64,
        now: DateTime<Utc>,
    ) -> Result<Grade> {
        ComponentScores {
            classwork: req.classwork_score,
            midterm: req.midterm_score,
            final_exam: req.final_score,
        }
        .validate()?;
        self.check_grade_scope(req.subject_instance_id, req.grading_period_id)
            .await?;

        // 重复键由唯一索引拒绝，映射为 Conflict
        let result = self.insert_grade(req, updated_by, now).await?;
        Ok(result.into_grade())
    }

    /// 通过 ID 获取成绩
    pub async fn get_grade_by_id_impl(&self, id: i64) -> Result<Option<Grade>> {
        let result = Grades::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询成绩失败: {e}")))?;

        Ok(result.map(|m| m.into_grade()))
    }

    /// 更新成绩
    pub async fn update_grade_impl(
        &self,
        id: i64,
        req: UpdateGradeRequest,
        updated_by: i64,
        now: DateTime<Utc>,
    ) -> Result<Option<Grade>> {
        let Some(existing) = Grades::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询成绩失败: {e}")))?
        else {
            return Ok(None);
        };

        let result = self.apply_grade_update(existing, req, updated_by, now).await?;
        Ok(Some(result.into_grade()))
    }

    async fn upsert_grade_row(
        &self,
        req: CreateGradeRequest,
        updated_by: i64,
        now: DateTime<Utc>,
    ) -> Result<(Model, bool)> {
        ComponentScores {
            classwork: req.classwork_score,
            midterm: req.midterm_score,
            final_exam: req.final_score,
        }
        .validate()?;
        self.check_grade_scope(req.subject_instance_id, req.grading_period_id)
            .await?;

        let existing = self
            .find_grade_by_key(
                req.student_id,
                req.subject_instance_id,
                req.grading_period_id,
            )
            .await?;

        let patch = UpdateGradeRequest {
            classwork_score: req.classwork_score,
            midterm_score: req.midterm_score,
            final_score: req.final_score,
            remarks: req.remarks.clone(),
        };

        if let Some(model) = existing {
            let updated = self.apply_grade_update(model, patch, updated_by, now).await?;
            return Ok((updated, false));
        }

        let (student_id, subject_instance_id, grading_period_id) =
            (req.student_id, req.subject_instance_id, req.grading_period_id);
        match self.insert_grade(req, updated_by, now).await {
            Ok(created) => Ok((created, true)),
            // 并发请求先插入了同一键：读回后按更新处理
            Err(LmsError::Conflict(_)) => {
                let model = self
                    .find_grade_by_key(student_id, subject_instance_id, grading_period_id)
                    .await?
                    .ok_or_else(|| {
                        LmsError::database_operation("录入成绩失败: 冲突后未找到成绩行")
                    })?;
                let updated = self.apply_grade_update(model, patch, updated_by, now).await?;
                Ok((updated, false))
            }
            Err(e) => Err(e),
        }
    }

    /// 批量录入成绩，逐行独立提交，单行失败不影响其余行
    pub async fn bulk_upsert_grades_impl(
        &self,
        rows: Vec<CreateGradeRequest>,
        updated_by: i64,
        now: DateTime<Utc>,
    ) -> Result<BulkUpsertResponse> {
        let mut results = Vec::with_capacity(rows.len());

        for (index, row) in rows.into_iter().enumerate() {
            let student_id = row.student_id;
            let subject_instance_id = row.subject_instance_id;

            match self.upsert_grade_row(row, updated_by, now).await {
                Ok((model, created)) => results.push(BulkUpsertRowResult {
                    index,
                    student_id,
                    subject_instance_id,
                    success: true,
                    created,
                    grade: Some(model.into_grade()),
                    error: None,
                }),
                Err(e) => {
                    tracing::warn!(
                        "Bulk grade upsert row {} (student {}, instance {}) failed: {}",
                        index,
                        student_id,
                        subject_instance_id,
                        e
                    );
                    results.push(BulkUpsertRowResult {
                        index,
                        student_id,
                        subject_instance_id,
                        success: false,
                        created: false,
                        grade: None,
                        error: Some(e.message().to_string()),
                    });
                }
            }
        }

        let succeeded = results.iter().filter(|r| r.success).count();
        let failed = results.len() - succeeded;
        tracing::info!(
            "Bulk grade upsert finished: {} succeeded, {} failed",
            succeeded,
            failed
        );

        Ok(BulkUpsertResponse {
            succeeded,
            failed,
            results,
        })
    }

    /// 列出学生成绩
    pub async fn list_student_grades_impl(
        &self,
        student_id: i64,
        subject_instance_id: Option<i64>,
    ) -> Result<Vec<Grade>> {
        let mut query = Grades::find().filter(Column::StudentId.eq(student_id));
        if let Some(instance_id) = subject_instance_id {
            query = query.filter(Column::SubjectInstanceId.eq(instance_id));
        }

        let results = query
            .order_by_asc(Column::SubjectInstanceId)
            .order_by_asc(Column::GradingPeriodId)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询成绩列表失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_grade()).collect())
    }

    /// 参与 GPA 计算的成绩行，附带学分与学期信息
    pub async fn list_grade_contributions_impl(
        &self,
        student_id: i64,
        semester_id: Option<i64>,
    ) -> Result<Vec<GradeContribution>> {
        let grades = Grades::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::GradePoint.is_not_null())
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询成绩失败: {e}")))?;
        if grades.is_empty() {
            return Ok(Vec::new());
        }

        let mut instance_ids: Vec<i64> = grades.iter().map(|g| g.subject_instance_id).collect();
        instance_ids.sort_unstable();
        instance_ids.dedup();

        let mut instance_query =
            SubjectInstances::find().filter(InstanceColumn::Id.is_in(instance_ids));
        if let Some(semester_id) = semester_id {
            instance_query = instance_query.filter(InstanceColumn::SemesterId.eq(semester_id));
        }
        let instances: HashMap<i64, _> = instance_query
            .find_also_related(Subjects)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询开课实例失败: {e}")))?
            .into_iter()
            .filter_map(|(instance, subject)| subject.map(|s| (instance.id, (instance, s))))
            .collect();

        let semester_ids: Vec<i64> = instances.values().map(|(i, _)| i.semester_id).collect();
        let semesters: HashMap<i64, _> = Semesters::find()
            .filter(crate::entity::semesters::Column::Id.is_in(semester_ids))
            .find_also_related(AcademicYears)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询学期失败: {e}")))?
            .into_iter()
            .filter_map(|(semester, year)| year.map(|y| (semester.id, (semester, y))))
            .collect();

        let contributions = grades
            .into_iter()
            .filter_map(|grade| {
                let grade_point = grade.grade_point?;
                let (instance, subject) = instances.get(&grade.subject_instance_id)?;
                let (semester, year) = semesters.get(&instance.semester_id)?;
                Some(GradeContribution {
                    grade_id: grade.id,
                    subject_instance_id: grade.subject_instance_id,
                    grading_period_id: grade.grading_period_id,
                    subject_code: subject.code.clone(),
                    subject_name: subject.name.clone(),
                    credits: subject.credits,
                    grade_label: grade.grade_label,
                    grade_point,
                    semester_id: semester.id,
                    semester_number: semester.number,
                    academic_year_id: year.id,
                    academic_year_start: year.start_year,
                })
            })
            .collect();

        Ok(contributions)
    }
}
