//! 校历存储操作

use super::SeaOrmStorage;
use crate::entity::academic_years::{
    ActiveModel as AcademicYearActiveModel, Column as AcademicYearColumn,
    Entity as AcademicYears,
};
use crate::entity::grading_periods::{
    ActiveModel as GradingPeriodActiveModel, Column as GradingPeriodColumn,
    Entity as GradingPeriods,
};
use crate::entity::semesters::{ActiveModel, Column, Entity as Semesters};
use crate::errors::{LmsError, Result};
use crate::models::calendar::{
    entities::{AcademicYear, GradingPeriod, Semester},
    requests::{CreateAcademicYearRequest, CreateGradingPeriodRequest, CreateSemesterRequest},
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建学年
    pub async fn create_academic_year_impl(
        &self,
        req: CreateAcademicYearRequest,
    ) -> Result<AcademicYear> {
        let model = AcademicYearActiveModel {
            name: Set(req.name),
            start_year: Set(req.start_year),
            is_current: Set(false),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            if super::is_unique_violation(&e) {
                LmsError::conflict("Academic year name already exists")
            } else {
                LmsError::database_operation(format!("创建学年失败: {e}"))
            }
        })?;

        Ok(result.into_academic_year())
    }

    /// 列出学年
    pub async fn list_academic_years_impl(&self) -> Result<Vec<AcademicYear>> {
        let results = AcademicYears::find()
            .order_by_asc(AcademicYearColumn::StartYear)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询学年列表失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_academic_year()).collect())
    }

    /// 设为当前学年：先清除全部当前标记再设置，在同一事务内完成
    pub async fn set_current_academic_year_impl(&self, id: i64) -> Result<Option<AcademicYear>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LmsError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(year) = AcademicYears::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询学年失败: {e}")))?
        else {
            return Ok(None);
        };

        AcademicYears::update_many()
            .col_expr(AcademicYearColumn::IsCurrent, Expr::value(false))
            .filter(AcademicYearColumn::IsCurrent.eq(true))
            .exec(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("清除当前学年失败: {e}")))?;

        let mut active: AcademicYearActiveModel = year.into();
        active.is_current = Set(true);
        let updated = active
            .update(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("设置当前学年失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| LmsError::database_operation(format!("提交事务失败: {e}")))?;

        tracing::info!("Current academic year set to {} ({})", updated.name, updated.id);
        Ok(Some(updated.into_academic_year()))
    }

    /// 创建学期
    pub async fn create_semester_impl(&self, req: CreateSemesterRequest) -> Result<Semester> {
        let exists = AcademicYears::find_by_id(req.academic_year_id)
            .select_only()
            .column(AcademicYearColumn::Id)
            .into_tuple::<i64>()
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询学年失败: {e}")))?;
        if exists.is_none() {
            return Err(LmsError::not_found(format!(
                "Academic year {} not found",
                req.academic_year_id
            )));
        }

        let model = ActiveModel {
            academic_year_id: Set(req.academic_year_id),
            number: Set(req.number),
            name: Set(req.name),
            is_current: Set(false),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            if super::is_unique_violation(&e) {
                LmsError::conflict("Semester number already exists in this academic year")
            } else {
                LmsError::database_operation(format!("创建学期失败: {e}"))
            }
        })?;

        Ok(result.into_semester())
    }

    /// 通过 ID 获取学期
    pub async fn get_semester_by_id_impl(&self, id: i64) -> Result<Option<Semester>> {
        let result = Semesters::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询学期失败: {e}")))?;

        Ok(result.map(|m| m.into_semester()))
    }

    /// 设为当前学期：在同一事务内清除所有学期与学年的当前标记，
    /// 再设置该学期及其所属学年
    pub async fn set_current_semester_impl(&self, id: i64) -> Result<Option<Semester>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LmsError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(semester) = Semesters::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询学期失败: {e}")))?
        else {
            return Ok(None);
        };

        Semesters::update_many()
            .col_expr(Column::IsCurrent, Expr::value(false))
            .filter(Column::IsCurrent.eq(true))
            .exec(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("清除当前学期失败: {e}")))?;

        AcademicYears::update_many()
            .col_expr(AcademicYearColumn::IsCurrent, Expr::value(false))
            .filter(AcademicYearColumn::IsCurrent.eq(true))
            .exec(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("清除当前学年失败: {e}")))?;

        AcademicYears::update_many()
            .col_expr(AcademicYearColumn::IsCurrent, Expr::value(true))
            .filter(AcademicYearColumn::Id.eq(semester.academic_year_id))
            .exec(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("设置当前学年失败: {e}")))?;

        let mut active: ActiveModel = semester.into();
        active.is_current = Set(true);
        let updated = active
            .update(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("设置当前学期失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| LmsError::database_operation(format!("提交事务失败: {e}")))?;

        tracing::info!("Current semester set to {} ({})", updated.name, updated.id);
        Ok(Some(updated.into_semester()))
    }

    /// 获取当前学期
    pub async fn get_current_semester_impl(&self) -> Result<Option<Semester>> {
        let result = Semesters::find()
            .filter(Column::IsCurrent.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询当前学期失败: {e}")))?;

        Ok(result.map(|m| m.into_semester()))
    }

    /// 创建评分阶段，缺省序号追加到末尾
    pub async fn create_grading_period_impl(
        &self,
        req: CreateGradingPeriodRequest,
    ) -> Result<GradingPeriod> {
        if self.get_semester_by_id_impl(req.semester_id).await?.is_none() {
            return Err(LmsError::not_found(format!(
                "Semester {} not found",
                req.semester_id
            )));
        }

        let sequence = match req.sequence {
            Some(seq) => seq,
            None => {
                let max_sequence = GradingPeriods::find()
                    .filter(GradingPeriodColumn::SemesterId.eq(req.semester_id))
                    .select_only()
                    .column_as(GradingPeriodColumn::Sequence.max(), "max_sequence")
                    .into_tuple::<Option<i32>>()
                    .one(&self.db)
                    .await
                    .map_err(|e| {
                        LmsError::database_operation(format!("查询评分阶段序号失败: {e}"))
                    })?
                    .flatten()
                    .unwrap_or(0);
                max_sequence + 1
            }
        };

        let model = GradingPeriodActiveModel {
            semester_id: Set(req.semester_id),
            name: Set(req.name),
            sequence: Set(sequence),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("创建评分阶段失败: {e}")))?;

        Ok(result.into_grading_period())
    }

    /// 通过 ID 获取评分阶段
    pub async fn get_grading_period_by_id_impl(&self, id: i64) -> Result<Option<GradingPeriod>> {
        let result = GradingPeriods::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询评分阶段失败: {e}")))?;

        Ok(result.map(|m| m.into_grading_period()))
    }

    /// 列出学期内的评分阶段
    pub async fn list_grading_periods_impl(&self, semester_id: i64) -> Result<Vec<GradingPeriod>> {
        let results = GradingPeriods::find()
            .filter(GradingPeriodColumn::SemesterId.eq(semester_id))
            .order_by_asc(GradingPeriodColumn::Sequence)
            .order_by_asc(GradingPeriodColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询评分阶段列表失败: {e}")))?;

        Ok(results
            .into_iter()
            .map(|m| m.into_grading_period())
            .collect())
    }
}
