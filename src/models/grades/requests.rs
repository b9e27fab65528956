use serde::Deserialize;
use ts_rs::TS;

/// 录入成绩请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct CreateGradeRequest {
    pub student_id: i64,
    pub subject_instance_id: i64,
    pub grading_period_id: Option<i64>,
    pub classwork_score: Option<f64>,
    pub midterm_score: Option<f64>,
    pub final_score: Option<f64>,
    pub remarks: Option<String>,
}

/// 更新成绩请求，缺省字段保留原值
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct UpdateGradeRequest {
    pub classwork_score: Option<f64>,
    pub midterm_score: Option<f64>,
    pub final_score: Option<f64>,
    pub remarks: Option<String>,
}

/// 批量录入，逐行创建或更新
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct BulkUpsertGradesRequest {
    pub grades: Vec<CreateGradeRequest>,
}

/// 成绩列表查询参数
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeListQuery {
    // 学生本人查询时忽略
    pub student_id: Option<i64>,
    pub subject_instance_id: Option<i64>,
}

/// GPA 查询参数
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GpaQuery {
    pub student_id: Option<i64>,
    // 缺省为当前学期
    pub semester_id: Option<i64>,
}

/// GPAX 查询参数
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GpaxQuery {
    pub student_id: Option<i64>,
}
