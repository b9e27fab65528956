use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/calendar.ts")]
pub struct CreateAcademicYearRequest {
    pub name: String,
    pub start_year: i32,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/calendar.ts")]
pub struct CreateSemesterRequest {
    pub academic_year_id: i64,
    pub number: i32,
    pub name: String,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/calendar.ts")]
pub struct CreateGradingPeriodRequest {
    pub semester_id: i64,
    pub name: String,
    pub sequence: Option<i32>,
}
