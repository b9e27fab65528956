//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。
//! 时间字段统一存储为 Unix 时间戳（秒）。

pub mod prelude;

pub mod academic_years;
pub mod assignments;
pub mod enrollments;
pub mod exam_answers;
pub mod exam_attempts;
pub mod exam_questions;
pub mod exams;
pub mod grades;
pub mod grading_periods;
pub mod question_banks;
pub mod questions;
pub mod semesters;
pub mod subject_instances;
pub mod subjects;
pub mod submissions;
