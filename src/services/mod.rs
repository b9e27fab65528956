pub mod assignments;
pub mod attempts;
pub mod calendar;
pub mod catalog;
pub mod exams;
pub mod grades;
pub mod questions;
pub mod submissions;

pub use assignments::AssignmentService;
pub use attempts::AttemptService;
pub use calendar::CalendarService;
pub use catalog::CatalogService;
pub use exams::ExamService;
pub use grades::GradeService;
pub use questions::QuestionService;
pub use submissions::SubmissionService;
