pub mod assignments;

pub mod attempts;

pub mod calendar;

pub mod catalog;

pub mod exams;

pub mod grades;

pub mod questions;

pub mod submissions;

pub use assignments::configure_assignments_routes;
pub use attempts::configure_attempts_routes;
pub use calendar::configure_calendar_routes;
pub use catalog::configure_catalog_routes;
pub use exams::configure_exams_routes;
pub use grades::configure_grades_routes;
pub use questions::configure_questions_routes;
pub use submissions::configure_submissions_routes;
