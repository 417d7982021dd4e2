pub mod assignment_ctx;
pub mod student_assignment;

pub use assignment_ctx::AssignmentCtx;
pub use student_assignment::{AssignmentRow, ExclusionRules, StudentAssignment};
