pub mod auto_fill;

pub use auto_fill::{AutoFillEngine, AutoFillReport, FailedAssignment, PlannedAssignment};
