pub mod processing;

pub use processing::{ProcessingService, RunPlan, SliceRun};
