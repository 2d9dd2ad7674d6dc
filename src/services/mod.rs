pub mod aggregator;
pub mod analyzer;
pub mod resume;

pub use aggregator::GlobalAggregator;
pub use analyzer::analyze;
pub use resume::{ResumeController, ResumePlan};
