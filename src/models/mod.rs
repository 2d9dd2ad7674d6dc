pub mod analysis;
pub mod loaders;
pub mod progress;
pub mod statement;
pub mod template;

pub use analysis::{GlobalStatistics, PaperAnalysisResult, StatementAnalysis};
pub use loaders::{load_registry, load_templates};
pub use progress::{ProgressEvent, ProgressUpdate, PublishedStatistics, RunStatus, StatisticsProgress};
pub use statement::{Node, NodeClass, Predicate, Statement, StatementBundle};
pub use template::{QueryTemplate, TemplateRegistry};
