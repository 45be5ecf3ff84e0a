//! Sales export loading and the staged single-employee KPI evaluation.
//!
//! The evaluation runs as a small candidate pipeline: the query is
//! hydrated with any fallback activation count, export rows are fetched,
//! filtered by employee name, and the latest matching row is selected and
//! scored.

pub mod activation_loader;
pub mod candidate_pipeline;
pub mod components;
pub mod error;
pub mod filter;
pub mod pipelines;
pub mod query_hydrator;
pub mod sales_loader;
pub mod selector;
pub mod side_effect;
pub mod source;
pub mod types;
pub mod util;

pub use activation_loader::{load_activations, load_activations_file, ActivationTable, SecondaryColumnMap};
pub use components::activation_query_hydrator::SecondarySource;
pub use error::{EvaluationError, EvaluationResult};
pub use pipelines::kpi_evaluation::KpiEvaluationPipeline;
pub use sales_loader::{load_sales, load_sales_file, ColumnMap, SalesRecord, SalesTable};
pub use types::{
    ActivationOverride, ActivationSource, EvaluationQuery, EvaluationReport, EvaluationSettings,
};
