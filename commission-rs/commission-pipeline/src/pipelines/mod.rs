pub mod kpi_evaluation;
