pub mod activation_query_hydrator;
pub mod employee_name_filter;
pub mod evaluation_log_side_effect;
pub mod latest_record_selector;
pub mod sales_record_source;
