pub mod ops_analyze;
pub mod ops_export;
