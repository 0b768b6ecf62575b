pub mod analytics;
pub mod dashboard;
pub mod dates;
pub mod demo;
pub mod domain;
pub mod error;
pub mod export;
pub mod ingest;
pub mod kpi;
pub mod range_selector;
pub mod selection;
pub mod settings;
pub mod table;
pub mod validate;
