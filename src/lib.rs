pub mod aggregators;
pub mod charts;
pub mod config;
pub mod dataset;
pub mod output;
pub mod routes;
pub mod source;
