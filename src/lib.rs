pub mod analytics;
pub mod api;
pub mod config;
pub mod errors;
pub mod ids;
pub mod models;
pub mod redirect;
pub mod storage;
