pub mod alert;
pub mod app_context;
pub mod config;
pub mod jobs;
pub mod monitor;
pub mod state_store;
