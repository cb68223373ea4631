// lib.rs
pub mod config;
pub mod dashboard_manager;
pub mod dashboard_renderer;
pub mod dataset_manager;
pub mod order_aggregator;
pub mod order_filter;
pub mod order_loader;
pub mod settings;
pub mod user_experience;
pub mod user_interaction;
