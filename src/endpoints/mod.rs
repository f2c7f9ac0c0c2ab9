pub mod auth_routes;
pub mod config_metrics;
pub mod config_routes;
