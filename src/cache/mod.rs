pub mod config_cache;
pub mod snapshot;
