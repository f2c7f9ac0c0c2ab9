pub mod common;

mod sheets_fetch;
mod value_coercion;
