pub mod client_secret;
pub mod credential_store;
pub mod token;
