/// Sources module
///
/// Remote collaborators: the identity provider token endpoint, the
/// spreadsheet values api, and the background token renewal executor.
pub mod executor;
pub mod fetch;
pub mod oauth2;
pub mod sheets;
