/// Certificate verification portal
///
/// Presentation and orchestration glue over three external collaborators: a
/// certificate contract on an EVM ledger, a backend REST API, and a
/// content-addressed storage gateway. The core is the multi-mode credential
/// resolution workflow in [`resolve::coordinator`].
pub mod admin;
pub mod api;
pub mod backend;
pub mod chain;
pub mod config;
pub mod context;
pub mod error;
pub mod metadata;
pub mod presenter;
pub mod resolve;
pub mod server;
