//! Application layer containing the issuance workflow and container wiring.

pub mod service;
pub mod state;

pub use service::AssetService;
pub use state::AppState;
