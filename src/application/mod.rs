// Application layer: error kinds, ledger aggregations and the service that
// ties one store to them for each user interaction.

pub mod error;
pub mod reporting;
pub mod service;

pub use error::*;
pub use service::*;
