pub mod client;
pub mod fallback;
pub mod model;
pub mod status;

pub use client::RelayClient;
pub use fallback::FallbackProcessor;
pub use model::{RelayError, RelayOutcome};
pub use status::StatusProber;
