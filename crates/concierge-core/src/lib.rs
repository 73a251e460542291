pub mod config;
pub mod error;
pub mod store;
pub mod types;

pub use config::ConciergeConfig;
pub use error::{ConciergeError, Result};
pub use store::AssistantStore;
pub use types::*;
