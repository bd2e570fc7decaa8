pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{FileStore, InMemoryStore, StaticSettings};
pub use config::TomlConfig;
pub use crate::core::carriers::CarrierSyncReport;
pub use crate::core::credentials::{resolve_credentials, Caller, Credentials};
pub use crate::core::outcome::{Disposition, ShipmentOutcome};
pub use crate::core::service::ShipsGoService;
pub use utils::error::{Result, ShipsGoError};
