pub mod carriers;
pub mod client;
pub mod credentials;
pub mod outcome;
pub mod service;
pub mod shipment;

pub use crate::domain::model::{CarrierRow, IntegrationSettings, ProjectRecord};
pub use crate::domain::ports::{RecordStore, SettingsProvider};
pub use crate::utils::error::Result;
