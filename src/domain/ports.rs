use crate::domain::model::{CarrierRow, IntegrationSettings, ProjectField, ProjectRecord};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait SettingsProvider: Send + Sync {
    fn load_settings(
        &self,
    ) -> impl std::future::Future<Output = Result<IntegrationSettings>> + Send;
}

/// Host-owned record store. Every call is its own unit of work; the store
/// decides commit semantics.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get_project(&self, record_id: &str) -> Result<Option<ProjectRecord>>;
    async fn save_project(&self, record: ProjectRecord) -> Result<()>;
    async fn set_project_field(&self, record_id: &str, field: ProjectField) -> Result<()>;
    async fn add_note(&self, record_id: &str, text: &str) -> Result<()>;

    async fn carrier_exists(&self, scac_code: &str) -> Result<bool>;
    async fn insert_carrier(&self, row: CarrierRow) -> Result<()>;
    async fn list_carriers(&self) -> Result<Vec<CarrierRow>>;
}
