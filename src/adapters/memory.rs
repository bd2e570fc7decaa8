use crate::domain::model::{AuditNote, CarrierRow, IntegrationSettings, ProjectField, ProjectRecord};
use crate::domain::ports::{RecordStore, SettingsProvider};
use crate::utils::error::{Result, ShipsGoError};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct MemoryState {
    projects: HashMap<String, ProjectRecord>,
    notes: Vec<AuditNote>,
    carriers: Vec<CarrierRow>,
    field_writes: usize,
}

/// Process-local record store. Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_project(&self, record: ProjectRecord) {
        let mut state = self.state.lock().await;
        state.projects.insert(record.name.clone(), record);
    }

    pub async fn notes_for(&self, record_id: &str) -> Vec<AuditNote> {
        let state = self.state.lock().await;
        state
            .notes
            .iter()
            .filter(|n| n.record_id == record_id)
            .cloned()
            .collect()
    }

    /// Number of `set_project_field` calls served so far.
    pub async fn field_writes(&self) -> usize {
        self.state.lock().await.field_writes
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn get_project(&self, record_id: &str) -> Result<Option<ProjectRecord>> {
        let state = self.state.lock().await;
        Ok(state.projects.get(record_id).cloned())
    }

    async fn save_project(&self, record: ProjectRecord) -> Result<()> {
        self.insert_project(record).await;
        Ok(())
    }

    async fn set_project_field(&self, record_id: &str, field: ProjectField) -> Result<()> {
        let mut state = self.state.lock().await;
        let record = state
            .projects
            .get_mut(record_id)
            .ok_or_else(|| ShipsGoError::RecordNotFoundError {
                record_id: record_id.to_string(),
            })?;
        field.apply(record);
        state.field_writes += 1;
        Ok(())
    }

    async fn add_note(&self, record_id: &str, text: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        state.notes.push(AuditNote {
            record_id: record_id.to_string(),
            text: text.to_string(),
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn carrier_exists(&self, scac_code: &str) -> Result<bool> {
        let state = self.state.lock().await;
        Ok(state.carriers.iter().any(|c| c.scac_code == scac_code))
    }

    async fn insert_carrier(&self, row: CarrierRow) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.carriers.iter().any(|c| c.scac_code == row.scac_code) {
            return Err(ShipsGoError::StoreError {
                message: format!("carrier {} already exists", row.scac_code),
            });
        }
        state.carriers.push(row);
        Ok(())
    }

    async fn list_carriers(&self) -> Result<Vec<CarrierRow>> {
        let state = self.state.lock().await;
        Ok(state.carriers.clone())
    }
}

/// Fixed settings, for embedding and tests.
#[derive(Debug, Clone)]
pub struct StaticSettings(pub IntegrationSettings);

impl SettingsProvider for StaticSettings {
    async fn load_settings(&self) -> Result<IntegrationSettings> {
        Ok(self.0.clone())
    }
}
