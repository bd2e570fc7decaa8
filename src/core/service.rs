use crate::core::client::ShipsGoClient;
use crate::core::credentials::{load_credentials, visible_tokens, Caller, Credentials, TokenView};
use crate::domain::model::ProjectRecord;
use crate::domain::ports::{RecordStore, SettingsProvider};
use crate::utils::error::{Result, ShipsGoError};
use crate::utils::validation::Validate;
use reqwest::Client;

/// Entry point for every ShipsGo operation.
///
/// Holds no per-caller state: each operation resolves its own credentials
/// and builds a [`ShipsGoClient`] for the duration of that call.
pub struct ShipsGoService<S: RecordStore, P: SettingsProvider> {
    pub(crate) store: S,
    pub(crate) settings: P,
    client: Client,
}

impl<S: RecordStore, P: SettingsProvider> ShipsGoService<S, P> {
    pub fn new(store: S, settings: P) -> Self {
        Self::with_client(store, settings, Client::new())
    }

    pub fn with_client(store: S, settings: P, client: Client) -> Self {
        Self {
            store,
            settings,
            client,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub(crate) fn api(&self, credentials: Credentials) -> ShipsGoClient {
        ShipsGoClient::new(self.client.clone(), credentials)
    }

    /// Saves a project after running the tracking-number validation hook.
    pub async fn save_project(&self, record: ProjectRecord) -> Result<()> {
        record.validate()?;
        tracing::debug!("💾 Saving project {}", record.name);
        self.store.save_project(record).await
    }

    pub async fn project(&self, record_id: &str) -> Result<ProjectRecord> {
        self.store
            .get_project(record_id)
            .await?
            .ok_or_else(|| ShipsGoError::RecordNotFoundError {
                record_id: record_id.to_string(),
            })
    }

    /// Fetches the remote shipment document. Read-only; nothing is written locally.
    pub async fn get_shipment(&self, caller: &Caller, shipment_id: &str) -> Result<serde_json::Value> {
        let credentials = load_credentials(&self.settings, caller).await?;
        let response = self.api(credentials).get_shipment(shipment_id).await?;

        if !response.is_success() {
            return Err(ShipsGoError::ApiError {
                status: response.status,
                body: response.body,
            });
        }

        response.json()
    }

    pub async fn tracking_link(&self) -> Result<Option<String>> {
        Ok(self.settings.load_settings().await?.tracking_link())
    }

    pub async fn settings_view(&self, viewer: &str, roles: &[String]) -> Result<Vec<TokenView>> {
        let settings = self.settings.load_settings().await?;
        Ok(visible_tokens(&settings, viewer, roles))
    }
}
