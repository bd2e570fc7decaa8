use crate::core::client::{CallFailure, CarrierListResponse, RemoteCarrier, SUCCESS_MESSAGE};
use crate::core::credentials::{load_credentials, Caller};
use crate::core::service::ShipsGoService;
use crate::domain::model::{CarrierRow, CarrierStatus};
use crate::domain::ports::{RecordStore, SettingsProvider};
use crate::utils::error::{Result, ShipsGoError};
use chrono::Utc;

/// Counters from one carrier sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarrierSyncReport {
    pub created: usize,
    pub already_present: usize,
    pub missing_scac: usize,
    /// False when the run stopped early; the cause has been logged.
    pub completed: bool,
}

impl<S: RecordStore, P: SettingsProvider> ShipsGoService<S, P> {
    /// Scheduled job: adds every remote carrier whose SCAC code is not yet
    /// known locally. Never fails; problems are logged for the operator.
    pub async fn fetch_carrier_list(&self) -> CarrierSyncReport {
        let mut report = CarrierSyncReport::default();

        match self.sync_carriers(&mut report).await {
            Ok(()) => {}
            Err(err @ ShipsGoError::TokenNotFoundError { .. }) => {
                tracing::error!(title = "ShipsGo Token Missing", "{}", err)
            }
            Err(err) => match CallFailure::from(&err) {
                CallFailure::Timeout => {
                    tracing::error!(title = "ShipsGo Timeout", "API request timed out")
                }
                CallFailure::Connect => {
                    tracing::error!(title = "ShipsGo Connection Error", "Unable to connect to ShipsGo")
                }
                CallFailure::Other(message) => {
                    tracing::error!(title = "ShipsGo Unknown Error", "{}", message)
                }
            },
        }

        tracing::info!(
            "📋 Carrier sync: {} created, {} already present, {} without SCAC",
            report.created,
            report.already_present,
            report.missing_scac
        );
        report
    }

    async fn sync_carriers(&self, report: &mut CarrierSyncReport) -> Result<()> {
        let credentials = load_credentials(&self.settings, &Caller::Scheduler).await?;

        if credentials.token.is_empty() {
            tracing::error!(title = "ShipsGo Token Missing", "ShipsGo token not configured");
            return Ok(());
        }

        let response = self.api(credentials).list_carriers().await?;

        if response.status != 200 {
            tracing::error!(
                title = %format!("ShipsGo HTTP Error {}", response.status),
                "{}",
                response.body
            );
            return Ok(());
        }

        let data: CarrierListResponse = response.json()?;
        if data.message.as_deref() != Some(SUCCESS_MESSAGE) {
            tracing::error!(title = "ShipsGo Logical Failure", "{}", response.body);
            return Ok(());
        }

        for carrier in data.carriers {
            self.import_carrier(carrier, report).await?;
        }

        report.completed = true;
        Ok(())
    }

    async fn import_carrier(&self, carrier: RemoteCarrier, report: &mut CarrierSyncReport) -> Result<()> {
        let scac_code = match carrier.scac {
            Some(scac) if !scac.is_empty() => scac,
            _ => {
                report.missing_scac += 1;
                return Ok(());
            }
        };

        if self.store.carrier_exists(&scac_code).await? {
            report.already_present += 1;
            return Ok(());
        }

        let row = CarrierRow {
            carrier_name: carrier.name.unwrap_or_default(),
            status: CarrierStatus::from_remote(carrier.status.as_deref()),
            scac_code,
            created_at: Utc::now(),
        };
        tracing::debug!("📋 New carrier {} ({:?})", row.scac_code, row.status);

        self.store.insert_carrier(row).await?;
        report.created += 1;
        Ok(())
    }
}
