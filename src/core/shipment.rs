use crate::core::client::{CallFailure, ShipmentPayload};
use crate::core::credentials::{load_credentials, Caller};
use crate::core::outcome::{Classification, LocalUpdate, ShipmentOutcome};
use crate::core::service::ShipsGoService;
use crate::domain::model::{ProjectField, ShipmentStatus};
use crate::domain::ports::{RecordStore, SettingsProvider};
use crate::utils::error::{Result, ShipsGoError};

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl<S: RecordStore, P: SettingsProvider> ShipsGoService<S, P> {
    /// Creates the project's shipment on ShipsGo and records the result.
    ///
    /// `Err` is returned only for problems found before the HTTP call:
    /// unknown record, missing carrier/tracking number, credential failures.
    /// Everything after that is reported through [`ShipmentOutcome`].
    pub async fn create_shipment(&self, record_id: &str, caller: &Caller) -> Result<ShipmentOutcome> {
        let record = self.project(record_id).await?;

        let (carrier, tracking_number) =
            match (non_empty(&record.carrier), non_empty(&record.tracking_number)) {
                (Some(carrier), Some(number)) => (carrier, number),
                _ => {
                    return Err(ShipsGoError::MissingFieldError {
                        message: "Carrier and Tracking Number are required.".to_string(),
                    })
                }
            };

        let credentials = load_credentials(&self.settings, caller).await?;
        let payload = ShipmentPayload::for_record(&record, carrier, tracking_number);

        tracing::info!(
            "🚢 Creating ShipsGo shipment for {} ({} {})",
            record_id,
            carrier,
            tracking_number
        );

        let classification = match self.api(credentials).create_shipment(&payload).await {
            Ok(response) => Classification::from_response(&response),
            Err(err) => Classification::from(CallFailure::from(&err)),
        };

        if let Classification::Unexpected { message } = &classification {
            tracing::error!(title = "Shipment Creation Failed", record = record_id, "{}", message);
        }

        match self.apply_update(record_id, classification.local_update()).await {
            Ok(()) => {
                let outcome = classification.outcome();
                tracing::info!("🚢 {}: {:?}", record_id, outcome.status);
                Ok(outcome)
            }
            Err(err) => {
                let message = err.to_string();
                tracing::error!(title = "Shipment Creation Failed", record = record_id, "{}", message);
                self.mark_failed_best_effort(record_id, &message).await;
                Ok(ShipmentOutcome::failed(message))
            }
        }
    }

    async fn apply_update(&self, record_id: &str, update: LocalUpdate) -> Result<()> {
        match update {
            LocalUpdate::Untouched => Ok(()),
            LocalUpdate::MarkCreated { shipment_id, note } => {
                self.store
                    .set_project_field(record_id, ProjectField::ShipmentId(shipment_id))
                    .await?;
                self.store
                    .set_project_field(record_id, ProjectField::Status(ShipmentStatus::Created))
                    .await?;
                self.store
                    .set_project_field(record_id, ProjectField::Error(String::new()))
                    .await?;
                self.store.add_note(record_id, &note).await
            }
            LocalUpdate::MarkFailed { error } => self.write_failed(record_id, error).await,
        }
    }

    async fn write_failed(&self, record_id: &str, error: String) -> Result<()> {
        self.store
            .set_project_field(record_id, ProjectField::Status(ShipmentStatus::Failed))
            .await?;
        self.store
            .set_project_field(record_id, ProjectField::Error(error))
            .await
    }

    async fn mark_failed_best_effort(&self, record_id: &str, message: &str) {
        if let Err(e) = self.write_failed(record_id, message.to_string()).await {
            tracing::error!(
                title = "Shipment Creation Failed",
                record = record_id,
                "could not record failure: {}",
                e
            );
        }
    }
}
