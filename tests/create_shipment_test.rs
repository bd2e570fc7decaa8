use async_trait::async_trait;
use httpmock::prelude::*;
use serde_json::json;
use shipsgo_sync::domain::model::{
    AccessToken, CarrierRow, IntegrationSettings, ProjectField, ProjectRecord, ShipmentStatus,
    TrackingMode,
};
use shipsgo_sync::domain::ports::RecordStore;
use shipsgo_sync::{
    Caller, Disposition, InMemoryStore, Result, ShipsGoError, ShipsGoService, StaticSettings,
};
use std::time::Duration;

const USER: &str = "ops@example.com";
const TOKEN: &str = "ops-token-0001";

fn settings(base_url: String) -> IntegrationSettings {
    IntegrationSettings::new(base_url).with_token(AccessToken::new(USER, TOKEN, true))
}

fn container_project() -> ProjectRecord {
    ProjectRecord::new("PROJ-0001")
        .with_carrier("MAEU")
        .with_tracking(TrackingMode::ContainerNumber, "ABCD1234567")
        .with_status(ShipmentStatus::NotCreated)
}

async fn service_for(
    settings: IntegrationSettings,
    record: ProjectRecord,
) -> (ShipsGoService<InMemoryStore, StaticSettings>, InMemoryStore) {
    let store = InMemoryStore::new();
    store.insert_project(record).await;
    (
        ShipsGoService::new(store.clone(), StaticSettings(settings)),
        store,
    )
}

async fn project(store: &InMemoryStore) -> ProjectRecord {
    store.get_project("PROJ-0001").await.unwrap().unwrap()
}

#[tokio::test]
async fn test_success_records_shipment_id() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/ocean/shipments")
            .header("X-Shipsgo-User-Token", TOKEN)
            .json_body(json!({
                "reference": "PROJ-0001",
                "carrier": "MAEU",
                "container_number": "ABCD1234567"
            }));
        then.status(200)
            .json_body(json!({"message": "SUCCESS", "shipment": {"id": "S1"}}));
    });

    let (service, store) = service_for(settings(server.base_url()), container_project()).await;
    let outcome = service
        .create_shipment("PROJ-0001", &Caller::user(USER))
        .await
        .unwrap();

    api_mock.assert();
    assert_eq!(outcome.status, Disposition::Success);
    assert_eq!(outcome.shipment_id.as_deref(), Some("S1"));
    assert_eq!(outcome.error, None);

    let record = project(&store).await;
    assert_eq!(record.shipment_status, Some(ShipmentStatus::Created));
    assert_eq!(record.shipment_id.as_deref(), Some("S1"));
    assert_eq!(record.shipment_error, "");

    let notes = store.notes_for("PROJ-0001").await;
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].text, "Shipment created on ShipsGo. ID: S1");
}

#[tokio::test]
async fn test_booking_number_payload() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/ocean/shipments").json_body(json!({
            "reference": "PROJ-0001",
            "carrier": "MSCU",
            "booking_number": "BK-2024/001"
        }));
        then.status(201)
            .json_body(json!({"message": "SUCCESS", "shipment": {"id": 991}}));
    });

    let record = ProjectRecord::new("PROJ-0001")
        .with_carrier("MSCU")
        .with_tracking(TrackingMode::BookingNumber, "BK-2024/001");
    let (service, store) = service_for(settings(server.base_url()), record).await;
    let outcome = service
        .create_shipment("PROJ-0001", &Caller::user(USER))
        .await
        .unwrap();

    api_mock.assert();
    assert_eq!(outcome.status, Disposition::Success);
    assert_eq!(project(&store).await.shipment_id.as_deref(), Some("991"));
}

#[tokio::test]
async fn test_success_without_id_mutates_nothing() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/ocean/shipments");
        then.status(200)
            .json_body(json!({"message": "SUCCESS", "shipment": {}}));
    });

    let (service, store) = service_for(settings(server.base_url()), container_project()).await;
    let outcome = service
        .create_shipment("PROJ-0001", &Caller::user(USER))
        .await
        .unwrap();

    assert_eq!(outcome.status, Disposition::Failed);
    assert_eq!(
        outcome.error.as_deref(),
        Some("Shipment created but ID missing in response.")
    );
    assert_eq!(store.field_writes().await, 0);
    assert_eq!(project(&store).await, container_project());
}

#[tokio::test]
async fn test_conflict_links_existing_shipment() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/ocean/shipments");
        then.status(409).json_body(json!({"shipment": {"id": "S2"}}));
    });

    let (service, store) = service_for(settings(server.base_url()), container_project()).await;
    let outcome = service
        .create_shipment("PROJ-0001", &Caller::user(USER))
        .await
        .unwrap();

    assert_eq!(outcome.status, Disposition::LinkedExisting);
    assert_eq!(outcome.shipment_id.as_deref(), Some("S2"));

    let record = project(&store).await;
    assert_eq!(record.shipment_status, Some(ShipmentStatus::Created));
    assert_eq!(record.shipment_id.as_deref(), Some("S2"));
    assert_eq!(
        store.notes_for("PROJ-0001").await[0].text,
        "Existing shipment linked (HTTP 409). ID: S2"
    );
}

#[tokio::test]
async fn test_rate_limit_is_retryable_and_untouched() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/ocean/shipments");
        then.status(429).body("slow down");
    });

    let mut record = container_project().with_status(ShipmentStatus::Failed);
    record.shipment_error = "previous failure".to_string();
    let (service, store) = service_for(settings(server.base_url()), record.clone()).await;

    let outcome = service
        .create_shipment("PROJ-0001", &Caller::user(USER))
        .await
        .unwrap();

    assert_eq!(outcome.status, Disposition::Retryable);
    assert_eq!(store.field_writes().await, 0);
    assert_eq!(project(&store).await, record);
}

#[tokio::test]
async fn test_failure_statuses_are_persisted() {
    let cases = [
        (402, "{\"message\":\"NO_CREDITS\"}", "Insufficient ShipsGo credits."),
        (400, "bad carrier", "bad carrier"),
        (422, "unprocessable", "unprocessable"),
        (502, "bad gateway", "bad gateway"),
        (404, "no such route", "no such route"),
    ];

    for (status, body, stored_error) in cases {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/ocean/shipments");
            then.status(status).body(body);
        });

        let (service, store) =
            service_for(settings(server.base_url()), container_project()).await;
        let outcome = service
            .create_shipment("PROJ-0001", &Caller::user(USER))
            .await
            .unwrap();

        assert_eq!(outcome.status, Disposition::Failed, "status {}", status);
        let record = project(&store).await;
        assert_eq!(record.shipment_status, Some(ShipmentStatus::Failed));
        assert_eq!(record.shipment_error, stored_error);
        assert_eq!(record.shipment_id, None);
    }
}

#[tokio::test]
async fn test_missing_fields_fail_before_http() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/ocean/shipments");
        then.status(200);
    });

    let no_carrier = ProjectRecord::new("PROJ-0001")
        .with_tracking(TrackingMode::ContainerNumber, "ABCD1234567");
    let (service, _) = service_for(settings(server.base_url()), no_carrier).await;
    let err = service
        .create_shipment("PROJ-0001", &Caller::user(USER))
        .await
        .unwrap_err();
    assert!(matches!(err, ShipsGoError::MissingFieldError { .. }));

    let mut empty_number = container_project();
    empty_number.tracking_number = Some(String::new());
    let (service, _) = service_for(settings(server.base_url()), empty_number).await;
    let err = service
        .create_shipment("PROJ-0001", &Caller::user(USER))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Carrier and Tracking Number are required.");

    api_mock.assert_hits(0);
}

#[tokio::test]
async fn test_credential_errors_propagate() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/ocean/shipments");
        then.status(200);
    });

    let (service, _) = service_for(settings(server.base_url()), container_project()).await;
    let err = service
        .create_shipment("PROJ-0001", &Caller::user("nobody@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, ShipsGoError::TokenNotFoundError { .. }));

    let mut disabled = settings(server.base_url());
    disabled.enable = false;
    let (service, store) = service_for(disabled, container_project()).await;
    let err = service
        .create_shipment("PROJ-0001", &Caller::user(USER))
        .await
        .unwrap_err();
    assert!(matches!(err, ShipsGoError::IntegrationDisabledError));
    assert_eq!(store.field_writes().await, 0);

    api_mock.assert_hits(0);
}

#[tokio::test]
async fn test_unknown_record() {
    let (service, _) =
        service_for(settings("http://127.0.0.1:1".into()), container_project()).await;
    let err = service
        .create_shipment("PROJ-9999", &Caller::user(USER))
        .await
        .unwrap_err();
    assert!(matches!(err, ShipsGoError::RecordNotFoundError { .. }));
}

#[tokio::test]
async fn test_timeout_is_retryable() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/ocean/shipments");
        then.status(200)
            .delay(Duration::from_secs(2))
            .json_body(json!({"message": "SUCCESS", "shipment": {"id": "late"}}));
    });

    let mut settings = settings(server.base_url());
    settings.request_timeout = Duration::from_millis(200);
    let (service, store) = service_for(settings, container_project()).await;

    let outcome = service
        .create_shipment("PROJ-0001", &Caller::user(USER))
        .await
        .unwrap();

    assert_eq!(outcome.status, Disposition::Retryable);
    assert_eq!(
        outcome.error.as_deref(),
        Some("Request timed out. Please try again.")
    );
    assert_eq!(store.field_writes().await, 0);
}

#[tokio::test]
async fn test_connection_error_is_retryable() {
    // nothing listens on port 1
    let (service, store) =
        service_for(settings("http://127.0.0.1:1".into()), container_project()).await;

    let outcome = service
        .create_shipment("PROJ-0001", &Caller::user(USER))
        .await
        .unwrap();

    assert_eq!(outcome.status, Disposition::Retryable);
    assert_eq!(outcome.error.as_deref(), Some("Unable to connect to ShipsGo."));
    assert_eq!(store.field_writes().await, 0);
}

#[tokio::test]
async fn test_undecodable_success_body_marks_failed() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/ocean/shipments");
        then.status(200).body("<html>gateway</html>");
    });

    let (service, store) = service_for(settings(server.base_url()), container_project()).await;
    let outcome = service
        .create_shipment("PROJ-0001", &Caller::user(USER))
        .await
        .unwrap();

    assert_eq!(outcome.status, Disposition::Failed);
    let record = project(&store).await;
    assert_eq!(record.shipment_status, Some(ShipmentStatus::Failed));
    assert!(record.shipment_error.starts_with("Serialization error"));
}

/// Store whose shipment-id writes always fail.
#[derive(Clone)]
struct BrokenIdColumn(InMemoryStore);

#[async_trait]
impl RecordStore for BrokenIdColumn {
    async fn get_project(&self, record_id: &str) -> Result<Option<ProjectRecord>> {
        self.0.get_project(record_id).await
    }

    async fn save_project(&self, record: ProjectRecord) -> Result<()> {
        self.0.save_project(record).await
    }

    async fn set_project_field(&self, record_id: &str, field: ProjectField) -> Result<()> {
        if let ProjectField::ShipmentId(_) = field {
            return Err(ShipsGoError::StoreError {
                message: "column locked".to_string(),
            });
        }
        self.0.set_project_field(record_id, field).await
    }

    async fn add_note(&self, record_id: &str, text: &str) -> Result<()> {
        self.0.add_note(record_id, text).await
    }

    async fn carrier_exists(&self, scac_code: &str) -> Result<bool> {
        self.0.carrier_exists(scac_code).await
    }

    async fn insert_carrier(&self, row: CarrierRow) -> Result<()> {
        self.0.insert_carrier(row).await
    }

    async fn list_carriers(&self) -> Result<Vec<CarrierRow>> {
        self.0.list_carriers().await
    }
}

#[tokio::test]
async fn test_store_failure_after_success_marks_failed() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/ocean/shipments");
        then.status(200)
            .json_body(json!({"message": "SUCCESS", "shipment": {"id": "S1"}}));
    });

    let inner = InMemoryStore::new();
    inner.insert_project(container_project()).await;
    let service = ShipsGoService::new(
        BrokenIdColumn(inner.clone()),
        StaticSettings(settings(server.base_url())),
    );

    let outcome = service
        .create_shipment("PROJ-0001", &Caller::user(USER))
        .await
        .unwrap();

    assert_eq!(outcome.status, Disposition::Failed);
    assert_eq!(
        outcome.error.as_deref(),
        Some("Record store error: column locked")
    );

    let record = project(&inner).await;
    assert_eq!(record.shipment_status, Some(ShipmentStatus::Failed));
    assert_eq!(record.shipment_error, "Record store error: column locked");
    assert!(inner.notes_for("PROJ-0001").await.is_empty());
}
