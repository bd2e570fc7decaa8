use crate::core::credentials::Credentials;
use crate::domain::model::{ProjectRecord, TrackingMode};
use crate::utils::error::{Result, ShipsGoError};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub const TOKEN_HEADER: &str = "X-Shipsgo-User-Token";
pub const SUCCESS_MESSAGE: &str = "SUCCESS";

/// Body of `POST /ocean/shipments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShipmentPayload {
    pub reference: String,
    pub carrier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_number: Option<String>,
}

impl ShipmentPayload {
    pub fn for_record(record: &ProjectRecord, carrier: &str, tracking_number: &str) -> Self {
        let mut payload = Self {
            reference: record.name.clone(),
            carrier: carrier.to_string(),
            container_number: None,
            booking_number: None,
        };

        match record.track_with {
            Some(TrackingMode::ContainerNumber) => {
                payload.container_number = Some(tracking_number.to_string())
            }
            Some(TrackingMode::BookingNumber) => {
                payload.booking_number = Some(tracking_number.to_string())
            }
            _ => {}
        }

        payload
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShipmentResponse {
    pub message: Option<String>,
    pub shipment: Option<RemoteShipment>,
}

impl ShipmentResponse {
    pub fn shipment_id(&self) -> Option<String> {
        self.shipment.as_ref().and_then(RemoteShipment::id)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoteShipment {
    // ShipsGo returns numeric ids; older payloads used strings
    #[serde(default)]
    id: Option<serde_json::Value>,
}

impl RemoteShipment {
    pub fn id(&self) -> Option<String> {
        match self.id.as_ref()? {
            serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CarrierListResponse {
    pub message: Option<String>,
    #[serde(default)]
    pub carriers: Vec<RemoteCarrier>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoteCarrier {
    pub scac: Option<String>,
    pub name: Option<String>,
    pub status: Option<String>,
}

/// Status and raw body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport-level failure of a call that produced no HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallFailure {
    Timeout,
    Connect,
    Other(String),
}

impl From<&ShipsGoError> for CallFailure {
    fn from(err: &ShipsGoError) -> Self {
        match err {
            ShipsGoError::HttpError(e) if e.is_timeout() => CallFailure::Timeout,
            ShipsGoError::HttpError(e) if e.is_connect() => CallFailure::Connect,
            other => CallFailure::Other(other.to_string()),
        }
    }
}

/// Thin client for the ShipsGo ocean API, bound to one caller's credentials.
pub struct ShipsGoClient {
    client: Client,
    credentials: Credentials,
}

impl ShipsGoClient {
    pub fn new(client: Client, credentials: Credentials) -> Self {
        Self {
            client,
            credentials,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.credentials.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub async fn create_shipment(&self, payload: &ShipmentPayload) -> Result<ApiResponse> {
        let url = self.endpoint("ocean/shipments");
        tracing::debug!("📡 POST {} (reference: {})", url, payload.reference);
        self.send(self.client.post(&url).json(payload)).await
    }

    pub async fn list_carriers(&self) -> Result<ApiResponse> {
        let url = self.endpoint("ocean/carriers");
        tracing::debug!("📡 GET {}", url);
        self.send(self.client.get(&url)).await
    }

    pub async fn get_shipment(&self, shipment_id: &str) -> Result<ApiResponse> {
        let url = self.endpoint(&format!("ocean/shipments/{}", shipment_id));
        tracing::debug!("📡 GET {}", url);
        self.send(self.client.get(&url)).await
    }

    async fn send(&self, request: RequestBuilder) -> Result<ApiResponse> {
        let response = request
            .header(TOKEN_HEADER, &self.credentials.token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .timeout(self.credentials.timeout)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        tracing::debug!("📡 ShipsGo responded with HTTP {}", status);

        Ok(ApiResponse { status, body })
    }
}
