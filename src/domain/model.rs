use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_SCHEDULER_IDENTITY: &str = "Administrator";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// "Track With" selection on a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TrackingMode {
    ContainerNumber,
    BookingNumber,
    /// Values the integration does not recognise. They pass validation untouched.
    Other(String),
}

impl TrackingMode {
    pub fn label(&self) -> &str {
        match self {
            TrackingMode::ContainerNumber => "Container Number",
            TrackingMode::BookingNumber => "Booking Number",
            TrackingMode::Other(value) => value,
        }
    }
}

impl From<&str> for TrackingMode {
    fn from(value: &str) -> Self {
        match value {
            "Container Number" => TrackingMode::ContainerNumber,
            "Booking Number" => TrackingMode::BookingNumber,
            other => TrackingMode::Other(other.to_string()),
        }
    }
}

impl From<String> for TrackingMode {
    fn from(value: String) -> Self {
        TrackingMode::from(value.as_str())
    }
}

impl From<TrackingMode> for String {
    fn from(mode: TrackingMode) -> Self {
        mode.label().to_string()
    }
}

impl fmt::Display for TrackingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShipmentStatus {
    #[serde(rename = "Not Created")]
    NotCreated,
    Created,
    Failed,
}

impl ShipmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipmentStatus::NotCreated => "Not Created",
            ShipmentStatus::Created => "Created",
            ShipmentStatus::Failed => "Failed",
        }
    }
}

impl fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Button offered for a project in the host UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShipmentAction {
    Create,
    Retry,
}

impl ShipmentAction {
    pub fn label(&self) -> &'static str {
        match self {
            ShipmentAction::Create => "Create Shipment",
            ShipmentAction::Retry => "Retry Shipment",
        }
    }
}

/// The host project record: tracking request fields plus the shipment result
/// fields written back by the integration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub name: String,
    #[serde(default)]
    pub carrier: Option<String>,
    #[serde(default)]
    pub track_with: Option<TrackingMode>,
    #[serde(default)]
    pub tracking_number: Option<String>,
    #[serde(default)]
    pub shipment_id: Option<String>,
    #[serde(default)]
    pub shipment_status: Option<ShipmentStatus>,
    #[serde(default)]
    pub shipment_error: String,
}

impl ProjectRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            carrier: None,
            track_with: None,
            tracking_number: None,
            shipment_id: None,
            shipment_status: None,
            shipment_error: String::new(),
        }
    }

    pub fn with_carrier(mut self, carrier: impl Into<String>) -> Self {
        self.carrier = Some(carrier.into());
        self
    }

    pub fn with_tracking(mut self, mode: TrackingMode, number: impl Into<String>) -> Self {
        self.track_with = Some(mode);
        self.tracking_number = Some(number.into());
        self
    }

    pub fn with_status(mut self, status: ShipmentStatus) -> Self {
        self.shipment_status = Some(status);
        self
    }

    pub fn next_action(&self) -> Option<ShipmentAction> {
        let has_carrier = self.carrier.as_deref().is_some_and(|c| !c.is_empty());
        if !has_carrier || self.track_with.is_none() {
            return None;
        }

        match self.shipment_status {
            Some(ShipmentStatus::Created) if self.shipment_id.is_some() => None,
            Some(ShipmentStatus::Failed) => Some(ShipmentAction::Retry),
            _ => Some(ShipmentAction::Create),
        }
    }
}

/// One of the three result fields the integration may write on a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectField {
    ShipmentId(Option<String>),
    Status(ShipmentStatus),
    Error(String),
}

impl ProjectField {
    pub fn apply(self, record: &mut ProjectRecord) {
        match self {
            ProjectField::ShipmentId(id) => record.shipment_id = id,
            ProjectField::Status(status) => record.shipment_status = Some(status),
            ProjectField::Error(error) => record.shipment_error = error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditNote {
    pub record_id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub user: String,
    pub access_token: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl AccessToken {
    pub fn new(user: impl Into<String>, access_token: impl Into<String>, active: bool) -> Self {
        Self {
            user: user.into(),
            access_token: access_token.into(),
            active,
        }
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("user", &self.user)
            .field("access_token", &mask_token(&self.access_token))
            .field("active", &self.active)
            .finish()
    }
}

/// Masks a secret for display, keeping the first and last four characters.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}****{}", head, tail)
}

/// The integration settings singleton.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrationSettings {
    pub enable: bool,
    pub base_api_url: String,
    pub dashboard_url: Option<String>,
    pub scheduler_identity: String,
    pub request_timeout: Duration,
    pub tokens: Vec<AccessToken>,
}

impl IntegrationSettings {
    pub fn new(base_api_url: impl Into<String>) -> Self {
        Self {
            enable: true,
            base_api_url: base_api_url.into(),
            dashboard_url: None,
            scheduler_identity: DEFAULT_SCHEDULER_IDENTITY.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            tokens: Vec::new(),
        }
    }

    pub fn with_token(mut self, token: AccessToken) -> Self {
        self.tokens.push(token);
        self
    }

    pub fn token_for(&self, user: &str) -> Option<&AccessToken> {
        self.tokens.iter().find(|t| t.user == user)
    }

    /// Dashboard page listing the account's tracked shipments.
    pub fn tracking_link(&self) -> Option<String> {
        let base = self.dashboard_url.as_deref()?.trim_end_matches('/');
        if base.is_empty() {
            return None;
        }
        Some(format!("{}/dashboard/track-and-trace/my-shipments", base))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CarrierStatus {
    Active,
    Inactive,
}

impl CarrierStatus {
    pub fn from_remote(status: Option<&str>) -> Self {
        if status == Some("ACTIVE") {
            CarrierStatus::Active
        } else {
            CarrierStatus::Inactive
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarrierRow {
    pub carrier_name: String,
    pub scac_code: String,
    pub status: CarrierStatus,
    pub created_at: DateTime<Utc>,
}
