//! Classification of a "create shipment" call into a disposition and the
//! matching local field update.
//!
//! Every way the call can end is a [`Classification`] variant, so the mapping
//! to [`Disposition`] and [`LocalUpdate`] is an exhaustive `match`.

use crate::core::client::{ApiResponse, CallFailure, ShipmentResponse, SUCCESS_MESSAGE};
use serde::{Deserialize, Serialize};

pub const INSUFFICIENT_CREDITS_ERROR: &str = "Insufficient ShipsGo credits.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    Success,
    LinkedExisting,
    /// Advisory only. Nothing is retried automatically.
    Retryable,
    Failed,
}

/// What `create_shipment` hands back to its interactive caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentOutcome {
    pub status: Disposition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipment_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ShipmentOutcome {
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: Disposition::Failed,
            shipment_id: None,
            error: Some(error.into()),
        }
    }
}

/// Writes to apply to the project after classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalUpdate {
    Untouched,
    MarkCreated {
        shipment_id: Option<String>,
        note: String,
    },
    MarkFailed {
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Created { shipment_id: String },
    Rejected { message: Option<String> },
    MissingShipmentId,
    AlreadyExists { shipment_id: Option<String> },
    RateLimited,
    InsufficientCredits,
    InvalidInput { body: String },
    ServerError { body: String },
    UnexpectedStatus { body: String },
    Timeout,
    ConnectionFailed,
    /// Anything else: undecodable bodies, other transport errors, store failures.
    Unexpected { message: String },
}

impl Classification {
    pub fn from_response(response: &ApiResponse) -> Self {
        match response.status {
            200 | 201 => {
                let body: ShipmentResponse = match response.json() {
                    Ok(body) => body,
                    Err(e) => {
                        return Classification::Unexpected {
                            message: e.to_string(),
                        }
                    }
                };

                if body.message.as_deref() != Some(SUCCESS_MESSAGE) {
                    return Classification::Rejected {
                        message: body.message,
                    };
                }

                match body.shipment_id() {
                    Some(shipment_id) => Classification::Created { shipment_id },
                    None => Classification::MissingShipmentId,
                }
            }
            409 => {
                // 409 bodies are not guaranteed to be JSON; the id is best effort
                let shipment_id = response
                    .json::<ShipmentResponse>()
                    .ok()
                    .and_then(|body| body.shipment_id());
                Classification::AlreadyExists { shipment_id }
            }
            429 => Classification::RateLimited,
            402 => Classification::InsufficientCredits,
            400 | 422 => Classification::InvalidInput {
                body: response.body.clone(),
            },
            status if status >= 500 => Classification::ServerError {
                body: response.body.clone(),
            },
            _ => Classification::UnexpectedStatus {
                body: response.body.clone(),
            },
        }
    }

    pub fn disposition(&self) -> Disposition {
        match self {
            Classification::Created { .. } => Disposition::Success,
            Classification::AlreadyExists { .. } => Disposition::LinkedExisting,
            Classification::RateLimited
            | Classification::Timeout
            | Classification::ConnectionFailed => Disposition::Retryable,
            Classification::Rejected { .. }
            | Classification::MissingShipmentId
            | Classification::InsufficientCredits
            | Classification::InvalidInput { .. }
            | Classification::ServerError { .. }
            | Classification::UnexpectedStatus { .. }
            | Classification::Unexpected { .. } => Disposition::Failed,
        }
    }

    pub fn local_update(&self) -> LocalUpdate {
        match self {
            Classification::Created { shipment_id } => LocalUpdate::MarkCreated {
                shipment_id: Some(shipment_id.clone()),
                note: format!("Shipment created on ShipsGo. ID: {}", shipment_id),
            },
            Classification::AlreadyExists { shipment_id } => LocalUpdate::MarkCreated {
                shipment_id: shipment_id.clone(),
                note: format!(
                    "Existing shipment linked (HTTP 409). ID: {}",
                    shipment_id.as_deref().unwrap_or("unknown")
                ),
            },
            Classification::InsufficientCredits => LocalUpdate::MarkFailed {
                error: INSUFFICIENT_CREDITS_ERROR.to_string(),
            },
            Classification::InvalidInput { body }
            | Classification::ServerError { body }
            | Classification::UnexpectedStatus { body } => {
                LocalUpdate::MarkFailed { error: body.clone() }
            }
            Classification::Unexpected { message } => LocalUpdate::MarkFailed {
                error: message.clone(),
            },
            Classification::Rejected { .. }
            | Classification::MissingShipmentId
            | Classification::RateLimited
            | Classification::Timeout
            | Classification::ConnectionFailed => LocalUpdate::Untouched,
        }
    }

    /// Message shown to the user for non-successful dispositions.
    pub fn user_error(&self) -> Option<String> {
        let message = match self {
            Classification::Created { .. } | Classification::AlreadyExists { .. } => return None,
            Classification::Rejected { message } => message
                .clone()
                .unwrap_or_else(|| "Unexpected API response".to_string()),
            Classification::MissingShipmentId => {
                "Shipment created but ID missing in response.".to_string()
            }
            Classification::RateLimited => {
                "Too many requests. Please wait a few seconds and try again.".to_string()
            }
            Classification::InsufficientCredits => {
                "ShipsGo account has insufficient credits.".to_string()
            }
            Classification::InvalidInput { .. } => "Invalid carrier or tracking number.".to_string(),
            Classification::ServerError { .. } => {
                "ShipsGo server error. Please retry later.".to_string()
            }
            Classification::UnexpectedStatus { body } => body.clone(),
            Classification::Timeout => "Request timed out. Please try again.".to_string(),
            Classification::ConnectionFailed => "Unable to connect to ShipsGo.".to_string(),
            Classification::Unexpected { message } => message.clone(),
        };
        Some(message)
    }

    pub fn outcome(&self) -> ShipmentOutcome {
        let shipment_id = match self {
            Classification::Created { shipment_id } => Some(shipment_id.clone()),
            Classification::AlreadyExists { shipment_id } => shipment_id.clone(),
            _ => None,
        };

        ShipmentOutcome {
            status: self.disposition(),
            shipment_id,
            error: self.user_error(),
        }
    }
}

impl From<CallFailure> for Classification {
    fn from(failure: CallFailure) -> Self {
        match failure {
            CallFailure::Timeout => Classification::Timeout,
            CallFailure::Connect => Classification::ConnectionFailed,
            CallFailure::Other(message) => Classification::Unexpected { message },
        }
    }
}
