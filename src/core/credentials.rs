use crate::domain::model::{mask_token, IntegrationSettings};
use crate::domain::ports::SettingsProvider;
use crate::utils::error::{Result, ShipsGoError};
use std::fmt;
use std::time::Duration;

/// Roles allowed to see every user's token in the settings view.
pub const PRIVILEGED_ROLES: &[&str] = &["System Manager"];

/// Who an outbound call is made on behalf of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    /// An interactive user, identified by their login.
    User(String),
    /// Unattended scheduled runs. Resolves to the settings' scheduler identity.
    Scheduler,
}

impl Caller {
    pub fn user(identity: impl Into<String>) -> Self {
        Caller::User(identity.into())
    }

    pub fn identity<'a>(&'a self, settings: &'a IntegrationSettings) -> &'a str {
        match self {
            Caller::User(identity) => identity.as_str(),
            Caller::Scheduler => settings.scheduler_identity.as_str(),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &mask_token(&self.token))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

pub fn resolve_credentials(settings: &IntegrationSettings, caller: &Caller) -> Result<Credentials> {
    if !settings.enable {
        return Err(ShipsGoError::IntegrationDisabledError);
    }

    let identity = caller.identity(settings);
    let token = settings
        .token_for(identity)
        .ok_or_else(|| ShipsGoError::TokenNotFoundError {
            user: identity.to_string(),
        })?;

    if !token.active {
        return Err(ShipsGoError::InactiveTokenError {
            user: identity.to_string(),
        });
    }

    tracing::debug!("🔑 Resolved ShipsGo token for {}", identity);

    Ok(Credentials {
        token: token.access_token.clone(),
        base_url: settings.base_api_url.clone(),
        timeout: settings.request_timeout,
    })
}

/// Loads the settings singleton and resolves the caller's credentials.
pub async fn load_credentials<P: SettingsProvider>(
    provider: &P,
    caller: &Caller,
) -> Result<Credentials> {
    let settings = provider.load_settings().await?;
    resolve_credentials(&settings, caller)
}

/// A token row as shown to a particular viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenView {
    pub user: String,
    pub access_token: String,
    pub active: bool,
    pub revealed: bool,
}

pub fn visible_tokens(
    settings: &IntegrationSettings,
    viewer: &str,
    roles: &[String],
) -> Vec<TokenView> {
    let privileged = roles
        .iter()
        .any(|role| PRIVILEGED_ROLES.contains(&role.as_str()));

    settings
        .tokens
        .iter()
        .map(|row| {
            let revealed = privileged || row.user == viewer;
            TokenView {
                user: row.user.clone(),
                access_token: if revealed {
                    row.access_token.clone()
                } else {
                    mask_token(&row.access_token)
                },
                active: row.active,
                revealed,
            }
        })
        .collect()
}
