use crate::domain::model::{
    AccessToken, IntegrationSettings, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SCHEDULER_IDENTITY,
};
use crate::domain::ports::SettingsProvider;
use crate::utils::error::{Result, ShipsGoError};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_STORE_PATH: &str = "./shipsgo-data.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub integration: IntegrationConfig,
    #[serde(default)]
    pub tokens: Vec<AccessToken>,
    pub store: Option<StoreConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrationConfig {
    #[serde(default)]
    pub enable: bool,
    pub base_api_url: String,
    pub dashboard_url: Option<String>,
    pub scheduler_identity: Option<String>,
    pub request_timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub path: String,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ShipsGoError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ShipsGoError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SHIPSGO_TOKEN})，未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::LazyLock;

        static ENV_VAR: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var regex"));

        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        use crate::utils::validation::{validate_non_empty_string, validate_positive_number, validate_url};

        validate_url("integration.base_api_url", &self.integration.base_api_url)?;

        if let Some(dashboard_url) = &self.integration.dashboard_url {
            validate_url("integration.dashboard_url", dashboard_url)?;
        }

        if let Some(timeout) = self.integration.request_timeout_seconds {
            validate_positive_number("integration.request_timeout_seconds", timeout, 1)?;
        }

        if let Some(identity) = &self.integration.scheduler_identity {
            validate_non_empty_string("integration.scheduler_identity", identity)?;
        }

        for (index, token) in self.tokens.iter().enumerate() {
            validate_non_empty_string(&format!("tokens[{}].user", index), &token.user)?;

            // 環境變數未設定時 ${VAR} 會原樣保留
            if token.access_token.starts_with("${") {
                return Err(ShipsGoError::InvalidConfigValueError {
                    field: format!("tokens[{}].access_token", index),
                    value: token.access_token.clone(),
                    reason: "Environment variable is not set".to_string(),
                });
            }
        }

        if let Some(store) = &self.store {
            validate_non_empty_string("store.path", &store.path)?;
        }

        Ok(())
    }

    pub fn store_path(&self) -> &str {
        self.store
            .as_ref()
            .map(|s| s.path.as_str())
            .unwrap_or(DEFAULT_STORE_PATH)
    }

    pub fn settings(&self) -> IntegrationSettings {
        IntegrationSettings {
            enable: self.integration.enable,
            base_api_url: self.integration.base_api_url.clone(),
            dashboard_url: self.integration.dashboard_url.clone(),
            scheduler_identity: self
                .integration
                .scheduler_identity
                .clone()
                .unwrap_or_else(|| DEFAULT_SCHEDULER_IDENTITY.to_string()),
            request_timeout: Duration::from_secs(
                self.integration
                    .request_timeout_seconds
                    .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            ),
            tokens: self.tokens.clone(),
        }
    }
}

impl SettingsProvider for TomlConfig {
    async fn load_settings(&self) -> Result<IntegrationSettings> {
        Ok(self.settings())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
