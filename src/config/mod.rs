#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::TomlConfig;

use crate::core::export::ExportFormat;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, validate_range, validate_url, Validate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_SESSION_DIR: &str = "./.pricing-desk";
pub const DEFAULT_OUTPUT_PATH: &str = "./exports";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_EXPORT_FORMAT: &str = "xlsx";

/// 合併後的執行設定：命令列 > 設定檔 > 預設值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub api_base_url: String,
    pub session_dir: String,
    pub output_path: String,
    pub timeout_seconds: u64,
    pub export_format: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            session_dir: DEFAULT_SESSION_DIR.to_string(),
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            export_format: DEFAULT_EXPORT_FORMAT.to_string(),
        }
    }
}

impl Settings {
    /// 設定檔有填的欄位覆蓋目前的值
    pub fn merge_toml(mut self, toml: &TomlConfig) -> Self {
        if let Some(url) = &toml.api.base_url {
            self.api_base_url = url.clone();
        }
        if let Some(timeout) = toml.api.timeout_seconds {
            self.timeout_seconds = timeout;
        }
        if let Some(dir) = &toml.session.dir {
            self.session_dir = dir.clone();
        }
        if let Some(path) = &toml.export.output_path {
            self.output_path = path.clone();
        }
        if let Some(format) = &toml.export.format {
            self.export_format = format.clone();
        }
        self
    }

    pub fn format(&self) -> Result<ExportFormat> {
        self.export_format.parse()
    }
}

impl ConfigProvider for Settings {
    fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    fn session_dir(&self) -> &str {
        &self.session_dir
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    fn export_format(&self) -> &str {
        &self.export_format
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_url("api_base_url", &self.api_base_url)?;
        validate_path("session_dir", &self.session_dir)?;
        validate_path("output_path", &self.output_path)?;
        validate_range("timeout_seconds", self.timeout_seconds, 1, 300)?;
        self.format()?;
        Ok(())
    }
}
