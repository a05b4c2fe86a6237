pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{ApiClient, LocalStorage};
pub use app::screens::{OperatorScreen, PricingScreen, RouteScreen, SeasonScreen};
#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{Settings, TomlConfig};
pub use crate::core::session::{Session, SessionContext};
pub use utils::error::{DeskError, Result};
