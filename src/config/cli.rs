use super::{Settings, TomlConfig};
use crate::app::screens::CellInput;
use crate::core::calendar::YearMonth;
use crate::domain::model::SeasonType;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "pricing-desk")]
#[command(about = "Manage routes, seasons, tour operators and daily prices")]
#[command(version)]
pub struct CliConfig {
    #[arg(long, global = true, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true)]
    pub api_base_url: Option<String>,

    #[arg(long, global = true, help = "Directory holding the saved session")]
    pub session_dir: Option<String>,

    #[arg(long, global = true, help = "Directory for exported spreadsheets")]
    pub output_path: Option<String>,

    #[arg(long, global = true)]
    pub timeout_seconds: Option<u64>,

    #[arg(long, global = true, help = "Export format: xlsx or csv")]
    pub format: Option<String>,

    #[arg(long, short, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    /// 預設值，疊上 --config 指定的檔案，再疊上命令列參數
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = Settings::default();

        if let Some(path) = &self.config {
            let toml = TomlConfig::from_file(path)?;
            toml.validate()?;
            settings = settings.merge_toml(&toml);
        }

        if let Some(url) = &self.api_base_url {
            settings.api_base_url = url.clone();
        }
        if let Some(dir) = &self.session_dir {
            settings.session_dir = dir.clone();
        }
        if let Some(path) = &self.output_path {
            settings.output_path = path.clone();
        }
        if let Some(timeout) = self.timeout_seconds {
            settings.timeout_seconds = timeout;
        }
        if let Some(format) = &self.format {
            settings.export_format = format.clone();
        }

        Ok(settings)
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Sign in and remember the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create a new account
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "Operator")]
        role: String,
    },
    /// Forget the saved session
    Logout,
    /// Show the saved session
    Whoami,
    #[command(subcommand)]
    Routes(RouteCommand),
    #[command(subcommand)]
    Seasons(SeasonCommand),
    #[command(subcommand)]
    Operators(OperatorCommand),
    #[command(subcommand)]
    Prices(PriceCommand),
}

#[derive(Debug, Clone, Subcommand)]
pub enum RouteCommand {
    List,
    /// Seasons that can be attached to a route, optionally for one year
    Seasons {
        #[arg(long)]
        year: Option<i32>,
    },
    Create {
        #[arg(long)]
        origin: String,
        #[arg(long)]
        destination: String,
        #[arg(long = "class", value_delimiter = ',', help = "Booking class names, e.g. Economy,Business")]
        classes: Vec<String>,
        #[arg(long)]
        season_id: Option<i64>,
    },
    Update {
        id: i64,
        #[arg(long)]
        origin: Option<String>,
        #[arg(long)]
        destination: Option<String>,
        #[arg(long = "class", value_delimiter = ',')]
        classes: Option<Vec<String>>,
        #[arg(long)]
        season_id: Option<i64>,
    },
    Delete {
        id: i64,
        #[arg(long, help = "Skip the confirmation prompt")]
        yes: bool,
    },
    BookingClasses {
        id: i64,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum SeasonCommand {
    List,
    Create {
        #[arg(long)]
        year: i32,
        #[arg(long = "type")]
        season_type: SeasonType,
    },
    Update {
        id: i64,
        #[arg(long)]
        year: i32,
        #[arg(long = "type")]
        season_type: SeasonType,
    },
    Delete {
        id: i64,
        #[arg(long)]
        yes: bool,
    },
    /// Print the name and dates a season would get, without calling the API
    Derive {
        #[arg(long)]
        year: i32,
        #[arg(long = "type")]
        season_type: SeasonType,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum OperatorCommand {
    List,
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, value_delimiter = ',')]
        booking_class_ids: Vec<i64>,
        #[arg(long, value_delimiter = ',')]
        season_ids: Vec<i64>,
    },
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long, value_delimiter = ',')]
        booking_class_ids: Option<Vec<i64>>,
        #[arg(long, value_delimiter = ',')]
        season_ids: Option<Vec<i64>>,
    },
    Delete {
        id: i64,
        #[arg(long)]
        yes: bool,
    },
}

/// 定價表的選取條件；未指定時用第一條路線、第一個季節與本月
#[derive(Debug, Clone, Args)]
pub struct GridArgs {
    #[arg(long, help = "Month as YYYY-MM")]
    pub month: Option<YearMonth>,
    #[arg(long)]
    pub route_id: Option<i64>,
    #[arg(long)]
    pub season_id: Option<i64>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum PriceCommand {
    /// Print the monthly grid
    Show(GridArgs),
    /// Edit cells and save them in one bulk upsert
    Set {
        #[command(flatten)]
        grid: GridArgs,
        #[arg(long = "cell", required = true, help = "DATE:CLASS_ID:PRICE:SEATS, empty parts are left unchanged")]
        cells: Vec<CellInput>,
    },
    /// Write the monthly grid to a spreadsheet
    Export(GridArgs),
    /// Search price entries
    Query {
        #[arg(long)]
        operator_id: Option<String>,
        #[arg(long)]
        route_id: Option<i64>,
        #[arg(long)]
        season_id: Option<i64>,
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        page_size: Option<u32>,
    },
    /// Create a single price entry
    Add {
        #[arg(long)]
        route_id: i64,
        #[arg(long)]
        season_id: i64,
        #[arg(long)]
        booking_class_id: i64,
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        price: f64,
        #[arg(long)]
        seats: i64,
    },
}
