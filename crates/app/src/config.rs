use clap::{Parser, Subcommand, ValueEnum};
use ledger::{AccountKind, DEFAULT_HISTORY_LEN};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/finboard.toml";
const ENV_PREFIX: &str = "FINBOARD";
pub const PASSWORD_ENV: &str = "FINBOARD_PASSWORD";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub email: String,
    pub poll_interval_secs: u64,
    pub history_len: usize,
    pub privacy: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            email: String::new(),
            poll_interval_secs: 5,
            history_len: DEFAULT_HISTORY_LEN,
            privacy: false,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "finboard", about = "Personal finance dashboard for the terminal")]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:8080).
    #[arg(long)]
    base_url: Option<String>,
    /// Override login email (password is only read from FINBOARD_PASSWORD).
    #[arg(long)]
    email: Option<String>,
    /// Mask every amount.
    #[arg(long)]
    privacy: bool,
    /// Print machine-readable JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List accounts with their balances.
    Accounts,
    /// Show the reconstructed balance series of an account.
    History {
        account_id: String,
        /// Number of recent transactions to walk.
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Totals across all accounts.
    Summary,
    /// Send money to another account by number.
    Transfer {
        #[arg(long = "from")]
        source_account_id: String,
        #[arg(long = "to")]
        target_account_number: String,
        /// Amount such as 12.50 or 12,50.
        #[arg(long)]
        amount: String,
        #[arg(long)]
        description: String,
    },
    CreateAccount {
        #[arg(long)]
        number: String,
        #[arg(long, value_enum, default_value_t = KindArg::Asset)]
        kind: KindArg,
    },
    DeleteAccount {
        account_id: String,
    },
    /// List investment positions with ROI.
    Investments,
    /// Register a purchase.
    Buy {
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, default_value = "STOCK")]
        kind: String,
        #[arg(long)]
        quantity: Decimal,
        #[arg(long)]
        price: Decimal,
    },
    /// Poll the ledger and print the summary until interrupted.
    Watch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Asset,
    Liability,
}

impl From<KindArg> for AccountKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Asset => AccountKind::Asset,
            KindArg::Liability => AccountKind::Liability,
        }
    }
}

#[derive(Debug)]
pub struct Invocation {
    pub config: AppConfig,
    pub command: Command,
    pub json: bool,
}

pub fn load() -> Result<Invocation> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(email) = args.email {
        settings.email = email;
    }
    if args.privacy {
        settings.privacy = true;
    }

    Ok(Invocation {
        config: settings,
        command: args.command,
        json: args.json,
    })
}
