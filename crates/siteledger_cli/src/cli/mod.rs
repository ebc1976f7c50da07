use clap::{Parser, Subcommand};
use siteledger_core::config::canonical_theme_name;
use siteledger_core::model::{
    Direction, DocumentCategory, DurationUnit, Money, PaymentMethod, ProjectStatus,
    TransactionStatus,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Construction project ledger", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create, list and inspect projects
    Project {
        #[command(subcommand)]
        command: ProjectCommand,
    },
    /// Contracted work items of a project
    Task {
        #[command(subcommand)]
        command: TaskCommand,
    },
    /// Record and list transactions
    Txn {
        #[command(subcommand)]
        command: TxnCommand,
    },
    /// Register and list project documents
    Doc {
        #[command(subcommand)]
        command: DocCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommand {
    /// Create a project
    ///
    /// Example: siteledger project add "Maple Street Duplex" --client "R. Okafor" --budget 250000 --deadline 2026-12-01
    Add {
        name: String,
        #[arg(long)]
        client: String,
        #[arg(long)]
        budget: Money,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        deadline: String,
        #[arg(long, default_value = "in-progress")]
        status: ProjectStatus,
        /// Team head count
        #[arg(long)]
        team: Option<u32>,
    },
    /// List all projects
    List,
    /// Show a project with its financial summary
    ///
    /// Example: siteledger project show project-1
    Show { id: String },
}

#[derive(Subcommand, Debug)]
pub enum TaskCommand {
    /// Add a contracted task to a project
    ///
    /// Example: siteledger task add project-1 --category Framing --contract-value 100000
    Add {
        project_id: String,
        /// Defaults to "<category> Work"
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long = "contract-value")]
        contract_value: Money,
        #[arg(long = "estimated-cost")]
        estimated_cost: Option<Money>,
        #[arg(long)]
        contractor: Option<String>,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        /// Start date (YYYY-MM-DD)
        #[arg(long = "start-date")]
        start_date: Option<String>,
        #[arg(long)]
        duration: Option<u32>,
        #[arg(long = "duration-unit", default_value = "months")]
        duration_unit: DurationUnit,
    },
    /// List the tasks of a project
    List { project_id: String },
    /// Show a task with its payments
    Show { task_id: String },
}

#[derive(Subcommand, Debug)]
pub enum TxnCommand {
    /// Record a transaction, reconciling the linked task if any
    ///
    /// Example: siteledger txn add project-1 40000 --task task-1 --method check
    /// Example: siteledger txn add project-1 25000 --direction in --category Deposit
    Add {
        project_id: String,
        /// Amount as a magnitude; --direction sets the sign
        #[arg(allow_negative_numbers = true)]
        amount: Money,
        /// Task this payment goes towards
        #[arg(long)]
        task: Option<String>,
        #[arg(long, default_value = "out")]
        direction: Direction,
        /// Defaults to the configured payment method
        #[arg(long)]
        method: Option<PaymentMethod>,
        #[arg(long, default_value = "completed")]
        status: TransactionStatus,
        /// Transaction date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        reference: Option<String>,
        /// Show the effect on the task without recording anything
        #[arg(long, requires = "task")]
        preview: bool,
    },
    /// List the transactions of a project
    List { project_id: String },
}

#[derive(Subcommand, Debug)]
pub enum DocCommand {
    /// Register a document's metadata
    ///
    /// Example: siteledger doc add project-1 permit.pdf --main-category owner --sub-category Permits --size-bytes 2621440
    Add {
        project_id: String,
        name: String,
        #[arg(long = "main-category")]
        main_category: DocumentCategory,
        #[arg(long = "sub-category")]
        sub_category: String,
        #[arg(long = "size-bytes", default_value_t = 0)]
        size_bytes: u64,
        #[arg(long)]
        description: Option<String>,
        #[arg(long = "uploaded-by", default_value = "unknown")]
        uploaded_by: String,
    },
    /// List the documents of a project
    List { project_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    Theme,
    CurrencySymbol,
    PaymentMethod,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let (key_raw, value_raw) = raw
        .trim()
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let value = value_raw.trim().to_string();
    let key =
        canonicalize_flag_name(key_raw).ok_or_else(|| "override key cannot be empty".to_string())?;

    let target = match key.as_str() {
        "theme" => ConfigOverrideTarget::Theme,
        "currency" | "currency_symbol" => ConfigOverrideTarget::CurrencySymbol,
        "payment_method" | "default_payment_method" => ConfigOverrideTarget::PaymentMethod,
        other => return Err(format!("unknown config field '{other}'")),
    };
    if value.is_empty() {
        return Err(format!("override '{key}' needs a value"));
    }
    let value = match target {
        ConfigOverrideTarget::Theme => canonical_theme_name(&value).ok_or_else(|| {
            format!("unknown theme '{value}' (expected default, noir or solarized)")
        })?,
        _ => value,
    };

    Ok(ParsedConfigOverride { target, value })
}

fn canonicalize_flag_name(name: &str) -> Option<String> {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
