//! `docket` - list and maintain court records from the terminal
//!
//! Records are kept as JSON collections in the data directory configured
//! in `settings.json` (see `docket-settings`).

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use docket_admin::{AccountSpec, Role, UserAccount};
use docket_records::{AnnualStatistic, Case, EntityKind, MonthlyStatistic, Petition, ReceiveLog};
use docket_settings::DocketSettings;

mod commands;
mod console;
mod logging;

use commands::{Context, ListOptions};

/// Record types the command line can address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Record(EntityKind),
    Account,
}

fn parse_kind(raw: &str) -> Result<Kind, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "account" | "accounts" => Ok(Kind::Account),
        _ => raw.parse().map(Kind::Record),
    }
}

/// Run a generic command for whichever record type `$kind` names
macro_rules! for_kind {
    ($kind:expr, async $command:ident ( $($arg:expr),* )) => {
        match $kind {
            Kind::Record(EntityKind::Case) => commands::$command::<Case>($($arg),*).await,
            Kind::Record(EntityKind::Petition) => commands::$command::<Petition>($($arg),*).await,
            Kind::Record(EntityKind::ReceiveLog) => commands::$command::<ReceiveLog>($($arg),*).await,
            Kind::Record(EntityKind::AnnualStatistic) => {
                commands::$command::<AnnualStatistic>($($arg),*).await
            }
            Kind::Record(EntityKind::MonthlyStatistic) => {
                commands::$command::<MonthlyStatistic>($($arg),*).await
            }
            Kind::Account => commands::$command::<UserAccount>($($arg),*).await,
        }
    };
    ($kind:expr, $command:ident ( $($arg:expr),* )) => {
        match $kind {
            Kind::Record(EntityKind::Case) => commands::$command::<Case>($($arg),*),
            Kind::Record(EntityKind::Petition) => commands::$command::<Petition>($($arg),*),
            Kind::Record(EntityKind::ReceiveLog) => commands::$command::<ReceiveLog>($($arg),*),
            Kind::Record(EntityKind::AnnualStatistic) => commands::$command::<AnnualStatistic>($($arg),*),
            Kind::Record(EntityKind::MonthlyStatistic) => commands::$command::<MonthlyStatistic>($($arg),*),
            Kind::Account => commands::$command::<UserAccount>($($arg),*),
        }
    };
}

#[derive(Parser)]
#[command(author, version, long_about = None)]
#[command(about = "List and maintain court records")]
struct Cli {
    /// Act as this account instead of the local system user
    #[arg(long, global = true, env = "DOCKET_ACTOR")]
    actor: Option<String>,

    /// Read and write collections in this directory
    #[arg(long, global = true, env = "DOCKET_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Answer yes to every confirmation
    #[arg(short, long, global = true)]
    yes: bool,

    /// Verbose logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List one page of records
    List(ListArgs),
    /// Show the header layout of a record type
    Columns {
        #[arg(value_parser = parse_kind)]
        kind: Kind,
    },
    /// Add a record
    Add {
        #[arg(value_parser = parse_kind)]
        kind: Kind,
        /// Field values as FIELD=VALUE
        #[arg(short, long = "set", value_name = "FIELD=VALUE")]
        set: Vec<String>,
    },
    /// Edit a record
    Edit {
        #[arg(value_parser = parse_kind)]
        kind: Kind,
        id: String,
        /// Field values as FIELD=VALUE
        #[arg(short, long = "set", value_name = "FIELD=VALUE")]
        set: Vec<String>,
    },
    /// Delete a record
    Delete {
        #[arg(value_parser = parse_kind)]
        kind: Kind,
        id: String,
    },
    /// Account administration
    Account {
        #[command(subcommand)]
        command: AccountCommands,
    },
}

#[derive(Args)]
struct ListArgs {
    #[arg(value_parser = parse_kind)]
    kind: Kind,

    /// Free-text search across every field
    #[arg(short, long)]
    search: Option<String>,

    /// FIELD=TEXT, or FIELD=START..END for date fields
    #[arg(short, long = "filter", value_name = "FIELD=VALUE")]
    filter: Vec<String>,

    /// Match this text filter as a substring instead of exactly
    #[arg(long, value_name = "FIELD")]
    contains: Vec<String>,

    /// Sort by this column
    #[arg(long)]
    sort: Option<String>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    desc: bool,

    #[arg(short, long, default_value_t = 1)]
    page: usize,

    #[arg(long)]
    page_size: Option<usize>,

    /// Print the page as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum AccountCommands {
    /// Create an account
    Create {
        username: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// admin, clerk or viewer
        #[arg(long, default_value = "viewer")]
        role: Role,
        #[arg(long, env = "DOCKET_PASSWORD")]
        password: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = DocketSettings::load_or_create()?;
    if let Some(dir) = cli.data_dir {
        settings.store.data_dir = Some(dir);
    }
    let created = docket_settings::ensure_directories(&settings)?;

    let config = if cli.verbose {
        logging::LoggingConfig::development()
    } else {
        logging::LoggingConfig::production()
    };
    let _guard = logging::init(config)?;
    for dir in &created {
        tracing::info!(dir = %dir.display(), "created directory");
    }

    let actor = commands::resolve_actor(&settings, cli.actor.as_deref()).await?;
    tracing::debug!(actor = %actor.name, "resolved actor");

    let ctx = Context {
        settings,
        actor,
        assume_yes: cli.yes,
    };

    match cli.command {
        Commands::List(args) => {
            let options = ListOptions {
                search: args.search,
                filters: args.filter,
                contains: args.contains,
                sort: args.sort,
                descending: args.desc,
                page: args.page,
                page_size: args.page_size,
                json: args.json,
            };
            for_kind!(args.kind, async list(&ctx, &options))
        }
        Commands::Columns { kind } => for_kind!(kind, columns()),
        Commands::Add { kind, set } => for_kind!(kind, async add(&ctx, &set)),
        Commands::Edit { kind, id, set } => for_kind!(kind, async edit(&ctx, &id, &set)),
        Commands::Delete { kind, id } => for_kind!(kind, async delete(&ctx, &id)),
        Commands::Account { command } => match command {
            AccountCommands::Create {
                username,
                name,
                email,
                role,
                password,
            } => {
                let spec = AccountSpec::new(username)
                    .with_full_name(name)
                    .with_email(email)
                    .with_role(role)
                    .with_password(password);
                commands::create_account(&ctx, &spec).await
            }
        },
    }
}
