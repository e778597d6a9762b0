mod content;
mod db;
mod report;

use adforge_core::ActingRole;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::content::ContentCommands;
use crate::report::ReportCommands;

#[derive(Debug, Parser)]
#[command(name = "adforge-cli")]
#[command(about = "AdForge content lifecycle and performance tooling")]
struct Cli {
    /// Role to act under (admin, editor or viewer)
    #[arg(long, global = true, default_value = "editor")]
    role: ActingRole,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Inspect and move content through its lifecycle
    Content {
        #[command(subcommand)]
        command: ContentCommands,
    },
    /// Performance roll-ups and learning insights
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check database connectivity
    Ping,
    /// Apply pending migrations
    Migrate,
    /// Insert a product with avatars, campaigns, content and links from YAML
    Seed {
        /// Seed file; defaults to `ADFORGE_SEED_PATH`
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("adforge-cli: no command given; see --help");
        return Ok(());
    };

    let config = adforge_core::load_app_config()?;
    tracing::debug!(role = %cli.role, env = %config.env, "adforge-cli starting");
    let pool_config = adforge_db::PoolConfig::from_app_config(&config);
    let pool = adforge_db::connect_pool(&config.database_url, pool_config).await?;

    match command {
        Commands::Db { command } => match command {
            DbCommands::Ping => db::run_db_ping(&pool).await?,
            DbCommands::Migrate => db::run_db_migrate(&pool).await?,
            DbCommands::Seed { file } => {
                let path = file.unwrap_or_else(|| config.seed_path.clone());
                db::run_db_seed(&pool, &path).await?;
            }
        },
        Commands::Content { command } => content::run(&pool, cli.role, command).await?,
        Commands::Report { command } => report::run(&pool, cli.role, command).await?,
    }

    Ok(())
}
