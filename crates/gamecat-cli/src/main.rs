mod populate;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::populate::PopulateArgs;

#[derive(Debug, Parser)]
#[command(name = "gamecat-cli")]
#[command(about = "Game catalog population command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch a catalog page and write its games, references, and images
    Populate(PopulateArgs),
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check that the database is reachable
    Ping,
    /// Apply pending migrations
    Migrate,
}

impl Commands {
    /// Whether the command opens a database connection.
    fn needs_database(&self) -> bool {
        !matches!(self, Commands::Populate(args) if args.dry_run)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("gamecat-cli ready; run with --help for commands");
        return Ok(());
    };

    let config = if command.needs_database() {
        gamecat_core::load_app_config()?
    } else {
        gamecat_core::load_app_config_without_database()?
    };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    tracing::debug!(config = ?config, "configuration loaded");

    if let Commands::Populate(args) = &command {
        if args.dry_run {
            return populate::run_populate_dry_run(&config, args).await;
        }
    }

    let pool_config = gamecat_db::PoolConfig::from_app_config(&config);
    let pool = gamecat_db::connect_pool(&config.database_url, pool_config).await?;

    match command {
        Commands::Populate(args) => populate::run_populate(&pool, &config, &args).await?,
        Commands::Db { command } => match command {
            DbCommands::Ping => {
                gamecat_db::ping(&pool).await?;
                println!("database ok");
            }
            DbCommands::Migrate => {
                let applied = gamecat_db::run_migrations(&pool).await?;
                println!("applied {applied} migrations");
            }
        },
    }

    Ok(())
}
