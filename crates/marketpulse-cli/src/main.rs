mod account;
mod analyzer;
mod context;
mod market;
mod output;

use clap::{Parser, Subcommand};
use marketpulse_core::Platform;
use tracing_subscriber::EnvFilter;

use account::{AuthCommands, UsersCommands};
use analyzer::{CalcCommands, ExportCommands, SessionCommands};
use context::AppContext;

#[derive(Debug, Parser)]
#[command(name = "marketpulse")]
#[command(about = "MarketPulse marketplace intelligence for sellers")]
struct Cli {
    /// Print results as JSON instead of formatted text
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract a marketplace listing and start a new analyzer session
    Extract {
        /// Product page URL (Mercado Livre, Amazon or Shopee)
        url: String,
    },
    /// Score the listing held in the session; flags override the form fields
    Analyze {
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Display price, e.g. "R$ 199,90"
        #[arg(long)]
        price: Option<String>,
        #[arg(long)]
        platform: Option<Platform>,
    },
    /// Generate optimized titles, bullets and a pitch for the extracted listing
    Copy,
    /// Unit economics and ad efficiency calculator
    Calc {
        #[command(subcommand)]
        command: CalcCommands,
    },
    /// Export the analyzer session as a report
    Export {
        #[command(subcommand)]
        command: ExportCommands,
    },
    /// Inspect or discard the analyzer session
    Session {
        #[command(subcommand)]
        command: SessionCommands,
    },
    /// Market trends for a category or product
    Trends {
        category: String,
    },
    /// Trend board: the top products of a category with shopping links
    Board {
        category: String,
    },
    /// Catalog opportunities for a category
    Catalog {
        category: String,
    },
    /// Competitor title benchmark for a keyword
    Titles {
        keyword: String,
        #[arg(long, default_value = "Mercado Livre")]
        platform: Platform,
    },
    /// Regional search interest for a product
    Geo {
        product: String,
    },
    /// Audit an ad campaign described in free text
    Audit {
        context: String,
    },
    /// Draft a complete listing from a product name
    Listing {
        name: String,
        #[arg(long, default_value = "")]
        characteristics: String,
        #[arg(long, default_value = "")]
        category: String,
    },
    /// Sign in and out
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Manage user accounts (administrators only)
    Users {
        #[command(subcommand)]
        command: UsersCommands,
    },
}

impl Commands {
    /// Commands that work without a signed-in user.
    fn is_public(&self) -> bool {
        matches!(
            self,
            Commands::Auth {
                command: AuthCommands::Login { .. } | AuthCommands::Logout | AuthCommands::Whoami
            }
        )
    }
}

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = marketpulse_core::load_app_config()?;
    init_tracing(&config.log_level);

    let missing = config.missing_credentials();
    if !missing.is_empty() {
        tracing::warn!(missing = %missing.join(", "), "credentials not configured");
    }

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("marketpulse ready; run `marketpulse --help` for commands");
        return Ok(());
    };

    let ctx = AppContext::new(config, cli.json)?;
    if !command.is_public() {
        ctx.require_user().await?;
    }

    match command {
        Commands::Extract { url } => analyzer::run_extract(&ctx, &url).await,
        Commands::Analyze {
            title,
            description,
            price,
            platform,
        } => {
            analyzer::run_analyze(
                &ctx,
                analyzer::FormOverrides {
                    title,
                    description,
                    price,
                    platform,
                },
            )
            .await
        }
        Commands::Copy => analyzer::run_copy(&ctx).await,
        Commands::Calc { command } => analyzer::run_calc(&ctx, command),
        Commands::Export { command } => analyzer::run_export(&ctx, &command),
        Commands::Session { command } => analyzer::run_session(&ctx, &command),
        Commands::Trends { category } => market::run_trends(&ctx, &category).await,
        Commands::Board { category } => market::run_board(&ctx, &category).await,
        Commands::Catalog { category } => market::run_catalog(&ctx, &category).await,
        Commands::Titles { keyword, platform } => {
            market::run_titles(&ctx, platform, &keyword).await
        }
        Commands::Geo { product } => market::run_geo(&ctx, &product).await,
        Commands::Audit { context } => market::run_audit(&ctx, &context).await,
        Commands::Listing {
            name,
            characteristics,
            category,
        } => market::run_listing(&ctx, &name, &characteristics, &category).await,
        Commands::Auth { command } => account::run_auth(&ctx, command).await,
        Commands::Users { command } => {
            ctx.require_admin().await?;
            account::run_users(&ctx, command).await
        }
    }
}
