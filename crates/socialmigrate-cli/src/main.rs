mod accounts;
mod migrate;

use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use socialmigrate_classifier::{GeminiClassifier, KeywordClassifier};
use socialmigrate_core::{AppConfig, RelevanceClassifier};
use socialmigrate_graph::GraphClient;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "socialmigrate")]
#[command(about = "Copy topic-matched posts from one account to another")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the wizard against built-in sample data
    Demo {
        #[command(flatten)]
        plan: PlanArgs,
        /// Milliseconds to wait before each simulated publish
        #[arg(long, default_value = "0")]
        delay_ms: u64,
    },
    /// Show the profile a token belongs to
    Profile {
        /// User access token
        #[arg(long, env = "SOCIALMIGRATE_SOURCE_TOKEN", hide_env_values = true)]
        token: String,
    },
    /// List the pages a token can publish to
    Pages {
        /// User access token
        #[arg(long, env = "SOCIALMIGRATE_DESTINATION_TOKEN", hide_env_values = true)]
        token: String,
    },
    /// Migrate matching posts between real accounts
    Migrate {
        /// Access token for the account whose posts are copied
        #[arg(long, env = "SOCIALMIGRATE_SOURCE_TOKEN", hide_env_values = true)]
        source_token: String,
        /// Access token for the account that receives the posts
        #[arg(long, env = "SOCIALMIGRATE_DESTINATION_TOKEN", hide_env_values = true)]
        destination_token: String,
        /// Read posts from this managed page instead of the source profile
        #[arg(long)]
        source_page: Option<String>,
        /// Publish to this managed page instead of the destination profile
        #[arg(long)]
        destination_page: Option<String>,
        #[command(flatten)]
        plan: PlanArgs,
    },
}

/// Topic, date bounds and output options shared by `demo` and `migrate`.
#[derive(Debug, Clone, Args)]
struct PlanArgs {
    /// Free-text description of the posts to migrate
    #[arg(long)]
    topic: String,
    /// Earliest post date to consider (YYYY-MM-DD)
    #[arg(long)]
    start: Option<String>,
    /// Latest post date to consider (YYYY-MM-DD)
    #[arg(long)]
    end: Option<String>,
    /// Stop after review without publishing anything
    #[arg(long)]
    dry_run: bool,
    /// Print the final report as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = socialmigrate_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Demo { plan, delay_ms }) => {
            migrate::run_demo(&config, classifier(&config)?, &plan, delay_ms).await?;
        }
        Some(Commands::Profile { token }) => {
            accounts::run_profile(&GraphClient::from_config(&config)?, &token).await?;
        }
        Some(Commands::Pages { token }) => {
            accounts::run_pages(&GraphClient::from_config(&config)?, &token).await?;
        }
        Some(Commands::Migrate {
            source_token,
            destination_token,
            source_page,
            destination_page,
            plan,
        }) => {
            let accounts = migrate::AccountArgs {
                source_token,
                destination_token,
                source_page,
                destination_page,
            };
            let graph = Arc::new(GraphClient::from_config(&config)?);
            migrate::run_migrate(&config, graph, classifier(&config)?, &accounts, &plan).await?;
        }
        None => println!("no command given; try `socialmigrate demo --topic concerts`"),
    }

    Ok(())
}

/// Gemini when a key is configured, otherwise the offline keyword matcher.
fn classifier(config: &AppConfig) -> anyhow::Result<Arc<dyn RelevanceClassifier>> {
    if config.gemini_api_key.is_some() {
        Ok(Arc::new(GeminiClassifier::from_config(config)?))
    } else {
        tracing::info!("GEMINI_API_KEY not set; using keyword classifier");
        Ok(Arc::new(KeywordClassifier::new()))
    }
}
