use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use nd_core::export::{self, DEFAULT_ROWS_PER_PAGE};
use nd_core::{
    sort_by_payout_desc, ArticleSource, AuthorPayout, ContentType, Dashboard, DirectoryAuthenticator, KeyValueStore,
    RateTable, Role, User,
};
use nd_feed::config::DEFAULT_BASE_URL;
use nd_feed::{fetch_or_fallback, FeedConfig, NewsApiSource, StaticSource};
use nd_storage::StorageKind;
use nd_web::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

mod logging;

use logging::Logger;

#[derive(Parser, Debug)]
#[command(author, version, about = "Newsroom admin back end", long_about = None)]
pub struct Cli {
    /// Where rates and the session are kept: memory or file
    #[arg(long, env = "ND_STORAGE", default_value = "memory")]
    storage: StorageKind,
    #[arg(long, env = "ND_DATA_DIR", default_value = ".newsdesk")]
    data_dir: PathBuf,
    #[arg(long, env = "NEWS_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    #[arg(long, env = "NEWS_API_URL", default_value = DEFAULT_BASE_URL)]
    api_url: String,
    #[arg(long, default_value = "us")]
    country: String,
    /// Skip the headlines service and work with the fallback articles
    #[arg(long)]
    offline: bool,
    #[arg(long, short)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the admin HTTP API
    Serve {
        #[arg(long, env = "ND_ADDR", default_value = "127.0.0.1:3000")]
        addr: SocketAddr,
        #[arg(long, env = "ND_ADMIN_EMAIL", default_value = "admin@example.com")]
        admin_email: String,
        /// Password for the seeded admin account. Without it no admin is seeded.
        #[arg(long, env = "ND_ADMIN_PASSWORD", hide_env_values = true)]
        admin_password: Option<String>,
    },
    /// Print payouts per author, highest first
    Payouts,
    /// Print the distinct authors
    Authors,
    /// Show or change the payout rates
    Rates {
        #[command(subcommand)]
        action: Option<RateCommands>,
    },
    /// Export payouts as CSV or as the paginated report
    Export {
        #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
        /// Write to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
        #[arg(long, default_value_t = DEFAULT_ROWS_PER_PAGE)]
        rows_per_page: usize,
    },
}

#[derive(Subcommand, Debug)]
enum RateCommands {
    Show,
    Set {
        content_type: ContentType,
        #[arg(allow_negative_numbers = true)]
        rate: f64,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum ExportFormat {
    Csv,
    Report,
}

fn build_source(cli: &Cli) -> Result<Arc<dyn ArticleSource>> {
    if cli.offline {
        return Ok(Arc::new(StaticSource::default()));
    }
    let mut config = FeedConfig::default().with_base_url(cli.api_url.clone());
    config.country = cli.country.clone();
    if let Some(api_key) = &cli.api_key {
        config = config.with_api_key(api_key.clone());
    }
    Ok(Arc::new(NewsApiSource::new(config)?))
}

async fn load_dashboard(store: &dyn KeyValueStore, source: &dyn ArticleSource) -> Dashboard {
    let mut dashboard = Dashboard::new(RateTable::load_or_seed(store).await);
    dashboard.replace_articles(fetch_or_fallback(source).await.articles);
    dashboard
}

fn admin_user(email: &str) -> User {
    User {
        id: "1".to_string(),
        email: email.to_string(),
        name: "Admin User".to_string(),
        role: Role::Admin,
        avatar: Some(format!("https://i.pravatar.cc/150?u={}", email)),
    }
}

fn render_payouts(payouts: &[AuthorPayout]) -> String {
    let mut out = format!("{:<32} {:>6} {:>6} {:>6} {:>12}\n", "Author", "News", "Blog", "Total", "Payout");
    for payout in payouts {
        out.push_str(&format!(
            "{:<32} {:>6} {:>6} {:>6} {:>12}\n",
            payout.author,
            payout.breakdown.news,
            payout.breakdown.blog,
            payout.articles,
            export::format_currency(payout.total_payout)
        ));
    }
    out
}

fn render_rates(rates: &RateTable) -> String {
    rates
        .to_rates()
        .iter()
        .map(|r| format!("{:<6} {}\n", r.content_type.as_str(), export::format_currency(r.rate)))
        .collect()
}

async fn serve(
    logger: &Logger,
    store: Arc<dyn KeyValueStore>,
    source: Arc<dyn ArticleSource>,
    addr: SocketAddr,
    admin_email: String,
    admin_password: Option<String>,
) -> Result<()> {
    let mut auth = DirectoryAuthenticator::new();
    if let Some(password) = admin_password {
        auth = auth.with_account(admin_user(&admin_email), &password).await;
    }
    if auth.is_empty().await {
        logger.warn("No admin password configured; only signed-up accounts can log in");
    }

    let state = Arc::new(AppState::load(store, source, Arc::new(auth)).await);
    let outcome = state.refresh().await;
    if let Some(reason) = &outcome.error {
        logger.warn(&format!("Serving fallback articles: {}", reason));
    }

    let app = nd_web::create_app(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    logger.info(&format!("🚀 Listening on http://{}", addr));
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let logger = logging::init_logging(cli.verbose);

    let store = nd_storage::create_store(cli.storage, &cli.data_dir).await?;
    let source = build_source(&cli)?;

    match cli.command {
        Commands::Serve {
            addr,
            admin_email,
            admin_password,
        } => {
            let logger = logger.with_prefix("[serve]");
            serve(&logger, store, source, addr, admin_email, admin_password).await?;
        }
        Commands::Payouts => {
            let dashboard = load_dashboard(store.as_ref(), source.as_ref()).await;
            let mut payouts = dashboard.payouts().to_vec();
            sort_by_payout_desc(&mut payouts);
            print!("{}", render_payouts(&payouts));
            println!("Total payout: {}", export::format_currency(dashboard.stats().total_payout));
        }
        Commands::Authors => {
            let dashboard = load_dashboard(store.as_ref(), source.as_ref()).await;
            for author in dashboard.unique_authors() {
                println!("{}", author);
            }
        }
        Commands::Rates { action } => {
            let mut rates = RateTable::load_or_seed(store.as_ref()).await;
            if let Some(RateCommands::Set { content_type, rate }) = action {
                rates.set_rate(content_type, rate)?;
                rates.persist(store.as_ref()).await?;
                let logger = logger.with_prefix("[rates]");
                logger.info(&format!("{} rate set to {}", content_type, export::format_currency(rate)));
                if cli.storage == StorageKind::Memory {
                    logger.warn("Memory storage: the new rate is dropped on exit, use --storage file to keep it");
                }
            }
            print!("{}", render_rates(&rates));
        }
        Commands::Export {
            format,
            output,
            rows_per_page,
        } => {
            let dashboard = load_dashboard(store.as_ref(), source.as_ref()).await;
            let mut payouts = dashboard.payouts().to_vec();
            sort_by_payout_desc(&mut payouts);
            let body = match format {
                ExportFormat::Csv => export::payouts_to_csv(&payouts)?,
                ExportFormat::Report => {
                    let today = chrono::Utc::now().date_naive();
                    let report = export::build_report(&payouts, dashboard.rates(), today, rows_per_page);
                    serde_json::to_string_pretty(&report)?
                }
            };
            match output {
                Some(path) => {
                    tokio::fs::write(&path, body)
                        .await
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    logger.info(&format!("📄 Wrote {}", path.display()));
                }
                None => print!("{}", body),
            }
        }
    }

    Ok(())
}
