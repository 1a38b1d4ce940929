mod config;
mod db;
mod error;
mod handlers;
mod llm;
mod notifier;
mod pipeline;
mod routes;
mod schema;

use anyhow::Result;
use clap::{Parser, Subcommand};
use collector::InstalledFlowSupplier;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppConfig;
use crate::db::PgStore;
use crate::llm::OpenAiClient;
use crate::pipeline::Pipeline;
use crate::routes::create_app;

#[derive(Parser)]
#[command(name = "backend")]
#[command(about = "Group recent Gmail by subject, store it, and export action notifications")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the trigger endpoints over HTTP (default)
    Serve,
    /// Run the email pipeline once and print the notifications
    Emails,
    /// Fetch and store calendar events once, printing them as JSON
    Calendar,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "backend=debug,collector=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenv::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = db::establish_connection_pool(&config.database_url)?;
    tracing::info!("Database connection pool initialized");

    let generator = OpenAiClient::new(config.openai_api_key.clone(), &config.openai_model)
        .with_base_url(&config.openai_base_url);

    let pipeline = Arc::new(Pipeline::new(
        Arc::new(InstalledFlowSupplier::new(config.collector.clone())),
        Arc::new(PgStore::new(pool)),
        Arc::new(generator),
        config.collector.clone(),
        &config.notifications_path,
    ));

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(pipeline, config.port).await,
        Command::Emails => {
            let summary = pipeline.process_emails().await?;
            for record in &summary.notifications {
                println!("{}\n{}\n{}", record.subject, record.notification, "=".repeat(50));
            }
            tracing::info!(
                "Processed {} emails in {} groups; notifications written to {}",
                summary.messages,
                summary.groups,
                config.notifications_path.display()
            );
            Ok(())
        }
        Command::Calendar => {
            let events = pipeline.process_calendar_events().await?;
            println!("{}", serde_json::to_string_pretty(&events)?);
            Ok(())
        }
    }
}

async fn serve(pipeline: Arc<Pipeline>, port: u16) -> Result<()> {
    tracing::info!("Starting inbox digest backend server");

    let app = create_app(pipeline);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
