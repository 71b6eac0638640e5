use std::sync::Arc;

use clap::Parser;
use jobwatch::application::commands::format_list;
use jobwatch::application::listener::run_command_listener;
use jobwatch::application::scheduler::Schedule;
use jobwatch::cli::commands::{Cli, Commands, KeywordAction};
use jobwatch::config::AppConfig;
use jobwatch::domain::error::DomainError;
use jobwatch::JobWatch;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "jobwatch=debug,info" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = AppConfig::from_env();

    if let Err(e) = run_command(config, cli.command).await {
        error!(error = %e, "Fatal");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run_command(config: AppConfig, cmd: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::Run { dry_run } => run_service(config, dry_run).await?,
        Commands::Once { dry_run } => {
            let (jw, _) = JobWatch::new(&config, dry_run)?;
            let report = jw.run_cycle().await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Keywords { action } => {
            let (jw, _) = JobWatch::new(&config, true)?;
            match action {
                KeywordAction::Add { word } => {
                    println!("Added keyword: {}", jw.add_keyword(&word)?);
                }
                KeywordAction::Exclude { word } => {
                    println!("Added exclude word: {}", jw.add_exclude_word(&word)?);
                }
                KeywordAction::Remove { word } => {
                    if jw.remove_keyword(&word)? {
                        println!("Removed keyword: {word}");
                    } else {
                        println!("Keyword not found: {word}");
                    }
                }
                KeywordAction::List => {
                    println!("{}", format_list(&jw.current_keywords()?));
                }
            }
        }
        Commands::Sent => {
            let (jw, _) = JobWatch::new(&config, true)?;
            println!("{} links notified", jw.sent_count()?);
        }
        Commands::Check => {
            config.require_telegram()?;
            let schedule = Schedule::from_config(
                config.cron_expression.as_deref(),
                config.interval,
                config.timezone,
            );
            let (jw, _) = JobWatch::new(&config, true)?;
            let keywords = jw.current_keywords()?;
            println!("Database: {}", config.db_path);
            println!("Schedule: {schedule}");
            println!("Sources: {}", jw.source_names().join(", "));
            println!(
                "Keywords: {} include, {} exclude",
                keywords.include.len(),
                keywords.exclude.len()
            );
        }
    }
    Ok(())
}

async fn run_service(config: AppConfig, dry_run: bool) -> Result<(), DomainError> {
    let (jw, bot) = JobWatch::new(&config, dry_run)?;
    let jw = Arc::new(jw);
    let schedule = Schedule::from_config(
        config.cron_expression.as_deref(),
        config.interval,
        config.timezone,
    );
    info!(
        schedule = %schedule,
        sources = ?jw.source_names(),
        dry_run,
        "Starting jobwatch"
    );

    let scheduler = {
        let jw = Arc::clone(&jw);
        tokio::spawn(async move { jw.run_scheduled(schedule).await })
    };

    let listener = bot.map(|bot| {
        let handler = Arc::new(jw.command_handler());
        let chat_id = bot.chat_id().to_string();
        tokio::spawn(run_command_listener(bot, handler, chat_id, jw.shutdown_signal()))
    });

    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Could not listen for Ctrl-C, shutting down");
    }
    info!(grace_secs = config.shutdown_grace.as_secs(), "Shutdown requested");
    jw.request_shutdown();

    if tokio::time::timeout(config.shutdown_grace, scheduler).await.is_err() {
        warn!("In-flight cycle did not finish within the grace period");
    }
    if let Some(listener) = listener {
        listener.abort();
    }
    info!("Stopped");
    Ok(())
}
