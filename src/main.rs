use clap::Parser;
use reconciler::cli::{Cli, Commands};
use reconciler::commands::{pending_command, run_command};
use reconciler::logging;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Cli::parse();

    let log_file = logging::create_log_file(&args.log_dir).expect("Failed to create log file");

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_level(true)
                .with_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
                ),
        )
        .with(
            fmt::layer()
                .with_writer(log_file)
                .with_ansi(false)
                .with_target(false)
                .with_thread_ids(false)
                .with_level(true)
                .with_filter(EnvFilter::new("debug")),
        )
        .init();

    if let Err(e) = run(args).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(args: Cli) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    match args.cmd {
        Commands::Run { profile, json } => {
            let summary = run_command(&args.config, &profile).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            }
            info!("Run complete: {}", summary);
        }
        Commands::Pending { profile, json } => {
            let batches = pending_command(&args.config, &profile).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&batches)?);
            } else {
                for batch in &batches {
                    println!("{}", batch.display());
                }
                info!("{} batches pending", batches.len());
            }
        }
    }
    Ok(())
}
