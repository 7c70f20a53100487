//! Switchyard CLI and REST API entry point.
//!
//! Binary name: `swyd`
//!
//! Parses CLI arguments, loads configuration, initializes tracing, then
//! dispatches to the appropriate command handler or starts the REST API server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use switchyard_infra::config::load_service_config;
use switchyard_infra::sqlite::seed::SeedPlan;
use switchyard_observe::tracing_setup::{init_tracing, shutdown_tracing, TracingOptions};
use switchyard_types::config::ServiceConfig;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need config or tracing
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "swyd", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = load_service_config(&cli.config).await?;
    cli.apply_overrides(&mut config);

    init_tracing(&TracingOptions {
        format: config.log_format,
        default_directive: cli.log_directive().to_string(),
        enable_otel: config.enable_otel,
    })
    .map_err(|e| anyhow::anyhow!(e))?;

    let result = run(cli, config).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli, config: ServiceConfig) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve { .. } => serve(&config).await?,

        Commands::Seed {
            date,
            open,
            close,
            minutes,
        } => {
            let plan = SeedPlan {
                date: date.unwrap_or_else(|| chrono::Utc::now().date_naive()),
                opening_hour: open,
                closing_hour: close,
                slot_minutes: minutes,
            };
            let pool = state::open_database(&config).await?;
            cli::slot::seed(&pool, &plan, cli.json).await?;
        }

        Commands::Assign {
            experiment,
            user_id,
        } => {
            let selector = state::build_selector(&config).await?;
            cli::experiment::assign(&selector, &experiment, &user_id, cli.json)?;
        }

        Commands::Experiments => {
            let selector = state::build_selector(&config).await?;
            cli::experiment::list_experiments(&selector, cli.json)?;
        }

        Commands::Slots { page, page_size } => {
            let pool = state::open_database(&config).await?;
            let service = state::build_slot_service(&config, pool);
            cli::slot::list_slots(&service, page, page_size, cli.json).await?;
        }

        Commands::Book { slot_id, email } => {
            let pool = state::open_database(&config).await?;
            let service = state::build_slot_service(&config, pool);
            cli::slot::book_slot(&service, slot_id, &email, cli.json).await?;
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}

/// Run the HTTP server until Ctrl+C or SIGTERM.
async fn serve(config: &ServiceConfig) -> anyhow::Result<()> {
    let state = AppState::init(config).await?;

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(
        %addr,
        experiments = state.selector.catalog().len(),
        max_page_size = state.slot_service.max_page_size(),
        "switchyard listening"
    );
    println!(
        "  {} Switchyard listening on {}",
        console::style("⚡").bold(),
        console::style(format!("http://{addr}")).cyan()
    );
    println!("  {}", console::style("Press Ctrl+C to stop").dim());

    let db_pool = state.db_pool.clone();
    let router = http::router::build_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db_pool.close().await;
    tracing::info!("server stopped");
    println!("\n  Server stopped.");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
