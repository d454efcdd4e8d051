// src/main.rs
use clap::Parser;
use dero_miner_rs::console::editor::{self, CrlfWriter, Prompt, TerminalPrompt};
use dero_miner_rs::{self, *};
use log::{error, info};
use std::io::{self, Write};
use std::sync::Arc;
use tokio::runtime::Runtime;

/// Main entry point for the miner client
///
/// # Returns
/// - `Ok(())` on successful execution
/// - `Err(MinerError)` if any operation fails
///
/// # Flow
/// 1. Parses command line arguments
/// 2. Delegates to appropriate subcommand handler
/// 3. Propagates any errors upward
fn main() -> Result<(), MinerError> {
    let cli = cli::Commands::parse();

    match cli.action {
        cli::Action::Start(opts) => start_miner(opts),
        cli::Action::Config(opts) => generate_config(opts),
    }
}

/// Starts the status core with given options
///
/// # Operations
/// 1. Loads and validates configuration, applying CLI overrides
/// 2. Initializes logging
/// 3. Runs the status monitor, stats API and console until shutdown
/// 4. Exits the process once the console reports why it stopped
fn start_miner(opts: cli::StartOptions) -> Result<(), MinerError> {
    let mut config = match &opts.config {
        Some(path) => config::load(path)?,
        None => Config::default(),
    };
    if opts.testnet {
        config.testnet = true;
    }
    if let Some(pool) = opts.pool {
        config.pool_url = pool;
    }
    if let Some(listen) = opts.api_listen {
        config.api.enabled = true;
        config.api.listen = listen;
    }
    config.validate()?;

    utils::init_logging(config.log_filter()?);

    let rt = Runtime::new()?;
    let reason = rt.block_on(run(config))?;

    info!("Shutting down: {}", reason);
    log::logger().flush();
    // Stop the world: the terminal reader thread and the mining engine are
    // not drained.
    std::process::exit(0);
}

/// Wires the components together and waits for the console to finish
async fn run(config: Config) -> Result<ExitReason, MinerError> {
    let ctx = MinerContext::new(config.pool_url.clone(), config.testnet);
    if config.testnet {
        info!("Running on testnet");
    }

    let prompt = Arc::new(TerminalPrompt::new());
    let monitor = tokio::spawn(
        ctx.status_monitor(prompt.clone() as Arc<dyn Prompt>)
            .run(ctx.cancel.clone()),
    );

    let api = if config.api.enabled {
        let server = ApiServer::new(
            config.api.listen.clone(),
            Arc::new(ctx.stats_source()),
            &ctx.cancel,
        );
        Some(tokio::spawn(async move {
            if let Err(e) = server.serve().await {
                error!("{}", e);
            }
        }))
    } else {
        info!("Stats API disabled");
        None
    };

    let input = editor::spawn_terminal_input(Arc::clone(&prompt));
    let out: Box<dyn Write + Send> = if input.raw_mode.is_some() {
        Box::new(CrlfWriter::new(io::stdout()))
    } else {
        Box::new(io::stdout())
    };
    let mut console = ConsoleController::new(&ctx, input.events, prompt, out);
    let reason = console.run().await;
    // Leave raw mode before the shutdown log lines are written.
    drop(input.raw_mode);

    monitor.await?;
    if let Some(api) = api {
        api.await?;
    }
    Ok(reason)
}

/// Generates configuration template file
///
/// # Arguments
/// * `opts` - Configuration generation options
fn generate_config(opts: cli::ConfigOptions) -> Result<(), MinerError> {
    std::fs::write(&opts.output, config::generate_template())?;
    println!("Configuration template written to {}", opts.output.display());
    Ok(())
}
