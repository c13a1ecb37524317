//! `rmc` – mining robot control core
//!
//! Boots the robot controller and serves operator commands:
//!
//! 1. Loads `robot.toml` (or `$RMC_CONFIG`); defaults when absent.
//! 2. Starts the snapshot publisher and, unless disabled, the operator link
//!    supervisor.
//! 3. Serves newline-delimited JSON commands on stdin until it closes, then
//!    kills the robot.  `{"command":"subscribe"}` streams snapshots to stdout.
//! 4. Intercepts **Ctrl-C** to kill the robot before exiting.
//!
//! `rmc --print-schema` prints the JSON schema of the command envelope.

mod config;
mod console;

use colored::Colorize;
use rmc_runtime::{LinkSupervisor, RobotController, SnapshotPublisher};
use rmc_types::RobotCommand;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    if std::env::args().any(|arg| arg == "--print-schema") {
        print_schema();
        return;
    }

    rmc_runtime::init_tracing();
    print_banner();

    let cfg = match config::load() {
        Ok(Some(cfg)) => {
            eprintln!(
                "  Config loaded from {}",
                config::config_path().display().to_string().bold()
            );
            cfg
        }
        Ok(None) => config::defaults_with_env(),
        Err(e) => {
            eprintln!("{}: {}", "Config error".red(), e);
            eprintln!("  Using default configuration.");
            config::defaults_with_env()
        }
    };
    info!(?cfg, "boot configuration");

    let controller = RobotController::with_capacity(
        cfg.initial_life,
        cfg.default_mode,
        cfg.snapshot_channel_capacity,
    );

    // ── Ctrl-C handler ────────────────────────────────────────────────────
    let ctrlc_controller = controller.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        eprintln!();
        eprintln!("{}", "⚠  Ctrl-C received – killing robot …".yellow().bold());
        ctrlc_controller.kill();
        eprintln!("{}", "  ✓ Robot dead. Exiting.".green());
        std::process::exit(130);
    }) {
        warn!(error = %e, "Failed to install Ctrl-C handler; Ctrl-C will not kill the robot");
    }

    // ── Background tasks ──────────────────────────────────────────────────
    let publisher = SnapshotPublisher::new(controller.clone())
        .with_interval(cfg.telemetry_interval())
        .spawn();

    let supervisor = LinkSupervisor::new(
        controller.clone(),
        cfg.link_timeout().unwrap_or_default(),
    );
    let watchdog = match cfg.link_timeout() {
        Some(timeout) => Some(supervisor.clone().spawn(timeout / 4)),
        None => {
            warn!("operator link watchdog disabled");
            None
        }
    };

    eprintln!(
        "  Send one JSON command per line, e.g. {}\n",
        r#"{"command":"set_life","life":"alive"}"#.cyan()
    );

    if let Err(e) = console::run(controller.clone(), supervisor).await {
        error!(error = %e, "console I/O failed");
    }

    // Operator console gone: never leave the robot running unattended.
    controller.kill();
    publisher.abort();
    if let Some(handle) = watchdog {
        handle.abort();
    }
    eprintln!("{}", "  ✓ Console closed; robot dead.".green());
}

fn print_schema() {
    let schema = schemars::schema_for!(RobotCommand);
    match serde_json::to_string_pretty(&schema) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("{}: {}", "Schema error".red(), e),
    }
}

fn print_banner() {
    eprintln!();
    eprintln!("{}", "  ╔══════════════════════════════════════╗".bold().cyan());
    eprintln!("{}", "  ║      Mining Robot Control Core       ║".bold().cyan());
    eprintln!("{}", "  ╚══════════════════════════════════════╝".bold().cyan());
    eprintln!(
        "  {} {}",
        "rmc".bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    eprintln!();
}
