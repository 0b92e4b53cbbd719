//! `teleopd` – humanoid teleoperation server.
//!
//! 1. Resolves the configuration: defaults, `~/.teleop/config.toml`,
//!    `TELEOP_*` variables, then the command line.
//! 2. Prepares the robot (autonomous life off, stiffness, volume).
//! 3. Runs the connection supervisor until **Ctrl-C** / `SIGTERM`, then stops
//!    and locks the robot before exiting.

mod config;

use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info, warn};

use teleop_hal::{ActuatorService, SimActuatorService};
use teleop_middleware::{ConnectionSupervisor, ControlSink};
use teleop_runtime::{Arbiter, init_tracing};
use teleop_types::TeleopError;

#[derive(Debug, Parser)]
#[command(name = "teleopd", version, about = "Humanoid teleoperation server")]
struct Args {
    /// Address of the robot; the control socket binds to it too.
    robot_addr: Option<String>,

    /// Port for the controller connection.
    #[arg(short, long)]
    port: Option<u16>,

    /// Config file to read instead of `~/.teleop/config.toml`.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write the resolved configuration to the config file and exit.
    #[arg(long)]
    save_config: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let _telemetry = init_tracing("teleopd");

    print_banner();

    let path = args.config.clone().unwrap_or_else(config::config_path);
    let cfg = match resolve(&args, config::load_from(&path)) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{}: {}", "Config error".red(), e);
            return ExitCode::FAILURE;
        }
    };

    if args.save_config {
        return match config::save_to(&cfg, &path) {
            Ok(()) => {
                println!(
                    "  {} Config saved to {}",
                    "✓".green().bold(),
                    path.display().to_string().bold()
                );
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("{}: {}", "Error saving config".red(), e);
                ExitCode::FAILURE
            }
        };
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("{}: {}", "Runtime error".red(), e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(serve(cfg)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "teleopd stopped with an error");
            ExitCode::FAILURE
        }
    }
}

/// Lay the command line over the loaded configuration and validate it.
fn resolve(
    args: &Args,
    loaded: Result<config::Config, TeleopError>,
) -> Result<config::Config, TeleopError> {
    let mut cfg = loaded?;
    if let Some(addr) = &args.robot_addr {
        cfg.robot_addr = addr.clone();
    }
    if let Some(port) = args.port {
        cfg.listen_port = port;
    }
    cfg.validate()?;
    Ok(cfg)
}

async fn serve(cfg: config::Config) -> Result<(), TeleopError> {
    let (stop_tx, stop_rx) = watch::channel(false);
    if let Err(e) = ctrlc::set_handler(move || {
        println!();
        println!("{}", "⚠  Interrupt received – stopping the robot …".yellow().bold());
        let _ = stop_tx.send(true);
    }) {
        warn!(error = %e, "failed to install Ctrl-C handler; the server must be killed to exit");
    }

    // No vendor SDK is linked into this build.
    warn!(robot = %cfg.robot_addr, "driving the simulated actuator backend");
    let actuator: Arc<dyn ActuatorService> =
        Arc::new(SimActuatorService::new().with_realtime_motion());
    let arbiter = Arc::new(Arbiter::new(actuator, cfg.arbiter_config()));

    if cfg.skip_robot_prepare {
        info!("robot preparation skipped");
    } else {
        arbiter.prepare().await?;
    }

    println!(
        "  Listening for the controller on {}\n",
        format!("{}:{}", cfg.robot_addr, cfg.listen_port).bold()
    );

    let sink: Arc<dyn ControlSink> = arbiter.clone();
    let supervisor = Arc::new(ConnectionSupervisor::new(cfg.supervisor_config(), sink));
    supervisor.run(stop_rx).await;

    arbiter.stop_and_lock().await?;
    println!("{}", "  ✓ Robot stopped and locked.".green());
    Ok(())
}

fn print_banner() {
    println!();
    println!("  {} {}",
        "teleopd".bold().cyan(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    println!("  Humanoid teleoperation server");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_line_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn command_line_overrides_the_config() {
        let args = Args::try_parse_from(["teleopd", "10.0.0.7", "--port", "9000"]).unwrap();
        let loaded = config::Config {
            robot_addr: "192.168.1.10".into(),
            ..config::Config::default()
        };
        let cfg = resolve(&args, Ok(loaded)).unwrap();
        assert_eq!(cfg.robot_addr, "10.0.0.7");
        assert_eq!(cfg.listen_port, 9000);
    }

    #[test]
    fn config_address_is_used_without_an_argument() {
        let args = Args::try_parse_from(["teleopd"]).unwrap();
        let loaded = config::Config {
            robot_addr: "nao.local".into(),
            ..config::Config::default()
        };
        assert_eq!(resolve(&args, Ok(loaded)).unwrap().robot_addr, "nao.local");
    }

    #[test]
    fn missing_address_is_rejected() {
        let args = Args::try_parse_from(["teleopd"]).unwrap();
        let err = resolve(&args, Ok(config::Config::default())).unwrap_err();
        assert!(matches!(err, TeleopError::Config(_)));
    }

    #[test]
    fn load_errors_are_passed_through() {
        let args = Args::try_parse_from(["teleopd", "127.0.0.1"]).unwrap();
        let err = resolve(&args, Err(TeleopError::Config("bad toml".into()))).unwrap_err();
        assert!(matches!(err, TeleopError::Config(_)));
    }
}
