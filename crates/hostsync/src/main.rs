// # hostsync - hosts file generator
//
// Thin integration layer: parse flags, load the config file, wire the
// OpenStack inventory and the selected publisher into a HostsEngine and run
// it once. All rendering logic lives in hostsync-core.
//
// ## Configuration
//
// TOML file (`-c/--config`, env `HOSTSYNC_CONFIG`, default
// `/etc/hostsync.toml`) with a single `[default]` table:
//
// ```toml
// [default]
// os_username = "admin"
// os_password = "secret"
// os_tenant_name = "infra"
// os_auth_url = "https://keystone.example.com:5000/v3"
// os_region = "RegionOne"
// domain = "example.com"
// internal_domain = "internal.example.com"
// ```
//
// ## Example
//
// ```bash
// hostsync                      # print to stdout
// hostsync -w -V                # replace /etc/hosts, log progress to stderr
// hostsync -w --random-delay 60 # cron-friendly
// ```

use anyhow::Result;
use clap::Parser;
use hostsync_core::{publisher_for, ConfigFile, Destination, HostsEngine, OutputConfig};
use rand::Rng;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{debug, error, Level};
use tracing_subscriber::FmtSubscriber;

/// Exit codes
///
/// - 0: Hosts content published
/// - 1: Configuration or startup error
/// - 2: Runtime error (inventory or publish failure)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HostsyncExitCode {
    Success = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<HostsyncExitCode> for ExitCode {
    fn from(code: HostsyncExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Render the OpenStack compute inventory into a hosts file
#[derive(Debug, Parser)]
#[command(name = "hostsync", version, about, disable_version_flag = true)]
struct Cli {
    /// Configuration file
    #[arg(short, long, env = "HOSTSYNC_CONFIG", default_value = "/etc/hostsync.toml")]
    config: PathBuf,

    /// Replace the target file instead of printing to stdout
    ///
    /// The temp file is renamed onto the target, so --scratch-dir must be on
    /// the target's filesystem (e.g. `--scratch-dir /etc` when /tmp is tmpfs).
    #[arg(short, long)]
    write: bool,

    /// Hosts file replaced by --write
    #[arg(short, long, default_value = "/etc/hosts")]
    target: PathBuf,

    /// Base template prepended to the generated lines (skipped when missing)
    #[arg(long, default_value = "/etc/hosts.base")]
    base: PathBuf,

    /// Directory for the temporary file; must share a filesystem with the target
    #[arg(long)]
    scratch_dir: Option<PathBuf>,

    /// Sleep a random 0..=SECS seconds before contacting the cloud
    #[arg(long, value_name = "SECS")]
    random_delay: Option<u64>,

    /// Log progress to stderr
    #[arg(short = 'V', long)]
    verbose: bool,

    /// Print version
    #[arg(long, action = clap::ArgAction::Version)]
    version: Option<bool>,
}

impl Cli {
    fn output(&self) -> OutputConfig {
        let mut output = OutputConfig {
            base_path: Some(self.base.clone()),
            ..OutputConfig::default()
        };

        if self.write {
            output.destination = Destination::File {
                path: self.target.clone(),
            };
        }
        if let Some(dir) = &self.scratch_dir {
            output.scratch_dir = dir.clone();
        }

        output
    }
}

fn parse_log_level(value: &str) -> Option<Level> {
    match value.to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

fn log_level(verbose: bool) -> Result<Level> {
    if verbose {
        return Ok(Level::DEBUG);
    }

    match env::var("HOSTSYNC_LOG_LEVEL") {
        Ok(value) => parse_log_level(&value).ok_or_else(|| {
            anyhow::anyhow!(
                "HOSTSYNC_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                value
            )
        }),
        Err(_) => Ok(Level::WARN),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match log_level(cli.verbose) {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return HostsyncExitCode::ConfigError.into();
        }
    };

    // stdout may carry the hosts file, so diagnostics go to stderr
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return HostsyncExitCode::ConfigError.into();
    }

    let config = match ConfigFile::load(&cli.config).and_then(|c| c.validate().map(|_| c)) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return HostsyncExitCode::ConfigError.into();
        }
    };
    debug!("Configuration loaded from {}", cli.config.display());

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return HostsyncExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        match run(&cli, config).await {
            Ok(()) => HostsyncExitCode::Success,
            Err(e) => {
                error!("{}", e);
                exit_code_for(&e)
            }
        }
    })
    .into()
}

/// Configuration problems found while wiring the engine map to exit code 1
fn exit_code_for(err: &anyhow::Error) -> HostsyncExitCode {
    match err.downcast_ref::<hostsync_core::Error>() {
        Some(e) if e.is_config() => HostsyncExitCode::ConfigError,
        _ => HostsyncExitCode::RuntimeError,
    }
}

async fn run(cli: &Cli, config: ConfigFile) -> Result<()> {
    let output = cli.output();
    let inventory = build_inventory(&config)?;
    let publisher = publisher_for(&output);

    let mut engine = HostsEngine::new(inventory, publisher, config.hosts())?;
    if let Some(base) = &output.base_path {
        engine = engine.with_base_path(base);
    }

    if let Some(secs) = cli.random_delay.filter(|s| *s > 0) {
        let delay = rand::thread_rng().gen_range(0..=secs);
        debug!("Sleeping {}s before contacting the cloud", delay);
        tokio::time::sleep(Duration::from_secs(delay)).await;
    }

    let report = engine.run().await?;
    debug!(
        "Published {} line(s), {} byte(s) to {} in {}ms",
        report.stats.lines,
        report.bytes,
        report.destination,
        report.elapsed().num_milliseconds()
    );

    Ok(())
}

#[cfg(feature = "openstack")]
fn build_inventory(
    config: &ConfigFile,
) -> Result<Box<dyn hostsync_core::InventorySource>, hostsync_core::Error> {
    let inventory = hostsync_openstack::OpenStackInventory::new(config.cloud())?;
    Ok(Box::new(inventory))
}

#[cfg(not(feature = "openstack"))]
fn build_inventory(
    _config: &ConfigFile,
) -> Result<Box<dyn hostsync_core::InventorySource>, hostsync_core::Error> {
    Err(hostsync_core::Error::config(
        "hostsync was built without the openstack feature",
    ))
}
