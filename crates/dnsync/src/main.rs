// # dnsync - DNS zone synchroniser
//
// This binary is a THIN integration layer:
// - Record parsing, planning and provider logic live in the library crates
// - Configuration is via environment variables ONLY
//
// The binary is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing logging and the runtime
// 3. Registering providers
// 4. Running one `dump` or `sync` pass over the configured zones
//
// ## Commands
//
// - `dnsync dump`: populate each zone from the provider and print it as JSON
// - `dnsync sync`: plan each zone against its desired-state file and apply
//
// ## Configuration
//
// ### DNS Provider
// - `DNSYNC_PROVIDER_TYPE`: Provider type (mythicbeasts)
// - `DNSYNC_PASSWORDS`: Zone passwords, `zone=password,zone2=password2`
//
// ### Zones
// - `DNSYNC_ZONES`: Comma-separated list of zones to manage
// - `DNSYNC_ZONE_DIR`: Directory holding `<zone>.txt` desired-state files
//
// ### Run
// - `DNSYNC_MODE`: `live` (default) or `dry-run`
// - `DNSYNC_STRICT_SUPPORTS`: Fail on unsupported record types (default true)
// - `DNSYNC_LOG_LEVEL`: trace, debug, info, warn, error
//
// ## Example
//
// ```bash
// export DNSYNC_PASSWORDS=example.com=your_password
// export DNSYNC_ZONES=example.com
// export DNSYNC_ZONE_DIR=/etc/dnsync/zones
// export DNSYNC_MODE=dry-run
//
// dnsync sync
// ```

use anyhow::{Context, Result};
use dnsync_core::{
    DnsProvider, ProviderConfig, ProviderRegistry, SyncConfig, SyncSettings, Zone, ZoneConfig,
    ZoneName,
};
use std::collections::HashMap;
use std::env;
use std::path::Path;
use std::process::ExitCode;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
///
/// - 0: Every zone handled
/// - 1: Configuration or startup error
/// - 2: Runtime error (provider or network failure)
#[derive(Debug, Clone, Copy)]
enum DnsyncExitCode {
    Clean = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<DnsyncExitCode> for ExitCode {
    fn from(code: DnsyncExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// What to do with each zone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Print the live zone
    Dump,
    /// Make the live zone match the desired-state file
    Sync,
}

impl Command {
    fn parse(arg: Option<&str>) -> Result<Self> {
        match arg {
            Some("dump") => Ok(Command::Dump),
            Some("sync") => Ok(Command::Sync),
            Some(other) => anyhow::bail!("Unknown command '{}'. Usage: dnsync <dump|sync>", other),
            None => anyhow::bail!("Missing command. Usage: dnsync <dump|sync>"),
        }
    }
}

/// Application configuration
struct Config {
    provider_type: String,
    /// ⚠️ NEVER log these values
    passwords: Option<HashMap<String, String>>,
    zones: Vec<String>,
    zone_dir: Option<String>,
    mode: String,
    strict_supports: bool,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Ok(Self {
            provider_type: env::var("DNSYNC_PROVIDER_TYPE")
                .unwrap_or_else(|_| "mythicbeasts".to_string()),
            passwords: env::var("DNSYNC_PASSWORDS")
                .ok()
                .map(|s| parse_passwords(&s))
                .transpose()?,
            zones: split_list(&env::var("DNSYNC_ZONES").unwrap_or_default()),
            zone_dir: env::var("DNSYNC_ZONE_DIR").ok().filter(|s| !s.is_empty()),
            mode: env::var("DNSYNC_MODE").unwrap_or_else(|_| "live".to_string()),
            strict_supports: match env::var("DNSYNC_STRICT_SUPPORTS") {
                Ok(value) => parse_bool(&value)
                    .with_context(|| "DNSYNC_STRICT_SUPPORTS must be true or false")?,
                Err(_) => true,
            },
            log_level: env::var("DNSYNC_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the configuration and build the library-level config
    fn into_sync_config(self) -> Result<SyncConfig> {
        match self.provider_type.as_str() {
            "mythicbeasts" => {}
            _ => anyhow::bail!(
                "DNSYNC_PROVIDER_TYPE '{}' is not supported. \
                Supported providers: mythicbeasts",
                self.provider_type
            ),
        }

        let dry_run = match self.mode.as_str() {
            "live" => false,
            "dry-run" => true,
            _ => anyhow::bail!(
                "DNSYNC_MODE '{}' is not valid. Valid modes: live, dry-run",
                self.mode
            ),
        };

        if self.zones.is_empty() {
            anyhow::bail!(
                "DNSYNC_ZONES must contain at least one zone. \
                Set it via: export DNSYNC_ZONES=example.com"
            );
        }

        let mut zones = Vec::with_capacity(self.zones.len());
        for name in &self.zones {
            let zone_name = ZoneName::new(name)?;
            let mut zone = ZoneConfig::new(zone_name.to_string());
            if let Some(dir) = &self.zone_dir {
                let file = Path::new(dir).join(format!("{}.txt", zone_name.without_trailing_dot()));
                zone = zone.with_desired_file(file.to_string_lossy());
            }
            zones.push(zone);
        }

        let config = SyncConfig {
            provider: ProviderConfig::MythicBeasts {
                passwords: self.passwords,
            },
            zones,
            settings: SyncSettings {
                dry_run,
                strict_supports: self.strict_supports,
            },
        };
        config.validate()?;

        Ok(config)
    }
}

/// Parse `zone=password,zone2=password2`
fn parse_passwords(value: &str) -> Result<HashMap<String, String>> {
    split_list(value)
        .into_iter()
        .map(|entry| -> Result<(String, String)> {
            let (zone, password) = entry
                .split_once('=')
                .with_context(|| "DNSYNC_PASSWORDS entries must look like zone=password")?;
            Ok((zone.trim().to_string(), password.trim().to_string()))
        })
        .collect()
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
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

fn main() -> ExitCode {
    let arg = env::args().nth(1);
    let command = match Command::parse(arg.as_deref()) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}", e);
            return DnsyncExitCode::ConfigError.into();
        }
    };

    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return DnsyncExitCode::ConfigError.into();
        }
    };

    let Some(log_level) = parse_log_level(&config.log_level) else {
        eprintln!(
            "DNSYNC_LOG_LEVEL '{}' is not valid. Valid levels: trace, debug, info, warn, error",
            config.log_level
        );
        return DnsyncExitCode::ConfigError.into();
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DnsyncExitCode::ConfigError.into();
    }

    let sync_config = match config.into_sync_config() {
        Ok(sync_config) => sync_config,
        Err(e) => {
            eprintln!("Configuration validation error: {:#}", e);
            return DnsyncExitCode::ConfigError.into();
        }
    };

    info!(
        "Configuration loaded: {} zone(s), provider {}",
        sync_config.zones.len(),
        sync_config.provider.type_name()
    );

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DnsyncExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        match run(command, &sync_config).await {
            Ok(()) => DnsyncExitCode::Clean,
            Err(e) if is_config_error(&e) => {
                error!("Configuration error: {:#}", e);
                DnsyncExitCode::ConfigError
            }
            Err(e) => {
                error!("{:?} failed: {:#}", command, e);
                DnsyncExitCode::RuntimeError
            }
        }
    })
    .into()
}

fn is_config_error(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<dnsync_core::Error>(),
        Some(dnsync_core::Error::Config(_))
    )
}

/// Run one pass of `command` over every configured zone
async fn run(command: Command, config: &SyncConfig) -> Result<()> {
    let registry = ProviderRegistry::new();

    #[cfg(feature = "mythicbeasts")]
    {
        info!("Registering Mythic Beasts provider");
        dnsync_provider_mythicbeasts::register(&registry);
    }

    let provider = registry.create_provider(
        config.provider.type_name(),
        &config.provider,
        &config.settings,
    )?;

    if config.settings.dry_run {
        warn!("Running in DRY-RUN mode - no changes will be made");
    }

    for zone in &config.zones {
        match command {
            Command::Dump => dump_zone(provider.as_ref(), zone).await?,
            Command::Sync => sync_zone(provider.as_ref(), zone).await?,
        }
    }

    Ok(())
}

async fn dump_zone(provider: &dyn DnsProvider, zone_config: &ZoneConfig) -> Result<()> {
    let mut zone = Zone::new(zone_config.zone_name()?);
    let exists = provider.populate(&mut zone).await?;

    let output = serde_json::json!({
        "zone": zone.name(),
        "exists": exists,
        "records": zone.records(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

async fn sync_zone(provider: &dyn DnsProvider, zone_config: &ZoneConfig) -> Result<()> {
    let desired = load_desired(zone_config).await?;
    let plan = provider.plan(&desired).await?;

    info!(
        "{}: {} create(s), {} update(s), {} delete(s)",
        plan.zone,
        plan.creates(),
        plan.updates(),
        plan.deletes()
    );

    if plan.is_empty() {
        info!("{}: already in sync", plan.zone);
        return Ok(());
    }

    let applied = provider.apply(&plan).await?;
    info!("{}: {} command(s) applied", plan.zone, applied);

    Ok(())
}

#[cfg(feature = "mythicbeasts")]
async fn load_desired(zone_config: &ZoneConfig) -> Result<Zone> {
    let zone_name = zone_config.zone_name()?;
    let path = zone_config.desired_file.as_deref().with_context(|| {
        format!(
            "No desired state for {}: set DNSYNC_ZONE_DIR",
            zone_name.without_trailing_dot()
        )
    })?;

    dnsync_provider_mythicbeasts::read_listing_file(zone_name, path)
        .await
        .with_context(|| format!("Failed to load desired state from {}", path))
}

#[cfg(not(feature = "mythicbeasts"))]
async fn load_desired(zone_config: &ZoneConfig) -> Result<Zone> {
    anyhow::bail!(
        "Cannot read desired state for {}: no provider with a listing format is built in",
        zone_config.name
    )
}
