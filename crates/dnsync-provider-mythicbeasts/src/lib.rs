// # Mythic Beasts DNS Provider
//
// This crate provides a Mythic Beasts primary DNS provider for dnsync.
//
// ## Implementation Status
//
// - ✅ One LIST request per populate, one request per ADD/DELETE command
// - ✅ Full error propagation to the caller (no retries here)
// - ✅ HTTP timeout configured (30 seconds)
// - ✅ A, AAAA, ALIAS, CAA, CNAME, MX, NS, SRV, SSHFP and TXT records
// - ✅ Dry-run mode for safe testing
// - ✅ Per-zone passwords
// - ❌ NO diffing (owned by `DnsProvider::plan` in dnsync-core)
// - ❌ NO retry or backoff logic (owned by the caller)
// - ❌ NO caching between populate and apply
// - ❌ NO background tasks
//
// ## Architectural Constraints
//
// ### Trust Level: Untrusted (DNS Provider)
//
// **Allowed Capabilities**:
// - ✅ Perform HTTPS form POSTs to the Mythic Beasts API only
// - ✅ Parse the plain-text listing format
//
// **Forbidden Capabilities**:
// - ❌ Spawn tasks or threads
// - ❌ Implement retry logic
// - ❌ Access other providers
// - ❌ Cache zone contents beyond a single call
//
// ## Security Requirements
//
// - Zone passwords NEVER appear in logs or `Debug` output
// - A missing password fails before any request is made
//
// ## API Reference
//
// - Primary DNS API: https://www.mythic-beasts.com/support/api/primary
// - List a zone: `command=LIST`
// - Change a zone: `command=ADD <host> <ttl> <type> <data>` / `DELETE ...`

pub mod codec;
pub mod normalize;
pub mod transport;

use async_trait::async_trait;
use dnsync_core::config::{ProviderConfig, SyncSettings};
use dnsync_core::traits::{DnsProvider, DnsProviderFactory};
use dnsync_core::{Change, Error, Plan, Record, RecordType, Result, Zone, ZoneName};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::{debug, info, warn};

use codec::{Action, Command, IgnoredLine};
use normalize::RawValue;
use transport::{ApiRequest, HttpTransport, ZoneTransport};

pub use codec::SUPPORTS;

/// Name used in error messages
pub const PROVIDER_DISPLAY_NAME: &str = "Mythic Beasts";

/// Registry key for this provider
pub const PROVIDER_TYPE: &str = "mythicbeasts";

/// Mythic Beasts primary DNS provider
///
/// # Trust Level: Untrusted
///
/// Stateless between calls: `populate` fetches the whole zone each time and
/// `apply` sends exactly the commands the plan implies.
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the provider will:
/// - Perform the LIST request in `populate`
/// - Log every ADD/DELETE command `apply` would send
/// - **NOT** send any of them
pub struct MythicBeastsProvider {
    id: String,

    /// Zone passwords keyed by absolute zone name
    /// ⚠️ NEVER log these values
    passwords: Option<HashMap<String, String>>,

    strict_supports: bool,

    /// Dry-run mode: if true, list zones but skip ADD/DELETE commands
    dry_run: bool,

    transport: Box<dyn ZoneTransport>,
}

// Custom Debug implementation that hides the passwords
impl std::fmt::Debug for MythicBeastsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let zones: Option<Vec<&String>> = self.passwords.as_ref().map(|p| {
            let mut zones: Vec<&String> = p.keys().collect();
            zones.sort();
            zones
        });
        f.debug_struct("MythicBeastsProvider")
            .field("id", &self.id)
            .field("zones", &zones)
            .field("passwords", &"<REDACTED>")
            .field("strict_supports", &self.strict_supports)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl MythicBeastsProvider {
    /// Create a provider talking to the public API
    ///
    /// # Parameters
    ///
    /// - `id`: Identifier used in log and error messages
    /// - `passwords`: Zone name (dotted or bare) to API password
    ///
    /// A `None` password map is accepted here and reported by `populate`.
    pub fn new(id: impl Into<String>, passwords: Option<HashMap<String, String>>) -> Result<Self> {
        Self::with_transport(id, passwords, Box::new(HttpTransport::new()?))
    }

    /// Create a provider using `transport` for every request
    pub fn with_transport(
        id: impl Into<String>,
        passwords: Option<HashMap<String, String>>,
        transport: Box<dyn ZoneTransport>,
    ) -> Result<Self> {
        let passwords = passwords.map(normalise_passwords).transpose()?;

        Ok(Self {
            id: id.into(),
            passwords,
            strict_supports: true,
            dry_run: false,
            transport,
        })
    }

    pub fn with_strict_supports(mut self, strict_supports: bool) -> Self {
        self.strict_supports = strict_supports;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    fn password_for(&self, zone: &ZoneName) -> Result<&str> {
        let passwords = self
            .passwords
            .as_ref()
            .ok_or_else(|| Error::config("Passwords must be a dictionary"))?;

        passwords
            .get(zone.as_str())
            .map(String::as_str)
            .ok_or_else(|| {
                Error::config(format!(
                    "Missing password for domain: {}",
                    zone.without_trailing_dot()
                ))
            })
    }
}

/// Key passwords by absolute zone name
///
/// `unit.tests` and `unit.tests.` name the same zone and may not both appear.
fn normalise_passwords(passwords: HashMap<String, String>) -> Result<HashMap<String, String>> {
    let mut normalised = HashMap::with_capacity(passwords.len());
    for (zone, password) in passwords {
        let zone = ZoneName::new(&zone)?;
        if normalised.contains_key(zone.as_str()) {
            return Err(Error::config(format!(
                "Duplicate password for domain: {}",
                zone.without_trailing_dot()
            )));
        }
        normalised.insert(zone.to_string(), password);
    }
    Ok(normalised)
}

/// Commands that add or delete every value of `record`
///
/// Records of types the API cannot manage compile to no commands.
pub fn compile_commands(action: Action, record: &Record, zone: &ZoneName) -> Vec<Command> {
    let (Some(tag), Some(values)) = (
        codec::wire_tag(record.record_type()),
        normalize::wire_values(record),
    ) else {
        return Vec::new();
    };

    let fqdn = record.fqdn(zone);
    values
        .into_iter()
        .map(|value| Command {
            action,
            fqdn: fqdn.clone(),
            ttl: record.ttl(),
            tag,
            value,
        })
        .collect()
}

/// DELETE the old state, then ADD the new one
pub fn change_commands(change: &Change, zone: &ZoneName) -> Vec<Command> {
    let mut commands = Vec::new();
    if let Some(existing) = change.existing() {
        commands.extend(compile_commands(Action::Delete, existing, zone));
    }
    if let Some(new) = change.new_record() {
        commands.extend(compile_commands(Action::Add, new, zone));
    }
    commands
}

/// Build records from LIST output
///
/// Lines that do not parse or carry an unmanaged type are skipped. Lines
/// sharing a name and type form one record, taking the TTL of the first.
pub fn records_from_listing(zone: &ZoneName, text: &str) -> Result<Vec<Record>> {
    let mut groups: BTreeMap<(String, RecordType), Vec<RawValue>> = BTreeMap::new();

    for (index, line) in text.lines().enumerate() {
        match codec::classify_line(line) {
            Ok(raw) => {
                let name = if raw.name == "@" {
                    String::new()
                } else {
                    raw.name
                };
                groups
                    .entry((name, raw.record_type))
                    .or_default()
                    .push(RawValue::new(raw.value, raw.ttl));
            }
            Err(IgnoredLine::Blank) => {}
            Err(reason) => debug!("{}: skipping line {}: {:?}", zone, index + 1, reason),
        }
    }

    let mut records = Vec::with_capacity(groups.len());
    for ((name, record_type), raw_values) in groups {
        let Some(data) = normalize::data_for(record_type, &raw_values, zone)? else {
            continue;
        };

        let ttl = raw_values.first().map_or(0, |raw| raw.ttl);
        if raw_values.iter().any(|raw| raw.ttl != ttl) {
            warn!(
                "{}: {} {} has mixed TTLs, using {}",
                zone,
                zone.fqdn(&name),
                record_type,
                ttl
            );
        }

        records.push(Record::new(name, record_type, ttl, data)?);
    }

    Ok(records)
}

/// Build a zone from LIST output
pub fn zone_from_listing(zone: ZoneName, text: &str) -> Result<Zone> {
    let records = records_from_listing(&zone, text)?;
    let mut zone = Zone::new(zone);
    for record in records {
        zone.add_record(record)?;
    }
    Ok(zone)
}

/// Read a file in the LIST format into a zone
pub async fn read_listing_file(zone: ZoneName, path: impl AsRef<Path>) -> Result<Zone> {
    let path = path.as_ref();
    debug!("Reading {} records from {}", zone, path.display());
    let text = tokio::fs::read_to_string(path).await?;
    zone_from_listing(zone, &text)
}

#[async_trait]
impl DnsProvider for MythicBeastsProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_TYPE
    }

    fn supports(&self) -> &'static [RecordType] {
        SUPPORTS
    }

    fn strict_supports(&self) -> bool {
        self.strict_supports
    }

    /// Fill `zone` from a LIST request
    ///
    /// # API Call
    ///
    /// ```http
    /// POST /
    /// domain=unit.tests&password=...&showall=0&command=LIST
    /// ```
    async fn populate(&self, zone: &mut Zone) -> Result<bool> {
        let name = zone.name().clone();
        let password = self.password_for(&name)?;
        let domain = name.without_trailing_dot();

        debug!("{}: listing {}", self.id, domain);
        let response = self.transport.send(&ApiRequest::list(domain, password)).await?;

        match response.status {
            200 => {}
            401 => return Err(Error::unauthorized(PROVIDER_DISPLAY_NAME, domain)),
            status => {
                return Err(Error::http(format!(
                    "{} listing for {} failed with status {}: {}",
                    PROVIDER_DISPLAY_NAME,
                    domain,
                    status,
                    response.body.trim()
                )));
            }
        }

        let records = records_from_listing(&name, &response.body)?;
        let found = records.len();
        for record in records {
            zone.add_record(record)?;
        }

        info!("{}: populated {} with {} record(s)", self.id, name, found);
        Ok(true)
    }

    /// Send one command per record value, stopping at the first refusal
    ///
    /// # API Call
    ///
    /// ```http
    /// POST /
    /// domain=unit.tests&origin=.&password=...&command=ADD prawf.unit.tests 300 TXT prawf
    /// ```
    async fn apply(&self, plan: &Plan) -> Result<usize> {
        let zone = &plan.zone;
        let password = self.password_for(zone)?;
        let domain = zone.without_trailing_dot();

        info!(
            "{}: applying {} change(s) to {} [mode: {}]",
            self.id,
            plan.changes.len(),
            zone,
            if self.dry_run { "DRY-RUN" } else { "LIVE" }
        );

        let mut applied = 0;
        for change in &plan.changes {
            for command in change_commands(change, zone) {
                let line = command.to_string();

                if self.dry_run {
                    info!("[DRY-RUN] Would send to {}: {}", domain, line);
                    applied += 1;
                    continue;
                }

                debug!("{}: {} {}", self.id, domain, line);
                let response = self
                    .transport
                    .send(&ApiRequest::action(domain, password, &line))
                    .await?;

                if response.status != 200 {
                    debug!(
                        "{}: command refused with status {}: {}",
                        self.id,
                        response.status,
                        response.body.trim()
                    );
                    return Err(Error::command_rejected(
                        PROVIDER_DISPLAY_NAME,
                        domain,
                        line,
                        response.status,
                    ));
                }
                applied += 1;
            }
        }

        info!("{}: applied {} command(s) to {}", self.id, applied, zone);
        Ok(applied)
    }
}

/// Factory for creating Mythic Beasts providers
pub struct MythicBeastsFactory;

impl DnsProviderFactory for MythicBeastsFactory {
    fn create(
        &self,
        id: &str,
        config: &ProviderConfig,
        settings: &SyncSettings,
    ) -> Result<Box<dyn DnsProvider>> {
        match config {
            ProviderConfig::MythicBeasts { passwords } => {
                config.validate()?;

                if settings.dry_run {
                    warn!("Mythic Beasts provider running in DRY-RUN mode - no changes will be made");
                }

                let provider = MythicBeastsProvider::new(id, passwords.clone())?
                    .with_strict_supports(settings.strict_supports)
                    .with_dry_run(settings.dry_run);
                Ok(Box::new(provider))
            }
            _ => Err(Error::config("Invalid config for Mythic Beasts provider")),
        }
    }
}

/// Register the Mythic Beasts provider with a registry
///
/// # Example
///
/// ```rust
/// use dnsync_core::ProviderRegistry;
///
/// let registry = ProviderRegistry::new();
/// dnsync_provider_mythicbeasts::register(&registry);
/// assert!(registry.has_provider("mythicbeasts"));
/// ```
pub fn register(registry: &dnsync_core::ProviderRegistry) {
    registry.register_provider(PROVIDER_TYPE, Box::new(MythicBeastsFactory));
}
