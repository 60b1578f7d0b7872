// # DNS Provider Trait
//
// Defines the interface every DNS provider plugin implements.
//
// ## Implementations
//
// - Mythic Beasts: `dnsync-provider-mythicbeasts` crate
//
// ## Usage
//
// ```rust,ignore
// use dnsync_core::{DnsProvider, Zone, ZoneName};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* DnsProvider implementation */;
//     let desired = /* Zone loaded from somewhere */;
//
//     let plan = provider.plan(&desired).await?;
//     let applied = provider.apply(&plan).await?;
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::model::{Record, RecordType, Zone};
use crate::plan::{Plan, plan_changes};

/// Trait for DNS provider implementations
///
/// A provider reads what it currently serves for a zone ([`populate`]) and
/// pushes changes ([`apply`]). Working out *what* to change is not the
/// provider's job: [`plan`] is provided here and only calls back into
/// `populate`.
///
/// # Trust Level: Untrusted
///
/// ## Allowed Capabilities
/// - ✅ Perform HTTP/HTTPS API calls to their endpoints only
/// - ✅ Parse provider-specific responses
/// - ✅ Return success or failure (the caller decides about retries)
///
/// ## Forbidden Capabilities
/// - ❌ Spawn tasks or threads
/// - ❌ Implement retry logic or backoff
/// - ❌ Diff zones themselves (owned by [`plan_changes`])
/// - ❌ Cache zone contents between calls
/// - ❌ Log credentials
///
/// [`populate`]: DnsProvider::populate
/// [`apply`]: DnsProvider::apply
/// [`plan`]: DnsProvider::plan
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Identifier given to this provider instance by its configuration
    fn id(&self) -> &str;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;

    /// Record types this provider can manage
    fn supports(&self) -> &'static [RecordType];

    /// Whether desired records of unsupported types are an error (`true`)
    /// or are dropped with a warning (`false`)
    fn strict_supports(&self) -> bool;

    /// Fill `zone` with the records the provider currently serves
    ///
    /// Records of unsupported types are skipped. Returns whether the zone
    /// exists at the provider.
    async fn populate(&self, zone: &mut Zone) -> Result<bool>;

    /// Push every change in `plan`, returning how many provider-level
    /// operations were performed
    ///
    /// The first failure aborts the rest of the plan.
    async fn apply(&self, plan: &Plan) -> Result<usize>;

    /// Whether `record_type` is in [`supports`](DnsProvider::supports)
    fn supports_type(&self, record_type: RecordType) -> bool {
        self.supports().contains(&record_type)
    }

    /// Compute the changes needed to make the provider serve `desired`
    async fn plan(&self, desired: &Zone) -> Result<Plan> {
        let mut wanted = desired.clone();
        let unsupported: Vec<&Record> = desired
            .records()
            .iter()
            .filter(|r| !self.supports_type(r.record_type()))
            .collect();

        if let Some(record) = unsupported.first()
            && self.strict_supports()
        {
            return Err(Error::unsupported(format!(
                "{}: {} records not supported for {}",
                self.id(),
                record.record_type(),
                record.fqdn(desired.name())
            )));
        }

        for record in unsupported {
            warn!(
                "{}: {} records not supported for {}, skipping",
                self.id(),
                record.record_type(),
                record.fqdn(desired.name())
            );
        }
        wanted.retain(|r| self.supports_type(r.record_type()));

        let mut existing = Zone::new(desired.name().clone());
        let exists = self.populate(&mut existing).await?;

        let changes = plan_changes(&existing, &wanted);
        debug!(
            "{}: planned {} change(s) for {}",
            self.id(),
            changes.len(),
            desired.name()
        );

        Ok(Plan::new(desired.name().clone(), changes, exists))
    }
}

/// Helper trait for constructing DNS providers from configuration
pub trait DnsProviderFactory: Send + Sync {
    /// Create a DnsProvider instance from configuration
    ///
    /// # Parameters
    ///
    /// - `id`: Identifier for the new provider instance
    /// - `config`: Configuration specific to this provider
    /// - `settings`: Run-wide settings (dry-run, strict supports)
    fn create(
        &self,
        id: &str,
        config: &crate::config::ProviderConfig,
        settings: &crate::config::SyncSettings,
    ) -> Result<Box<dyn DnsProvider>>;
}
