// # dnsync-core
//
// Core library for dnsync, a DNS-as-code zone synchroniser.
//
// ## Architecture Overview
//
// This library provides the provider-independent half of a sync run:
// - **Record model**: `ZoneName`, `Zone`, `Record` and typed record values
// - **Planning**: `plan_changes` diffs a live zone against a desired one
// - **DnsProvider**: Trait for reading and changing zones via provider APIs
// - **ProviderRegistry**: Plugin-based registry for DNS providers
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Providers translate, the core plans
// 2. **Plugin-Based**: Providers are registered dynamically, no hard-coded if-else
// 3. **Library-First**: All core functionality can be used as a library
// 4. **Stateless**: Nothing is kept between plan/apply cycles

pub mod config;
pub mod error;
pub mod model;
pub mod plan;
pub mod registry;
pub mod traits;

// Re-export core types for convenience
pub use config::{ProviderConfig, SyncConfig, SyncSettings, ZoneConfig};
pub use error::{Error, Result};
pub use model::{Record, RecordData, RecordType, RecordValue, Zone, ZoneName};
pub use plan::{Change, Plan, plan_changes};
pub use registry::ProviderRegistry;
pub use traits::{DnsProvider, DnsProviderFactory};
