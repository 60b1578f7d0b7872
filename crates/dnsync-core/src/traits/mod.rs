//! Core traits for dnsync
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`DnsProvider`]: Read and change a zone through a provider API

pub mod dns_provider;

pub use dns_provider::{DnsProvider, DnsProviderFactory};
