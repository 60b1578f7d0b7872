//! Structured DNS records
//!
//! A [`Record`] is keyed by its relative name and [`RecordType`] and carries
//! either a single value or a list of values. Structured types (MX, SRV,
//! SSHFP, CAA) use dedicated value structs so callers never have to split
//! strings themselves.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::name::ZoneName;
use crate::error::{Error, Result};

/// DNS record types known to the record model
///
/// Not every provider supports every type; see
/// [`DnsProvider::supports`](crate::traits::DnsProvider::supports).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    A,
    Aaaa,
    Alias,
    Caa,
    Cname,
    Mx,
    Ns,
    Ptr,
    Spf,
    Srv,
    Sshfp,
    Txt,
}

impl RecordType {
    /// Every type the record model knows about
    pub const ALL: [RecordType; 12] = [
        RecordType::A,
        RecordType::Aaaa,
        RecordType::Alias,
        RecordType::Caa,
        RecordType::Cname,
        RecordType::Mx,
        RecordType::Ns,
        RecordType::Ptr,
        RecordType::Spf,
        RecordType::Srv,
        RecordType::Sshfp,
        RecordType::Txt,
    ];

    /// Canonical upper-case name
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Alias => "ALIAS",
            RecordType::Caa => "CAA",
            RecordType::Cname => "CNAME",
            RecordType::Mx => "MX",
            RecordType::Ns => "NS",
            RecordType::Ptr => "PTR",
            RecordType::Spf => "SPF",
            RecordType::Srv => "SRV",
            RecordType::Sshfp => "SSHFP",
            RecordType::Txt => "TXT",
        }
    }

    /// Types that only ever hold one value
    pub fn is_single_valued(&self) -> bool {
        matches!(self, RecordType::Alias | RecordType::Cname | RecordType::Ptr)
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = Error;

    /// Case-sensitive: `"mx"` is not a record type.
    fn from_str(s: &str) -> Result<Self> {
        RecordType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::invalid_input(format!("Unknown record type: {s}")))
    }
}

/// MX value
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MxValue {
    pub preference: u16,
    pub exchange: String,
}

/// SRV value
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SrvValue {
    pub priority: u16,
    pub weight: u16,
    pub port: u16,
    pub target: String,
}

/// SSHFP value
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SshfpValue {
    pub algorithm: u8,
    pub fingerprint_type: u8,
    pub fingerprint: String,
}

/// CAA value
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CaaValue {
    pub flags: u8,
    pub tag: String,
    pub value: String,
}

/// One value of a record
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordValue {
    /// Scalar types: addresses, host names, text
    Text(String),
    Mx(MxValue),
    Srv(SrvValue),
    Sshfp(SshfpValue),
    Caa(CaaValue),
}

impl RecordValue {
    /// Whether this value has the right shape for `record_type`
    pub fn fits(&self, record_type: RecordType) -> bool {
        match self {
            RecordValue::Text(_) => matches!(
                record_type,
                RecordType::A
                    | RecordType::Aaaa
                    | RecordType::Alias
                    | RecordType::Cname
                    | RecordType::Ns
                    | RecordType::Ptr
                    | RecordType::Spf
                    | RecordType::Txt
            ),
            RecordValue::Mx(_) => record_type == RecordType::Mx,
            RecordValue::Srv(_) => record_type == RecordType::Srv,
            RecordValue::Sshfp(_) => record_type == RecordType::Sshfp,
            RecordValue::Caa(_) => record_type == RecordType::Caa,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            RecordValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<&str> for RecordValue {
    fn from(value: &str) -> Self {
        RecordValue::Text(value.to_string())
    }
}

impl From<String> for RecordValue {
    fn from(value: String) -> Self {
        RecordValue::Text(value)
    }
}

impl From<MxValue> for RecordValue {
    fn from(value: MxValue) -> Self {
        RecordValue::Mx(value)
    }
}

impl From<SrvValue> for RecordValue {
    fn from(value: SrvValue) -> Self {
        RecordValue::Srv(value)
    }
}

impl From<SshfpValue> for RecordValue {
    fn from(value: SshfpValue) -> Self {
        RecordValue::Sshfp(value)
    }
}

impl From<CaaValue> for RecordValue {
    fn from(value: CaaValue) -> Self {
        RecordValue::Caa(value)
    }
}

/// Record payload: a single `value` or a list of `values`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordData {
    #[serde(rename = "value")]
    Single(RecordValue),
    #[serde(rename = "values")]
    Multiple(Vec<RecordValue>),
}

impl RecordData {
    /// One value becomes `Single`, anything else `Multiple`
    pub fn from_values(mut values: Vec<RecordValue>) -> Self {
        if values.len() == 1 {
            RecordData::Single(values.remove(0))
        } else {
            RecordData::Multiple(values)
        }
    }

    /// All values regardless of cardinality
    pub fn values(&self) -> &[RecordValue] {
        match self {
            RecordData::Single(value) => std::slice::from_ref(value),
            RecordData::Multiple(values) => values,
        }
    }
}

/// A DNS record relative to its zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    name: String,
    #[serde(rename = "type")]
    record_type: RecordType,
    ttl: u32,
    #[serde(flatten)]
    data: RecordData,
}

impl Record {
    /// Create a record, checking that the data fits the type
    ///
    /// `name` is relative to the zone; the apex is the empty string.
    pub fn new(
        name: impl Into<String>,
        record_type: RecordType,
        ttl: u32,
        data: RecordData,
    ) -> Result<Self> {
        let name = name.into();

        if name.ends_with('.') {
            return Err(Error::invalid_input(format!(
                "Record name must be relative, got '{name}'"
            )));
        }
        if name.chars().any(char::is_whitespace) {
            return Err(Error::invalid_input(format!(
                "Record name contains whitespace: '{name}'"
            )));
        }

        match &data {
            RecordData::Multiple(values) if values.is_empty() => {
                return Err(Error::invalid_input(format!(
                    "{record_type} record '{name}' has no values"
                )));
            }
            RecordData::Multiple(values) if record_type.is_single_valued() && values.len() > 1 => {
                return Err(Error::invalid_input(format!(
                    "{record_type} record '{name}' takes a single value"
                )));
            }
            _ => {}
        }

        if let Some(bad) = data.values().iter().find(|v| !v.fits(record_type)) {
            return Err(Error::invalid_input(format!(
                "Value {bad:?} does not fit {record_type} record '{name}'"
            )));
        }

        Ok(Self {
            name,
            record_type,
            ttl,
            data,
        })
    }

    /// Convenience constructor for a single-valued record
    pub fn single(
        name: impl Into<String>,
        record_type: RecordType,
        ttl: u32,
        value: impl Into<RecordValue>,
    ) -> Result<Self> {
        Self::new(name, record_type, ttl, RecordData::Single(value.into()))
    }

    /// Convenience constructor for a multi-valued record
    pub fn multiple<V: Into<RecordValue>>(
        name: impl Into<String>,
        record_type: RecordType,
        ttl: u32,
        values: impl IntoIterator<Item = V>,
    ) -> Result<Self> {
        let values = values.into_iter().map(Into::into).collect();
        Self::new(name, record_type, ttl, RecordData::Multiple(values))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    pub fn data(&self) -> &RecordData {
        &self.data
    }

    pub fn values(&self) -> &[RecordValue] {
        self.data.values()
    }

    /// The value of a single-valued record
    pub fn value(&self) -> Option<&RecordValue> {
        match &self.data {
            RecordData::Single(value) => Some(value),
            RecordData::Multiple(_) => None,
        }
    }

    /// Absolute name of this record inside `zone`
    pub fn fqdn(&self, zone: &ZoneName) -> String {
        zone.fqdn(&self.name)
    }

    /// Identity within a zone
    pub fn key(&self) -> (&str, RecordType) {
        (&self.name, self.record_type)
    }

    /// Same TTL and same set of values, ignoring value order and whether
    /// the data was written as `value` or `values`.
    pub fn same_data(&self, other: &Record) -> bool {
        self.ttl == other.ttl && self.sorted_values() == other.sorted_values()
    }

    fn sorted_values(&self) -> Vec<&RecordValue> {
        let mut values: Vec<&RecordValue> = self.values().iter().collect();
        values.sort();
        values
    }
}
