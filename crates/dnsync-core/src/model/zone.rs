//! Zone container
//!
//! Records are kept sorted by `(name, type)`, which is also their identity:
//! a zone never holds two records with the same key.

use serde::Serialize;

use super::name::ZoneName;
use super::record::{Record, RecordType};
use crate::error::{Error, Result};

/// A zone and the records it holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Zone {
    name: ZoneName,
    records: Vec<Record>,
}

impl Zone {
    /// Create an empty zone
    pub fn new(name: ZoneName) -> Self {
        Self {
            name,
            records: Vec::new(),
        }
    }

    pub fn name(&self) -> &ZoneName {
        &self.name
    }

    /// Records in `(name, type)` order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Add a record; a second record with the same name and type is an error
    pub fn add_record(&mut self, record: Record) -> Result<()> {
        match self.position(record.name(), record.record_type()) {
            Ok(_) => Err(Error::invalid_input(format!(
                "Duplicate {} record for {}",
                record.record_type(),
                record.fqdn(&self.name)
            ))),
            Err(index) => {
                self.records.insert(index, record);
                Ok(())
            }
        }
    }

    /// Remove and return the record with this key, if any
    pub fn remove_record(&mut self, name: &str, record_type: RecordType) -> Option<Record> {
        self.position(name, record_type)
            .ok()
            .map(|index| self.records.remove(index))
    }

    pub fn get(&self, name: &str, record_type: RecordType) -> Option<&Record> {
        self.position(name, record_type)
            .ok()
            .map(|index| &self.records[index])
    }

    /// Keep only the records matching `keep`
    pub fn retain(&mut self, keep: impl FnMut(&Record) -> bool) {
        self.records.retain(keep);
    }

    fn position(&self, name: &str, record_type: RecordType) -> std::result::Result<usize, usize> {
        self.records
            .binary_search_by(|record| record.key().cmp(&(name, record_type)))
    }
}
