//! Record model shared by every provider
//!
//! - [`ZoneName`]: absolute zone names
//! - [`Record`], [`RecordType`], [`RecordValue`]: structured records
//! - [`Zone`]: the set of records in one zone

pub mod name;
pub mod record;
pub mod zone;

pub use name::{ZoneName, add_trailing_dot, remove_trailing_dot};
pub use record::{
    CaaValue, MxValue, Record, RecordData, RecordType, RecordValue, SrvValue, SshfpValue,
};
pub use zone::Zone;
