//! Line protocol codec
//!
//! The Mythic Beasts API speaks plain text. A zone listing is one record per
//! line:
//!
//! ```text
//! <name> <ttl> <type> <value...>
//! ```
//!
//! and changes are sent as one command per request:
//!
//! ```text
//! ADD|DELETE <fqdn-without-trailing-dot> <ttl> <type> <value...>
//! ```
//!
//! This module only splits and joins fields. Turning values into structured
//! records is done by [`crate::normalize`].

use dnsync_core::RecordType;
use dnsync_core::model::remove_trailing_dot;
use std::fmt;

/// Record types the Mythic Beasts API can manage
pub const SUPPORTS: &[RecordType] = &[
    RecordType::A,
    RecordType::Aaaa,
    RecordType::Alias,
    RecordType::Caa,
    RecordType::Cname,
    RecordType::Mx,
    RecordType::Ns,
    RecordType::Srv,
    RecordType::Sshfp,
    RecordType::Txt,
];

/// One parsed listing line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    /// Name relative to the zone, `@` for the apex
    pub name: String,
    pub ttl: u32,
    pub record_type: RecordType,
    /// Type-specific value, internal spacing preserved
    pub value: String,
}

/// Why a listing line was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoredLine {
    /// Empty or whitespace-only
    Blank,
    /// Not `<name> <ttl> <type> <value>`
    Malformed,
    /// Well-formed, but the type is not one we manage
    UnsupportedType(String),
}

/// Parse a listing line, saying why it was skipped if it was
pub fn classify_line(line: &str) -> Result<RawLine, IgnoredLine> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Err(IgnoredLine::Blank);
    }

    let (name, rest) = split_token(line).ok_or(IgnoredLine::Malformed)?;
    // names in a listing are relative to the zone
    if name.ends_with('.') {
        return Err(IgnoredLine::Malformed);
    }
    let (ttl, rest) = split_token(rest).ok_or(IgnoredLine::Malformed)?;
    let (tag, value) = split_token(rest).ok_or(IgnoredLine::Malformed)?;

    if !ttl.bytes().all(|b| b.is_ascii_digit()) || value.is_empty() {
        return Err(IgnoredLine::Malformed);
    }
    let ttl = ttl.parse().map_err(|_| IgnoredLine::Malformed)?;

    let record_type =
        record_type_for_tag(tag).ok_or_else(|| IgnoredLine::UnsupportedType(tag.to_string()))?;

    Ok(RawLine {
        name: name.to_string(),
        ttl,
        record_type,
        value: value.to_string(),
    })
}

/// Parse a listing line; anything unusable is `None`
pub fn parse_line(line: &str) -> Option<RawLine> {
    classify_line(line).ok()
}

/// Split off the first token; the remainder has its leading whitespace removed.
fn split_token(s: &str) -> Option<(&str, &str)> {
    let end = s.find(char::is_whitespace)?;
    if end == 0 {
        return None;
    }
    let (token, rest) = s.split_at(end);
    Some((token, rest.trim_start()))
}

/// Map a wire type tag to a record type. Case-sensitive.
///
/// `ANAME` is the registrar's spelling of `ALIAS`.
pub fn record_type_for_tag(tag: &str) -> Option<RecordType> {
    let record_type = match tag {
        "ANAME" => RecordType::Alias,
        other => other.parse().ok()?,
    };
    SUPPORTS.contains(&record_type).then_some(record_type)
}

/// Map a record type to the tag sent on the wire
pub fn wire_tag(record_type: RecordType) -> Option<&'static str> {
    match record_type {
        RecordType::Alias => Some("ANAME"),
        other if SUPPORTS.contains(&other) => Some(other.as_str()),
        _ => None,
    }
}

/// Command verb
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Add,
    Delete,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Add => "ADD",
            Action::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One add/delete command for a single record value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub action: Action,
    /// Absolute name, trailing dot included
    pub fqdn: String,
    pub ttl: u32,
    /// Wire type tag
    pub tag: &'static str,
    /// Wire-encoded value
    pub value: String,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_command(
            self.action,
            &self.fqdn,
            self.ttl,
            self.tag,
            &self.value,
        ))
    }
}

/// Build a command line
///
/// `fqdn` must be absolute; the trailing dot is dropped on the wire. `value`
/// is written verbatim.
pub fn format_command(action: Action, fqdn: &str, ttl: u32, tag: &str, value: &str) -> String {
    format!(
        "{} {} {} {} {}",
        action,
        remove_trailing_dot(fqdn),
        ttl,
        tag,
        value
    )
}
