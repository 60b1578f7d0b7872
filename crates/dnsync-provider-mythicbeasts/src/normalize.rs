//! Per-type record normalizer
//!
//! Converts the raw values collected for one `(name, type)` pair into
//! structured record data, and structured records back into raw values.
//!
//! | Type            | Raw value                              | Structured                  |
//! |-----------------|----------------------------------------|-----------------------------|
//! | A, AAAA, NS     | token                                  | `value` if one, else `values` |
//! | CNAME           | host, relative names qualified         | `value`                     |
//! | ALIAS           | host, left as-is                       | `value`                     |
//! | TXT             | free text, `;` escaped as `\;`         | `values`                    |
//! | MX              | `<preference> <exchange>`              | `values`                    |
//! | SRV             | `<priority> <weight> <port> <target>`  | `values`                    |
//! | SSHFP           | `<algorithm> <fp-type> <fingerprint>`  | `values`                    |
//! | CAA             | `<flags> <tag> <value>`                | `value` if one, else `values` |
//!
//! A raw value that does not split into the expected fields is an
//! [`Error::MalformedData`].

use dnsync_core::model::{CaaValue, MxValue, SrvValue, SshfpValue};
use dnsync_core::{Error, Record, RecordData, RecordType, RecordValue, Result, ZoneName};
use std::str::FromStr;

/// One raw value as listed by the API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawValue {
    pub value: String,
    pub ttl: u32,
}

impl RawValue {
    pub fn new(value: impl Into<String>, ttl: u32) -> Self {
        Self {
            value: value.into(),
            ttl,
        }
    }
}

type Forward = fn(&[RawValue], &ZoneName) -> Result<RecordData>;
type Reverse = fn(&Record) -> Vec<String>;

/// Forward and reverse conversions for one record type
#[derive(Clone, Copy)]
struct Normalizer {
    forward: Forward,
    reverse: Reverse,
}

fn normalizer(record_type: RecordType) -> Option<Normalizer> {
    let (forward, reverse): (Forward, Reverse) = match record_type {
        RecordType::A | RecordType::Aaaa | RecordType::Ns => (data_for_multiple, text_values),
        RecordType::Cname => (data_for_cname, text_values),
        RecordType::Alias => (data_for_alias, text_values),
        RecordType::Txt => (data_for_txt, txt_values),
        RecordType::Mx => (data_for_mx, mx_values),
        RecordType::Srv => (data_for_srv, srv_values),
        RecordType::Sshfp => (data_for_sshfp, sshfp_values),
        RecordType::Caa => (data_for_caa, caa_values),
        RecordType::Ptr | RecordType::Spf => return None,
    };
    Some(Normalizer { forward, reverse })
}

/// Structured data for the raw values of one `(name, type)` group
///
/// `Ok(None)` when the type is not handled by this provider.
pub fn data_for(
    record_type: RecordType,
    raw_values: &[RawValue],
    zone: &ZoneName,
) -> Result<Option<RecordData>> {
    match normalizer(record_type) {
        Some(n) => (n.forward)(raw_values, zone).map(Some),
        None => Ok(None),
    }
}

/// Raw values for a structured record, one per command
///
/// `None` when the type is not handled by this provider.
pub fn wire_values(record: &Record) -> Option<Vec<String>> {
    normalizer(record.record_type()).map(|n| (n.reverse)(record))
}

/// Escape `;` the way the record model expects TXT values
pub fn escape_txt(value: &str) -> String {
    value.replace(';', "\\;")
}

/// Inverse of [`escape_txt`]
pub fn unescape_txt(value: &str) -> String {
    value.replace("\\;", ";")
}

fn first(raw_values: &[RawValue], record_type: RecordType) -> Result<&str> {
    raw_values
        .first()
        .map(|raw| raw.value.as_str())
        .ok_or_else(|| Error::malformed(record_type, ""))
}

/// Relative host names are relative to the zone; `@` is the apex.
fn qualify(host: &str, zone: &ZoneName) -> String {
    if host.ends_with('.') {
        host.to_string()
    } else if host == "@" {
        zone.to_string()
    } else {
        zone.fqdn(host)
    }
}

/// Split `raw` into exactly `N` whitespace-separated fields
fn fields<const N: usize>(raw: &str, record_type: RecordType) -> Result<[&str; N]> {
    let parts: Vec<&str> = raw.split_whitespace().collect();
    parts
        .try_into()
        .map_err(|_| Error::malformed(record_type, raw))
}

fn number<T: FromStr>(field: &str, raw: &str, record_type: RecordType) -> Result<T> {
    field.parse().map_err(|_| Error::malformed(record_type, raw))
}

fn data_for_multiple(raw_values: &[RawValue], _zone: &ZoneName) -> Result<RecordData> {
    let values = raw_values
        .iter()
        .map(|raw| RecordValue::Text(raw.value.clone()))
        .collect();
    Ok(RecordData::from_values(values))
}

fn data_for_cname(raw_values: &[RawValue], zone: &ZoneName) -> Result<RecordData> {
    let target = first(raw_values, RecordType::Cname)?;
    Ok(RecordData::Single(RecordValue::Text(qualify(target, zone))))
}

fn data_for_alias(raw_values: &[RawValue], _zone: &ZoneName) -> Result<RecordData> {
    let target = first(raw_values, RecordType::Alias)?;
    Ok(RecordData::Single(RecordValue::Text(target.to_string())))
}

fn data_for_txt(raw_values: &[RawValue], _zone: &ZoneName) -> Result<RecordData> {
    let values = raw_values
        .iter()
        .map(|raw| RecordValue::Text(escape_txt(&raw.value)))
        .collect();
    Ok(RecordData::Multiple(values))
}

fn data_for_mx(raw_values: &[RawValue], zone: &ZoneName) -> Result<RecordData> {
    let values = raw_values
        .iter()
        .map(|raw| -> Result<RecordValue> {
            let [preference, exchange] = fields::<2>(&raw.value, RecordType::Mx)?;
            Ok(RecordValue::Mx(MxValue {
                preference: number(preference, &raw.value, RecordType::Mx)?,
                exchange: qualify(exchange, zone),
            }))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(RecordData::Multiple(values))
}

fn data_for_srv(raw_values: &[RawValue], zone: &ZoneName) -> Result<RecordData> {
    let values = raw_values
        .iter()
        .map(|raw| -> Result<RecordValue> {
            let [priority, weight, port, target] = fields::<4>(&raw.value, RecordType::Srv)?;
            Ok(RecordValue::Srv(SrvValue {
                priority: number(priority, &raw.value, RecordType::Srv)?,
                weight: number(weight, &raw.value, RecordType::Srv)?,
                port: number(port, &raw.value, RecordType::Srv)?,
                target: qualify(target, zone),
            }))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(RecordData::Multiple(values))
}

fn data_for_sshfp(raw_values: &[RawValue], _zone: &ZoneName) -> Result<RecordData> {
    let values = raw_values
        .iter()
        .map(|raw| -> Result<RecordValue> {
            let [algorithm, fingerprint_type, fingerprint] =
                fields::<3>(&raw.value, RecordType::Sshfp)?;
            Ok(RecordValue::Sshfp(SshfpValue {
                algorithm: number(algorithm, &raw.value, RecordType::Sshfp)?,
                fingerprint_type: number(fingerprint_type, &raw.value, RecordType::Sshfp)?,
                fingerprint: fingerprint.to_string(),
            }))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(RecordData::Multiple(values))
}

fn data_for_caa(raw_values: &[RawValue], _zone: &ZoneName) -> Result<RecordData> {
    let values = raw_values
        .iter()
        .map(|raw| -> Result<RecordValue> {
            let [flags, tag, value] = fields::<3>(&raw.value, RecordType::Caa)?;
            Ok(RecordValue::Caa(CaaValue {
                flags: number(flags, &raw.value, RecordType::Caa)?,
                tag: tag.to_string(),
                value: value.to_string(),
            }))
        })
        .collect::<Result<Vec<_>>>()?;
    if values.is_empty() {
        return Err(Error::malformed(RecordType::Caa, ""));
    }
    Ok(RecordData::from_values(values))
}

fn text_values(record: &Record) -> Vec<String> {
    record
        .values()
        .iter()
        .filter_map(RecordValue::as_text)
        .map(str::to_string)
        .collect()
}

fn txt_values(record: &Record) -> Vec<String> {
    record
        .values()
        .iter()
        .filter_map(RecordValue::as_text)
        .map(unescape_txt)
        .collect()
}

fn mx_values(record: &Record) -> Vec<String> {
    record
        .values()
        .iter()
        .filter_map(|value| match value {
            RecordValue::Mx(mx) => Some(format!("{} {}", mx.preference, mx.exchange)),
            _ => None,
        })
        .collect()
}

fn srv_values(record: &Record) -> Vec<String> {
    record
        .values()
        .iter()
        .filter_map(|value| match value {
            RecordValue::Srv(srv) => Some(format!(
                "{} {} {} {}",
                srv.priority, srv.weight, srv.port, srv.target
            )),
            _ => None,
        })
        .collect()
}

fn sshfp_values(record: &Record) -> Vec<String> {
    record
        .values()
        .iter()
        .filter_map(|value| match value {
            RecordValue::Sshfp(sshfp) => Some(format!(
                "{} {} {}",
                sshfp.algorithm, sshfp.fingerprint_type, sshfp.fingerprint
            )),
            _ => None,
        })
        .collect()
}

fn caa_values(record: &Record) -> Vec<String> {
    record
        .values()
        .iter()
        .filter_map(|value| match value {
            RecordValue::Caa(caa) => Some(format!("{} {} {}", caa.flags, caa.tag, caa.value)),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone() -> ZoneName {
        ZoneName::new("unit.tests.").unwrap()
    }

    fn raw(values: &[(&str, u32)]) -> Vec<RawValue> {
        values.iter().map(|(v, ttl)| RawValue::new(*v, *ttl)).collect()
    }

    fn forward(record_type: RecordType, values: &[(&str, u32)]) -> Result<RecordData> {
        data_for(record_type, &raw(values), &zone()).map(|data| data.expect("supported type"))
    }

    #[test]
    fn test_data_for_single() {
        let data = forward(RecordType::Aaaa, &[("a:a::c", 0)]).unwrap();
        assert_eq!(data, RecordData::Single(RecordValue::from("a:a::c")));
    }

    #[test]
    fn test_data_for_multiple() {
        let data = forward(RecordType::Aaaa, &[("b:b::d", 60), ("a:a::c", 60)]).unwrap();
        assert!(matches!(&data, RecordData::Multiple(values) if values.len() == 2));
    }

    #[test]
    fn test_data_for_txt() {
        let data = forward(
            RecordType::Txt,
            &[("v=DKIM1; k=rsa; p=prawf", 60), ("prawf prawf dyma prawf", 300)],
        )
        .unwrap();
        let values = data.values();
        assert_eq!(values.len(), 2);
        assert_eq!(values[0], RecordValue::from("v=DKIM1\\; k=rsa\\; p=prawf"));
    }

    #[test]
    fn test_data_for_mx() {
        let data = forward(
            RecordType::Mx,
            &[("10 un.unit", 60), ("20 dau.unit", 60), ("30 tri.unit", 60)],
        )
        .unwrap();
        assert_eq!(data.values().len(), 3);
        assert_eq!(
            data.values()[0],
            RecordValue::Mx(MxValue {
                preference: 10,
                exchange: "un.unit.unit.tests.".to_string(),
            })
        );

        let err = forward(RecordType::Mx, &[("", 0)]).unwrap_err();
        assert_eq!(err.to_string(), "Unable to parse MX data");

        let err = forward(RecordType::Mx, &[("ten mx.unit.tests.", 0)]).unwrap_err();
        assert_eq!(err.to_string(), "Unable to parse MX data");
    }

    #[test]
    fn test_data_for_cname() {
        let data = forward(RecordType::Cname, &[("cname", 60)]).unwrap();
        assert_eq!(data, RecordData::Single(RecordValue::from("cname.unit.tests.")));

        let data = forward(RecordType::Cname, &[("unit.tests.", 60)]).unwrap();
        assert_eq!(data, RecordData::Single(RecordValue::from("unit.tests.")));
    }

    #[test]
    fn test_data_for_alias() {
        let data = forward(RecordType::Alias, &[("aname", 60)]).unwrap();
        assert_eq!(data, RecordData::Single(RecordValue::from("aname")));
    }

    #[test]
    fn test_data_for_srv() {
        let data = forward(
            RecordType::Srv,
            &[
                ("10 20 30 un.srv.unit", 60),
                ("20 30 40 dau.srv.unit", 60),
                ("30 30 50 tri.srv.unit", 60),
            ],
        )
        .unwrap();
        assert_eq!(data.values().len(), 3);
        assert_eq!(
            data.values()[0],
            RecordValue::Srv(SrvValue {
                priority: 10,
                weight: 20,
                port: 30,
                target: "un.srv.unit.unit.tests.".to_string(),
            })
        );

        let err = forward(RecordType::Srv, &[("", 0)]).unwrap_err();
        assert_eq!(err.to_string(), "Unable to parse SRV data");

        let err = forward(RecordType::Srv, &[("10 20 70000 big.port.", 0)]).unwrap_err();
        assert_eq!(err.to_string(), "Unable to parse SRV data");
    }

    #[test]
    fn test_data_for_sshfp() {
        let data = forward(
            RecordType::Sshfp,
            &[
                ("1 1 0123456789abcdef", 60),
                ("1 2 0123456789abcdef", 60),
                ("2 3 0123456789abcdef", 60),
            ],
        )
        .unwrap();
        assert_eq!(data.values().len(), 3);

        let err = forward(RecordType::Sshfp, &[("", 0)]).unwrap_err();
        assert_eq!(err.to_string(), "Unable to parse SSHFP data");
    }

    #[test]
    fn test_data_for_caa() {
        let data = forward(RecordType::Caa, &[("1 issue letsencrypt.org", 60)]).unwrap();
        assert_eq!(
            data,
            RecordData::Single(RecordValue::Caa(CaaValue {
                flags: 1,
                tag: "issue".to_string(),
                value: "letsencrypt.org".to_string(),
            }))
        );

        let err = forward(RecordType::Caa, &[("", 0)]).unwrap_err();
        assert_eq!(err.to_string(), "Unable to parse CAA data");
    }

    #[test]
    fn test_unhandled_types() {
        assert!(data_for(RecordType::Ptr, &raw(&[("x.", 60)]), &zone()).unwrap().is_none());

        let ptr = Record::single("ptr", RecordType::Ptr, 60, "x.unit.tests.").unwrap();
        assert!(wire_values(&ptr).is_none());
    }

    #[test]
    fn test_round_trip_to_raw_values() {
        let cases: &[(RecordType, &[&str])] = &[
            (RecordType::A, &["1.2.3.4", "5.6.7.8"]),
            (RecordType::Aaaa, &["a:a::c"]),
            (RecordType::Ns, &["ns1.unit.tests.", "ns2.unit.tests."]),
            (RecordType::Cname, &["www.unit.tests."]),
            (RecordType::Alias, &["alias.unit.tests."]),
            (RecordType::Txt, &["v=DKIM1; k=rsa; p=prawf", "prawf prawf dyma prawf"]),
            (RecordType::Mx, &["10 smtp-1.unit.tests.", "20 smtp-2.unit.tests."]),
            (RecordType::Srv, &["10 20 30 foo-1.unit.tests."]),
            (RecordType::Sshfp, &["1 1 bf6b6825d2977c511a475bbefb88aad54a92ac73"]),
            (RecordType::Caa, &["0 issue ca.unit.tests", "0 iodef mailto:admin@unit.tests"]),
        ];

        for (record_type, values) in cases {
            let raw_values: Vec<RawValue> = values.iter().map(|v| RawValue::new(*v, 300)).collect();
            let data = data_for(*record_type, &raw_values, &zone()).unwrap().unwrap();
            let record = Record::new("rt", *record_type, 300, data).unwrap();

            let mut expected: Vec<String> = values.iter().map(|v| v.to_string()).collect();
            let mut actual = wire_values(&record).unwrap();
            expected.sort();
            actual.sort();
            assert_eq!(actual, expected, "{record_type} did not round-trip");
        }
    }
}
