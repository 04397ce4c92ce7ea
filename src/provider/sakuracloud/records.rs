use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Relative record name that denotes the zone apex
pub const APEX_MARKER: &str = "@";

/// Record types known to Sakura Cloud DNS.
/// Types we don't know about are carried through unchanged in [`RecordType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordType {
    A,
    Aaaa,
    Alias,
    Caa,
    Cname,
    Https,
    Mx,
    Ns,
    Ptr,
    Srv,
    Svcb,
    Txt,
    Other(String),
}

impl From<String> for RecordType {
    fn from(s: String) -> Self {
        RecordType::from(s.as_str())
    }
}

impl From<&str> for RecordType {
    fn from(s: &str) -> Self {
        match s {
            "A" => RecordType::A,
            "AAAA" => RecordType::Aaaa,
            "ALIAS" => RecordType::Alias,
            "CAA" => RecordType::Caa,
            "CNAME" => RecordType::Cname,
            "HTTPS" => RecordType::Https,
            "MX" => RecordType::Mx,
            "NS" => RecordType::Ns,
            "PTR" => RecordType::Ptr,
            "SRV" => RecordType::Srv,
            "SVCB" => RecordType::Svcb,
            "TXT" => RecordType::Txt,
            other => RecordType::Other(other.to_owned()),
        }
    }
}

impl RecordType {
    pub fn as_str(&self) -> &str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Alias => "ALIAS",
            RecordType::Caa => "CAA",
            RecordType::Cname => "CNAME",
            RecordType::Https => "HTTPS",
            RecordType::Mx => "MX",
            RecordType::Ns => "NS",
            RecordType::Ptr => "PTR",
            RecordType::Srv => "SRV",
            RecordType::Svcb => "SVCB",
            RecordType::Txt => "TXT",
            RecordType::Other(s) => s.as_str(),
        }
    }
}

impl From<RecordType> for String {
    fn from(t: RecordType) -> Self {
        t.as_str().to_owned()
    }
}

impl Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single resource record as stored by Sakura Cloud.
/// `name` is relative to the zone, or [`APEX_MARKER`] for the zone apex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Type")]
    pub record_type: RecordType,
    #[serde(rename = "RData")]
    pub rdata: String,
    #[serde(rename = "TTL")]
    pub ttl: i64,
}

impl Record {
    pub fn new(record_type: RecordType, name: &str, rdata: &str, ttl: i64) -> Self {
        Record {
            name: name.to_owned(),
            record_type,
            rdata: rdata.to_owned(),
            ttl,
        }
    }

    /// Two records are the same DNS record if type, name and data match. The TTL is not considered.
    pub fn same_record(&self, other: &Record) -> bool {
        self.record_type == other.record_type && self.name == other.name && self.rdata == other.rdata
    }
}

impl Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.name, self.ttl, self.record_type, self.rdata
        )
    }
}

/// The full record set of a zone.
///
/// Modifications never change a set in place, they return the modified copy instead.
/// Record order is preserved, new records are appended.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ZoneRecords(Vec<Record>);

impl ZoneRecords {
    pub fn new(records: Vec<Record>) -> Self {
        ZoneRecords(records)
    }

    /// Returns a set that contains `record`.
    /// If the same record is already present, only its TTL is updated.
    pub fn with(&self, record: &Record) -> ZoneRecords {
        let mut records = self.0.clone();
        match records.iter_mut().find(|r| r.same_record(record)) {
            Some(existing) => existing.ttl = record.ttl,
            None => records.push(record.clone()),
        }
        ZoneRecords(records)
    }

    /// Returns a set that no longer contains `record`
    pub fn without(&self, record: &Record) -> ZoneRecords {
        ZoneRecords(
            self.0
                .iter()
                .filter(|r| !r.same_record(record))
                .cloned()
                .collect(),
        )
    }

    pub fn contains(&self, record: &Record) -> bool {
        self.0.iter().any(|r| r.same_record(record))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Record] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A DNS zone hosted by Sakura Cloud
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    pub id: String,
    /// Fully-qualified zone name, without trailing dot
    pub name: String,
    pub records: ZoneRecords,
}
