//! Provider-agnostic description of desired DNS state.
//!
//! An [`Endpoint`] is what the planning component hands us: a fully-qualified name,
//! a record type and a list of targets. The types here use the same JSON field names
//! as the planner so that change documents can be passed through unmodified.

use std::fmt::Display;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

pub const RECORD_TYPE_A: &str = "A";
pub const RECORD_TYPE_AAAA: &str = "AAAA";
pub const RECORD_TYPE_CNAME: &str = "CNAME";
pub const RECORD_TYPE_TXT: &str = "TXT";
pub const RECORD_TYPE_SRV: &str = "SRV";
pub const RECORD_TYPE_NS: &str = "NS";
pub const RECORD_TYPE_MX: &str = "MX";

/// Returns whether records of this type are surfaced on the read path
pub fn supported_record_type(record_type: &str) -> bool {
    matches!(
        record_type,
        RECORD_TYPE_A
            | RECORD_TYPE_AAAA
            | RECORD_TYPE_CNAME
            | RECORD_TYPE_SRV
            | RECORD_TYPE_TXT
            | RECORD_TYPE_NS
            | RECORD_TYPE_MX
    )
}

/// Time-to-live of an endpoint in seconds.
/// A value of zero means that the TTL was not configured and the provider default should be used.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ttl(pub i64);

impl Ttl {
    pub fn is_configured(&self) -> bool {
        self.0 > 0
    }
}

/// A single desired DNS name with all of its targets of one record type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub dns_name: String,
    #[serde(default)]
    pub targets: Vec<String>,
    pub record_type: String,
    #[serde(rename = "recordTTL", default, skip_serializing_if = "is_unconfigured")]
    pub record_ttl: Ttl,
}

fn is_unconfigured(ttl: &Ttl) -> bool {
    !ttl.is_configured()
}

impl Endpoint {
    /// Create an endpoint that uses the provider default TTL
    pub fn new(dns_name: &str, record_type: &str, targets: &[&str]) -> Self {
        Self::with_ttl(dns_name, record_type, Ttl::default(), targets)
    }

    pub fn with_ttl(dns_name: &str, record_type: &str, ttl: Ttl, targets: &[&str]) -> Self {
        Endpoint {
            dns_name: dns_name.trim_end_matches('.').to_owned(),
            targets: targets.iter().map(|t| t.to_string()).collect(),
            record_type: record_type.to_owned(),
            record_ttl: ttl,
        }
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} [{}]",
            self.dns_name,
            self.record_ttl.0,
            self.record_type,
            self.targets.iter().join(";")
        )
    }
}

/// Restricts the zones a provider operates on.
///
/// An empty filter matches every domain. A filter matches a domain that is either equal to it
/// or one of its subdomains; filters with a leading dot (`.example.com`) only match subdomains.
/// Exclusions take precedence over filters.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DomainFilter {
    filters: Vec<String>,
    exclusions: Vec<String>,
}

impl DomainFilter {
    pub fn new(filters: &[String]) -> Self {
        Self::with_exclusions(filters, &[])
    }

    pub fn with_exclusions(filters: &[String], exclusions: &[String]) -> Self {
        DomainFilter {
            filters: prepare_filters(filters),
            exclusions: prepare_filters(exclusions),
        }
    }

    pub fn matches(&self, domain: &str) -> bool {
        match_filters(&self.filters, domain, true) && !match_filters(&self.exclusions, domain, false)
    }

    pub fn is_configured(&self) -> bool {
        !self.filters.is_empty()
    }
}

fn prepare_filters(filters: &[String]) -> Vec<String> {
    filters
        .iter()
        .map(|f| f.trim().trim_end_matches('.').to_lowercase())
        .filter(|f| !f.is_empty())
        .unique()
        .collect()
}

fn match_filters(filters: &[String], domain: &str, if_empty: bool) -> bool {
    if filters.is_empty() {
        return if_empty;
    }
    let domain = domain.trim_end_matches('.').to_lowercase();

    filters.iter().any(|filter| {
        if filter.starts_with('.') {
            domain.ends_with(filter.as_str())
        } else {
            domain == *filter || domain.ends_with(&format!(".{}", filter))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(f: &[&str]) -> Vec<String> {
        f.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_filter_should_match_everything() {
        let df = DomainFilter::default();
        assert!(df.matches("example.com"));
        assert!(df.matches("foo.bar.org"));
        assert!(!df.is_configured());
    }

    #[test]
    fn filter_should_match_domain_and_subdomains() {
        let df = DomainFilter::new(&filter(&["example.com."]));
        assert!(df.matches("example.com"));
        assert!(df.matches("Sub.Example.com."));
        assert!(!df.matches("badexample.com"));
        assert!(!df.matches("example.org"));
    }

    #[test]
    fn leading_dot_filter_should_only_match_subdomains() {
        let df = DomainFilter::new(&filter(&[".example.com"]));
        assert!(df.matches("foo.example.com"));
        assert!(!df.matches("example.com"));
    }

    #[test]
    fn exclusions_should_override_filters() {
        let df = DomainFilter::with_exclusions(
            &filter(&["example.com"]),
            &filter(&["internal.example.com"]),
        );
        assert!(df.matches("example.com"));
        assert!(!df.matches("internal.example.com"));
        assert!(!df.matches("db.internal.example.com"));
    }

    #[test]
    fn blank_filters_should_be_ignored() {
        let df = DomainFilter::new(&filter(&["", "  "]));
        assert!(!df.is_configured());
        assert!(df.matches("example.com"));
    }

    #[test]
    fn ttl_should_only_be_configured_when_positive() {
        assert!(!Ttl::default().is_configured());
        assert!(!Ttl(-1).is_configured());
        assert!(Ttl(60).is_configured());
    }

    #[test]
    fn should_only_support_known_record_types() {
        for t in ["A", "AAAA", "CNAME", "SRV", "TXT", "NS", "MX"] {
            assert!(supported_record_type(t), "{} should be supported", t);
        }
        assert!(!supported_record_type("CAA"));
        assert!(!supported_record_type("ALIAS"));
        assert!(!supported_record_type("a"));
    }

    #[test]
    fn endpoint_should_use_planner_field_names() {
        let ep: Endpoint = serde_json::from_value(serde_json::json!({
            "dnsName": "www.example.com",
            "targets": ["1.1.1.1", "2.2.2.2"],
            "recordType": "A",
            "recordTTL": 120,
            "labels": {"owner": "default"}
        }))
        .unwrap();
        assert_eq!(
            ep,
            Endpoint::with_ttl("www.example.com", "A", Ttl(120), &["1.1.1.1", "2.2.2.2"])
        );

        let unconfigured = serde_json::to_value(Endpoint::new("example.com", "TXT", &["x"])).unwrap();
        assert!(unconfigured.get("recordTTL").is_none());
    }
}
