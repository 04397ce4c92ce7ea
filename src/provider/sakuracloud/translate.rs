// Conversion between planner endpoints and Sakura Cloud records

use crate::endpoint::{Endpoint, Ttl};

use super::records::{Record, RecordType, Zone, APEX_MARKER};

/// TTL applied to new records when the endpoint does not configure one
pub const DEFAULT_RECORD_TTL: i64 = 300;

/// Convert an endpoint into one record per target, named relative to `zone`
pub fn endpoint_to_records(zone: &Zone, ep: &Endpoint) -> Vec<Record> {
    let ttl = if ep.record_ttl.is_configured() {
        ep.record_ttl.0
    } else {
        DEFAULT_RECORD_TTL
    };
    let name = stripped_record_name(zone, ep);
    let record_type = RecordType::from(ep.record_type.as_str());

    ep.targets
        .iter()
        .map(|target| Record::new(record_type.clone(), &name, unquote(target), ttl))
        .collect()
}

/// Convert a record read from `zone` back into an endpoint with a fully-qualified name
pub fn record_to_endpoint(zone: &Zone, rec: &Record) -> Endpoint {
    let dns_name = if rec.name == APEX_MARKER {
        zone.name.to_owned()
    } else {
        format!("{}.{}", rec.name, zone.name)
    };

    Endpoint {
        dns_name,
        targets: vec![rec.rdata.to_owned()],
        record_type: rec.record_type.to_string(),
        record_ttl: Ttl(rec.ttl),
    }
}

// The zone apex is named "@". Names outside the zone are returned as-is.
fn stripped_record_name(zone: &Zone, ep: &Endpoint) -> String {
    if ep.dns_name == zone.name {
        return APEX_MARKER.to_owned();
    }
    let suffix = format!(".{}", zone.name);
    ep.dns_name
        .strip_suffix(suffix.as_str())
        .unwrap_or(&ep.dns_name)
        .to_owned()
}

// Strips at most one quote on each side, TXT targets are often passed quoted
fn unquote(target: &str) -> &str {
    let target = target.strip_prefix('"').unwrap_or(target);
    target.strip_suffix('"').unwrap_or(target)
}
