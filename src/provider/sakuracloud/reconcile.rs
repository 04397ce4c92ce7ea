use std::fmt::Display;

use log::debug;

use super::{
    records::{Record, Zone, ZoneRecords},
    translate::endpoint_to_records,
};
use crate::{endpoint::Endpoint, plan::Changes};

/// The change categories of a plan, in the order they are applied
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Create,
    UpdateNew,
    Delete,
    UpdateOld,
}

impl ChangeKind {
    pub const ORDER: [ChangeKind; 4] = [
        ChangeKind::Create,
        ChangeKind::UpdateNew,
        ChangeKind::Delete,
        ChangeKind::UpdateOld,
    ];

    fn endpoints(self, changes: &Changes) -> &[Endpoint] {
        match self {
            ChangeKind::Create => &changes.create,
            ChangeKind::UpdateNew => &changes.update_new,
            ChangeKind::Delete => &changes.delete,
            ChangeKind::UpdateOld => &changes.update_old,
        }
    }
}

impl Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ChangeKind::Create => "Create",
            ChangeKind::UpdateNew => "UpdateNew",
            ChangeKind::Delete => "Delete",
            ChangeKind::UpdateOld => "UpdateOld",
        };
        write!(f, "{}", s)
    }
}

/// Endpoints belong to every zone whose name appears anywhere in their DNS name.
// This is a substring test, not a suffix test: zone "ple.com" also matches "example.com".
pub fn zone_contains(zone: &Zone, ep: &Endpoint) -> bool {
    ep.dns_name.contains(zone.name.as_str())
}

/// Record set of one zone while a plan is applied to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneState {
    pub id: String,
    pub name: String,
    pub records: ZoneRecords,
    /// Whether any endpoint of the plan belonged to this zone
    pub touched: bool,
    // Records added by UpdateNew, these survive the UpdateOld pass
    ensured: ZoneRecords,
}

impl ZoneState {
    pub fn new(zone: Zone) -> Self {
        ZoneState {
            id: zone.id,
            name: zone.name,
            records: zone.records,
            touched: false,
            ensured: ZoneRecords::default(),
        }
    }

    fn as_zone(&self) -> Zone {
        Zone {
            id: self.id.to_owned(),
            name: self.name.to_owned(),
            records: ZoneRecords::default(),
        }
    }

    /// Apply all endpoints of one change category that belong to this zone
    pub fn apply(self, kind: ChangeKind, endpoints: &[Endpoint]) -> ZoneState {
        let zone = self.as_zone();
        endpoints
            .iter()
            .filter(|ep| zone_contains(&zone, ep))
            .flat_map(|ep| endpoint_to_records(&zone, ep))
            .fold(
                ZoneState {
                    touched: self.touched
                        || endpoints.iter().any(|ep| zone_contains(&zone, ep)),
                    ..self
                },
                |state, rec| state.apply_record(kind, &rec),
            )
    }

    fn apply_record(self, kind: ChangeKind, rec: &Record) -> ZoneState {
        match kind {
            ChangeKind::Create => {
                debug!("change.{} in zone {}: {}", kind, self.name, rec);
                ZoneState {
                    records: self.records.with(rec),
                    ..self
                }
            }
            ChangeKind::UpdateNew => {
                debug!("change.{} in zone {}: {}", kind, self.name, rec);
                ZoneState {
                    records: self.records.with(rec),
                    ensured: self.ensured.with(rec),
                    ..self
                }
            }
            ChangeKind::Delete => {
                debug!("change.{} in zone {}: {}", kind, self.name, rec);
                ZoneState {
                    records: self.records.without(rec),
                    ..self
                }
            }
            ChangeKind::UpdateOld => {
                if self.ensured.contains(rec) {
                    debug!(
                        "change.{} in zone {}: keeping {}, still present after update",
                        kind, self.name, rec
                    );
                    return self;
                }
                debug!("change.{} in zone {}: {}", kind, self.name, rec);
                ZoneState {
                    records: self.records.without(rec),
                    ..self
                }
            }
        }
    }
}

/// Apply a plan to the in-memory record sets of `zones`.
///
/// Each change category is applied to all zones before moving on to the next one,
/// in the order given by [`ChangeKind::ORDER`].
pub fn reconcile(zones: Vec<Zone>, changes: &Changes) -> Vec<ZoneState> {
    ChangeKind::ORDER.iter().fold(
        zones.into_iter().map(ZoneState::new).collect(),
        |states: Vec<ZoneState>, kind| {
            states
                .into_iter()
                .map(|state| state.apply(*kind, kind.endpoints(changes)))
                .collect()
        },
    )
}
