use log::debug;
use serde::{Deserialize, Serialize};

use crate::endpoint::Endpoint;

/// The set of endpoint changes computed by the planner for one reconciliation cycle.
///
/// Updates are split into the state before (`update_old`) and after (`update_new`) the change.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Changes {
    #[serde(rename = "Create", default)]
    pub create: Vec<Endpoint>,
    #[serde(rename = "UpdateOld", default)]
    pub update_old: Vec<Endpoint>,
    #[serde(rename = "UpdateNew", default)]
    pub update_new: Vec<Endpoint>,
    #[serde(rename = "Delete", default)]
    pub delete: Vec<Endpoint>,
}

impl Changes {
    /// Returns whether applying these changes can be skipped entirely.
    ///
    /// Only creations, deletions and new update states count. A plan that consists of
    /// nothing but `update_old` entries is considered empty.
    pub fn is_empty(&self) -> bool {
        let empty = self.create.len() + self.delete.len() + self.update_new.len() == 0;
        if empty && !self.update_old.is_empty() {
            debug!(
                "Ignoring {} UpdateOld endpoints without matching UpdateNew",
                self.update_old.len()
            );
        }
        empty
    }
}
