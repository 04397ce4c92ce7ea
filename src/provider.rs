//! DNS providers host the zones whose records we reconcile.
//!
//! Each provider implements the [`Provider`] trait. Currently available:
//! - [`SakuraCloudProvider`]: Sakura Cloud DNS, committing full zone record sets through the cloud API

mod sakuracloud;

pub use self::sakuracloud::{
    DnsApi, Record, RecordType, SakuraCloudClient, SakuraCloudProvider, SakuraCloudProviderConfig, Zone,
    ZoneRecords, APEX_MARKER, DEFAULT_RECORD_TTL, SAKURACLOUD_API_ROOT_URL,
};

use thiserror::Error;

use crate::{
    endpoint::{DomainFilter, Endpoint},
    plan::Changes,
};

/// A provider is any DNS service that hosts zones, such as Sakura Cloud.
/// It can list the records it currently serves and apply a set of planned changes to them.
pub trait Provider {
    /// Returns the filter restricting which zones this provider operates on
    fn domain_filter(&self) -> &DomainFilter;

    /// Get all records of supported types currently registered with the provider
    fn records(&self) -> Result<Vec<Endpoint>, ProviderError>;

    /// Apply a full set of [`Changes`] to the zones of this provider.
    /// Passing `None` or an empty set of changes returns immediately.
    fn apply_changes(&self, changes: Option<&Changes>) -> Result<(), ProviderError>;
}

/// Error returned by a provider action
#[derive(Error, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProviderError {
    /// A required credential was not supplied when creating the provider
    #[error("missing credential: {0}")]
    MissingCredential(String),
    /// A call to the provider API failed
    #[error("provider unavailable: {0}")]
    ProviderUnavailable(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        ProviderError::ProviderUnavailable(e.to_string())
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(e: serde_json::Error) -> Self {
        ProviderError::ProviderUnavailable(format!("could not decode response: {}", e))
    }
}
