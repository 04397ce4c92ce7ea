mod api;
mod reconcile;
mod records;
mod translate;

pub use self::api::{DnsApi, SakuraCloudClient};
pub use self::records::{Record, RecordType, Zone, ZoneRecords, APEX_MARKER};
pub use self::translate::DEFAULT_RECORD_TTL;

use log::{debug, info, trace};

use self::{
    reconcile::reconcile,
    translate::{endpoint_to_records, record_to_endpoint},
};
use super::{Provider, ProviderError};
use crate::{
    endpoint::{supported_record_type, DomainFilter, Endpoint},
    plan::Changes,
};

pub const SAKURACLOUD_API_ROOT_URL: &str = "https://secure.sakura.ad.jp/cloud/zone/is1a/api/cloud/1.1";
const SAKURACLOUD_DEFAULT_TIMEOUT_SECS: u64 = 30;

/// A [`Provider`] for Sakura Cloud DNS.
///
/// Sakura Cloud stores the records of a zone as one set, so changes are collected in memory
/// for every zone and then written back with a single update call per zone.
///
/// To create a provider, use the [`SakuraCloudProvider::from_config()`] function.
#[non_exhaustive]
pub struct SakuraCloudProvider {
    api: Box<dyn DnsApi>,
    domain_filter: DomainFilter,
    dry_run: bool,
}

/// Configuration object for a [`SakuraCloudProvider`]. Must be supplied when creating a provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SakuraCloudProviderConfig {
    /// API access token
    pub access_token: String,
    /// Secret belonging to the access token
    pub access_token_secret: String,
    /// Base URL of the IaaS API
    pub api_root_url: String,
    /// Timeout for each API request in seconds
    pub timeout_secs: u64,
}

impl Default for SakuraCloudProviderConfig {
    fn default() -> Self {
        SakuraCloudProviderConfig {
            access_token: String::new(),
            access_token_secret: String::new(),
            api_root_url: SAKURACLOUD_API_ROOT_URL.to_owned(),
            timeout_secs: SAKURACLOUD_DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl SakuraCloudProvider {
    /// Create a provider talking to the Sakura Cloud API.
    /// Fails with [`ProviderError::MissingCredential`] if the token or its secret is empty.
    pub fn from_config(
        config: &SakuraCloudProviderConfig,
        domain_filter: DomainFilter,
        dry_run: bool,
    ) -> Result<SakuraCloudProvider, ProviderError> {
        if config.access_token.is_empty() {
            return Err(ProviderError::MissingCredential(
                "no access token found".to_string(),
            ));
        }
        if config.access_token_secret.is_empty() {
            return Err(ProviderError::MissingCredential(
                "no access token secret found".to_string(),
            ));
        }
        let api = SakuraCloudClient::try_new(config)?;
        Ok(SakuraCloudProvider::with_api(
            Box::new(api),
            domain_filter,
            dry_run,
        ))
    }

    /// Create a provider on top of an existing API implementation
    pub fn with_api(api: Box<dyn DnsApi>, domain_filter: DomainFilter, dry_run: bool) -> Self {
        SakuraCloudProvider {
            api,
            domain_filter,
            dry_run,
        }
    }

    /// All zones of the account that pass the domain filter
    pub fn zones(&self) -> Result<Vec<Zone>, ProviderError> {
        let zones = self
            .api
            .find_zones()?
            .into_iter()
            .filter(|z| self.domain_filter.matches(&z.name))
            .collect::<Vec<_>>();
        trace!("Collected zones {:?}", zones);
        Ok(zones)
    }

    /// Convert an endpoint into the records it would create in `zone`
    pub fn endpoint_to_records(&self, zone: &Zone, ep: &Endpoint) -> Vec<Record> {
        endpoint_to_records(zone, ep)
    }
}

impl Provider for SakuraCloudProvider {
    fn domain_filter(&self) -> &DomainFilter {
        &self.domain_filter
    }

    fn records(&self) -> Result<Vec<Endpoint>, ProviderError> {
        debug!("Reading zones from Sakura Cloud API");
        let endpoints = self
            .zones()?
            .iter()
            .flat_map(|z| {
                z.records
                    .iter()
                    .filter(|r| supported_record_type(r.record_type.as_str()))
                    .map(move |r| record_to_endpoint(z, r))
            })
            .collect::<Vec<_>>();
        trace!("Collected endpoints: {:?}", endpoints);
        Ok(endpoints)
    }

    fn apply_changes(&self, changes: Option<&Changes>) -> Result<(), ProviderError> {
        let changes = match changes {
            Some(c) if !c.is_empty() => c,
            _ => {
                debug!("No changes to apply");
                return Ok(());
            }
        };

        let zones = self.zones()?;
        let states = reconcile(zones, changes);
        debug!("All changes applied in memory");

        if self.dry_run {
            info!("Dry-run enabled, not committing changes to Sakura Cloud");
            return Ok(());
        }

        for state in states.iter().filter(|s| s.touched) {
            self.api.update_zone(&state.id, &state.records)?;
            info!(
                "Committed {} records to zone {} ({})",
                state.records.len(),
                state.name,
                state.id
            );
        }
        Ok(())
    }
}
