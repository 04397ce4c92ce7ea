use std::time::Duration;

use log::{debug, trace};
#[cfg(test)]
use mockall::automock;
use reqwest::blocking::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{
    records::{Record, Zone, ZoneRecords},
    SakuraCloudProviderConfig,
};
use crate::provider::ProviderError;

const COMMON_SERVICE_ITEM_PATH: &str = "commonserviceitem";
const DNS_PROVIDER_CLASS: &str = "dns";

/// The two Sakura Cloud DNS operations needed to reconcile zones.
///
/// Both calls block until the API has answered. Failures are returned as
/// [`ProviderError::ProviderUnavailable`] and never retried.
#[cfg_attr(test, automock)]
pub trait DnsApi {
    /// List every DNS zone of the account, without any filter conditions
    fn find_zones(&self) -> Result<Vec<Zone>, ProviderError>;
    /// Replace the full record set of a zone
    fn update_zone(&self, zone_id: &str, records: &ZoneRecords) -> Result<(), ProviderError>;
}

/// Blocking HTTP client for the Sakura Cloud IaaS API
pub struct SakuraCloudClient {
    client: Client,
    api_root_url: String,
    access_token: String,
    access_token_secret: String,
}

impl SakuraCloudClient {
    pub fn try_new(config: &SakuraCloudProviderConfig) -> Result<SakuraCloudClient, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(SakuraCloudClient {
            client,
            api_root_url: config.api_root_url.trim_end_matches('/').to_owned(),
            access_token: config.access_token.to_owned(),
            access_token_secret: config.access_token_secret.to_owned(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_root_url, path)
    }
}

// Turn non-2xx responses into errors, using the API's own message where possible
fn check_status(response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    let msg = match serde_json::from_str::<ApiErrorBody>(&body) {
        Ok(e) => format!("[{}] {}: {}", status, e.error_code, e.error_msg),
        Err(_) => format!("[{}] {}", status, body),
    };
    Err(ProviderError::ProviderUnavailable(msg))
}

impl DnsApi for SakuraCloudClient {
    fn find_zones(&self) -> Result<Vec<Zone>, ProviderError> {
        let condition = json!({ "Filter": { "Provider.Class": DNS_PROVIDER_CLASS } }).to_string();
        let url = format!(
            "{}?{}",
            self.url(COMMON_SERVICE_ITEM_PATH),
            urlencoding::encode(&condition)
        );
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.access_token, Some(&self.access_token_secret))
            .send()?;
        let body = check_status(response)?.text()?;
        trace!("Response body: {}", body);

        let found: FindResponse = serde_json::from_str(&body)?;
        Ok(found
            .common_service_items
            .into_iter()
            .map(Zone::from)
            .collect())
    }

    fn update_zone(&self, zone_id: &str, records: &ZoneRecords) -> Result<(), ProviderError> {
        let url = self.url(&format!("{}/{}", COMMON_SERVICE_ITEM_PATH, zone_id));
        debug!("PUT {} with {} records", url, records.len());

        let request = UpdateRequest {
            common_service_item: UpdateItem {
                settings: DnsSettings {
                    dns: DnsRecordSets {
                        resource_record_sets: records.as_slice().to_vec(),
                    },
                },
            },
        };
        let response = self
            .client
            .put(&url)
            .basic_auth(&self.access_token, Some(&self.access_token_secret))
            .json(&request)
            .send()?;
        check_status(response)?;
        Ok(())
    }
}

// IDs are usually sent as strings, but some endpoints return plain numbers
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ResourceId {
    Text(String),
    Number(u64),
}

impl From<ResourceId> for String {
    fn from(id: ResourceId) -> Self {
        match id {
            ResourceId::Text(s) => s,
            ResourceId::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct FindResponse {
    #[serde(rename = "CommonServiceItems", default)]
    common_service_items: Vec<CommonServiceItem>,
}

#[derive(Debug, Deserialize)]
struct CommonServiceItem {
    #[serde(rename = "ID")]
    id: ResourceId,
    #[serde(rename = "Name", default)]
    name: String,
    #[serde(rename = "Status", default)]
    status: Option<DnsStatus>,
    #[serde(rename = "Settings", default)]
    settings: Option<DnsSettings>,
}

#[derive(Debug, Deserialize)]
struct DnsStatus {
    #[serde(rename = "Zone", default)]
    zone: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct DnsSettings {
    #[serde(rename = "DNS")]
    dns: DnsRecordSets,
}

#[derive(Debug, Serialize, Deserialize)]
struct DnsRecordSets {
    #[serde(
        rename = "ResourceRecordSets",
        default,
        deserialize_with = "null_as_empty"
    )]
    resource_record_sets: Vec<Record>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Record>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<Record>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Serialize)]
struct UpdateRequest {
    #[serde(rename = "CommonServiceItem")]
    common_service_item: UpdateItem,
}

#[derive(Debug, Serialize)]
struct UpdateItem {
    #[serde(rename = "Settings")]
    settings: DnsSettings,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    error_code: String,
    #[serde(default)]
    error_msg: String,
}

impl From<CommonServiceItem> for Zone {
    fn from(item: CommonServiceItem) -> Self {
        // The zone name lives in the status, the item name is only a label that normally matches it
        let name = match item.status {
            Some(s) if !s.zone.is_empty() => s.zone,
            _ => item.name,
        };
        Zone {
            id: item.id.into(),
            name: name.trim_end_matches('.').to_owned(),
            records: item
                .settings
                .map(|s| ZoneRecords::new(s.dns.resource_record_sets))
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;

    use super::*;
    use crate::provider::sakuracloud::records::RecordType;

    fn client(server: &mockito::Server) -> SakuraCloudClient {
        SakuraCloudClient::try_new(&SakuraCloudProviderConfig {
            access_token: "token".to_string(),
            access_token_secret: "secret".to_string(),
            api_root_url: format!("{}/", server.url()),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn should_find_zones() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", Matcher::Regex("^/commonserviceitem".to_string()))
            .match_header("authorization", "Basic dG9rZW46c2VjcmV0")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "From": 0, "Count": 2, "Total": 2,
                    "CommonServiceItems": [
                        {
                            "ID": "112900000001",
                            "Name": "example.com",
                            "Status": {"Zone": "example.com", "NS": ["ns1.gslb1.sakura.ne.jp"]},
                            "Settings": {"DNS": {"ResourceRecordSets": [
                                {"Name": "www", "Type": "A", "RData": "1.1.1.1", "TTL": 300}
                            ]}},
                            "Provider": {"Class": "dns"}
                        },
                        {
                            "ID": 112900000002u64,
                            "Name": "empty.example.org",
                            "Settings": {"DNS": {"ResourceRecordSets": null}}
                        }
                    ],
                    "is_ok": true
                })
                .to_string(),
            )
            .create();

        let zones = client(&server).find_zones().unwrap();
        mock.assert();

        assert_eq!(
            zones,
            vec![
                Zone {
                    id: "112900000001".to_string(),
                    name: "example.com".to_string(),
                    records: ZoneRecords::new(vec![Record::new(
                        RecordType::A,
                        "www",
                        "1.1.1.1",
                        300
                    )]),
                },
                Zone {
                    id: "112900000002".to_string(),
                    name: "empty.example.org".to_string(),
                    records: ZoneRecords::default(),
                },
            ]
        );
    }

    #[test]
    fn find_zones_should_report_api_errors() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", Matcher::Regex("^/commonserviceitem".to_string()))
            .with_status(401)
            .with_body(
                json!({
                    "is_fatal": true,
                    "status": "401 Unauthorized",
                    "error_code": "unauthorized",
                    "error_msg": "invalid credentials"
                })
                .to_string(),
            )
            .create();

        let err = client(&server).find_zones().unwrap_err();
        assert!(matches!(err, ProviderError::ProviderUnavailable(ref msg) if msg.contains("invalid credentials")));
    }

    #[test]
    fn find_zones_should_report_malformed_responses() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", Matcher::Regex("^/commonserviceitem".to_string()))
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create();

        assert!(matches!(
            client(&server).find_zones(),
            Err(ProviderError::ProviderUnavailable(_))
        ));
    }

    #[test]
    fn should_update_zone_with_full_record_set() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("PUT", "/commonserviceitem/112900000001")
            .match_body(Matcher::Json(json!({
                "CommonServiceItem": {"Settings": {"DNS": {"ResourceRecordSets": [
                    {"Name": "www", "Type": "A", "RData": "1.1.1.1", "TTL": 300},
                    {"Name": "@", "Type": "TXT", "RData": "hello", "TTL": 60}
                ]}}}
            })))
            .with_status(200)
            .with_body(json!({"Success": true, "is_ok": true}).to_string())
            .create();

        let records = ZoneRecords::new(vec![
            Record::new(RecordType::A, "www", "1.1.1.1", 300),
            Record::new(RecordType::Txt, "@", "hello", 60),
        ]);
        client(&server)
            .update_zone("112900000001", &records)
            .unwrap();
        mock.assert();
    }

    #[test]
    fn update_zone_should_report_api_errors() {
        let mut server = mockito::Server::new();
        server
            .mock("PUT", "/commonserviceitem/404")
            .with_status(404)
            .with_body("not found")
            .create();

        let err = client(&server)
            .update_zone("404", &ZoneRecords::default())
            .unwrap_err();
        assert_eq!(
            err,
            ProviderError::ProviderUnavailable("[404 Not Found] not found".to_string())
        );
    }
}
