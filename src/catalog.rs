// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Low-level code to work with the service catalog.

use log::debug;

use crate::protocol::CatalogRecord;
use crate::Error;

/// Service names that identify a compute endpoint, compared case-insensitively.
const COMPUTE_ALIASES: &[&str] = &["NOVA", "CLOUDSERVERSOPENSTACK"];

#[inline]
fn is_compute(name: &str) -> bool {
    let upper = name.to_uppercase();
    COMPUTE_ALIASES.iter().any(|alias| *alias == upper)
}

/// Find the public compute endpoint for a region in the service catalog.
///
/// Every compute-aliased record is scanned in catalog order; within a record
/// the first endpoint in the matching region wins, and a later record
/// overwrites an earlier one. The region comparison ignores case.
pub fn find_compute_endpoint<'c>(
    catalog: &'c [CatalogRecord],
    region: &str,
) -> Result<&'c str, Error> {
    let mut found = None;
    for service in catalog {
        if !is_compute(&service.name) {
            continue;
        }
        let endpoint = service.endpoints.iter().find(|e| {
            e.region
                .as_deref()
                .map(|r| r.eq_ignore_ascii_case(region))
                .unwrap_or(false)
        });
        if let Some(endpoint) = endpoint {
            debug!(
                "Found compute endpoint {} in service {}",
                endpoint.public_url, service.name
            );
            found = Some(endpoint.public_url.as_str());
        }
    }

    found.ok_or_else(|| {
        let available: Vec<String> = catalog.iter().map(|s| s.name.clone()).collect();
        Error::new_endpoint_not_found(region, &available)
    })
}

#[cfg(test)]
pub mod test {
    use super::find_compute_endpoint;
    use crate::protocol::{CatalogRecord, Endpoint};
    use crate::ErrorKind;

    fn record(name: &str, endpoints: &[(&str, &str)]) -> CatalogRecord {
        CatalogRecord {
            name: name.to_string(),
            endpoints: endpoints
                .iter()
                .map(|(region, url)| Endpoint {
                    region: Some(region.to_string()),
                    public_url: url.to_string(),
                })
                .collect(),
        }
    }

    pub fn demo_catalog() -> Vec<CatalogRecord> {
        vec![
            record(
                "cloudServersOpenStack",
                &[
                    ("DFW", "https://dfw.servers.api.rackspacecloud.com/v2/123456"),
                    ("ORD", "https://ord.servers.api.rackspacecloud.com/v2/123456"),
                ],
            ),
            record(
                "cloudFiles",
                &[("DFW", "https://storage101.dfw1.clouddrive.com/v1/123456")],
            ),
        ]
    }

    #[test]
    fn test_find_endpoint_by_region() {
        let cat = demo_catalog();
        let url = find_compute_endpoint(&cat, "ORD").unwrap();
        assert_eq!(url, "https://ord.servers.api.rackspacecloud.com/v2/123456");
    }

    #[test]
    fn test_find_endpoint_region_case_insensitive() {
        let cat = demo_catalog();
        let url = find_compute_endpoint(&cat, "dfw").unwrap();
        assert_eq!(url, "https://dfw.servers.api.rackspacecloud.com/v2/123456");
    }

    #[test]
    fn test_find_endpoint_ignores_other_regions() {
        let cat = vec![
            record("nova", &[("RegionOne", "http://one.local/v2/t")]),
            record("cloudServersOpenStack", &[("RegionTwo", "http://two.local/v2/t")]),
        ];
        let url = find_compute_endpoint(&cat, "RegionTwo").unwrap();
        assert_eq!(url, "http://two.local/v2/t");
    }

    // Pins the historical behavior: with two compute-aliased records in the
    // same region, whichever is listed last in the catalog wins.
    #[test]
    fn test_find_endpoint_last_match_wins() {
        let cat = vec![
            record("nova", &[("DFW", "http://first.local/v2/t")]),
            record("cloudServersOpenStack", &[("DFW", "http://second.local/v2/t")]),
        ];
        let url = find_compute_endpoint(&cat, "DFW").unwrap();
        assert_eq!(url, "http://second.local/v2/t");
    }

    #[test]
    fn test_find_endpoint_not_found_lists_services() {
        let cat = vec![
            record("cloudFiles", &[("DFW", "http://files.local/v1/t")]),
            record("cloudDatabases", &[("DFW", "http://db.local/v1/t")]),
        ];
        let err = find_compute_endpoint(&cat, "DFW").err().unwrap();
        assert_eq!(err.kind(), ErrorKind::EndpointNotFound);
        let text = err.to_string();
        assert!(text.contains("cloudFiles"));
        assert!(text.contains("cloudDatabases"));
    }

    #[test]
    fn test_find_endpoint_missing_region_field() {
        let cat = vec![CatalogRecord {
            name: "nova".to_string(),
            endpoints: vec![Endpoint {
                region: None,
                public_url: "http://one.local/v2/t".to_string(),
            }],
        }];
        let err = find_compute_endpoint(&cat, "DFW").err().unwrap();
        assert_eq!(err.kind(), ErrorKind::EndpointNotFound);
    }
}
