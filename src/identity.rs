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

//! Resolving identity endpoints and credential payloads.

use std::collections::HashMap;

use lazy_static::lazy_static;
use log::debug;

use crate::protocol::AuthRequest;
use crate::{url, Error, ErrorKind, SessionConfig};

/// Domain suffix identifying a hosted Rackspace identity endpoint.
const PROVIDER_DOMAIN_SUFFIX: &str = "rackspacecloud.com";

lazy_static! {
    /// Canonical identity hosts for known region shorthand codes.
    static ref KNOWN_REGIONS: HashMap<&'static str, &'static str> = {
        let mut map = HashMap::new();
        let _ = map.insert("DFW", "identity.api.rackspacecloud.com");
        let _ = map.insert("ORD", "identity.api.rackspacecloud.com");
        let _ = map.insert("LON", "lon.identity.api.rackspacecloud.com");
        map
    };
}

/// The resolved identity endpoint and credential payload.
///
/// Produced by [resolve](fn.resolve.html) without any network I/O.
#[derive(Clone, Debug)]
pub struct ResolvedIdentity {
    /// Bare host to connect to.
    pub host: String,
    /// Path suffix retained from the auth URL (may be empty).
    pub path: String,
    /// Whether to use HTTPS.
    pub secure: bool,
    /// Whether this is a known-provider (Rackspace-style) session.
    pub rackspace: bool,
    /// Effective region for catalog lookups.
    pub region: String,
    /// Credential payload to send to the identity endpoint.
    pub body: AuthRequest,
}

impl ResolvedIdentity {
    /// URL scheme matching the resolved transport.
    #[inline]
    pub fn scheme(&self) -> &'static str {
        if self.secure {
            "https"
        } else {
            "http"
        }
    }

    /// Full URL of the token issuing resource.
    #[inline]
    pub fn token_url(&self, api_version: &str) -> String {
        format!("{}://{}/{}/tokens", self.scheme(), self.host, api_version)
    }
}

/// Resolve the identity endpoint and credential payload for a configuration.
///
/// A known region shorthand takes priority over an explicit auth URL; when
/// neither is usable, the missing field is reported as `InvalidConfig`.
pub fn resolve(config: &SessionConfig) -> Result<ResolvedIdentity, Error> {
    let known = config.rax_region.as_deref().map(str::to_uppercase).and_then(|code| {
        KNOWN_REGIONS
            .get(code.as_str())
            .copied()
            .map(|host| (host, code))
    });

    let (host, path, secure, rackspace, region) = if let Some((host, region)) = known {
        (host.to_string(), String::new(), true, true, region)
    } else {
        let region = config
            .region
            .clone()
            .ok_or_else(|| Error::new(ErrorKind::InvalidConfig, "region required"))?;
        let auth_url = config
            .auth_url
            .as_deref()
            .ok_or_else(|| Error::new(ErrorKind::InvalidConfig, "auth URL required"))?;

        let secure = auth_url.starts_with("https");
        let (host, path) = url::split_host(url::strip_scheme(auth_url));
        let rackspace = host.ends_with(PROVIDER_DOMAIN_SUFFIX);
        (host.to_string(), path.to_string(), secure, rackspace, region)
    };

    // Providers that accept either secret treat the two names as
    // interchangeable, so mirror whichever one is present.
    let (api_key, password) = match (config.api_key.as_deref(), config.password.as_deref()) {
        (Some(key), Some(pw)) => (key, pw),
        (Some(key), None) => (key, key),
        (None, Some(pw)) => (pw, pw),
        (None, None) => {
            return Err(Error::new(
                ErrorKind::InvalidConfig,
                "API key or password required",
            ));
        }
    };

    let body = if rackspace {
        AuthRequest::with_api_key(&config.username, api_key)
    } else {
        let tenant = config
            .tenant_name
            .clone()
            .unwrap_or_else(|| config.username.clone());
        AuthRequest::with_password(tenant, &config.username, password)
    };

    debug!(
        "Resolved identity endpoint {} (secure: {}, known provider: {}) for region {}",
        host, secure, rackspace, region
    );

    Ok(ResolvedIdentity {
        host,
        path,
        secure,
        rackspace,
        region,
        body,
    })
}
