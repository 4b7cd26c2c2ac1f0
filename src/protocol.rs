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

//! JSON structures and protocol bits for the Identity V2 API.

#![allow(missing_docs)]

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// API key credentials as accepted by Rackspace-style identity endpoints.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ApiKeyCredentials {
    pub username: String,
    #[serde(rename = "apiKey")]
    pub api_key: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ApiKeyAuth {
    #[serde(rename = "RAX-KSKEY:apiKeyCredentials")]
    pub api_key_credentials: ApiKeyCredentials,
}

/// User name and password credentials.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PasswordCredentials {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PasswordAuth {
    #[serde(rename = "tenantName")]
    pub tenant_name: String,
    #[serde(rename = "passwordCredentials")]
    pub password_credentials: PasswordCredentials,
}

/// The credential payload of an authentication request.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Credentials {
    ApiKey(ApiKeyAuth),
    Password(PasswordAuth),
}

/// Root of an authentication request body.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AuthRequest {
    pub auth: Credentials,
}

impl AuthRequest {
    /// Create an API key authentication request.
    pub fn with_api_key<S1, S2>(username: S1, api_key: S2) -> AuthRequest
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        AuthRequest {
            auth: Credentials::ApiKey(ApiKeyAuth {
                api_key_credentials: ApiKeyCredentials {
                    username: username.into(),
                    api_key: api_key.into(),
                },
            }),
        }
    }

    /// Create a tenant-scoped password authentication request.
    pub fn with_password<S1, S2, S3>(tenant_name: S1, username: S2, password: S3) -> AuthRequest
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        AuthRequest {
            auth: Credentials::Password(PasswordAuth {
                tenant_name: tenant_name.into(),
                password_credentials: PasswordCredentials {
                    username: username.into(),
                    password: password.into(),
                },
            }),
        }
    }
}

/// One region-scoped endpoint of a catalog record.
#[derive(Clone, Debug, Deserialize)]
pub struct Endpoint {
    #[serde(default)]
    pub region: Option<String>,
    #[serde(rename = "publicURL")]
    pub public_url: String,
}

/// A named service with its endpoints.
#[derive(Clone, Debug, Deserialize)]
pub struct CatalogRecord {
    pub name: String,
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
}

/// The tenant a token is scoped to.
#[derive(Clone, Debug, Deserialize)]
pub struct Tenant {
    pub id: String,
}

/// A bearer token with its tenant.
#[derive(Clone, Debug, Deserialize)]
pub struct Token {
    pub id: String,
    pub tenant: Tenant,
}

/// The `access` document returned on successful authentication.
///
/// The user object is kept as a raw map: only its field *names* are ever
/// inspected, to detect provider-specific extensions.
#[derive(Clone, Debug, Deserialize)]
pub struct Access {
    #[serde(rename = "serviceCatalog", default)]
    pub service_catalog: Vec<CatalogRecord>,
    pub token: Token,
    #[serde(default)]
    pub user: Map<String, Value>,
}

/// Root of an authentication response body.
#[derive(Clone, Debug, Deserialize)]
pub struct AccessRoot {
    pub access: Access,
}
