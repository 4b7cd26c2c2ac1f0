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

//! Session configuration.

use std::env;

use crate::{Error, ErrorKind};

const DEFAULT_API_VERSION: &str = "v2.0";

/// Identity inputs for establishing a session.
///
/// The configuration is a plain value: it is never mutated by the library
/// after construction. All derived state (token, tenant ID, compute endpoint,
/// last response) lives on the [Session](struct.Session.html) instead.
///
/// ```rust,no_run
/// let config = osnova::SessionConfig::new("demo")
///     .with_api_key("deadbeef")
///     .with_rax_region("DFW");
/// let mut session = osnova::Session::new(config).expect("Cannot create an HTTP client");
/// ```
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// User name to authenticate as.
    pub username: String,
    /// API key (Rackspace-style secret).
    pub api_key: Option<String>,
    /// Password (generic OpenStack secret).
    pub password: Option<String>,
    /// Tenant name; defaults to the user name when absent.
    pub tenant_name: Option<String>,
    /// Region to select compute endpoints from.
    pub region: Option<String>,
    /// Shorthand code of a known Rackspace region.
    pub rax_region: Option<String>,
    /// Explicit identity endpoint URL.
    pub auth_url: Option<String>,
    /// Identity API version used in the token request path.
    pub api_version: String,
}

impl SessionConfig {
    /// Create a configuration for the given user.
    pub fn new<S: Into<String>>(username: S) -> SessionConfig {
        SessionConfig {
            username: username.into(),
            api_key: None,
            password: None,
            tenant_name: None,
            region: None,
            rax_region: None,
            auth_url: None,
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }

    /// Set the API key.
    pub fn set_api_key<S: Into<String>>(&mut self, api_key: S) {
        self.api_key = Some(api_key.into());
    }

    /// Set the password.
    pub fn set_password<S: Into<String>>(&mut self, password: S) {
        self.password = Some(password.into());
    }

    /// Set the tenant name.
    pub fn set_tenant_name<S: Into<String>>(&mut self, tenant_name: S) {
        self.tenant_name = Some(tenant_name.into());
    }

    /// Set the region.
    pub fn set_region<S: Into<String>>(&mut self, region: S) {
        self.region = Some(region.into());
    }

    /// Set a known region shorthand code.
    ///
    /// The code is upper-cased so that `dfw` and `DFW` are interchangeable.
    pub fn set_rax_region<S: AsRef<str>>(&mut self, code: S) {
        self.rax_region = Some(code.as_ref().to_uppercase());
    }

    /// Set an explicit identity endpoint URL.
    pub fn set_auth_url<S: Into<String>>(&mut self, auth_url: S) {
        self.auth_url = Some(auth_url.into());
    }

    /// Set the identity API version.
    pub fn set_api_version<S: Into<String>>(&mut self, api_version: S) {
        self.api_version = api_version.into();
    }

    /// Convert into a configuration with the given API key.
    #[inline]
    pub fn with_api_key<S: Into<String>>(mut self, api_key: S) -> SessionConfig {
        self.set_api_key(api_key);
        self
    }

    /// Convert into a configuration with the given password.
    #[inline]
    pub fn with_password<S: Into<String>>(mut self, password: S) -> SessionConfig {
        self.set_password(password);
        self
    }

    /// Convert into a configuration with the given tenant name.
    #[inline]
    pub fn with_tenant_name<S: Into<String>>(mut self, tenant_name: S) -> SessionConfig {
        self.set_tenant_name(tenant_name);
        self
    }

    /// Convert into a configuration with the given region.
    #[inline]
    pub fn with_region<S: Into<String>>(mut self, region: S) -> SessionConfig {
        self.set_region(region);
        self
    }

    /// Convert into a configuration with the given region shorthand.
    #[inline]
    pub fn with_rax_region<S: AsRef<str>>(mut self, code: S) -> SessionConfig {
        self.set_rax_region(code);
        self
    }

    /// Convert into a configuration with the given auth URL.
    #[inline]
    pub fn with_auth_url<S: Into<String>>(mut self, auth_url: S) -> SessionConfig {
        self.set_auth_url(auth_url);
        self
    }

    /// Convert into a configuration with the given API version.
    #[inline]
    pub fn with_api_version<S: Into<String>>(mut self, api_version: S) -> SessionConfig {
        self.set_api_version(api_version);
        self
    }
}

// This is only used for unit testing.
trait Environment {
    fn get(&self, name: &'static str) -> Result<String, Error>;
}

#[derive(Debug, Clone, Copy)]
struct RealEnvironment;

impl Environment for RealEnvironment {
    fn get(&self, name: &'static str) -> Result<String, Error> {
        env::var(name).map_err(|_| {
            Error::new(
                ErrorKind::InvalidInput,
                format!("Required environment variable {} is not provided", name),
            )
        })
    }
}

#[inline]
fn _from_env<E: Environment>(env: E) -> Result<SessionConfig, Error> {
    let mut config = SessionConfig::new(env.get("OS_USERNAME")?);

    if let Ok(api_key) = env.get("OS_API_KEY") {
        config.set_api_key(api_key);
    }
    if let Ok(password) = env.get("OS_PASSWORD") {
        config.set_password(password);
    }
    if let Ok(tenant) = env.get("OS_TENANT_NAME") {
        config.set_tenant_name(tenant);
    }
    if let Ok(region) = env.get("OS_REGION_NAME") {
        config.set_region(region);
    }
    if let Ok(code) = env.get("OS_RAX_AUTH") {
        config.set_rax_region(code);
    }
    if let Ok(auth_url) = env.get("OS_AUTH_URL") {
        config.set_auth_url(auth_url);
    }
    if let Ok(version) = env.get("OS_IDENTITY_API_VERSION") {
        config.set_api_version(version);
    }

    Ok(config)
}

/// Create a `SessionConfig` from `OS_` environment variables.
///
/// Only `OS_USERNAME` is required; the credential resolver validates the rest
/// when authentication is attempted.
pub fn from_env() -> Result<SessionConfig, Error> {
    _from_env(RealEnvironment)
}
