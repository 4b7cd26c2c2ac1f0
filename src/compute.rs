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

//! Convenience operations on the Compute API.
//!
//! These are thin wrappers over [Session::get](struct.Session.html#method.get),
//! [post](struct.Session.html#method.post) and
//! [delete](struct.Session.html#method.delete); the response of each call is
//! stored on the session and returned as the last-response record.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use log::debug;
use serde_json::{json, Map, Value};

use crate::session::{LastResponse, Session};
use crate::Error;

/// UUID of the default Rackspace public network.
pub const RAX_PUBLIC_NET_ID: &str = "00000000-0000-0000-0000-000000000000";

/// UUID of the default Rackspace service (private) network.
pub const RAX_SERVICE_NET_ID: &str = "11111111-1111-1111-1111-111111111111";

/// Boot payload builder for new servers.
///
/// Name, image and flavor are always required; everything else is optional:
///
/// ```rust
/// let payload = osnova::ServerBuilder::new("web1", "image-uuid", "general1-1")
///     .with_key_name("deploy")
///     .with_metadata("role", "web")
///     .to_payload(true);
/// ```
#[derive(Clone, Debug)]
pub struct ServerBuilder {
    name: String,
    image_ref: String,
    flavor_ref: String,
    networks: Vec<String>,
    rax_public: bool,
    rax_private: bool,
    key_name: Option<String>,
    metadata: Map<String, Value>,
    files: Vec<(String, Vec<u8>)>,
    manual_disk: bool,
}

impl ServerBuilder {
    /// Create a builder from the required boot values.
    pub fn new<S1, S2, S3>(name: S1, image_ref: S2, flavor_ref: S3) -> ServerBuilder
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        ServerBuilder {
            name: name.into(),
            image_ref: image_ref.into(),
            flavor_ref: flavor_ref.into(),
            networks: Vec::new(),
            rax_public: true,
            rax_private: true,
            key_name: None,
            metadata: Map::new(),
            files: Vec::new(),
            manual_disk: false,
        }
    }

    /// Attach the server to a network by UUID.
    pub fn with_network<S: Into<String>>(mut self, uuid: S) -> ServerBuilder {
        self.networks.push(uuid.into());
        self
    }

    /// Opt out of the default Rackspace public network.
    pub fn without_public_network(mut self) -> ServerBuilder {
        self.rax_public = false;
        self
    }

    /// Opt out of the default Rackspace service network.
    pub fn without_service_network(mut self) -> ServerBuilder {
        self.rax_private = false;
        self
    }

    /// Inject an SSH key by key pair name on boot.
    pub fn with_key_name<S: Into<String>>(mut self, key_name: S) -> ServerBuilder {
        self.key_name = Some(key_name.into());
        self
    }

    /// Set a metadata key on the new server.
    pub fn with_metadata<S1, S2>(mut self, key: S1, value: S2) -> ServerBuilder
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        let _ = self.metadata.insert(key.into(), Value::String(value.into()));
        self
    }

    /// Inject a file on boot (base64-encoded personality entry).
    pub fn with_file<S: Into<String>>(mut self, path: S, contents: &[u8]) -> ServerBuilder {
        self.files.push((path.into(), contents.to_vec()));
        self
    }

    /// Use manual disk configuration instead of the managed default.
    pub fn with_manual_disk(mut self) -> ServerBuilder {
        self.manual_disk = true;
        self
    }

    /// Build the boot request body.
    ///
    /// `rackspace` enables the provider's default public/service networks
    /// (unless opted out); it normally comes from the session's
    /// known-provider flag.
    pub fn to_payload(&self, rackspace: bool) -> Value {
        let mut server = Map::new();
        let _ = server.insert("name".to_string(), Value::String(self.name.clone()));
        let _ = server.insert("imageRef".to_string(), Value::String(self.image_ref.clone()));
        let _ = server.insert(
            "flavorRef".to_string(),
            Value::String(self.flavor_ref.clone()),
        );

        let mut networks: Vec<Value> = Vec::new();
        if rackspace {
            if self.rax_public {
                networks.push(json!({ "uuid": RAX_PUBLIC_NET_ID }));
            }
            if self.rax_private {
                networks.push(json!({ "uuid": RAX_SERVICE_NET_ID }));
            }
        }
        for uuid in &self.networks {
            networks.push(json!({ "uuid": uuid }));
        }
        if !networks.is_empty() {
            let _ = server.insert("networks".to_string(), Value::Array(networks));
        }

        if let Some(ref key_name) = self.key_name {
            let _ = server.insert("key_name".to_string(), Value::String(key_name.clone()));
        }

        if !self.metadata.is_empty() {
            let _ = server.insert("metadata".to_string(), Value::Object(self.metadata.clone()));
        }

        if !self.files.is_empty() {
            let personality: Vec<Value> = self
                .files
                .iter()
                .map(|(path, contents)| {
                    json!({ "path": path, "contents": BASE64.encode(contents) })
                })
                .collect();
            let _ = server.insert("personality".to_string(), Value::Array(personality));
        }

        if self.manual_disk {
            let _ = server.insert(
                "diskConfig".to_string(),
                Value::String("MANUAL".to_string()),
            );
        }

        Value::Object(Map::from_iter([(
            "server".to_string(),
            Value::Object(server),
        )]))
    }
}

impl Session {
    /// List servers in the authenticated region.
    pub fn server_list(&mut self) -> Result<&LastResponse, Error> {
        debug!("Providing a list of servers");
        self.get("/servers")
    }

    /// List servers with details.
    pub fn server_list_detail(&mut self) -> Result<&LastResponse, Error> {
        debug!("Providing a detailed list of servers");
        self.get("/servers/detail")
    }

    /// Show one server.
    pub fn server_info(&mut self, server_id: &str) -> Result<&LastResponse, Error> {
        debug!("Providing server information on instance {}", server_id);
        self.get(&format!("/servers/{}", server_id))
    }

    /// Boot a new server.
    pub fn boot_server(&mut self, builder: &ServerBuilder) -> Result<&LastResponse, Error> {
        let rackspace = self.is_rackspace().unwrap_or(false);
        let payload = builder.to_payload(rackspace);
        self.post("/servers", &payload)
    }

    /// Delete a server.
    pub fn delete_server(&mut self, server_id: &str) -> Result<&LastResponse, Error> {
        debug!("Destroying server {}", server_id);
        self.delete(&format!("/servers/{}", server_id))
    }

    /// Reboot a server, hard or soft.
    pub fn reboot_server(&mut self, server_id: &str, hard: bool) -> Result<&LastResponse, Error> {
        debug!("Performing a reboot on {}, hard: {}", server_id, hard);
        let kind = if hard { "HARD" } else { "SOFT" };
        let payload = json!({ "reboot": { "type": kind } });
        self.post(&format!("/servers/{}/action", server_id), &payload)
    }

    /// Resize a server to a new flavor.
    pub fn resize_server(
        &mut self,
        server_id: &str,
        flavor_ref: &str,
    ) -> Result<&LastResponse, Error> {
        debug!("Performing a resize on {} to {}", server_id, flavor_ref);
        let payload = json!({ "resize": { "flavorRef": flavor_ref } });
        self.post(&format!("/servers/{}/action", server_id), &payload)
    }

    /// Confirm a pending resize.
    pub fn confirm_resize(&mut self, server_id: &str) -> Result<&LastResponse, Error> {
        debug!("Confirming the resize of {}", server_id);
        let payload = json!({ "confirmResize": null });
        self.post(&format!("/servers/{}/action", server_id), &payload)
    }

    /// Revert a pending resize.
    pub fn revert_resize(&mut self, server_id: &str) -> Result<&LastResponse, Error> {
        debug!("Reverting the resize of {}", server_id);
        let payload = json!({ "revertResize": null });
        self.post(&format!("/servers/{}/action", server_id), &payload)
    }

    /// List images.
    pub fn image_list(&mut self) -> Result<&LastResponse, Error> {
        self.get("/images")
    }

    /// List images with details.
    pub fn image_list_detail(&mut self) -> Result<&LastResponse, Error> {
        self.get("/images/detail")
    }

    /// Show one image.
    pub fn image_info(&mut self, image_id: &str) -> Result<&LastResponse, Error> {
        self.get(&format!("/images/{}", image_id))
    }

    /// Create an image of a server, with optional metadata.
    pub fn create_image(
        &mut self,
        server_id: &str,
        name: &str,
        metadata: Option<&Map<String, Value>>,
    ) -> Result<&LastResponse, Error> {
        debug!("Creating image {} of server {}", name, server_id);
        let payload = match metadata {
            Some(metadata) => json!({ "createImage": { "name": name, "metadata": metadata } }),
            None => json!({ "createImage": { "name": name } }),
        };
        self.post(&format!("/servers/{}/action", server_id), &payload)
    }

    /// Delete an image.
    pub fn delete_image(&mut self, image_id: &str) -> Result<&LastResponse, Error> {
        debug!("Destroying image {}", image_id);
        self.delete(&format!("/images/{}", image_id))
    }

    /// List flavors.
    pub fn flavor_list(&mut self) -> Result<&LastResponse, Error> {
        self.get("/flavors")
    }

    /// List flavors with details.
    pub fn flavor_list_detail(&mut self) -> Result<&LastResponse, Error> {
        self.get("/flavors/detail")
    }

    /// List key pairs.
    pub fn keypair_list(&mut self) -> Result<&LastResponse, Error> {
        self.get("/os-keypairs")
    }

    /// Create a key pair; the response carries the private key.
    pub fn create_keypair(&mut self, key_name: &str) -> Result<&LastResponse, Error> {
        debug!("Creating key pair {}", key_name);
        let payload = json!({ "keypair": { "name": key_name } });
        self.post("/os-keypairs", &payload)
    }

    /// Delete a key pair.
    pub fn delete_keypair(&mut self, key_name: &str) -> Result<&LastResponse, Error> {
        debug!("Destroying key pair {}", key_name);
        self.delete(&format!("/os-keypairs/{}", key_name))
    }

    /// List networks available to the tenant.
    pub fn network_list(&mut self) -> Result<&LastResponse, Error> {
        self.get("/os-networksv2")
    }
}

#[cfg(test)]
pub mod test {
    use super::{ServerBuilder, RAX_PUBLIC_NET_ID, RAX_SERVICE_NET_ID};

    #[test]
    fn test_minimal_payload() {
        let payload = ServerBuilder::new("web1", "img", "flv").to_payload(false);
        assert_eq!(
            payload,
            serde_json::json!({
                "server": {"name": "web1", "imageRef": "img", "flavorRef": "flv"}
            })
        );
    }

    #[test]
    fn test_rackspace_default_networks() {
        let payload = ServerBuilder::new("web1", "img", "flv").to_payload(true);
        let networks = payload["server"]["networks"].as_array().unwrap();
        assert_eq!(networks.len(), 2);
        assert_eq!(networks[0]["uuid"], RAX_PUBLIC_NET_ID);
        assert_eq!(networks[1]["uuid"], RAX_SERVICE_NET_ID);
    }

    #[test]
    fn test_rackspace_network_opt_out() {
        let payload = ServerBuilder::new("web1", "img", "flv")
            .without_public_network()
            .to_payload(true);
        let networks = payload["server"]["networks"].as_array().unwrap();
        assert_eq!(networks.len(), 1);
        assert_eq!(networks[0]["uuid"], RAX_SERVICE_NET_ID);
    }

    #[test]
    fn test_custom_network_without_rackspace() {
        let payload = ServerBuilder::new("web1", "img", "flv")
            .with_network("abcd-1234")
            .to_payload(false);
        let networks = payload["server"]["networks"].as_array().unwrap();
        assert_eq!(networks.len(), 1);
        assert_eq!(networks[0]["uuid"], "abcd-1234");
    }

    #[test]
    fn test_optional_fields() {
        let payload = ServerBuilder::new("web1", "img", "flv")
            .with_key_name("deploy")
            .with_metadata("role", "web")
            .with_manual_disk()
            .to_payload(false);
        let server = &payload["server"];
        assert_eq!(server["key_name"], "deploy");
        assert_eq!(server["metadata"]["role"], "web");
        assert_eq!(server["diskConfig"], "MANUAL");
    }

    #[test]
    fn test_file_injection_is_base64() {
        let payload = ServerBuilder::new("web1", "img", "flv")
            .with_file("/etc/motd", b"hello")
            .to_payload(false);
        let personality = payload["server"]["personality"].as_array().unwrap();
        assert_eq!(personality.len(), 1);
        assert_eq!(personality[0]["path"], "/etc/motd");
        assert_eq!(personality[0]["contents"], "aGVsbG8=");
    }
}
