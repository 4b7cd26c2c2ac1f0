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

use std::env;

fn main() {
    env_logger::init();

    let image = env::var("DEMO_IMAGE_REF").expect("Set DEMO_IMAGE_REF to an image UUID");
    let flavor = env::var("DEMO_FLAVOR_REF").expect("Set DEMO_FLAVOR_REF to a flavor ID");

    let config = osnova::from_env().expect("Failed to create a configuration from the environment");
    let mut session = osnova::Session::new(config).expect("Cannot create an HTTP client");

    let outcome = session.authenticate().expect("Authentication errored");
    if !outcome.is_authenticated() {
        eprintln!("Not authenticated: {:?}", session.last_response());
        return;
    }

    let builder = osnova::ServerBuilder::new("demo-server", image, flavor)
        .with_metadata("created-by", "osnova-demo");
    let last = session.boot_server(&builder).expect("Boot request failed");
    println!("Status: {} {}", last.status, last.reason);
    if let Some(body) = last.data.as_json() {
        println!("Server ID: {}", body["server"]["id"].as_str().unwrap_or("?"));
    }
}
