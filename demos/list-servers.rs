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

fn main() {
    env_logger::init();

    let config = osnova::from_env().expect("Failed to create a configuration from the environment");
    let mut session = osnova::Session::new(config).expect("Cannot create an HTTP client");

    let outcome = session.authenticate().expect("Authentication errored");
    if !outcome.is_authenticated() {
        eprintln!("Not authenticated: {:?}", session.last_response());
        return;
    }

    let last = session.server_list().expect("Listing failed");
    match last.data.as_json() {
        Some(body) => {
            if let Some(servers) = body["servers"].as_array() {
                for srv in servers {
                    println!(
                        "ID = {}, Name = {}",
                        srv["id"].as_str().unwrap_or("?"),
                        srv["name"].as_str().unwrap_or("?")
                    );
                }
            }
            println!("Done listing");
        }
        None => eprintln!("Listing failed: {} {}", last.status, last.reason),
    }
}
