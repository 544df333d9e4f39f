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
//
// SPDX-License-Identifier: Apache-2.0
use serde::Deserialize;

/// Directory backend verifying the presented credentials.
#[derive(Debug, Deserialize, Clone)]
pub struct IdentitySection {
    /// Name of the identity backend driver. The driver must be registered in
    /// the plugin manager before the service starts.
    #[serde(default = "default_identity_driver")]
    pub driver: String,
}

fn default_identity_driver() -> String {
    "directory".into()
}

impl Default for IdentitySection {
    fn default() -> Self {
        Self {
            driver: default_identity_driver(),
        }
    }
}
