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
use std::path::PathBuf;

/// Tenant trust configuration source.
#[derive(Debug, Deserialize, Clone)]
pub struct TenantSection {
    /// Configuration extractor driver. `file` reads the per-tenant documents
    /// from the `config_dir`, any other name refers to an extractor
    /// registered in the plugin manager.
    #[serde(default = "default_tenant_driver")]
    pub driver: String,

    /// Directory with the `<tenant>.json` documents used by the `file`
    /// driver. Relative paths inside of the documents are resolved against
    /// this directory.
    #[serde(default = "default_config_dir")]
    pub config_dir: PathBuf,
}

fn default_tenant_driver() -> String {
    "file".into()
}

fn default_config_dir() -> PathBuf {
    PathBuf::from("/etc/sts/tenants")
}

impl Default for TenantSection {
    fn default() -> Self {
        Self {
            driver: default_tenant_driver(),
            config_dir: default_config_dir(),
        }
    }
}
