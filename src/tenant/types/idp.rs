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
//! External identity providers registered for the tenant.

use derive_builder::Builder;

use crate::error::BuilderError;
use crate::tenant::types::Certificate;

/// External identity provider.
#[derive(Builder, Clone, Debug, PartialEq)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(into))]
pub struct IdpConfig {
    /// Entity ID of the identity provider.
    pub entity_id: String,

    /// Optional alias of the identity provider.
    #[builder(default, setter(strip_option))]
    pub alias: Option<String>,

    /// Certificates the identity provider signs its assertions with.
    pub signing_certificates: Vec<Certificate>,

    /// Accepted name ID formats.
    #[builder(default)]
    pub name_id_formats: Vec<String>,
}

impl IdpConfig {
    /// Verify the identity provider entry is usable.
    pub(crate) fn check(&self) -> Result<(), String> {
        if self.entity_id.trim().is_empty() {
            return Err("entity id must not be empty".into());
        }
        if self.signing_certificates.is_empty() {
            return Err("at least one signing certificate is required".into());
        }
        Ok(())
    }
}
