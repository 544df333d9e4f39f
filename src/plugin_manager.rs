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
//! # Plugin manager
//!
//! A driver, also known as a backend, is an abstraction around the external
//! collaborators a provider relies on: the directory verifying the presented
//! credentials and the source of the tenant trust configuration. The STS does
//! not ship a directory implementation, the deployment registers its own.
//!
//! The [PluginManager] is responsible for picking the proper backend driver for
//! the provider.
use std::collections::HashMap;
use std::sync::Arc;

use crate::identity::IdentityBackend;
use crate::tenant::backend::ConfigExtractor;

/// Plugin manager allowing to pass custom backend plugins implementing required
/// trait during the service start.
#[derive(Clone, Default)]
pub struct PluginManager {
    /// Tenant configuration extractor plugins.
    config_extractors: HashMap<String, Arc<dyn ConfigExtractor>>,
    /// Identity backend plugins.
    identity_backends: HashMap<String, Arc<dyn IdentityBackend>>,
}

impl PluginManager {
    /// Register tenant configuration extractor.
    pub fn register_config_extractor<S: AsRef<str>>(
        &mut self,
        name: S,
        plugin: Arc<dyn ConfigExtractor>,
    ) {
        self.config_extractors
            .insert(name.as_ref().to_string(), plugin);
    }

    /// Register identity backend.
    pub fn register_identity_backend<S: AsRef<str>>(
        &mut self,
        name: S,
        plugin: Arc<dyn IdentityBackend>,
    ) {
        self.identity_backends
            .insert(name.as_ref().to_string(), plugin);
    }

    /// Get registered tenant configuration extractor.
    pub fn get_config_extractor<S: AsRef<str>>(
        &self,
        name: S,
    ) -> Option<&Arc<dyn ConfigExtractor>> {
        self.config_extractors.get(name.as_ref())
    }

    /// Get registered identity backend.
    pub fn get_identity_backend<S: AsRef<str>>(
        &self,
        name: S,
    ) -> Option<&Arc<dyn IdentityBackend>> {
        self.identity_backends.get(name.as_ref())
    }
}
