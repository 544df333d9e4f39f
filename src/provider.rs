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
//! # Provider manager
//!
//! Provider manager provides access to the individual service providers. This
//! gives an easy interact for passing overall manager down to the individual
//! providers that might need to call other providers while also allowing an
//! easy injection of mocked providers.
use derive_builder::Builder;
use mockall_double::double;

use crate::auth::AuthApi;
#[double]
use crate::auth::AuthProvider;
use crate::config::Config;
use crate::error::StsError;
use crate::plugin_manager::PluginManager;
use crate::tenant::TenantApi;
#[double]
use crate::tenant::TenantProvider;
use crate::token::TokenApi;
#[double]
use crate::token::TokenProvider;

/// Global provider manager.
#[derive(Builder)]
// The owned pattern keeps the builder from cloning the (mocked) providers.
#[builder(pattern = "owned")]
pub struct Provider {
    /// Configuration.
    pub config: Config,
    /// Authentication provider.
    auth: AuthProvider,
    /// Tenant provider.
    tenant: TenantProvider,
    /// Token provider.
    token: TokenProvider,
}

impl Provider {
    pub fn new(cfg: Config, plugin_manager: PluginManager) -> Result<Self, StsError> {
        let auth_provider = AuthProvider::new(&cfg, &plugin_manager)?;
        let tenant_provider = TenantProvider::new(&cfg, &plugin_manager)?;
        let token_provider = TokenProvider::new(&cfg)?;

        Ok(Self {
            config: cfg,
            auth: auth_provider,
            tenant: tenant_provider,
            token: token_provider,
        })
    }

    /// Get the authentication provider.
    pub fn get_auth_provider(&self) -> &impl AuthApi {
        &self.auth
    }

    /// Get the tenant provider.
    pub fn get_tenant_provider(&self) -> &impl TenantApi {
        &self.tenant
    }

    /// Get the token provider.
    pub fn get_token_provider(&self) -> &impl TokenApi {
        &self.token
    }
}

#[cfg(test)]
impl Provider {
    pub fn mocked_builder() -> ProviderBuilder {
        let config = Config::default();
        let auth_mock = crate::auth::MockAuthProvider::default();
        let tenant_mock = crate::tenant::MockTenantProvider::default();
        let token_mock = crate::token::MockTokenProvider::default();

        ProviderBuilder::default()
            .config(config)
            .auth(auth_mock)
            .tenant(tenant_mock)
            .token(token_mock)
    }
}
