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
//! Tenant provider interface.

use async_trait::async_trait;
use std::sync::Arc;

use crate::tenant::TenantProviderError;
use crate::tenant::types::TenantTrustConfig;

/// Tenant Provider interface.
#[async_trait]
pub trait TenantApi: Send + Sync {
    /// Get the validated trust configuration snapshot of the tenant.
    ///
    /// The returned snapshot is never modified. A configuration change
    /// produces a new snapshot after the tenant is invalidated.
    async fn get_config<'a>(
        &self,
        tenant: &'a str,
    ) -> Result<Arc<TenantTrustConfig>, TenantProviderError>;

    /// Drop the cached snapshot of the tenant so that the next resolution
    /// reads the configuration again.
    async fn invalidate<'a>(&self, tenant: &'a str);
}
