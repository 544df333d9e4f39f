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
//! Tenant configuration sources.

use async_trait::async_trait;

use crate::tenant::TenantProviderError;
use crate::tenant::types::TenantTrustConfig;

pub mod file;
pub use file::FileConfigExtractor;

/// Configuration extractor interface.
///
/// Implementations fail with [TenantProviderError::NoSuchIdp] for an unknown
/// tenant and with [TenantProviderError::SystemConfiguration] when the
/// configuration source can not be reached.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConfigExtractor: Send + Sync {
    /// Read and validate the trust configuration of the tenant.
    async fn get_config<'a>(
        &self,
        tenant: &'a str,
    ) -> Result<TenantTrustConfig, TenantProviderError>;
}
