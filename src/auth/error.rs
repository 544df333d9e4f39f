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
//! Authentication provider errors.

use thiserror::Error;

use crate::tenant::error::TenantProviderError;

/// Authentication error.
///
/// Rejected credentials are not errors but
/// [crate::auth::types::AuthenticationFailure] results.
#[derive(Error, Debug)]
pub enum AuthenticationError {
    /// The tenant is not known.
    #[error("tenant {0} does not exist")]
    NoSuchIdp(String),

    /// The configuration of the tenant can not be obtained.
    #[error("configuration of the tenant is not available: {source}")]
    SystemConfiguration {
        /// The source of the error.
        source: TenantProviderError,
    },

    /// Unexpected backend failure or backend contract violation.
    #[error("authentication system error: {0}")]
    SystemError(String),

    /// Identity backend driver is not registered.
    #[error("unsupported identity driver {0}")]
    UnsupportedDriver(String),
}

impl From<TenantProviderError> for AuthenticationError {
    fn from(value: TenantProviderError) -> Self {
        match value {
            TenantProviderError::NoSuchIdp(tenant) => Self::NoSuchIdp(tenant),
            source => Self::SystemConfiguration { source },
        }
    }
}

impl AuthenticationError {
    /// Whether the error is a system error (as opposite to a client error).
    pub fn is_system_error(&self) -> bool {
        !matches!(self, Self::NoSuchIdp(_))
    }
}
