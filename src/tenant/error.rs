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
//! Tenant provider errors.

use thiserror::Error;

use crate::error::BuilderError;
use crate::tenant::types::CertificateError;

/// Tenant provider error.
#[derive(Error, Debug)]
pub enum TenantProviderError {
    /// Certificate handling error.
    #[error(transparent)]
    Certificate {
        /// The source of the error.
        #[from]
        source: CertificateError,
    },

    /// Issuer is not set.
    #[error("issuer of the tenant {0} must not be empty")]
    EmptyIssuer(String),

    /// One of the valid chains has no certificates.
    #[error("valid chain {index} of the tenant {tenant} is empty")]
    EmptyValidChain { tenant: String, index: usize },

    /// External identity provider entry is not usable.
    #[error("identity provider {entity_id} is invalid: {reason}")]
    InvalidIdp { entity_id: String, reason: String },

    /// Token restrictions are not sane.
    #[error("token restrictions are invalid: {source}")]
    InvalidRestrictions {
        /// The source of the error.
        #[from]
        source: validator::ValidationErrors,
    },

    /// Clock tolerance is negative.
    #[error("clock tolerance of the tenant {tenant} must not be negative, got {tolerance}ms")]
    NegativeClockTolerance { tenant: String, tolerance: i64 },

    /// The tenant is not known.
    #[error("no identity provider for the tenant {0}")]
    NoSuchIdp(String),

    /// No valid chains are configured.
    #[error("tenant {0} does not have any valid certificate chain")]
    NoValidChains(String),

    /// The signing chain is not among the valid chains.
    #[error("signing chain of the tenant {0} is not among its valid chains")]
    SigningChainNotTrusted(String),

    /// Private signing key can not be used.
    #[error("signing key of the tenant {tenant} can not be loaded: {reason}")]
    SigningKey { tenant: String, reason: String },

    /// The signing key does not belong to the signing certificate.
    #[error("signing key of the tenant {0} does not match its signing certificate")]
    SigningKeyMismatch(String),

    /// Structures builder error.
    #[error(transparent)]
    StructBuilder {
        /// The source of the error.
        #[from]
        source: BuilderError,
    },

    /// The configuration source is not reachable or returned garbage.
    #[error("configuration of the tenant {tenant} can not be retrieved: {reason}")]
    SystemConfiguration { tenant: String, reason: String },

    /// Unsupported driver.
    #[error("unsupported driver {0}")]
    UnsupportedDriver(String),
}

impl TenantProviderError {
    /// Whether the error is caused by the service side. Only an unknown
    /// tenant is attributed to the caller.
    pub fn is_system_error(&self) -> bool {
        !matches!(self, Self::NoSuchIdp(_))
    }
}
