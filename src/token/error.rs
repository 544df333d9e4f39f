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
//! Token provider errors.

use std::fmt;

use thiserror::Error;

use crate::error::BuilderError;
use crate::identity::types::PrincipalId;
use crate::tenant::error::TenantProviderError;
use crate::tenant::types::CertificateError;
use crate::time_period::TimePeriodError;

/// Restriction of the tenant the token (request) does not respect.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RestrictionViolation {
    /// Requested lifetime above the cap of the confirmation method.
    Lifetime { requested: i64, max: i64 },
    /// Delegation chain longer than allowed.
    Delegation { depth: u64, max: u32 },
    /// Too many renewals.
    Renewal { count: u64, max: u32 },
}

impl fmt::Display for RestrictionViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lifetime { requested, max } => {
                write!(f, "lifetime of {requested}ms exceeds the maximum of {max}ms")
            }
            Self::Delegation { depth, max } => {
                write!(f, "delegation depth {depth} exceeds the maximum of {max}")
            }
            Self::Renewal { count, max } => {
                write!(f, "renew count {count} exceeds the maximum of {max}")
            }
        }
    }
}

/// Token provider error.
#[derive(Error, Debug)]
pub enum TokenProviderError {
    /// Token is not valid for the expected audience.
    #[error("token is not intended for the audience {0}")]
    AudienceMismatch(String),

    #[error(transparent)]
    Certificate {
        /// The source of the error.
        #[from]
        source: CertificateError,
    },

    /// Token validity window could not be computed.
    #[error("token validity window is out of the supported time range")]
    ExpiryCalculation,

    /// Principal whose name can not be told apart from its domain.
    #[error("principal {0} has an ambiguous name")]
    InvalidPrincipal(PrincipalId),

    /// The authenticated principal may not request the token.
    #[error("principal {principal} may not request a token for {subject}")]
    InvalidRequester {
        principal: PrincipalId,
        subject: PrincipalId,
    },

    /// Token request is invalid.
    #[error("invalid token request: {source}")]
    InvalidTokenSpec {
        /// The source of the error.
        #[from]
        source: validator::ValidationErrors,
    },

    /// Renewal of a token issued as not renewable.
    #[error("token {0} is not renewable")]
    NotRenewable(String),

    /// Presenter of a holder-of-key token did not prove the key possession.
    #[error("proof of possession of the confirmation key failed")]
    ProofOfPossessionFailed,

    /// Token signature is not valid or not trusted.
    #[error("token signature validation failed: {0}")]
    SignatureValidationFailed(String),

    /// Signing of the token failed.
    #[error("token signing failed: {0}")]
    Signing(String),

    #[error(transparent)]
    StructBuilder {
        /// The source of the error.
        #[from]
        source: BuilderError,
    },

    #[error(transparent)]
    TenantProvider {
        /// The source of the error.
        #[from]
        source: TenantProviderError,
    },

    #[error(transparent)]
    TimePeriod {
        /// The source of the error.
        #[from]
        source: TimePeriodError,
    },

    /// Token is expired.
    #[error("token expired")]
    TokenExpired,

    /// Token is not valid yet.
    #[error("token is not valid yet")]
    TokenNotYetValid,

    /// Token (request) violates a restriction of the tenant.
    #[error("token restriction exceeded: {0}")]
    TokenRestrictionExceeded(RestrictionViolation),
}

impl TokenProviderError {
    /// Whether the error is a system error (as opposite to a client error).
    pub fn is_system_error(&self) -> bool {
        match self {
            Self::TenantProvider { source } => source.is_system_error(),
            Self::Certificate { .. }
            | Self::ExpiryCalculation
            | Self::Signing(..)
            | Self::StructBuilder { .. }
            | Self::TimePeriod { .. } => true,
            _ => false,
        }
    }
}
