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
//! # Error
//!
//! Diverse errors that can occur during the STS processing.
use thiserror::Error;

use crate::auth::error::AuthenticationError;
use crate::identity::error::IdentityBackendError;
use crate::tenant::error::TenantProviderError;
use crate::time_period::TimePeriodError;
use crate::token::error::TokenProviderError;

/// STS error.
#[derive(Debug, Error)]
pub enum StsError {
    /// Authentication provider error.
    #[error(transparent)]
    Authentication {
        /// The source of the error.
        #[from]
        source: AuthenticationError,
    },

    /// Identity backend error.
    #[error(transparent)]
    IdentityBackend {
        /// The source of the error.
        #[from]
        source: IdentityBackendError,
    },

    /// Tenant provider error.
    #[error(transparent)]
    TenantProvider {
        /// The source of the error.
        #[from]
        source: TenantProviderError,
    },

    #[error(transparent)]
    TimePeriod {
        #[from]
        source: TimePeriodError,
    },

    /// Token provider error.
    #[error(transparent)]
    TokenProvider {
        /// The source of the error.
        #[from]
        source: TokenProviderError,
    },
}

impl StsError {
    /// Whether the caller may retry the call with a backoff.
    ///
    /// Client errors (bad credentials, restriction violations, rejected
    /// tokens) are final. System errors (unreachable configuration backend,
    /// unexpected backend failures, internal contract violations) are not.
    pub fn is_system_error(&self) -> bool {
        match self {
            Self::Authentication { source } => source.is_system_error(),
            Self::IdentityBackend { source } => source.is_system_error(),
            Self::TenantProvider { source } => source.is_system_error(),
            Self::TokenProvider { source } => source.is_system_error(),
            Self::TimePeriod { .. } => false,
        }
    }
}

/// Errors of the structure builders.
#[derive(Debug, Error)]
pub enum BuilderError {
    /// Mandatory field has not been set.
    #[error("field `{0}` is not initialized")]
    UninitializedField(String),

    /// Builder validation failed.
    #[error("{0}")]
    Validation(String),
}

impl From<derive_builder::UninitializedFieldError> for BuilderError {
    fn from(value: derive_builder::UninitializedFieldError) -> Self {
        Self::UninitializedField(value.field_name().to_string())
    }
}

impl From<String> for BuilderError {
    fn from(value: String) -> Self {
        Self::Validation(value)
    }
}
