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
//! Identity backend errors.

use thiserror::Error;

/// Errors reported by the directory backend.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum IdentityBackendError {
    /// Revoked certificate in the presented chain.
    #[error("certificate has been revoked")]
    CertificateRevoked,

    /// Wrong credentials.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The account is locked.
    #[error("account is locked")]
    LockedAccount,

    /// The certificate chain parameter could not be processed.
    #[error("malformed certificate chain: {0}")]
    MalformedCertificateChain(String),

    /// The tenant is not known to the directory.
    #[error("tenant {0} does not exist")]
    NoSuchTenant(String),

    /// The password has expired.
    #[error("password has expired")]
    PasswordExpired,

    /// The revocation status of the certificate can not be determined.
    #[error("certificate revocation status can not be determined")]
    RevocationCheckUndeterminable,

    /// The certificate chain does not lead to a trusted root.
    #[error("certificate chain is not trusted: {0}")]
    UntrustedCertificateChain(String),

    /// Unexpected directory failure.
    #[error("identity backend is unavailable: {0}")]
    Unavailable(String),
}

impl IdentityBackendError {
    /// Whether the error is caused by the directory itself and not by the
    /// presented credentials.
    pub fn is_system_error(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}
