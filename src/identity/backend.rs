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
//! Identity backend interface.

use async_trait::async_trait;
use secrecy::SecretString;

use crate::identity::{GssResult, IdentityBackendError, OtpResult, PrincipalId};
use crate::tenant::types::Certificate;

/// Directory backend verifying the presented credentials.
///
/// Every method answers with `Ok(None)` only when the directory violates its
/// contract (e.g. accepts the credentials without naming the principal); the
/// caller treats such answers as system errors.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityBackend: Send + Sync {
    /// Verify the password of the user identified by its UPN.
    async fn authenticate_by_password<'a>(
        &self,
        tenant: &'a str,
        upn: &'a str,
        password: &'a SecretString,
    ) -> Result<Option<PrincipalId>, IdentityBackendError>;

    /// Process the next leg of the GSS negotiation of the given context.
    async fn authenticate_by_gss<'a>(
        &self,
        tenant: &'a str,
        context_id: &'a str,
        ticket: &'a [u8],
    ) -> Result<Option<GssResult>, IdentityBackendError>;

    /// Verify the certificate chain (leaf first), including the revocation
    /// status when the tenant requires it.
    async fn authenticate_by_cert_chain<'a>(
        &self,
        tenant: &'a str,
        chain: &'a [Certificate],
    ) -> Result<Option<PrincipalId>, IdentityBackendError>;

    /// Verify the one-time passcode. `session_id` is set when resubmitting
    /// within a session opened by a previous call.
    async fn authenticate_by_otp<'a>(
        &self,
        tenant: &'a str,
        username: &'a str,
        session_id: Option<String>,
        passcode: &'a SecretString,
    ) -> Result<Option<OtpResult>, IdentityBackendError>;
}
