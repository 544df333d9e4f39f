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
//! Token provider interface.

use async_trait::async_trait;

use crate::identity::types::PrincipalId;
use crate::sts::ServiceState;
use crate::token::error::TokenProviderError;
use crate::token::types::{IssuedToken, PossessionProof, TokenSpec};

/// Token Provider interface.
#[async_trait]
pub trait TokenApi: Send + Sync {
    /// Issue a new token.
    ///
    /// # Arguments
    ///
    /// * `state` - An application state.
    /// * `tenant` - Tenant issuing the token.
    /// * `principal` - Authenticated principal requesting the token. It must
    ///   be the subject or the last delegate of the token.
    /// * `spec` - Parameters of the token.
    async fn issue_token<'a>(
        &self,
        state: &ServiceState,
        tenant: &'a str,
        principal: &'a PrincipalId,
        spec: &'a TokenSpec,
    ) -> Result<IssuedToken, TokenProviderError>;

    /// Renew a valid and renewable token with a fresh validity window.
    async fn renew_token<'a>(
        &self,
        state: &ServiceState,
        tenant: &'a str,
        principal: &'a PrincipalId,
        token: &'a IssuedToken,
        requested_lifetime_ms: i64,
    ) -> Result<IssuedToken, TokenProviderError>;

    /// Validate the token presented to the tenant.
    ///
    /// # Arguments
    ///
    /// * `state` - An application state.
    /// * `tenant` - Tenant the token is presented to.
    /// * `token` - The token.
    /// * `expected_audience` - Relying party the token must be intended for.
    /// * `proof` - Proof of possession of the confirmation key over the
    ///   challenge expected by the relying party. Required for holder-of-key
    ///   tokens.
    async fn validate_token<'a>(
        &self,
        state: &ServiceState,
        tenant: &'a str,
        token: &'a IssuedToken,
        expected_audience: Option<String>,
        proof: Option<PossessionProof>,
    ) -> Result<(), TokenProviderError>;
}
