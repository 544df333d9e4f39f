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
//! # Security Token Service
//!
//! The [Service] ties the configuration and the providers together. It is
//! shared (`Arc`) between all the concurrent calls; the providers keep their
//! own internal state (tenant configuration snapshots, authentication
//! continuations) safe for concurrent use.
//!
//! The functions of this module are the operations exposed to the callers.
//! They report the errors of all the providers as [StsError], which tells the
//! client errors from the system errors ([StsError::is_system_error]).

use std::sync::Arc;
use tracing::info;

use crate::auth::{AuthApi, AuthenticationResult, Credential};
use crate::config::Config;
use crate::error::StsError;
use crate::identity::types::PrincipalId;
use crate::provider::Provider;
use crate::token::{IssuedToken, PossessionProof, TokenApi, TokenSpec};

pub struct Service {
    /// Config file
    pub config: Config,
    /// Service/resource Provider
    pub provider: Provider,
}

pub type ServiceState = Arc<Service>;

impl Service {
    pub fn new(cfg: Config, provider: Provider) -> Result<Self, StsError> {
        info!("Starting the security token service");
        Ok(Self {
            config: cfg,
            provider,
        })
    }
}

/// Authenticate the credential within the tenant.
pub async fn authenticate(
    state: &ServiceState,
    tenant: &str,
    credential: Credential,
) -> Result<AuthenticationResult, StsError> {
    Ok(state
        .provider
        .get_auth_provider()
        .authenticate(state, tenant, credential)
        .await?)
}

/// Issue a token to the authenticated principal.
pub async fn issue_token(
    state: &ServiceState,
    tenant: &str,
    principal: &PrincipalId,
    spec: &TokenSpec,
) -> Result<IssuedToken, StsError> {
    Ok(state
        .provider
        .get_token_provider()
        .issue_token(state, tenant, principal, spec)
        .await?)
}

/// Renew the token of the authenticated principal.
pub async fn renew_token(
    state: &ServiceState,
    tenant: &str,
    principal: &PrincipalId,
    token: &IssuedToken,
    requested_lifetime_ms: i64,
) -> Result<IssuedToken, StsError> {
    Ok(state
        .provider
        .get_token_provider()
        .renew_token(state, tenant, principal, token, requested_lifetime_ms)
        .await?)
}

/// Validate the token presented to the tenant.
pub async fn validate_token(
    state: &ServiceState,
    tenant: &str,
    token: &IssuedToken,
    expected_audience: Option<&str>,
    proof: Option<PossessionProof>,
) -> Result<(), StsError> {
    Ok(state
        .provider
        .get_token_provider()
        .validate_token(
            state,
            tenant,
            token,
            expected_audience.map(ToString::to_string),
            proof,
        )
        .await?)
}
