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
//! # Token provider
//!
//! Tokens are signed assertions describing the subject, its groups, the way
//! the subject is confirmed (bearer or holder-of-key), the validity window and
//! the usage restrictions (audience, delegation, renewal).
//!
//! Issuance checks the request against the restrictions of the tenant before
//! anything is signed and rejects (never clamps) the requests exceeding them.
//! Validation checks the signature against the chains trusted by the tenant,
//! the validity window expanded by the clock tolerance of the tenant, the
//! current restrictions of the tenant, the audience and, for holder-of-key
//! tokens, the proof of possession of the confirmation key.
//!
//! Both are pure functions of their input and the current time
//! ([issuer::TokenIssuer::issue], [validator::validate]); the provider only
//! resolves the trust configuration of the tenant.

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

mod assertion;
pub mod error;
pub mod issuer;
#[cfg(test)]
mod mock;
mod signature;
pub mod types;
pub mod validator;
mod xml;

use crate::config::Config;
use crate::identity::types::PrincipalId;
use crate::sts::ServiceState;
use crate::tenant::TenantApi;
use issuer::TokenIssuer;

pub use error::TokenProviderError;
#[cfg(test)]
pub use mock::MockTokenProvider;
pub use types::*;

/// Token provider.
#[derive(Clone, Debug)]
pub struct TokenProvider {
    issuer: TokenIssuer,
}

impl TokenProvider {
    pub fn new(config: &Config) -> Result<Self, TokenProviderError> {
        Ok(Self {
            issuer: TokenIssuer::new(&config.token),
        })
    }
}

#[async_trait]
impl TokenApi for TokenProvider {
    /// Issue a new token.
    #[tracing::instrument(level = "info", skip(self, state, spec))]
    async fn issue_token<'a>(
        &self,
        state: &ServiceState,
        tenant: &'a str,
        principal: &'a PrincipalId,
        spec: &'a TokenSpec,
    ) -> Result<IssuedToken, TokenProviderError> {
        let config = state
            .provider
            .get_tenant_provider()
            .get_config(tenant)
            .await?;
        self.issuer
            .issue(&config, principal, spec, IssuancePath::Fresh, Utc::now())
    }

    /// Renew the token.
    #[tracing::instrument(level = "info", skip(self, state, token))]
    async fn renew_token<'a>(
        &self,
        state: &ServiceState,
        tenant: &'a str,
        principal: &'a PrincipalId,
        token: &'a IssuedToken,
        requested_lifetime_ms: i64,
    ) -> Result<IssuedToken, TokenProviderError> {
        let config = state
            .provider
            .get_tenant_provider()
            .get_config(tenant)
            .await?;
        let now = Utc::now();
        validator::validate_core(&config, token, now)?;
        if !token.renewable() {
            return Err(TokenProviderError::NotRenewable(
                token.assertion_id().to_string(),
            ));
        }
        debug!("renewing token {}", token.assertion_id());

        let assertion = token.assertion();
        let spec = TokenSpec {
            subject: assertion.subject.clone(),
            confirmation: assertion.confirmation.clone(),
            requested_lifetime_ms,
            renewable: assertion.renewable,
            delegable: assertion.delegable,
            audience: assertion.audience.clone(),
            delegation_chain: assertion.delegation_chain.clone(),
            renew_count_so_far: assertion.renew_count,
            groups: assertion.groups.clone(),
            advice: assertion.advice.clone(),
            authentication: assertion.authentication.clone(),
        };
        self.issuer
            .issue(&config, principal, &spec, IssuancePath::Renewal, now)
    }

    /// Validate the token.
    #[tracing::instrument(level = "info", skip(self, state, token, proof))]
    async fn validate_token<'a>(
        &self,
        state: &ServiceState,
        tenant: &'a str,
        token: &'a IssuedToken,
        expected_audience: Option<String>,
        proof: Option<PossessionProof>,
    ) -> Result<(), TokenProviderError> {
        let config = state
            .provider
            .get_tenant_provider()
            .get_config(tenant)
            .await?;
        validator::validate(
            &config,
            token,
            expected_audience.as_deref(),
            proof.as_ref(),
            Utc::now(),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::provider::Provider;
    use crate::sts::Service;
    use crate::tenant::{MockTenantProvider, TenantProviderError};
    use crate::tests::fixtures;

    fn get_state() -> ServiceState {
        let mut tenant_mock = MockTenantProvider::default();
        tenant_mock
            .expect_get_config()
            .withf(|tenant: &'_ str| tenant == "acme.local")
            .returning(|_| Ok(Arc::new(fixtures::tenant_config("acme.local"))));
        tenant_mock
            .expect_get_config()
            .returning(|tenant| Err(TenantProviderError::NoSuchIdp(tenant.to_string())));
        let provider = Provider::mocked_builder()
            .tenant(tenant_mock)
            .build()
            .unwrap();
        Arc::new(Service::new(Config::default(), provider).unwrap())
    }

    fn jdoe() -> PrincipalId {
        PrincipalId::new("jdoe", "acme.local")
    }

    fn spec(renewable: bool) -> TokenSpec {
        TokenSpecBuilder::default()
            .subject(jdoe())
            .confirmation(Confirmation::bearer())
            .requested_lifetime_ms(300_000)
            .renewable(renewable)
            .audience(["https://vc.acme.local".to_string()])
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_issue_and_validate() {
        let state = get_state();
        let provider = TokenProvider::new(&Config::default()).unwrap();

        let token = provider
            .issue_token(&state, "acme.local", &jdoe(), &spec(false))
            .await
            .unwrap();
        assert_eq!(&jdoe(), token.subject());

        provider
            .validate_token(
                &state,
                "acme.local",
                &token,
                Some("https://vc.acme.local".into()),
                None,
            )
            .await
            .unwrap();
        if let Err(TokenProviderError::AudienceMismatch(..)) = provider
            .validate_token(&state, "acme.local", &token, Some("other".into()), None)
            .await
        {
        } else {
            panic!("foreign audience must be rejected");
        }
    }

    #[tokio::test]
    async fn test_unknown_tenant() {
        let state = get_state();
        let provider = TokenProvider::new(&Config::default()).unwrap();

        if let Err(TokenProviderError::TenantProvider {
            source: TenantProviderError::NoSuchIdp(tenant),
        }) = provider
            .issue_token(&state, "unknown.local", &jdoe(), &spec(false))
            .await
        {
            assert_eq!("unknown.local", tenant);
        } else {
            panic!("unknown tenant must be reported");
        }
    }

    #[tokio::test]
    async fn test_renew() {
        let state = get_state();
        let provider = TokenProvider::new(&Config::default()).unwrap();

        let token = provider
            .issue_token(&state, "acme.local", &jdoe(), &spec(true))
            .await
            .unwrap();
        let renewed = provider
            .renew_token(&state, "acme.local", &jdoe(), &token, 600_000)
            .await
            .unwrap();
        assert_ne!(token.assertion_id(), renewed.assertion_id());
        assert_eq!(1, renewed.renew_count());
        assert_eq!(600_000, renewed.lifetime_ms());
        assert_eq!(token.audience(), renewed.audience());
        assert!(renewed.renewable());

        // renew count cap of the tenant is 3
        let mut current = renewed;
        for _ in 0..2 {
            current = provider
                .renew_token(&state, "acme.local", &jdoe(), &current, 300_000)
                .await
                .unwrap();
        }
        assert_eq!(3, current.renew_count());
        if let Err(TokenProviderError::TokenRestrictionExceeded(..)) = provider
            .renew_token(&state, "acme.local", &jdoe(), &current, 300_000)
            .await
        {
        } else {
            panic!("renewal above the cap must be rejected");
        }

        // requested lifetime is still capped
        if let Err(TokenProviderError::TokenRestrictionExceeded(..)) = provider
            .renew_token(&state, "acme.local", &jdoe(), &token, 700_000)
            .await
        {
        } else {
            panic!("lifetime above the cap must be rejected");
        }
    }

    #[tokio::test]
    async fn test_renew_not_renewable() {
        let state = get_state();
        let provider = TokenProvider::new(&Config::default()).unwrap();

        let token = provider
            .issue_token(&state, "acme.local", &jdoe(), &spec(false))
            .await
            .unwrap();
        if let Err(TokenProviderError::NotRenewable(id)) = provider
            .renew_token(&state, "acme.local", &jdoe(), &token, 300_000)
            .await
        {
            assert_eq!(token.assertion_id(), id);
        } else {
            panic!("token must not be renewable");
        }

        let token = provider
            .issue_token(&state, "acme.local", &jdoe(), &spec(true))
            .await
            .unwrap();
        if let Err(TokenProviderError::InvalidRequester { .. }) = provider
            .renew_token(
                &state,
                "acme.local",
                &PrincipalId::new("mallory", "acme.local"),
                &token,
                300_000,
            )
            .await
        {
        } else {
            panic!("foreign principal must not renew the token");
        }
    }
}
