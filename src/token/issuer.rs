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
//! Token issuance.

use chrono::{DateTime, SubsecRound, TimeDelta, Utc};
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

use crate::config::TokenSection;
use crate::identity::types::PrincipalId;
use crate::tenant::types::TenantTrustConfig;
use crate::token::error::{RestrictionViolation, TokenProviderError};
use crate::token::signature;
use crate::token::types::{
    Assertion, IssuancePath, IssuedToken, SignatureAlgorithm, TokenSpec,
};

/// Check that every principal of the token has a name distinct from its
/// domain in the signed form.
pub(crate) fn check_principals<'a, I>(principals: I) -> Result<(), TokenProviderError>
where
    I: IntoIterator<Item = &'a PrincipalId>,
{
    match principals
        .into_iter()
        .find(|principal| !principal.has_separable_name())
    {
        Some(principal) => Err(TokenProviderError::InvalidPrincipal(principal.clone())),
        None => Ok(()),
    }
}

/// Issues signed tokens for the tenants.
#[derive(Clone, Debug)]
pub struct TokenIssuer {
    /// Algorithm for the tenants without their own.
    default_algorithm: SignatureAlgorithm,
    /// How long before the token the bearer subject confirmation expires.
    confirmation_margin: TimeDelta,
}

impl TokenIssuer {
    pub fn new(config: &TokenSection) -> Self {
        Self {
            default_algorithm: config.signature_algorithm,
            confirmation_margin: config.get_subject_confirmation_margin(),
        }
    }

    /// Check the request against the restrictions of the tenant.
    ///
    /// The principal must be the subject of the token or, for delegated
    /// tokens, the last delegate.
    pub fn check_request(
        &self,
        tenant: &TenantTrustConfig,
        principal: &PrincipalId,
        spec: &TokenSpec,
        path: IssuancePath,
    ) -> Result<(), TokenProviderError> {
        spec.validate()?;
        check_principals(
            std::iter::once(&spec.subject)
                .chain(&spec.delegation_chain)
                .chain(&spec.groups),
        )?;
        let restrictions = tenant.restrictions();

        let max = restrictions.max_lifetime_ms(&spec.confirmation);
        if spec.requested_lifetime_ms > max {
            debug!(
                "requested lifetime {}ms is above the cap of the tenant {}",
                spec.requested_lifetime_ms,
                tenant.tenant()
            );
            return Err(TokenProviderError::TokenRestrictionExceeded(
                RestrictionViolation::Lifetime {
                    requested: spec.requested_lifetime_ms,
                    max,
                },
            ));
        }

        let depth = spec.delegation_chain.len() as u64;
        if depth > u64::from(restrictions.max_delegation_count) {
            return Err(TokenProviderError::TokenRestrictionExceeded(
                RestrictionViolation::Delegation {
                    depth,
                    max: restrictions.max_delegation_count,
                },
            ));
        }

        let count = spec.resulting_renew_count(path);
        if count > u64::from(restrictions.max_renew_count) {
            return Err(TokenProviderError::TokenRestrictionExceeded(
                RestrictionViolation::Renewal {
                    count,
                    max: restrictions.max_renew_count,
                },
            ));
        }

        let requester = spec.delegation_chain.last().unwrap_or(&spec.subject);
        if principal != requester {
            return Err(TokenProviderError::InvalidRequester {
                principal: principal.clone(),
                subject: spec.subject.clone(),
            });
        }
        Ok(())
    }

    /// Issue the signed token.
    ///
    /// The request is completely checked before anything is signed.
    pub fn issue(
        &self,
        tenant: &TenantTrustConfig,
        principal: &PrincipalId,
        spec: &TokenSpec,
        path: IssuancePath,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, TokenProviderError> {
        self.check_request(tenant, principal, spec, path)?;

        let issue_instant = now.trunc_subsecs(3);
        let not_on_or_after = TimeDelta::try_milliseconds(spec.requested_lifetime_ms)
            .and_then(|lifetime| issue_instant.checked_add_signed(lifetime))
            .ok_or(TokenProviderError::ExpiryCalculation)?;
        // a lifetime not longer than the margin keeps the full window
        let subject_confirmation_not_on_or_after = spec.confirmation.is_bearer().then(|| {
            not_on_or_after
                .checked_sub_signed(self.confirmation_margin)
                .filter(|expiry| *expiry > issue_instant)
                .unwrap_or(not_on_or_after)
        });
        let renew_count = u32::try_from(spec.resulting_renew_count(path)).map_err(|_| {
            TokenProviderError::TokenRestrictionExceeded(RestrictionViolation::Renewal {
                count: spec.resulting_renew_count(path),
                max: tenant.restrictions().max_renew_count,
            })
        })?;

        let assertion = Assertion {
            id: format!("_{}", Uuid::new_v4()),
            issuer: tenant.issuer().to_string(),
            subject: spec.subject.clone(),
            confirmation: spec.confirmation.clone(),
            subject_confirmation_not_on_or_after,
            issue_instant,
            not_before: issue_instant,
            not_on_or_after,
            audience: spec.audience.clone(),
            groups: spec.groups.clone(),
            delegation_chain: spec.delegation_chain.clone(),
            renew_count,
            renewable: spec.renewable,
            delegable: spec.delegable,
            advice: spec.advice.clone(),
            authentication: spec.authentication.clone(),
        };
        let algorithm = tenant
            .signature_algorithm()
            .unwrap_or(self.default_algorithm);
        let signature = signature::sign(
            &assertion,
            algorithm,
            tenant.signing_key(),
            tenant.signing_certificate(),
        )?;
        debug!(
            "issued token {} for {} in the tenant {}",
            assertion.id,
            assertion.subject,
            tenant.tenant()
        );
        Ok(IssuedToken::from_parts(assertion, signature))
    }
}
