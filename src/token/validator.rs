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
//! Token validation.
//!
//! Validation is a pure function of the token, the trust configuration of
//! the tenant and the current time.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::tenant::types::TenantTrustConfig;
use crate::time_period::TimePeriod;
use crate::token::error::{RestrictionViolation, TokenProviderError};
use crate::token::issuer::check_principals;
use crate::token::signature;
use crate::token::types::{Confirmation, IssuedToken, PossessionProof};

/// Check the signature, validity window and restrictions of the token.
///
/// The audience and the proof of possession are not checked.
pub fn validate_core(
    tenant: &TenantTrustConfig,
    token: &IssuedToken,
    now: DateTime<Utc>,
) -> Result<(), TokenProviderError> {
    let certificate = &token.signature().certificate;
    let trusted = tenant.chains_with_leaf(certificate).count();
    if trusted != 1 {
        debug!(
            "signing certificate {} is the leaf of {} valid chains of the tenant {}",
            certificate.subject(),
            trusted,
            tenant.tenant()
        );
        return Err(TokenProviderError::SignatureValidationFailed(format!(
            "signing certificate {} is not trusted",
            certificate.subject()
        )));
    }
    signature::verify(token.assertion(), token.signature())?;
    check_principals(
        std::iter::once(token.subject())
            .chain(token.delegation_chain())
            .chain(token.groups()),
    )?;

    let window = TimePeriod::bounded(token.not_before(), token.not_on_or_after())?
        .expand(tenant.clock_tolerance_ms())?;
    if !window.contains(&now) {
        return Err(if window.is_before_start(&now) {
            TokenProviderError::TokenNotYetValid
        } else {
            TokenProviderError::TokenExpired
        });
    }

    let restrictions = tenant.restrictions();
    let depth = token.delegation_depth() as u64;
    if depth > u64::from(restrictions.max_delegation_count) {
        return Err(TokenProviderError::TokenRestrictionExceeded(
            RestrictionViolation::Delegation {
                depth,
                max: restrictions.max_delegation_count,
            },
        ));
    }
    if token.renew_count() > restrictions.max_renew_count {
        return Err(TokenProviderError::TokenRestrictionExceeded(
            RestrictionViolation::Renewal {
                count: u64::from(token.renew_count()),
                max: restrictions.max_renew_count,
            },
        ));
    }
    Ok(())
}

/// Decide whether the token presented to the tenant is accepted.
pub fn validate(
    tenant: &TenantTrustConfig,
    token: &IssuedToken,
    expected_audience: Option<&str>,
    proof: Option<&PossessionProof>,
    now: DateTime<Utc>,
) -> Result<(), TokenProviderError> {
    validate_core(tenant, token, now)?;

    if let Some(audience) = expected_audience
        && !token.audience().contains(audience)
    {
        return Err(TokenProviderError::AudienceMismatch(audience.to_string()));
    }

    if let Confirmation::HolderOfKey { key } = token.confirmation()
        && !proof.is_some_and(|proof| proof.verify(key, token.assertion_id()))
    {
        return Err(TokenProviderError::ProofOfPossessionFailed);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, TimeZone};

    use super::*;
    use crate::config::TokenSection;
    use crate::identity::types::PrincipalId;
    use crate::tenant::types::{TokenRestrictions, TokenRestrictionsBuilder};
    use crate::tests::fixtures;
    use crate::token::issuer::TokenIssuer;
    use crate::token::types::{IssuancePath, SignatureAlgorithm, TokenSpec, TokenSpecBuilder};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap()
    }

    fn ms(value: i64) -> TimeDelta {
        TimeDelta::milliseconds(value)
    }

    fn jdoe() -> PrincipalId {
        PrincipalId::new("jdoe", "acme.local")
    }

    fn bearer_spec(lifetime_ms: i64) -> TokenSpec {
        TokenSpecBuilder::default()
            .subject(jdoe())
            .confirmation(Confirmation::bearer())
            .requested_lifetime_ms(lifetime_ms)
            .audience(["https://vc.acme.local".to_string()])
            .build()
            .unwrap()
    }

    fn issue(tenant: &TenantTrustConfig, spec: &TokenSpec) -> IssuedToken {
        let requester = spec.delegation_chain.last().unwrap_or(&spec.subject).clone();
        TokenIssuer::new(&TokenSection::default())
            .issue(tenant, &requester, spec, IssuancePath::Fresh, t0())
            .unwrap()
    }

    #[test]
    fn test_validity_window() {
        let tenant = fixtures::tenant_config("acme.local");
        let token = issue(&tenant, &bearer_spec(300_000));
        assert_eq!(t0() + ms(300_000), token.not_on_or_after());

        assert!(validate(&tenant, &token, None, None, t0() + ms(301_500)).is_ok());
        if let Err(TokenProviderError::TokenExpired) =
            validate(&tenant, &token, None, None, t0() + ms(302_500))
        {
        } else {
            panic!("token must be expired");
        }
        // expanded end is excluded
        if let Err(TokenProviderError::TokenExpired) =
            validate(&tenant, &token, None, None, t0() + ms(302_000))
        {
        } else {
            panic!("token must be expired");
        }

        assert!(validate(&tenant, &token, None, None, t0() - ms(2000)).is_ok());
        if let Err(TokenProviderError::TokenNotYetValid) =
            validate(&tenant, &token, None, None, t0() - ms(2001))
        {
        } else {
            panic!("token must not be valid yet");
        }
    }

    #[test]
    fn test_zero_tolerance() {
        let tenant = fixtures::tenant_config_builder("acme.local")
            .clock_tolerance_ms(0)
            .build()
            .unwrap();
        let token = issue(&tenant, &bearer_spec(300_000));
        let period = TimePeriod::bounded(token.not_before(), token.not_on_or_after()).unwrap();

        for offset in [-1, 0, 1, 299_999, 300_000, 300_001] {
            let now = t0() + ms(offset);
            assert_eq!(
                period.contains(&now),
                validate(&tenant, &token, None, None, now).is_ok(),
                "offset {offset}"
            );
        }
    }

    #[test]
    fn test_idempotent() {
        let tenant = fixtures::tenant_config("acme.local");
        let token = issue(&tenant, &bearer_spec(300_000));
        let now = t0() + ms(1000);
        let first = validate(&tenant, &token, Some("https://vc.acme.local"), None, now);
        let second = validate(&tenant, &token, Some("https://vc.acme.local"), None, now);
        assert!(first.is_ok() && second.is_ok());

        let now = t0() + ms(900_000);
        let first = validate(&tenant, &token, None, None, now);
        let second = validate(&tenant, &token, None, None, now);
        assert_eq!(first.unwrap_err().to_string(), second.unwrap_err().to_string());
    }

    #[test]
    fn test_tampered() {
        let tenant = fixtures::tenant_config("acme.local");
        let token = issue(&tenant, &bearer_spec(300_000));

        let (mut assertion, signature) = token.clone().into_parts();
        assertion.not_on_or_after = assertion.not_on_or_after + ms(3_600_000);
        let forged = IssuedToken::from_parts(assertion, signature);
        if let Err(TokenProviderError::SignatureValidationFailed(..)) =
            validate(&tenant, &forged, None, None, t0())
        {
        } else {
            panic!("modified token must be rejected");
        }

        let (assertion, mut signature) = token.into_parts();
        signature.value[0] ^= 0xff;
        let forged = IssuedToken::from_parts(assertion, signature);
        if let Err(TokenProviderError::SignatureValidationFailed(..)) =
            validate(&tenant, &forged, None, None, t0())
        {
        } else {
            panic!("modified signature must be rejected");
        }
    }

    #[test]
    fn test_swapped_name_and_domain() {
        let tenant = fixtures::tenant_config("acme.local");
        let admin = PrincipalId::new("admin", "acme.local@guest.local");
        let spec = TokenSpecBuilder::default()
            .subject(admin)
            .confirmation(Confirmation::bearer())
            .requested_lifetime_ms(300_000)
            .delegation_chain(vec![PrincipalId::new("svc", "acme.local@guest.local")])
            .build()
            .unwrap();
        let token = issue(&tenant, &spec);
        assert!(validate(&tenant, &token, None, None, t0()).is_ok());

        // same `name@domain` rendering with a different split
        let (mut assertion, signature) = token.clone().into_parts();
        assertion.subject = PrincipalId::new("admin@acme.local", "guest.local");
        let forged = IssuedToken::from_parts(assertion, signature);
        if let Err(TokenProviderError::SignatureValidationFailed(..)) =
            validate(&tenant, &forged, None, None, t0())
        {
        } else {
            panic!("swapped subject must be rejected");
        }

        let (mut assertion, signature) = token.into_parts();
        assertion.delegation_chain = vec![PrincipalId::new("svc@acme.local", "guest.local")];
        let forged = IssuedToken::from_parts(assertion, signature);
        if let Err(TokenProviderError::SignatureValidationFailed(..)) =
            validate(&tenant, &forged, None, None, t0())
        {
        } else {
            panic!("swapped delegate must be rejected");
        }
    }

    #[test]
    fn test_untrusted_signer() {
        let tenant = fixtures::tenant_config("acme.local");
        let other = fixtures::tenant_config_builder("other.local")
            .signing_key(fixtures::other_signing_key())
            .signing_chain(fixtures::other_chain())
            .valid_chains(vec![fixtures::other_chain()])
            .build()
            .unwrap();
        let token = issue(&other, &bearer_spec(300_000));
        assert!(validate(&other, &token, None, None, t0()).is_ok());
        if let Err(TokenProviderError::SignatureValidationFailed(..)) =
            validate(&tenant, &token, None, None, t0())
        {
        } else {
            panic!("token of an untrusted signer must be rejected");
        }

        // trusting the signer of the other tenant as well
        let both = fixtures::tenant_config_builder("acme.local")
            .valid_chains(vec![fixtures::signing_chain(), fixtures::other_chain()])
            .build()
            .unwrap();
        assert!(validate(&both, &token, None, None, t0()).is_ok());

        // the leaf must be unambiguous
        let ambiguous = fixtures::tenant_config_builder("acme.local")
            .valid_chains(vec![
                fixtures::signing_chain(),
                fixtures::signing_chain()[..1].to_vec(),
            ])
            .build()
            .unwrap();
        let token = issue(&ambiguous, &bearer_spec(300_000));
        if let Err(TokenProviderError::SignatureValidationFailed(..)) =
            validate(&ambiguous, &token, None, None, t0())
        {
        } else {
            panic!("certificate being the leaf of several chains must be rejected");
        }
    }

    #[test]
    fn test_sha512() {
        let tenant = fixtures::tenant_config_builder("acme.local")
            .signature_algorithm(SignatureAlgorithm::RsaSha512)
            .build()
            .unwrap();
        let token = issue(&tenant, &bearer_spec(300_000));
        assert!(validate(&tenant, &token, None, None, t0()).is_ok());
    }

    fn restrictions(max_delegation_count: u32, max_renew_count: u32) -> TokenRestrictions {
        TokenRestrictionsBuilder::default()
            .max_bearer_lifetime_ms(600_000)
            .max_hok_lifetime_ms(2_592_000_000i64)
            .max_delegation_count(max_delegation_count)
            .max_renew_count(max_renew_count)
            .build()
            .unwrap()
    }

    #[test]
    fn test_restriction_tightening() {
        let tenant = fixtures::tenant_config("acme.local");
        let mut spec = bearer_spec(300_000);
        spec.delegation_chain = vec![PrincipalId::new("svc-vc", "acme.local")];
        spec.renew_count_so_far = 2;
        let token = issue(&tenant, &spec);
        assert!(validate(&tenant, &token, None, None, t0()).is_ok());

        let tightened = fixtures::tenant_config_builder("acme.local")
            .restrictions(restrictions(0, 3))
            .build()
            .unwrap();
        if let Err(TokenProviderError::TokenRestrictionExceeded(
            RestrictionViolation::Delegation { depth, max },
        )) = validate(&tightened, &token, None, None, t0())
        {
            assert_eq!(1, depth);
            assert_eq!(0, max);
        } else {
            panic!("delegated token must be rejected");
        }

        let tightened = fixtures::tenant_config_builder("acme.local")
            .restrictions(restrictions(1, 1))
            .build()
            .unwrap();
        if let Err(TokenProviderError::TokenRestrictionExceeded(
            RestrictionViolation::Renewal { count, max },
        )) = validate(&tightened, &token, None, None, t0())
        {
            assert_eq!(2, count);
            assert_eq!(1, max);
        } else {
            panic!("renewed token must be rejected");
        }
    }

    #[test]
    fn test_audience() {
        let tenant = fixtures::tenant_config("acme.local");
        let token = issue(&tenant, &bearer_spec(300_000));
        assert!(validate(&tenant, &token, Some("https://vc.acme.local"), None, t0()).is_ok());
        if let Err(TokenProviderError::AudienceMismatch(audience)) =
            validate(&tenant, &token, Some("https://nsx.acme.local"), None, t0())
        {
            assert_eq!("https://nsx.acme.local", audience);
        } else {
            panic!("foreign audience must be rejected");
        }
    }

    #[test]
    fn test_holder_of_key() {
        let tenant = fixtures::tenant_config("acme.local");
        let spec = TokenSpecBuilder::default()
            .subject(jdoe())
            .confirmation(Confirmation::holder_of_key(fixtures::hok_public_key()))
            .requested_lifetime_ms(86_400_000)
            .build()
            .unwrap();
        let token = issue(&tenant, &spec);

        let proof =
            PossessionProof::sign(&fixtures::hok_key(), token.assertion_id(), "nonce-1").unwrap();
        assert!(validate(&tenant, &token, None, Some(&proof), t0()).is_ok());

        if let Err(TokenProviderError::ProofOfPossessionFailed) =
            validate(&tenant, &token, None, None, t0())
        {
        } else {
            panic!("missing proof must be rejected");
        }

        let proof =
            PossessionProof::sign(&fixtures::signing_key(), token.assertion_id(), "nonce-1")
                .unwrap();
        if let Err(TokenProviderError::ProofOfPossessionFailed) =
            validate(&tenant, &token, None, Some(&proof), t0())
        {
        } else {
            panic!("proof with a foreign key must be rejected");
        }

        // bearer tokens ignore the proof
        let token = issue(&tenant, &bearer_spec(300_000));
        assert!(validate(&tenant, &token, None, Some(&proof), t0()).is_ok());
    }

    #[test]
    fn test_holder_of_key_proof_replay() {
        let tenant = fixtures::tenant_config("acme.local");
        let spec = TokenSpecBuilder::default()
            .subject(jdoe())
            .confirmation(Confirmation::holder_of_key(fixtures::hok_public_key()))
            .requested_lifetime_ms(86_400_000)
            .build()
            .unwrap();
        let token_a = issue(&tenant, &spec);
        let token_b = issue(&tenant, &spec);

        let proof =
            PossessionProof::sign(&fixtures::hok_key(), token_a.assertion_id(), "nonce-1").unwrap();
        assert!(validate(&tenant, &token_a, None, Some(&proof), t0()).is_ok());
        if let Err(TokenProviderError::ProofOfPossessionFailed) =
            validate(&tenant, &token_b, None, Some(&proof), t0())
        {
        } else {
            panic!("proof of another token must be rejected");
        }

        // the relying party expects a fresh challenge
        let replayed = PossessionProof::new("nonce-2", proof.signature());
        if let Err(TokenProviderError::ProofOfPossessionFailed) =
            validate(&tenant, &token_a, None, Some(&replayed), t0())
        {
        } else {
            panic!("proof over another challenge must be rejected");
        }
    }
}
