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
//! Tenant trust configuration.

use derive_builder::Builder;
use rsa::{RsaPrivateKey, RsaPublicKey};
use std::collections::BTreeMap;
use std::fmt;
use tracing::error;
use validator::Validate;

use crate::error::BuilderError;
use crate::tenant::error::TenantProviderError;
use crate::tenant::types::{Certificate, IdpConfig, TokenRestrictions};
use crate::token::types::SignatureAlgorithm;

/// Immutable trust configuration of a single tenant.
///
/// The configuration can only be obtained through
/// [TenantTrustConfigBuilder::build] which enforces the invariants:
///
/// - there is at least one valid chain and no valid chain is empty,
/// - the clock tolerance is not negative,
/// - the signing chain is (element by element) one of the valid chains,
/// - the signing key belongs to the leaf certificate of the signing chain,
/// - the token restrictions and the external identity providers are sane.
#[derive(Builder, Clone)]
#[builder(pattern = "owned")]
#[builder(build_fn(private, name = "build_unchecked", error = "BuilderError"))]
#[builder(setter(into))]
pub struct TenantTrustConfig {
    /// Tenant name.
    tenant: String,

    /// Issuer put into every token of the tenant.
    issuer: String,

    /// Private key the tokens are signed with.
    signing_key: RsaPrivateKey,

    /// Certificate chain of the signing key (leaf first).
    signing_chain: Vec<Certificate>,

    /// Signature algorithm of the tenant. Service default applies when unset.
    #[builder(default, setter(strip_option))]
    signature_algorithm: Option<SignatureAlgorithm>,

    /// Chains trusted for the token signature validation (leaf first).
    valid_chains: Vec<Vec<Certificate>>,

    /// Accepted clock disagreement (in milliseconds).
    #[builder(default)]
    clock_tolerance_ms: i64,

    /// Token restrictions.
    restrictions: TokenRestrictions,

    /// External identity providers keyed by their entity ID.
    #[builder(default)]
    external_idps: BTreeMap<String, IdpConfig>,
}

impl TenantTrustConfigBuilder {
    /// Build the configuration enforcing its invariants.
    pub fn build(self) -> Result<TenantTrustConfig, TenantProviderError> {
        let config = self.build_unchecked()?;
        config.check_invariants()?;
        Ok(config)
    }
}

impl TenantTrustConfig {
    fn check_invariants(&self) -> Result<(), TenantProviderError> {
        if self.issuer.trim().is_empty() {
            return Err(TenantProviderError::EmptyIssuer(self.tenant.clone()));
        }
        if self.valid_chains.is_empty() {
            return Err(TenantProviderError::NoValidChains(self.tenant.clone()));
        }
        if let Some(idx) = self.valid_chains.iter().position(|chain| chain.is_empty()) {
            return Err(TenantProviderError::EmptyValidChain {
                tenant: self.tenant.clone(),
                index: idx,
            });
        }
        if self.clock_tolerance_ms < 0 {
            return Err(TenantProviderError::NegativeClockTolerance {
                tenant: self.tenant.clone(),
                tolerance: self.clock_tolerance_ms,
            });
        }
        if !self
            .valid_chains
            .iter()
            .any(|chain| *chain == self.signing_chain)
        {
            error!(
                "signing chain of the tenant {} is not among its valid chains",
                self.tenant
            );
            return Err(TenantProviderError::SigningChainNotTrusted(
                self.tenant.clone(),
            ));
        }
        if self.signing_certificate().public_key()? != RsaPublicKey::from(&self.signing_key) {
            error!(
                "signing key of the tenant {} does not match the signing certificate {}",
                self.tenant,
                self.signing_certificate().subject()
            );
            return Err(TenantProviderError::SigningKeyMismatch(self.tenant.clone()));
        }
        self.restrictions.validate()?;
        for (entity_id, idp) in self.external_idps.iter() {
            if *entity_id != idp.entity_id {
                return Err(TenantProviderError::InvalidIdp {
                    entity_id: entity_id.clone(),
                    reason: format!("registered under a different entity id {}", idp.entity_id),
                });
            }
            idp.check().map_err(|reason| TenantProviderError::InvalidIdp {
                entity_id: entity_id.clone(),
                reason,
            })?;
        }
        Ok(())
    }

    pub fn tenant(&self) -> &str {
        &self.tenant
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn signing_key(&self) -> &RsaPrivateKey {
        &self.signing_key
    }

    pub fn signing_chain(&self) -> &[Certificate] {
        &self.signing_chain
    }

    /// Leaf certificate of the signing chain.
    pub fn signing_certificate(&self) -> &Certificate {
        // non-empty since it equals one of the (non-empty) valid chains
        &self.signing_chain[0]
    }

    pub fn signature_algorithm(&self) -> Option<SignatureAlgorithm> {
        self.signature_algorithm
    }

    pub fn valid_chains(&self) -> &[Vec<Certificate>] {
        &self.valid_chains
    }

    /// Valid chains having the certificate as their leaf.
    pub fn chains_with_leaf<'a>(
        &'a self,
        leaf: &'a Certificate,
    ) -> impl Iterator<Item = &'a Vec<Certificate>> + 'a {
        self.valid_chains
            .iter()
            .filter(move |chain| chain.first() == Some(leaf))
    }

    pub fn clock_tolerance_ms(&self) -> i64 {
        self.clock_tolerance_ms
    }

    pub fn restrictions(&self) -> &TokenRestrictions {
        &self.restrictions
    }

    pub fn external_idps(&self) -> &BTreeMap<String, IdpConfig> {
        &self.external_idps
    }
}

impl fmt::Debug for TenantTrustConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TenantTrustConfig")
            .field("tenant", &self.tenant)
            .field("issuer", &self.issuer)
            .field("signing_certificate", &self.signing_certificate().subject())
            .field("signature_algorithm", &self.signature_algorithm)
            .field("valid_chains", &self.valid_chains.len())
            .field("clock_tolerance_ms", &self.clock_tolerance_ms)
            .field("restrictions", &self.restrictions)
            .field("external_idps", &self.external_idps.keys())
            .finish()
    }
}
