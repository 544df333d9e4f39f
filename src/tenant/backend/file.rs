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
//! # File based configuration extractor.
//!
//! Every tenant is described by the `<config_dir>/<tenant>.json` document:
//!
//! ```json
//! {
//!   "issuer": "https://sts.acme.local/acme.local",
//!   "signing_key": "acme/signing.key",
//!   "signing_chain": "acme/signing_chain.pem",
//!   "valid_chains": ["acme/signing_chain.pem", "acme/previous_chain.pem"],
//!   "signature_algorithm": "rsa-sha256",
//!   "clock_tolerance_ms": 600000,
//!   "restrictions": {
//!     "max_bearer_lifetime_ms": 300000,
//!     "max_hok_lifetime_ms": 2592000000,
//!     "max_delegation_count": 10,
//!     "max_renew_count": 10
//!   },
//!   "external_idps": [
//!     {
//!       "entity_id": "https://idp.partner.example/metadata",
//!       "signing_certificates": "acme/partner.pem"
//!     }
//!   ]
//! }
//! ```
//!
//! The signing key is a PKCS#8 PEM document, the chains are PEM documents
//! with the certificates ordered from the leaf to the root. Relative paths
//! are resolved against the `config_dir`.

use async_trait::async_trait;
use rsa::RsaPrivateKey;
use rsa::pkcs8::DecodePrivateKey;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

use crate::tenant::TenantProviderError;
use crate::tenant::backend::ConfigExtractor;
use crate::tenant::types::*;
use crate::token::types::SignatureAlgorithm;

/// Tenant document.
#[derive(Debug, Deserialize)]
struct TenantDocument {
    issuer: String,
    signing_key: PathBuf,
    signing_chain: PathBuf,
    valid_chains: Vec<PathBuf>,
    #[serde(default)]
    signature_algorithm: Option<SignatureAlgorithm>,
    #[serde(default)]
    clock_tolerance_ms: i64,
    restrictions: TokenRestrictions,
    #[serde(default)]
    external_idps: Vec<IdpDocument>,
}

/// External identity provider entry of the tenant document.
#[derive(Debug, Deserialize)]
struct IdpDocument {
    entity_id: String,
    #[serde(default)]
    alias: Option<String>,
    signing_certificates: PathBuf,
    #[serde(default)]
    name_id_formats: Vec<String>,
}

/// Configuration extractor reading the per-tenant documents from a directory.
#[derive(Clone, Debug)]
pub struct FileConfigExtractor {
    config_dir: PathBuf,
}

impl FileConfigExtractor {
    pub fn new<P: Into<PathBuf>>(config_dir: P) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.config_dir.join(path)
        }
    }

    async fn read(&self, tenant: &str, path: &Path) -> Result<String, TenantProviderError> {
        let path = self.resolve(path);
        fs::read_to_string(&path)
            .await
            .map_err(|err| TenantProviderError::SystemConfiguration {
                tenant: tenant.into(),
                reason: format!("{}: {}", path.display(), err),
            })
    }

    async fn read_chain(
        &self,
        tenant: &str,
        path: &Path,
    ) -> Result<Vec<Certificate>, TenantProviderError> {
        Ok(Certificate::chain_from_pem(self.read(tenant, path).await?)?)
    }
}

/// Tenant names are used as file names, so only a conservative character set
/// is accepted.
fn is_valid_tenant_name(tenant: &str) -> bool {
    !tenant.is_empty()
        && !tenant.starts_with('.')
        && tenant
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
}

#[async_trait]
impl ConfigExtractor for FileConfigExtractor {
    #[tracing::instrument(level = "debug", skip(self))]
    async fn get_config<'a>(
        &self,
        tenant: &'a str,
    ) -> Result<TenantTrustConfig, TenantProviderError> {
        if !is_valid_tenant_name(tenant) {
            warn!("rejecting tenant name {:?}", tenant);
            return Err(TenantProviderError::NoSuchIdp(tenant.into()));
        }
        let path = self.config_dir.join(format!("{tenant}.json"));
        let raw = match fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("no configuration document {}", path.display());
                return Err(TenantProviderError::NoSuchIdp(tenant.into()));
            }
            Err(err) => {
                return Err(TenantProviderError::SystemConfiguration {
                    tenant: tenant.into(),
                    reason: format!("{}: {}", path.display(), err),
                });
            }
        };
        let document: TenantDocument =
            serde_json::from_str(&raw).map_err(|err| TenantProviderError::SystemConfiguration {
                tenant: tenant.into(),
                reason: format!("{}: {}", path.display(), err),
            })?;

        let signing_key = RsaPrivateKey::from_pkcs8_pem(
            &self.read(tenant, &document.signing_key).await?,
        )
        .map_err(|err| TenantProviderError::SigningKey {
            tenant: tenant.into(),
            reason: err.to_string(),
        })?;

        let mut valid_chains = Vec::with_capacity(document.valid_chains.len());
        for chain in document.valid_chains.iter() {
            valid_chains.push(self.read_chain(tenant, chain).await?);
        }

        let mut external_idps = BTreeMap::new();
        for idp in document.external_idps.into_iter() {
            let mut builder = IdpConfigBuilder::default();
            builder
                .entity_id(idp.entity_id.clone())
                .signing_certificates(self.read_chain(tenant, &idp.signing_certificates).await?)
                .name_id_formats(idp.name_id_formats);
            if let Some(alias) = idp.alias {
                builder.alias(alias);
            }
            external_idps.insert(idp.entity_id, builder.build()?);
        }

        let mut builder = TenantTrustConfigBuilder::default()
            .tenant(tenant)
            .issuer(document.issuer)
            .signing_key(signing_key)
            .signing_chain(self.read_chain(tenant, &document.signing_chain).await?)
            .valid_chains(valid_chains)
            .clock_tolerance_ms(document.clock_tolerance_ms)
            .restrictions(document.restrictions)
            .external_idps(external_idps);
        if let Some(algorithm) = document.signature_algorithm {
            builder = builder.signature_algorithm(algorithm);
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use std::fs::File;
    use std::io::Write;
    use tempfile::{TempDir, tempdir};

    use super::*;
    use crate::tests::fixtures;

    fn write(dir: &TempDir, name: &str, content: &str) {
        let mut file = File::create(dir.path().join(name)).unwrap();
        write!(file, "{content}").unwrap();
    }

    fn setup_dir(valid_chains: Vec<&str>) -> TempDir {
        let dir = tempdir().unwrap();
        write(&dir, "signing.key", fixtures::SIGNING_KEY_PEM);
        write(&dir, "signing_chain.pem", fixtures::SIGNING_CHAIN_PEM);
        write(&dir, "other_chain.pem", fixtures::OTHER_CHAIN_PEM);
        write(
            &dir,
            "acme.local.json",
            &json!({
                "issuer": "https://sts.acme.local/acme.local",
                "signing_key": "signing.key",
                "signing_chain": "signing_chain.pem",
                "valid_chains": valid_chains,
                "signature_algorithm": "rsa-sha384",
                "clock_tolerance_ms": 2000,
                "restrictions": {
                    "max_bearer_lifetime_ms": 600000,
                    "max_hok_lifetime_ms": 2592000000i64,
                    "max_delegation_count": 1,
                    "max_renew_count": 3
                },
                "external_idps": [{
                    "entity_id": "https://idp.partner.example/metadata",
                    "alias": "partner",
                    "signing_certificates": "other_chain.pem"
                }]
            })
            .to_string(),
        );
        dir
    }

    #[tokio::test]
    async fn test_get_config() {
        let dir = setup_dir(vec!["other_chain.pem", "signing_chain.pem"]);
        let extractor = FileConfigExtractor::new(dir.path());

        let config = extractor.get_config("acme.local").await.unwrap();
        assert_eq!("acme.local", config.tenant());
        assert_eq!("https://sts.acme.local/acme.local", config.issuer());
        assert_eq!(2, config.signing_chain().len());
        assert_eq!(2, config.valid_chains().len());
        assert_eq!(
            Some(SignatureAlgorithm::RsaSha384),
            config.signature_algorithm()
        );
        assert_eq!(2000, config.clock_tolerance_ms());
        assert_eq!(600_000, config.restrictions().max_bearer_lifetime_ms);
        assert_eq!(1, config.restrictions().max_delegation_count);
        let idp = config
            .external_idps()
            .get("https://idp.partner.example/metadata")
            .unwrap();
        assert_eq!(Some("partner".to_string()), idp.alias);
        assert_eq!(2, idp.signing_certificates.len());
    }

    #[tokio::test]
    async fn test_unknown_tenant() {
        let dir = setup_dir(vec!["signing_chain.pem"]);
        let extractor = FileConfigExtractor::new(dir.path());

        for tenant in ["vsphere.local", "../acme.local", ".hidden", ""] {
            if let Err(TenantProviderError::NoSuchIdp(name)) = extractor.get_config(tenant).await
            {
                assert_eq!(tenant, name);
            } else {
                panic!("tenant {tenant} must not be resolved");
            }
        }
    }

    #[tokio::test]
    async fn test_signing_chain_not_trusted() {
        let dir = setup_dir(vec!["other_chain.pem"]);
        let extractor = FileConfigExtractor::new(dir.path());

        if let Err(TenantProviderError::SigningChainNotTrusted(_)) =
            extractor.get_config("acme.local").await
        {
        } else {
            panic!("configuration with untrusted signing chain must be rejected");
        }
    }

    #[tokio::test]
    async fn test_broken_document() {
        let dir = setup_dir(vec!["signing_chain.pem"]);
        write(&dir, "broken.json", "{\"issuer\": ");
        write(
            &dir,
            "nokey.json",
            &json!({
                "issuer": "nokey",
                "signing_key": "missing.key",
                "signing_chain": "signing_chain.pem",
                "valid_chains": ["signing_chain.pem"],
                "restrictions": {
                    "max_bearer_lifetime_ms": 1,
                    "max_hok_lifetime_ms": 1,
                    "max_delegation_count": 0,
                    "max_renew_count": 0
                }
            })
            .to_string(),
        );
        let extractor = FileConfigExtractor::new(dir.path());

        for tenant in ["broken", "nokey"] {
            if let Err(TenantProviderError::SystemConfiguration { tenant: name, .. }) =
                extractor.get_config(tenant).await
            {
                assert_eq!(tenant, name);
            } else {
                panic!("unreadable configuration of {tenant} must be a system error");
            }
        }
    }
}
