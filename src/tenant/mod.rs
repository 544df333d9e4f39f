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
//! # Tenant provider
//!
//! Every tenant owns an independent trust configuration: the identity it
//! signs the tokens with, the certificate chains it trusts for the token
//! validation, the accepted clock disagreement, the token restrictions and
//! the registered external identity providers.
//!
//! The configuration itself is read by a configuration extractor (see
//! [backend::ConfigExtractor]). The provider validates it once and keeps the
//! resulting immutable snapshot shared (`Arc`) between all the concurrent
//! issuances and validations. A configuration change never touches an
//! existing snapshot: the tenant is invalidated and the next resolution builds
//! a new one, while the requests still running keep using the previous one.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, trace};

pub mod backend;
pub mod error;
#[cfg(test)]
mod mock;
pub mod types;

use crate::config::Config;
use crate::plugin_manager::PluginManager;
use backend::{ConfigExtractor, FileConfigExtractor};
use types::TenantTrustConfig;

pub use error::TenantProviderError;
#[cfg(test)]
pub use mock::MockTenantProvider;
pub use types::TenantApi;

/// Tenant provider.
pub struct TenantProvider {
    /// Configuration extractor.
    backend_driver: Arc<dyn ConfigExtractor>,

    /// Validated configuration snapshots.
    snapshots: RwLock<Snapshots>,
}

#[derive(Default)]
struct Snapshots {
    configs: HashMap<String, Arc<TenantTrustConfig>>,
    /// Number of invalidations per tenant.
    generations: HashMap<String, u64>,
}

impl Snapshots {
    fn generation(&self, tenant: &str) -> u64 {
        self.generations.get(tenant).copied().unwrap_or_default()
    }
}

impl TenantProvider {
    pub fn new(
        config: &Config,
        plugin_manager: &PluginManager,
    ) -> Result<Self, TenantProviderError> {
        let backend_driver = if let Some(driver) =
            plugin_manager.get_config_extractor(config.tenant.driver.clone())
        {
            driver.clone()
        } else {
            match config.tenant.driver.as_str() {
                "file" => Arc::new(FileConfigExtractor::new(config.tenant.config_dir.clone())),
                _ => {
                    return Err(TenantProviderError::UnsupportedDriver(
                        config.tenant.driver.clone(),
                    ));
                }
            }
        };
        Ok(Self::with_backend(backend_driver))
    }

    /// Build the provider around the given configuration extractor.
    pub fn with_backend(backend_driver: Arc<dyn ConfigExtractor>) -> Self {
        Self {
            backend_driver,
            snapshots: RwLock::new(Snapshots::default()),
        }
    }
}

#[async_trait]
impl TenantApi for TenantProvider {
    /// Get the tenant configuration snapshot.
    #[tracing::instrument(level = "info", skip(self))]
    async fn get_config<'a>(
        &self,
        tenant: &'a str,
    ) -> Result<Arc<TenantTrustConfig>, TenantProviderError> {
        let generation = {
            let read_guard = self.snapshots.read().await;
            if let Some(config) = read_guard.configs.get(tenant) {
                trace!("using cached configuration of the tenant {}", tenant);
                return Ok(Arc::clone(config));
            }
            read_guard.generation(tenant)
        };

        // The lock is not held while the extractor is working.
        let config = self.backend_driver.get_config(tenant).await?;
        if config.tenant() != tenant {
            return Err(TenantProviderError::SystemConfiguration {
                tenant: tenant.into(),
                reason: format!("extractor returned configuration of {}", config.tenant()),
            });
        }
        debug!(
            "resolved configuration of the tenant {}: {:?}",
            tenant, config
        );

        let mut write_guard = self.snapshots.write().await;
        if write_guard.generation(tenant) != generation {
            debug!(
                "configuration of the tenant {} was invalidated during the resolution",
                tenant
            );
            return Ok(Arc::new(config));
        }
        // Concurrent resolution of the same tenant may have been faster.
        let snapshot = write_guard
            .configs
            .entry(tenant.to_string())
            .or_insert_with(|| Arc::new(config));
        Ok(Arc::clone(snapshot))
    }

    /// Invalidate the tenant configuration snapshot.
    #[tracing::instrument(level = "info", skip(self))]
    async fn invalidate<'a>(&self, tenant: &'a str) {
        let mut write_guard = self.snapshots.write().await;
        *write_guard.generations.entry(tenant.to_string()).or_default() += 1;
        if write_guard.configs.remove(tenant).is_some() {
            debug!("dropped configuration snapshot of the tenant {}", tenant);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    use super::*;
    use crate::tenant::backend::MockConfigExtractor;
    use crate::tests::fixtures;

    #[tokio::test]
    async fn test_get_config_cached() {
        let mut extractor = MockConfigExtractor::default();
        extractor
            .expect_get_config()
            .withf(|tenant: &str| tenant == "acme.local")
            .times(1)
            .returning(|tenant: &str| Ok(fixtures::tenant_config(tenant)));
        let provider = TenantProvider::with_backend(Arc::new(extractor));

        let first = provider.get_config("acme.local").await.unwrap();
        let second = provider.get_config("acme.local").await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_invalidate_produces_new_snapshot() {
        let mut extractor = MockConfigExtractor::default();
        extractor
            .expect_get_config()
            .times(2)
            .returning(|tenant: &str| Ok(fixtures::tenant_config(tenant)));
        let provider = TenantProvider::with_backend(Arc::new(extractor));

        let first = provider.get_config("acme.local").await.unwrap();
        provider.invalidate("acme.local").await;
        let second = provider.get_config("acme.local").await.unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        // The old snapshot stays usable by whoever still holds it.
        assert_eq!("acme.local", first.tenant());
    }

    /// Extractor holding the first resolution until released.
    #[derive(Default)]
    struct SlowExtractor {
        calls: AtomicUsize,
        entered: Notify,
        release: Notify,
    }

    #[async_trait]
    impl ConfigExtractor for SlowExtractor {
        async fn get_config<'a>(
            &self,
            tenant: &'a str,
        ) -> Result<TenantTrustConfig, TenantProviderError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                self.entered.notify_one();
                self.release.notified().await;
            }
            Ok(fixtures::tenant_config(tenant))
        }
    }

    #[tokio::test]
    async fn test_invalidate_during_resolution() {
        let extractor = Arc::new(SlowExtractor::default());
        let provider = Arc::new(TenantProvider::with_backend(extractor.clone()));

        let pending = {
            let provider = provider.clone();
            tokio::spawn(async move { provider.get_config("acme.local").await })
        };
        extractor.entered.notified().await;
        provider.invalidate("acme.local").await;
        extractor.release.notify_one();
        let stale = pending.await.unwrap().unwrap();

        // the resolution started before the invalidation is not cached
        let fresh = provider.get_config("acme.local").await.unwrap();
        assert!(!Arc::ptr_eq(&stale, &fresh));
        assert_eq!(2, extractor.calls.load(Ordering::SeqCst));

        let cached = provider.get_config("acme.local").await.unwrap();
        assert!(Arc::ptr_eq(&fresh, &cached));
        assert_eq!(2, extractor.calls.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let mut extractor = MockConfigExtractor::default();
        extractor
            .expect_get_config()
            .times(2)
            .returning(|tenant: &str| Err(TenantProviderError::NoSuchIdp(tenant.into())));
        let provider = TenantProvider::with_backend(Arc::new(extractor));

        for _ in 0..2 {
            if let Err(TenantProviderError::NoSuchIdp(tenant)) =
                provider.get_config("vsphere.local").await
            {
                assert_eq!("vsphere.local", tenant);
            } else {
                panic!("unknown tenant must not be resolved");
            }
        }
    }

    #[tokio::test]
    async fn test_extractor_returning_foreign_tenant() {
        let mut extractor = MockConfigExtractor::default();
        extractor
            .expect_get_config()
            .returning(|_| Ok(fixtures::tenant_config("other.local")));
        let provider = TenantProvider::with_backend(Arc::new(extractor));

        if let Err(TenantProviderError::SystemConfiguration { .. }) =
            provider.get_config("acme.local").await
        {
        } else {
            panic!("configuration of another tenant must not be accepted");
        }
    }

    #[test]
    fn test_unsupported_driver() {
        let mut config = Config::default();
        config.tenant.driver = "ldap".into();
        if let Err(TenantProviderError::UnsupportedDriver(driver)) =
            TenantProvider::new(&config, &PluginManager::default())
        {
            assert_eq!("ldap", driver);
        } else {
            panic!("unknown driver must be rejected");
        }
        assert!(TenantProvider::new(&Config::default(), &PluginManager::default()).is_ok());
    }
}
