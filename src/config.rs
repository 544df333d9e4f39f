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
//! # STS configuration
//!
//! Parsing of the STS configuration file. The configuration is an INI file
//! with the following sections:
//!
//! - `[DEFAULT]`: generic options.
//! - `[tenant]`: source and caching of the per-tenant trust configuration.
//! - `[identity]`: directory backend verifying the credentials.
//! - `[continuation]`: store of the multi round trip authentication state.
//! - `[token]`: token issuance defaults.
use config::{File, FileFormat};
use eyre::{Report, WrapErr};
use serde::Deserialize;
use std::path::PathBuf;

mod continuation;
mod default;
mod identity;
mod tenant;
mod token;

pub use continuation::ContinuationSection;
pub use default::DefaultSection;
pub use identity::IdentitySection;
pub use tenant::TenantSection;
pub use token::TokenSection;

#[derive(Debug, Default, Deserialize, Clone)]
pub struct Config {
    /// Global configuration options.
    #[serde(rename = "DEFAULT", default)]
    pub default: DefaultSection,

    /// Authentication continuation store.
    #[serde(default)]
    pub continuation: ContinuationSection,

    /// Directory (identity) backend.
    #[serde(default)]
    pub identity: IdentitySection,

    /// Tenant trust configuration source.
    #[serde(default)]
    pub tenant: TenantSection,

    /// Token issuance.
    #[serde(default)]
    pub token: TokenSection,
}

impl Config {
    pub fn new(path: PathBuf) -> Result<Self, Report> {
        let mut builder = config::Config::builder();

        if std::path::Path::new(&path).is_file() {
            builder = builder.add_source(File::from(path).format(FileFormat::Ini));
        }

        builder.try_into()
    }
}

impl TryFrom<config::ConfigBuilder<config::builder::DefaultState>> for Config {
    type Error = Report;
    fn try_from(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, Self::Error> {
        let mut builder = builder;
        builder = builder
            .set_default("continuation.ttl", "300")?
            .set_default("continuation.max_capacity", "10000")?
            .set_default("tenant.driver", "file")?
            .set_default("tenant.config_dir", "/etc/sts/tenants")?
            .set_default("token.signature_algorithm", "rsa-sha256")?
            .set_default("token.subject_confirmation_margin", "1000")?;

        builder
            .build()
            .wrap_err("Failed to read configuration file")?
            .try_deserialize()
            .wrap_err("Failed to parse configuration file")
    }
}

#[cfg(test)]
mod tests {
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    use super::*;
    use crate::token::types::SignatureAlgorithm;

    #[test]
    fn test_defaults() {
        let config = Config::try_from(config::Config::builder()).unwrap();
        assert_eq!(300, config.continuation.ttl);
        assert_eq!(10_000, config.continuation.max_capacity);
        assert_eq!("file", config.tenant.driver);
        assert_eq!(PathBuf::from("/etc/sts/tenants"), config.tenant.config_dir);
        assert_eq!(
            SignatureAlgorithm::RsaSha256,
            config.token.signature_algorithm
        );
        assert_eq!(1000, config.token.subject_confirmation_margin);
        assert!(!config.default.debug);
    }

    #[test]
    fn test_read_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sts.conf");
        let mut file = File::create(&path).unwrap();
        write!(
            file,
            r#"
[DEFAULT]
debug = true

[continuation]
ttl = 60
max_capacity = 128

[identity]
driver = ldap

[tenant]
config_dir = /var/lib/sts/tenants

[token]
signature_algorithm = rsa-sha512
subject_confirmation_margin = 0
"#
        )
        .unwrap();

        let config = Config::new(path).unwrap();
        assert!(config.default.debug);
        assert_eq!(60, config.continuation.ttl);
        assert_eq!(128, config.continuation.max_capacity);
        assert_eq!("ldap", config.identity.driver);
        assert_eq!(
            PathBuf::from("/var/lib/sts/tenants"),
            config.tenant.config_dir
        );
        assert_eq!(
            SignatureAlgorithm::RsaSha512,
            config.token.signature_algorithm
        );
        assert_eq!(0, config.token.subject_confirmation_margin);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::new(dir.path().join("absent.conf")).unwrap();
        assert_eq!(300, config.continuation.ttl);
    }
}
