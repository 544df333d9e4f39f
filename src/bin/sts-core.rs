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
//! Operator tooling of the security token service.
//!
//! This is the entry point of the `sts-core` binary.

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Report, Result};
use eyre::WrapErr;
use std::io;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{Layer, filter::LevelFilter, prelude::*};

use sts_core::config::Config;
use sts_core::plugin_manager::PluginManager;
use sts_core::tenant::{TenantApi, TenantProvider};

/// Security Token Service.
///
/// Multi-tenant service authenticating the callers and issuing signed identity
/// tokens.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the STS config file.
    #[arg(short, long, default_value = "/etc/sts/sts.conf")]
    config: PathBuf,

    /// Verbosity level. Repeat to increase level.
    #[arg(short, long, global=true, action = clap::ArgAction::Count, display_order = 920)]
    pub verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve and validate the trust configuration of the tenant.
    CheckTenant {
        /// Tenant name.
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Report> {
    color_eyre::install()?;
    let args = Args::parse();

    let cfg = Config::new(args.config)?;

    let verbosity = if cfg.default.debug {
        args.verbose.max(2)
    } else {
        args.verbose
    };
    let log_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_filter(match verbosity {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        });

    // build the tracing registry
    tracing_subscriber::registry().with(log_layer).init();

    match args.command {
        Command::CheckTenant { name } => {
            info!("Checking the tenant {}", name);
            let provider = TenantProvider::new(&cfg, &PluginManager::default())?;
            let tenant = provider
                .get_config(&name)
                .await
                .wrap_err_with(|| format!("Configuration of the tenant {name} is not usable"))?;

            let restrictions = tenant.restrictions();
            println!("tenant:              {}", tenant.tenant());
            println!("issuer:              {}", tenant.issuer());
            println!(
                "signing certificate: {} (sha256 {})",
                tenant.signing_certificate().subject(),
                tenant.signing_certificate().thumbprint()
            );
            println!(
                "signature algorithm: {}",
                tenant
                    .signature_algorithm()
                    .unwrap_or(cfg.token.signature_algorithm)
                    .uri()
            );
            println!("valid chains:        {}", tenant.valid_chains().len());
            println!("clock tolerance:     {}ms", tenant.clock_tolerance_ms());
            println!(
                "token lifetime:      bearer {}ms, holder-of-key {}ms",
                restrictions.max_bearer_lifetime_ms, restrictions.max_hok_lifetime_ms
            );
            println!(
                "token usage:         delegation {}, renewal {}",
                restrictions.max_delegation_count, restrictions.max_renew_count
            );
            for idp in tenant.external_idps().values() {
                println!(
                    "external idp:        {} ({} signing certificates)",
                    idp.entity_id,
                    idp.signing_certificates.len()
                );
            }
        }
    }
    Ok(())
}
