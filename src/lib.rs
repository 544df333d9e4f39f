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

//! # Security Token Service core
//!
//! Multi-tenant Security Token Service (STS) core. The service authenticates
//! a caller through one of the supported credential mechanisms (password,
//! Kerberos/GSS, X.509 certificate chain, one-time passcode), resolves the
//! trust configuration of the tenant the caller belongs to and issues or
//! validates signed identity tokens (SAML style assertions) carrying the
//! subject, group memberships, confirmation method, validity window and usage
//! restrictions.
//!
//! The crate is organized around providers:
//!
//! - [tenant] resolves, validates and caches the immutable per-tenant trust
//!   configuration.
//!
//! - [auth] normalizes the authentication mechanisms into a single result
//!   taxonomy and keeps the continuation state of the multi round trip flows.
//!
//! - [token] issues, renews and validates the signed tokens.
//!
//! The directory backend that actually verifies the credentials and the
//! source of the tenant configuration are external collaborators plugged in
//! through the [plugin_manager::PluginManager].

pub mod auth;
pub mod config;
pub mod error;
pub mod identity;
pub mod plugin_manager;
pub mod provider;
pub mod sts;
pub mod tenant;
pub mod time_period;
pub mod token;

#[cfg(test)]
mod tests;
