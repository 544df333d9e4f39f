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
//! Token request.

use std::collections::{BTreeMap, BTreeSet};

use derive_builder::Builder;
use validator::Validate;

use crate::error::BuilderError;
use crate::identity::types::PrincipalId;
use crate::token::types::{AuthenticationData, Confirmation};

/// Parameters of the token to issue.
#[derive(Builder, Clone, Debug, PartialEq, Validate)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(into))]
pub struct TokenSpec {
    /// Subject of the token.
    pub subject: PrincipalId,

    pub confirmation: Confirmation,

    /// Requested lifetime in milliseconds.
    #[validate(range(min = 1))]
    pub requested_lifetime_ms: i64,

    /// Whether the token can be renewed.
    #[builder(default)]
    pub renewable: bool,

    /// Whether the token can be delegated further.
    #[builder(default)]
    pub delegable: bool,

    /// Relying parties the token is intended for.
    #[builder(default)]
    pub audience: BTreeSet<String>,

    /// Principals acting on behalf of the subject, in delegation order.
    #[builder(default)]
    pub delegation_chain: Vec<PrincipalId>,

    /// Number of renewals the token went through before this request.
    #[builder(default)]
    pub renew_count_so_far: u32,

    /// Groups of the subject.
    #[builder(default)]
    pub groups: Vec<PrincipalId>,

    /// Opaque attributes copied into the token.
    #[builder(default)]
    pub advice: BTreeMap<String, String>,

    #[builder(default, setter(strip_option))]
    pub authentication: Option<AuthenticationData>,
}

/// Whether a token is issued from scratch or renews an existing one.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IssuancePath {
    Fresh,
    Renewal,
}

impl TokenSpec {
    /// Renew count the issued token carries.
    pub fn resulting_renew_count(&self, path: IssuancePath) -> u64 {
        match path {
            IssuancePath::Fresh => u64::from(self.renew_count_so_far),
            IssuancePath::Renewal => u64::from(self.renew_count_so_far) + 1,
        }
    }
}
