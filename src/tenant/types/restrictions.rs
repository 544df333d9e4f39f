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
//! Token restrictions of the tenant.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::BuilderError;
use crate::token::types::Confirmation;

/// Limits every token issued (and accepted) by the tenant must respect.
#[derive(Builder, Clone, Debug, Deserialize, PartialEq, Serialize, Validate)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(into))]
pub struct TokenRestrictions {
    /// Maximal lifetime (in milliseconds) of bearer tokens.
    #[validate(range(min = 1))]
    pub max_bearer_lifetime_ms: i64,

    /// Maximal lifetime (in milliseconds) of holder-of-key tokens.
    #[validate(range(min = 1))]
    pub max_hok_lifetime_ms: i64,

    /// Maximal length of the delegation (act-as) chain.
    pub max_delegation_count: u32,

    /// Maximal number of times a token can be renewed.
    pub max_renew_count: u32,
}

impl TokenRestrictions {
    /// Lifetime cap for the confirmation method.
    pub fn max_lifetime_ms(&self, confirmation: &Confirmation) -> i64 {
        match confirmation {
            Confirmation::Bearer { .. } => self.max_bearer_lifetime_ms,
            Confirmation::HolderOfKey { .. } => self.max_hok_lifetime_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        let restrictions = TokenRestrictionsBuilder::default()
            .max_bearer_lifetime_ms(600_000)
            .max_hok_lifetime_ms(2_592_000_000i64)
            .max_delegation_count(10u32)
            .max_renew_count(10u32)
            .build()
            .unwrap();
        assert!(restrictions.validate().is_ok());

        let mut invalid = restrictions.clone();
        invalid.max_bearer_lifetime_ms = 0;
        assert!(invalid.validate().is_err());
        let mut invalid = restrictions;
        invalid.max_hok_lifetime_ms = -1;
        assert!(invalid.validate().is_err());
    }
}
