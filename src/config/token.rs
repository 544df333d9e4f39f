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
use chrono::TimeDelta;
use serde::Deserialize;

use crate::token::types::SignatureAlgorithm;

/// Token issuance.
#[derive(Debug, Deserialize, Clone)]
pub struct TokenSection {
    /// Signature algorithm used for tenants not configuring their own.
    #[serde(default)]
    pub signature_algorithm: SignatureAlgorithm,

    /// Margin (in milliseconds) by which the subject confirmation of bearer
    /// tokens expires before the token itself.
    #[serde(default = "default_subject_confirmation_margin")]
    pub subject_confirmation_margin: i64,
}

fn default_subject_confirmation_margin() -> i64 {
    1000
}

impl TokenSection {
    /// Subject confirmation margin. Negative values disable the margin.
    pub fn get_subject_confirmation_margin(&self) -> TimeDelta {
        TimeDelta::try_milliseconds(self.subject_confirmation_margin.max(0))
            .unwrap_or_else(TimeDelta::zero)
    }
}

impl Default for TokenSection {
    fn default() -> Self {
        Self {
            signature_algorithm: SignatureAlgorithm::default(),
            subject_confirmation_margin: default_subject_confirmation_margin(),
        }
    }
}
