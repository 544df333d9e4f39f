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
use serde::Deserialize;
use std::time::Duration;

/// Continuation store of the multi round trip authentication flows (GSS
/// contexts, one-time passcode sessions).
#[derive(Debug, Deserialize, Clone)]
pub struct ContinuationSection {
    /// Time (in seconds) after which an entry is evicted, whether the
    /// authentication flow completed or not.
    #[serde(default = "default_ttl")]
    pub ttl: u64,

    /// Maximal number of entries kept at the same time.
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
}

fn default_ttl() -> u64 {
    300
}

fn default_max_capacity() -> u64 {
    10_000
}

impl ContinuationSection {
    pub fn get_ttl(&self) -> Duration {
        Duration::from_secs(self.ttl)
    }
}

impl Default for ContinuationSection {
    fn default() -> Self {
        Self {
            ttl: default_ttl(),
            max_capacity: default_max_capacity(),
        }
    }
}
