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
//! Identity backend types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Principal identifier.
#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct PrincipalId {
    /// Principal name.
    pub name: String,
    /// Domain of the principal.
    pub domain: String,
}

impl PrincipalId {
    pub fn new<N: Into<String>, D: Into<String>>(name: N, domain: D) -> Self {
        Self {
            name: name.into(),
            domain: domain.into(),
        }
    }

    /// User principal name (`name@domain`).
    pub fn upn(&self) -> String {
        format!("{}@{}", self.name, self.domain)
    }

    /// Whether the name can be told apart from the domain in the rendered
    /// `name@domain` and `name/domain` forms.
    pub fn has_separable_name(&self) -> bool {
        !self.name.contains(['@', '/'])
    }

    /// Whether any of the identifier parts is empty.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() || self.domain.is_empty()
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.domain)
    }
}

/// Result of a single GSS negotiation leg.
#[derive(Clone, Debug, PartialEq)]
pub enum GssResult {
    /// The security context is not established yet. The challenge must be
    /// passed to the client which answers with the next ticket.
    ContinueNeeded {
        /// Server leg of the negotiation.
        challenge: Vec<u8>,
    },
    /// The security context is established.
    Established {
        /// Authenticated principal.
        principal: PrincipalId,
    },
}

/// Result of the one-time passcode verification.
#[derive(Clone, Debug, PartialEq)]
pub enum OtpResult {
    /// Passcode accepted.
    Authenticated {
        /// Authenticated principal.
        principal: PrincipalId,
    },
    /// The user must choose a new PIN and resubmit it in the same session.
    NewPinRequired {
        /// Backend session correlating the resubmission.
        session_id: String,
    },
    /// The user must wait for the next token code and resubmit it in the
    /// same session.
    NextPasscodeRequired {
        /// Backend session correlating the resubmission.
        session_id: String,
    },
}
