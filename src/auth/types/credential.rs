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
//! Presented credentials.

use secrecy::SecretString;

use crate::token::types::AuthnMethod;

/// Credential presented by the caller.
#[derive(Clone, Debug)]
pub enum Credential {
    /// User principal name and password.
    Password {
        upn: String,
        password: SecretString,
    },
    /// Kerberos ticket (GSS token). The context ID is absent on the first
    /// leg of the negotiation and carries the ID returned by the previous leg
    /// afterwards.
    Gss {
        context_id: Option<String>,
        ticket: Vec<u8>,
    },
    /// DER encoded certificate chain, leaf first.
    Cert { chain: Vec<Vec<u8>> },
    /// One-time passcode (or the new PIN when requested). The session ID
    /// carries the ID of the session opened by a previous call.
    Otp {
        username: String,
        passcode: SecretString,
        session_id: Option<String>,
    },
}

impl Credential {
    /// Authentication method the credential stands for.
    pub fn method(&self) -> AuthnMethod {
        match self {
            Self::Password { .. } => AuthnMethod::Password,
            Self::Gss { .. } => AuthnMethod::Kerberos,
            Self::Cert { .. } => AuthnMethod::TlsClient,
            Self::Otp { .. } => AuthnMethod::TimeSyncToken,
        }
    }
}
