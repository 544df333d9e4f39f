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
//! Authentication statement of the token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Mechanism the subject authenticated with.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthnMethod {
    Password,
    Kerberos,
    XmlDsig,
    TlsClient,
    TimeSyncToken,
    SmartCard,
    /// Authenticated through a previously issued token.
    Assertion,
}

impl AuthnMethod {
    /// Authentication context class reference of the method.
    pub fn context_class(&self) -> &'static str {
        match self {
            Self::Password => {
                "urn:oasis:names:tc:SAML:2.0:ac:classes:PasswordProtectedTransport"
            }
            Self::Kerberos => "urn:oasis:names:tc:SAML:2.0:ac:classes:Kerberos",
            Self::XmlDsig => "urn:oasis:names:tc:SAML:2.0:ac:classes:X509",
            Self::TlsClient => "urn:oasis:names:tc:SAML:2.0:ac:classes:TLSClient",
            Self::TimeSyncToken => "urn:oasis:names:tc:SAML:2.0:ac:classes:TimeSyncToken",
            Self::SmartCard => "urn:oasis:names:tc:SAML:2.0:ac:classes:SmartcardPKI",
            Self::Assertion => "urn:oasis:names:tc:SAML:2.0:ac:classes:PreviousSession",
        }
    }
}

/// How and when the subject of the token authenticated.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct AuthenticationData {
    pub method: AuthnMethod,
    pub instant: DateTime<Utc>,
}

impl AuthenticationData {
    pub fn new(method: AuthnMethod, instant: DateTime<Utc>) -> Self {
        Self { method, instant }
    }
}
