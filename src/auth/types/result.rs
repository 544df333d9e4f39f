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
//! Authentication results.

use std::fmt;

use crate::identity::types::PrincipalId;

/// Reason the presented certificate chain was refused.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CertificateFailure {
    /// A certificate of the chain has been revoked.
    Revoked,
    /// The revocation status could not be determined.
    RevocationUndeterminable,
    /// The chain could not be processed.
    Malformed,
    /// The chain does not lead to a trusted root.
    Untrusted,
}

/// Reason the authentication failed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AuthenticationFailure {
    InvalidCredentials,
    LockedAccount,
    PasswordExpired,
    UserCertificateInvalid(CertificateFailure),
}

impl fmt::Display for AuthenticationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "invalid credentials"),
            Self::LockedAccount => write!(f, "account is locked"),
            Self::PasswordExpired => write!(f, "password has expired"),
            Self::UserCertificateInvalid(reason) => {
                write!(f, "user certificate is not valid: {reason:?}")
            }
        }
    }
}

/// Outcome of a single authentication call.
///
/// Only [AuthenticationResult::Authenticated] and
/// [AuthenticationResult::Failed] are final, the other results ask the caller
/// to resubmit within the returned context or session.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AuthenticationResult {
    Authenticated(PrincipalId),
    /// Pass the challenge to the client and resubmit its answer with the
    /// context ID.
    ContinueGss {
        context_id: String,
        challenge: Vec<u8>,
    },
    /// Resubmit the new PIN within the session.
    NewPinRequired { session_id: String },
    /// Resubmit the next passcode within the session.
    NextPasscodeRequired { session_id: String },
    Failed(AuthenticationFailure),
}

impl AuthenticationResult {
    /// Authenticated principal.
    pub fn principal(&self) -> Option<&PrincipalId> {
        match self {
            Self::Authenticated(principal) => Some(principal),
            _ => None,
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, Self::Authenticated(_) | Self::Failed(_))
    }
}
