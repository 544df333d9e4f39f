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
//! Issued token.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};

use crate::identity::types::PrincipalId;
use crate::tenant::types::Certificate;
use crate::token::types::{AuthenticationData, Confirmation, SignatureAlgorithm};

/// Signed content of the token.
#[derive(Clone, Debug, PartialEq)]
pub struct Assertion {
    /// Unique ID of the assertion.
    pub id: String,
    pub issuer: String,
    pub subject: PrincipalId,
    pub confirmation: Confirmation,
    /// Expiry of the bearer subject confirmation. Unset for holder-of-key.
    pub subject_confirmation_not_on_or_after: Option<DateTime<Utc>>,
    pub issue_instant: DateTime<Utc>,
    pub not_before: DateTime<Utc>,
    pub not_on_or_after: DateTime<Utc>,
    pub audience: BTreeSet<String>,
    pub groups: Vec<PrincipalId>,
    pub delegation_chain: Vec<PrincipalId>,
    pub renew_count: u32,
    pub renewable: bool,
    pub delegable: bool,
    pub advice: BTreeMap<String, String>,
    pub authentication: Option<AuthenticationData>,
}

/// Enveloped signature of the assertion.
#[derive(Clone, Debug, PartialEq)]
pub struct TokenSignature {
    pub algorithm: SignatureAlgorithm,
    /// Digest of the canonical assertion without the signature.
    pub digest: Vec<u8>,
    /// Signature of the canonical signed info.
    pub value: Vec<u8>,
    /// Certificate of the signing key.
    pub certificate: Certificate,
}

/// Signed token.
///
/// The token is immutable. Reassembling a token from modified parts with
/// [IssuedToken::from_parts] breaks its signature.
#[derive(Clone, Debug, PartialEq)]
pub struct IssuedToken {
    assertion: Assertion,
    signature: TokenSignature,
}

impl IssuedToken {
    /// Assemble the token from its signed content and signature.
    pub fn from_parts(assertion: Assertion, signature: TokenSignature) -> Self {
        Self {
            assertion,
            signature,
        }
    }

    pub fn assertion(&self) -> &Assertion {
        &self.assertion
    }

    pub fn signature(&self) -> &TokenSignature {
        &self.signature
    }

    pub fn into_parts(self) -> (Assertion, TokenSignature) {
        (self.assertion, self.signature)
    }

    pub fn assertion_id(&self) -> &str {
        &self.assertion.id
    }

    pub fn issuer(&self) -> &str {
        &self.assertion.issuer
    }

    pub fn subject(&self) -> &PrincipalId {
        &self.assertion.subject
    }

    pub fn confirmation(&self) -> &Confirmation {
        &self.assertion.confirmation
    }

    pub fn subject_confirmation_not_on_or_after(&self) -> Option<DateTime<Utc>> {
        self.assertion.subject_confirmation_not_on_or_after
    }

    pub fn issue_instant(&self) -> DateTime<Utc> {
        self.assertion.issue_instant
    }

    pub fn not_before(&self) -> DateTime<Utc> {
        self.assertion.not_before
    }

    pub fn not_on_or_after(&self) -> DateTime<Utc> {
        self.assertion.not_on_or_after
    }

    pub fn audience(&self) -> &BTreeSet<String> {
        &self.assertion.audience
    }

    pub fn groups(&self) -> &[PrincipalId] {
        &self.assertion.groups
    }

    pub fn delegation_chain(&self) -> &[PrincipalId] {
        &self.assertion.delegation_chain
    }

    /// Number of principals the token was delegated to.
    pub fn delegation_depth(&self) -> usize {
        self.assertion.delegation_chain.len()
    }

    pub fn renew_count(&self) -> u32 {
        self.assertion.renew_count
    }

    pub fn renewable(&self) -> bool {
        self.assertion.renewable
    }

    pub fn delegable(&self) -> bool {
        self.assertion.delegable
    }

    pub fn advice(&self) -> &BTreeMap<String, String> {
        &self.assertion.advice
    }

    pub fn authentication(&self) -> Option<&AuthenticationData> {
        self.assertion.authentication.as_ref()
    }

    /// Lifetime of the token in milliseconds.
    pub fn lifetime_ms(&self) -> i64 {
        (self.assertion.not_on_or_after - self.assertion.not_before).num_milliseconds()
    }
}
