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
//! Subject confirmation.

use rsa::{Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};

/// Confirmation method of the token subject.
#[derive(Clone, Debug, PartialEq)]
pub enum Confirmation {
    /// Whoever presents the token is the subject.
    Bearer {
        /// ID of the request the token is issued in response to.
        in_response_to: Option<String>,
        /// Endpoint the token may be presented to.
        recipient: Option<String>,
    },
    /// The presenter must prove possession of the private part of the key.
    HolderOfKey { key: RsaPublicKey },
}

impl Confirmation {
    /// Plain bearer confirmation.
    pub fn bearer() -> Self {
        Self::Bearer {
            in_response_to: None,
            recipient: None,
        }
    }

    pub fn holder_of_key(key: RsaPublicKey) -> Self {
        Self::HolderOfKey { key }
    }

    /// SAML confirmation method identifier.
    pub fn method(&self) -> &'static str {
        match self {
            Self::Bearer { .. } => "urn:oasis:names:tc:SAML:2.0:cm:bearer",
            Self::HolderOfKey { .. } => "urn:oasis:names:tc:SAML:2.0:cm:holder-of-key",
        }
    }

    pub fn is_bearer(&self) -> bool {
        matches!(self, Self::Bearer { .. })
    }
}

/// Proof the presenter of a holder-of-key token owns the confirmation key.
///
/// The presenter signs (RSA PKCS#1 v1.5 SHA-256) the ID of the presented
/// assertion together with the challenge of the relying party, typically a
/// nonce or the digest of the request the token comes with. The relying
/// party builds the proof from the challenge it expects, so a signature
/// captured for another token or another request does not verify.
#[derive(Clone, Debug, PartialEq)]
pub struct PossessionProof {
    challenge: Vec<u8>,
    signature: Vec<u8>,
}

impl PossessionProof {
    /// Proof over the challenge expected by the relying party.
    pub fn new<C: Into<Vec<u8>>, S: Into<Vec<u8>>>(challenge: C, signature: S) -> Self {
        Self {
            challenge: challenge.into(),
            signature: signature.into(),
        }
    }

    /// Sign the presentation of the assertion with the private part of the
    /// confirmation key.
    pub fn sign<C: Into<Vec<u8>>>(
        key: &RsaPrivateKey,
        assertion_id: &str,
        challenge: C,
    ) -> Result<Self, rsa::Error> {
        let challenge = challenge.into();
        let signature = key.sign(
            Pkcs1v15Sign::new::<Sha256>(),
            &Self::digest(assertion_id, &challenge),
        )?;
        Ok(Self {
            challenge,
            signature,
        })
    }

    pub fn challenge(&self) -> &[u8] {
        &self.challenge
    }

    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// Whether the proof was produced with the private part of the key for
    /// the presentation of the assertion. An empty challenge never verifies.
    pub fn verify(&self, key: &RsaPublicKey, assertion_id: &str) -> bool {
        !self.challenge.is_empty()
            && key
                .verify(
                    Pkcs1v15Sign::new::<Sha256>(),
                    &Self::digest(assertion_id, &self.challenge),
                    &self.signature,
                )
                .is_ok()
    }

    fn digest(assertion_id: &str, challenge: &[u8]) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(b"sts-core possession proof\n");
        hasher.update(assertion_id.as_bytes());
        hasher.update(b"\n");
        hasher.update(challenge);
        hasher.finalize().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::fixtures;

    #[test]
    fn test_possession_proof() {
        let proof = PossessionProof::sign(&fixtures::hok_key(), "_a1", "nonce-1").unwrap();
        assert!(proof.verify(&fixtures::hok_public_key(), "_a1"));
        assert!(!proof.verify(&RsaPublicKey::from(&fixtures::signing_key()), "_a1"));
    }

    #[test]
    fn test_possession_proof_bound_to_presentation() {
        let proof = PossessionProof::sign(&fixtures::hok_key(), "_a1", "nonce-1").unwrap();
        // other assertion
        assert!(!proof.verify(&fixtures::hok_public_key(), "_a2"));
        // the relying party expects another challenge
        let replayed = PossessionProof::new("nonce-2", proof.signature());
        assert!(!replayed.verify(&fixtures::hok_public_key(), "_a1"));
        // the id and the challenge are not interchangeable
        let shifted = PossessionProof::sign(&fixtures::hok_key(), "_a", "1\nnonce-1").unwrap();
        assert!(!PossessionProof::new("nonce-1", shifted.signature())
            .verify(&fixtures::hok_public_key(), "_a1"));
    }

    #[test]
    fn test_possession_proof_empty_challenge() {
        let proof = PossessionProof::sign(&fixtures::hok_key(), "_a1", Vec::new()).unwrap();
        assert!(!proof.verify(&fixtures::hok_public_key(), "_a1"));
    }

    #[test]
    fn test_method() {
        assert_eq!(
            "urn:oasis:names:tc:SAML:2.0:cm:bearer",
            Confirmation::bearer().method()
        );
        assert!(!Confirmation::holder_of_key(fixtures::hok_public_key()).is_bearer());
    }
}
