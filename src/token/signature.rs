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
//! Enveloped token signature.

use rsa::RsaPrivateKey;
use tracing::debug;

use crate::tenant::types::Certificate;
use crate::token::assertion::signed_info;
use crate::token::error::TokenProviderError;
use crate::token::types::{Assertion, SignatureAlgorithm, TokenSignature};

/// Sign the assertion.
///
/// The digest of the canonical assertion is referenced from the signed info
/// whose canonical form is signed with the key.
pub(crate) fn sign(
    assertion: &Assertion,
    algorithm: SignatureAlgorithm,
    key: &RsaPrivateKey,
    certificate: &Certificate,
) -> Result<TokenSignature, TokenProviderError> {
    let digest = algorithm.digest(assertion.canonical().as_bytes());
    let signed_info = signed_info(&assertion.id, algorithm, &digest).to_canonical_string();
    let value = key
        .sign(
            algorithm.padding(),
            &algorithm.digest(signed_info.as_bytes()),
        )
        .map_err(|err| TokenProviderError::Signing(err.to_string()))?;
    debug!("signed assertion {} with {:?}", assertion.id, algorithm);
    Ok(TokenSignature {
        algorithm,
        digest,
        value,
        certificate: certificate.clone(),
    })
}

/// Verify the signature of the assertion with the key of the embedded
/// certificate. Trust in the certificate is not checked here.
pub(crate) fn verify(
    assertion: &Assertion,
    signature: &TokenSignature,
) -> Result<(), TokenProviderError> {
    let algorithm = signature.algorithm;
    if algorithm.digest(assertion.canonical().as_bytes()) != signature.digest {
        return Err(TokenProviderError::SignatureValidationFailed(
            "digest of the assertion does not match".into(),
        ));
    }
    let key = signature.certificate.public_key().map_err(|err| {
        TokenProviderError::SignatureValidationFailed(format!("unusable certificate: {err}"))
    })?;
    let signed_info =
        signed_info(&assertion.id, algorithm, &signature.digest).to_canonical_string();
    key.verify(
        algorithm.padding(),
        &algorithm.digest(signed_info.as_bytes()),
        &signature.value,
    )
    .map_err(|_| {
        TokenProviderError::SignatureValidationFailed("signature value is not valid".into())
    })
}
