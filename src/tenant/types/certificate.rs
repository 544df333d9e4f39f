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
//! X.509 certificates.

use rsa::RsaPublicKey;
use rsa::pkcs8::DecodePublicKey;
use sha2::{Digest, Sha256};
use thiserror::Error;
use x509_parser::certificate::X509Certificate;
use x509_parser::prelude::FromDer;

/// Certificate handling errors.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum CertificateError {
    /// The certificate can not be parsed.
    #[error("certificate can not be parsed: {0}")]
    Parse(String),

    /// PEM document can not be parsed.
    #[error("pem parsing error: {0}")]
    Pem(String),

    /// PEM document does not contain any certificate.
    #[error("no certificates found in the pem document")]
    NoCertificates,

    /// The public key of the certificate is not a RSA key.
    #[error("certificate public key is not supported: {0}")]
    UnsupportedKey(String),
}

impl From<pem::PemError> for CertificateError {
    fn from(value: pem::PemError) -> Self {
        Self::Pem(value.to_string())
    }
}

/// Parsed and validated X.509 certificate.
///
/// Two certificates are equal when their DER encodings are equal.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Certificate {
    der: Vec<u8>,
    subject: String,
}

impl Certificate {
    /// Build the certificate from its DER encoding.
    pub fn from_der<D: Into<Vec<u8>>>(der: D) -> Result<Self, CertificateError> {
        let der = der.into();
        let subject = {
            let (rest, cert) = X509Certificate::from_der(&der)
                .map_err(|err| CertificateError::Parse(err.to_string()))?;
            if !rest.is_empty() {
                return Err(CertificateError::Parse(format!(
                    "{} trailing bytes after the certificate",
                    rest.len()
                )));
            }
            cert.subject().to_string()
        };
        Ok(Self { der, subject })
    }

    /// Parse all `CERTIFICATE` blocks of the PEM document preserving their
    /// order.
    pub fn chain_from_pem<P: AsRef<[u8]>>(data: P) -> Result<Vec<Self>, CertificateError> {
        let chain = pem::parse_many(data)?
            .into_iter()
            .filter(|block| block.tag() == "CERTIFICATE")
            .map(|block| Self::from_der(block.into_contents()))
            .collect::<Result<Vec<_>, _>>()?;
        if chain.is_empty() {
            return Err(CertificateError::NoCertificates);
        }
        Ok(chain)
    }

    /// DER encoding of the certificate.
    pub fn der(&self) -> &[u8] {
        &self.der
    }

    /// Subject distinguished name.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Hex encoded SHA-256 digest of the DER encoding.
    pub fn thumbprint(&self) -> String {
        hex::encode(Sha256::digest(&self.der))
    }

    /// RSA public key of the certificate.
    pub fn public_key(&self) -> Result<RsaPublicKey, CertificateError> {
        let (_, cert) = X509Certificate::from_der(&self.der)
            .map_err(|err| CertificateError::Parse(err.to_string()))?;
        RsaPublicKey::from_public_key_der(cert.public_key().raw)
            .map_err(|err| CertificateError::UnsupportedKey(err.to_string()))
    }
}
