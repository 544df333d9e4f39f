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
//! Token signature algorithms.

use rsa::Pkcs1v15Sign;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha384, Sha512};

/// RSA PKCS#1 v1.5 signature algorithm used for the token signature.
///
/// The digest of the signed content uses the hash function of the algorithm.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignatureAlgorithm {
    #[default]
    RsaSha256,
    RsaSha384,
    RsaSha512,
}

impl SignatureAlgorithm {
    /// XML signature method identifier.
    pub fn uri(&self) -> &'static str {
        match self {
            Self::RsaSha256 => "http://www.w3.org/2001/04/xmldsig-more#rsa-sha256",
            Self::RsaSha384 => "http://www.w3.org/2001/04/xmldsig-more#rsa-sha384",
            Self::RsaSha512 => "http://www.w3.org/2001/04/xmldsig-more#rsa-sha512",
        }
    }

    /// XML digest method identifier.
    pub fn digest_uri(&self) -> &'static str {
        match self {
            Self::RsaSha256 => "http://www.w3.org/2001/04/xmlenc#sha256",
            Self::RsaSha384 => "http://www.w3.org/2001/04/xmldsig-more#sha384",
            Self::RsaSha512 => "http://www.w3.org/2001/04/xmlenc#sha512",
        }
    }

    /// Hash the data with the hash function of the algorithm.
    pub fn digest(&self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::RsaSha256 => Sha256::digest(data).to_vec(),
            Self::RsaSha384 => Sha384::digest(data).to_vec(),
            Self::RsaSha512 => Sha512::digest(data).to_vec(),
        }
    }

    /// PKCS#1 v1.5 padding scheme matching [Self::digest].
    pub(crate) fn padding(&self) -> Pkcs1v15Sign {
        match self {
            Self::RsaSha256 => Pkcs1v15Sign::new::<Sha256>(),
            Self::RsaSha384 => Pkcs1v15Sign::new::<Sha384>(),
            Self::RsaSha512 => Pkcs1v15Sign::new::<Sha512>(),
        }
    }
}
