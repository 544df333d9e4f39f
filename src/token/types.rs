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
//! Token provider types.

mod algorithm;
mod authentication;
mod confirmation;
mod issued;
pub mod provider_api;
mod spec;

pub use algorithm::SignatureAlgorithm;
pub use authentication::{AuthenticationData, AuthnMethod};
pub use confirmation::{Confirmation, PossessionProof};
pub use issued::{Assertion, IssuedToken, TokenSignature};
pub use provider_api::TokenApi;
pub use spec::{IssuancePath, TokenSpec, TokenSpecBuilder};
