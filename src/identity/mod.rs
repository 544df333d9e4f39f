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
//! # Identity backend
//!
//! The directory that actually verifies passwords, Kerberos tickets,
//! certificate revocation and one-time passcodes is an external collaborator.
//! This module describes the contract of such a directory: the
//! [IdentityBackend] trait, the results it produces and the errors it may
//! fail with. The authentication provider translates them into the shared
//! authentication result taxonomy, so nothing backend specific leaks past it.
//!
//! ## Principal
//!
//! A principal is identified by its name and the domain it belongs to. The
//! user principal name (UPN) is `name@domain`.

pub mod backend;
pub mod error;
pub mod types;

pub use backend::IdentityBackend;
#[cfg(test)]
pub use backend::MockIdentityBackend;
pub use error::IdentityBackendError;
pub use types::*;
