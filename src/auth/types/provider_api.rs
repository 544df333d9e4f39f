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
//! Authentication provider interface.

use async_trait::async_trait;

use crate::auth::error::AuthenticationError;
use crate::auth::types::{AuthenticationResult, Credential};
use crate::sts::ServiceState;

/// Authentication Provider interface.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Authenticate the credential within the tenant.
    ///
    /// Rejected credentials are reported as
    /// [AuthenticationResult::Failed], errors are reserved for unknown
    /// tenants and system failures.
    async fn authenticate<'a>(
        &self,
        state: &ServiceState,
        tenant: &'a str,
        credential: Credential,
    ) -> Result<AuthenticationResult, AuthenticationError>;
}
