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
//! Internal mock structures for the [TokenProvider].

use async_trait::async_trait;
use mockall::mock;

use crate::config::Config;
use crate::identity::types::PrincipalId;
use crate::sts::ServiceState;
use crate::token::{
    IssuedToken, PossessionProof, TokenApi, TokenProviderError, TokenSpec,
};

mock! {
    pub TokenProvider {
        pub fn new(cfg: &Config) -> Result<Self, TokenProviderError>;
    }

    #[async_trait]
    impl TokenApi for TokenProvider {
        async fn issue_token<'a>(
            &self,
            state: &ServiceState,
            tenant: &'a str,
            principal: &'a PrincipalId,
            spec: &'a TokenSpec,
        ) -> Result<IssuedToken, TokenProviderError>;

        async fn renew_token<'a>(
            &self,
            state: &ServiceState,
            tenant: &'a str,
            principal: &'a PrincipalId,
            token: &'a IssuedToken,
            requested_lifetime_ms: i64,
        ) -> Result<IssuedToken, TokenProviderError>;

        async fn validate_token<'a>(
            &self,
            state: &ServiceState,
            tenant: &'a str,
            token: &'a IssuedToken,
            expected_audience: Option<String>,
            proof: Option<PossessionProof>,
        ) -> Result<(), TokenProviderError>;
    }
}
