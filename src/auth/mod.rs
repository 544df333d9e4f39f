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
//! # Authentication provider
//!
//! The provider normalizes the supported authentication mechanisms into a
//! single [AuthenticationResult] taxonomy:
//!
//! - password: single round trip,
//!
//! - Kerberos (GSS): the negotiation spans several calls correlated by the
//!   context ID the first call returns,
//!
//! - X.509 certificate chain: single round trip, the directory checks the
//!   trust and the revocation status of the chain,
//!
//! - one-time passcode: the directory may ask for a new PIN or the next
//!   passcode which the caller resubmits within the returned session.
//!
//! The credentials are verified by the directory backend ([IdentityBackend])
//! whose errors are translated at this boundary. An answer of the directory
//! which accepts the credentials without naming the principal violates its
//! contract and is reported as a system error.

use async_trait::async_trait;
use secrecy::SecretString;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

pub mod continuation;
pub mod error;
#[cfg(test)]
mod mock;
pub mod types;

use crate::config::Config;
use crate::identity::{GssResult, IdentityBackend, IdentityBackendError, OtpResult, PrincipalId};
use crate::plugin_manager::PluginManager;
use crate::sts::ServiceState;
use crate::tenant::TenantApi;
use crate::tenant::types::Certificate;
use continuation::{
    ContinuationKey, ContinuationState, ContinuationStore, EntryLookup, GssState, OtpState,
};

pub use error::AuthenticationError;
#[cfg(test)]
pub use mock::MockAuthProvider;
pub use types::*;

/// Authentication provider.
pub struct AuthProvider {
    /// Directory verifying the credentials.
    backend_driver: Arc<dyn IdentityBackend>,

    /// State of the GSS contexts and passcode sessions in progress.
    continuations: ContinuationStore,
}

impl AuthProvider {
    pub fn new(
        config: &Config,
        plugin_manager: &PluginManager,
    ) -> Result<Self, AuthenticationError> {
        let backend_driver = plugin_manager
            .get_identity_backend(&config.identity.driver)
            .ok_or_else(|| AuthenticationError::UnsupportedDriver(config.identity.driver.clone()))?
            .clone();
        Ok(Self::with_backend(
            backend_driver,
            ContinuationStore::from(&config.continuation),
        ))
    }

    pub fn with_backend(
        backend_driver: Arc<dyn IdentityBackend>,
        continuations: ContinuationStore,
    ) -> Self {
        Self {
            backend_driver,
            continuations,
        }
    }

    async fn authenticate_by_password(
        &self,
        tenant: &str,
        upn: &str,
        password: &SecretString,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        match self
            .backend_driver
            .authenticate_by_password(tenant, upn, password)
            .await
        {
            Ok(Some(principal)) => authenticated("password", principal),
            Ok(None) => Err(contract_violation("password", "principal")),
            Err(err) => translate_backend_error(err),
        }
    }

    async fn authenticate_by_gss(
        &self,
        tenant: &str,
        context_id: Option<String>,
        ticket: &[u8],
    ) -> Result<AuthenticationResult, AuthenticationError> {
        let (context_id, mut entry) = match context_id {
            None => {
                let context_id = Uuid::new_v4().to_string();
                let key = ContinuationKey::Gss {
                    tenant: tenant.to_string(),
                    context_id: context_id.clone(),
                };
                debug!("opening GSS context {}", context_id);
                let entry = self
                    .continuations
                    .open(key, ContinuationState::Gss(GssState::Init))
                    .await;
                (context_id, entry)
            }
            Some(context_id) => {
                let key = ContinuationKey::Gss {
                    tenant: tenant.to_string(),
                    context_id: context_id.clone(),
                };
                match self.continuations.lock(&key).await {
                    EntryLookup::Locked(entry) if entry.state.is_open() => (context_id, entry),
                    EntryLookup::Locked(entry) => {
                        debug!(
                            "GSS context {} opened at {} is already closed",
                            context_id,
                            entry.created_at()
                        );
                        return Ok(invalid_credentials());
                    }
                    EntryLookup::Busy => {
                        warn!("GSS context {} is being processed concurrently", context_id);
                        return Ok(invalid_credentials());
                    }
                    EntryLookup::Missing => {
                        debug!("GSS context {} is unknown or expired", context_id);
                        return Ok(invalid_credentials());
                    }
                }
            }
        };

        let outcome = match self
            .backend_driver
            .authenticate_by_gss(tenant, &context_id, ticket)
            .await
        {
            Ok(Some(GssResult::ContinueNeeded { challenge })) => {
                Ok(AuthenticationResult::ContinueGss {
                    context_id,
                    challenge,
                })
            }
            Ok(Some(GssResult::Established { principal })) => authenticated("GSS", principal),
            Ok(None) => Err(contract_violation("GSS", "negotiation result")),
            Err(err) => translate_backend_error(err),
        };
        entry.state = ContinuationState::Gss(match &outcome {
            Ok(AuthenticationResult::ContinueGss { .. }) => GssState::Continue,
            Ok(AuthenticationResult::Authenticated(principal)) => {
                GssState::Established(principal.clone())
            }
            _ => GssState::Failed,
        });
        outcome
    }

    async fn authenticate_by_cert_chain(
        &self,
        tenant: &str,
        chain: Vec<Vec<u8>>,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if chain.is_empty() {
            debug!("empty certificate chain presented");
            return Ok(AuthenticationResult::Failed(
                AuthenticationFailure::UserCertificateInvalid(CertificateFailure::Malformed),
            ));
        }
        let chain = match chain
            .into_iter()
            .map(Certificate::from_der)
            .collect::<Result<Vec<_>, _>>()
        {
            Ok(chain) => chain,
            Err(err) => {
                debug!("malformed certificate chain presented: {}", err);
                return Ok(AuthenticationResult::Failed(
                    AuthenticationFailure::UserCertificateInvalid(CertificateFailure::Malformed),
                ));
            }
        };
        debug!("authenticating certificate {}", chain[0].subject());
        match self
            .backend_driver
            .authenticate_by_cert_chain(tenant, &chain)
            .await
        {
            Ok(Some(principal)) => authenticated("certificate", principal),
            Ok(None) => Err(contract_violation("certificate", "principal")),
            Err(err) => translate_backend_error(err),
        }
    }

    async fn authenticate_by_otp(
        &self,
        tenant: &str,
        username: String,
        passcode: &SecretString,
        session_id: Option<String>,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        let mut current = match &session_id {
            None => None,
            Some(session_id) => {
                let key = ContinuationKey::Otp {
                    tenant: tenant.to_string(),
                    session_id: session_id.clone(),
                };
                match self.continuations.lock(&key).await {
                    EntryLookup::Locked(entry) => {
                        let refused = match &entry.state {
                            ContinuationState::Otp { username: owner, .. }
                                if *owner != username =>
                            {
                                warn!(
                                    "passcode session {} of {} resubmitted by {}",
                                    session_id, owner, username
                                );
                                true
                            }
                            state if !state.is_open() => {
                                debug!("passcode session {} is already closed", session_id);
                                true
                            }
                            _ => false,
                        };
                        if refused {
                            return Ok(invalid_credentials());
                        }
                        Some(entry)
                    }
                    EntryLookup::Busy => {
                        warn!("passcode session {} is being processed concurrently", session_id);
                        return Ok(invalid_credentials());
                    }
                    EntryLookup::Missing => {
                        debug!("passcode session {} is unknown or expired", session_id);
                        return Ok(invalid_credentials());
                    }
                }
            }
        };

        let outcome = match self
            .backend_driver
            .authenticate_by_otp(tenant, &username, session_id.clone(), passcode)
            .await
        {
            Ok(Some(OtpResult::Authenticated { principal })) => {
                authenticated("passcode", principal)
            }
            Ok(Some(OtpResult::NewPinRequired { session_id })) if !session_id.is_empty() => {
                Ok(AuthenticationResult::NewPinRequired { session_id })
            }
            Ok(Some(OtpResult::NextPasscodeRequired { session_id })) if !session_id.is_empty() => {
                Ok(AuthenticationResult::NextPasscodeRequired { session_id })
            }
            Ok(Some(_)) => Err(contract_violation("passcode", "session ID")),
            Ok(None) => Err(contract_violation("passcode", "verification result")),
            Err(err) => translate_backend_error(err),
        };

        let (state, next_session) = match &outcome {
            Ok(AuthenticationResult::Authenticated(principal)) => {
                (OtpState::Established(principal.clone()), None)
            }
            Ok(AuthenticationResult::NewPinRequired { session_id }) => {
                (OtpState::AwaitNewPin, Some(session_id.clone()))
            }
            Ok(AuthenticationResult::NextPasscodeRequired { session_id }) => {
                (OtpState::AwaitPasscode, Some(session_id.clone()))
            }
            _ => (OtpState::Failed, None),
        };
        match (current.as_mut(), next_session) {
            (Some(entry), Some(next)) if Some(&next) == session_id.as_ref() => {
                entry.state = ContinuationState::Otp { username, state };
            }
            (entry, Some(next)) => {
                if let Some(entry) = entry {
                    // superseded by the new session
                    entry.state = ContinuationState::Otp {
                        username: username.clone(),
                        state: OtpState::Failed,
                    };
                }
                debug!("opening passcode session {}", next);
                let key = ContinuationKey::Otp {
                    tenant: tenant.to_string(),
                    session_id: next,
                };
                drop(
                    self.continuations
                        .open(key, ContinuationState::Otp { username, state })
                        .await,
                );
            }
            (Some(entry), None) => {
                entry.state = ContinuationState::Otp { username, state };
            }
            (None, None) => {}
        }
        outcome
    }
}

fn invalid_credentials() -> AuthenticationResult {
    AuthenticationResult::Failed(AuthenticationFailure::InvalidCredentials)
}

fn contract_violation(mechanism: &str, missing: &str) -> AuthenticationError {
    error!(
        "identity backend returned no {} for the {} authentication",
        missing, mechanism
    );
    AuthenticationError::SystemError(format!(
        "identity backend returned no {missing} for the {mechanism} authentication"
    ))
}

fn authenticated(
    mechanism: &str,
    principal: PrincipalId,
) -> Result<AuthenticationResult, AuthenticationError> {
    if principal.is_empty() {
        return Err(contract_violation(mechanism, "principal"));
    }
    Ok(AuthenticationResult::Authenticated(principal))
}

/// Translate the directory error into the authentication taxonomy.
fn translate_backend_error(
    err: IdentityBackendError,
) -> Result<AuthenticationResult, AuthenticationError> {
    let failure = match err {
        IdentityBackendError::InvalidCredentials => AuthenticationFailure::InvalidCredentials,
        IdentityBackendError::LockedAccount => AuthenticationFailure::LockedAccount,
        IdentityBackendError::PasswordExpired => AuthenticationFailure::PasswordExpired,
        IdentityBackendError::CertificateRevoked => {
            AuthenticationFailure::UserCertificateInvalid(CertificateFailure::Revoked)
        }
        IdentityBackendError::RevocationCheckUndeterminable => {
            AuthenticationFailure::UserCertificateInvalid(
                CertificateFailure::RevocationUndeterminable,
            )
        }
        IdentityBackendError::MalformedCertificateChain(reason) => {
            debug!("certificate chain refused as malformed: {}", reason);
            AuthenticationFailure::UserCertificateInvalid(CertificateFailure::Malformed)
        }
        IdentityBackendError::UntrustedCertificateChain(reason) => {
            debug!("certificate chain refused as untrusted: {}", reason);
            AuthenticationFailure::UserCertificateInvalid(CertificateFailure::Untrusted)
        }
        IdentityBackendError::NoSuchTenant(tenant) => {
            return Err(AuthenticationError::NoSuchIdp(tenant));
        }
        IdentityBackendError::Unavailable(reason) => {
            error!("identity backend failure: {}", reason);
            return Err(AuthenticationError::SystemError(reason));
        }
    };
    Ok(AuthenticationResult::Failed(failure))
}

#[async_trait]
impl AuthApi for AuthProvider {
    /// Authenticate the credential.
    #[tracing::instrument(
        level = "info",
        skip(self, state, credential),
        fields(method = ?credential.method())
    )]
    async fn authenticate<'a>(
        &self,
        state: &ServiceState,
        tenant: &'a str,
        credential: Credential,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        // unknown tenants never reach the directory
        state
            .provider
            .get_tenant_provider()
            .get_config(tenant)
            .await?;

        let result = match credential {
            Credential::Password { upn, password } => {
                self.authenticate_by_password(tenant, &upn, &password)
                    .await?
            }
            Credential::Gss { context_id, ticket } => {
                self.authenticate_by_gss(tenant, context_id, &ticket).await?
            }
            Credential::Cert { chain } => self.authenticate_by_cert_chain(tenant, chain).await?,
            Credential::Otp {
                username,
                passcode,
                session_id,
            } => {
                self.authenticate_by_otp(tenant, username, &passcode, session_id)
                    .await?
            }
        };
        match &result {
            AuthenticationResult::Authenticated(principal) => {
                info!("authenticated {}", principal)
            }
            AuthenticationResult::Failed(reason) => info!("authentication failed: {}", reason),
            _ => debug!("authentication continues"),
        }
        Ok(result)
    }
}
