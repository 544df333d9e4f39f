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
//! Continuation store of the multi round trip authentication flows.
//!
//! Every GSS context and one-time passcode session in progress is an entry
//! of the store. Entries are evicted once their time to live elapses, whether
//! the flow completed or not, so that abandoned flows do not accumulate.
//! An entry is processed by a single call at a time.

use chrono::{DateTime, Utc};
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::config::ContinuationSection;
use crate::identity::types::PrincipalId;

/// Continuation entry identifier. Entries are never shared across tenants.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum ContinuationKey {
    Gss { tenant: String, context_id: String },
    Otp { tenant: String, session_id: String },
}

/// State of the GSS negotiation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum GssState {
    /// Context created, no ticket processed yet.
    Init,
    /// Waiting for the next ticket of the client.
    Continue,
    Established(PrincipalId),
    Failed,
}

/// State of the one-time passcode session.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum OtpState {
    AwaitPasscode,
    AwaitNewPin,
    Established(PrincipalId),
    Failed,
}

/// Mechanism specific state of the entry.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ContinuationState {
    Gss(GssState),
    Otp {
        /// User the session was opened for.
        username: String,
        state: OtpState,
    },
}

impl ContinuationState {
    /// Whether the flow may continue with another call.
    pub fn is_open(&self) -> bool {
        match self {
            Self::Gss(state) => matches!(state, GssState::Init | GssState::Continue),
            Self::Otp { state, .. } => {
                matches!(state, OtpState::AwaitPasscode | OtpState::AwaitNewPin)
            }
        }
    }
}

#[derive(Debug)]
pub struct ContinuationEntry {
    pub state: ContinuationState,
    created_at: DateTime<Utc>,
}

impl ContinuationEntry {
    pub fn new(state: ContinuationState) -> Self {
        Self {
            state,
            created_at: Utc::now(),
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Entry locked for processing.
pub type LockedEntry = OwnedMutexGuard<ContinuationEntry>;

/// Outcome of an entry lookup.
pub enum EntryLookup {
    Locked(LockedEntry),
    /// The entry is being processed by another call.
    Busy,
    /// No such entry or the entry expired.
    Missing,
}

/// Time limited store of the continuation entries.
#[derive(Clone)]
pub struct ContinuationStore {
    entries: Cache<ContinuationKey, Arc<Mutex<ContinuationEntry>>>,
}

impl ContinuationStore {
    pub fn new(ttl: Duration, max_capacity: u64) -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Insert a new entry and lock it for processing.
    pub async fn open(&self, key: ContinuationKey, state: ContinuationState) -> LockedEntry {
        let entry = Arc::new(Mutex::new(ContinuationEntry::new(state)));
        // not visible to anybody else yet
        let locked = Arc::clone(&entry).lock_owned().await;
        self.entries.insert(key, entry).await;
        locked
    }

    /// Lock the entry for processing without waiting for other calls.
    pub async fn lock(&self, key: &ContinuationKey) -> EntryLookup {
        match self.entries.get(key).await {
            Some(entry) => match entry.try_lock_owned() {
                Ok(locked) => EntryLookup::Locked(locked),
                Err(_) => EntryLookup::Busy,
            },
            None => EntryLookup::Missing,
        }
    }
}

impl From<&ContinuationSection> for ContinuationStore {
    fn from(value: &ContinuationSection) -> Self {
        Self::new(value.get_ttl(), value.max_capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(context_id: &str) -> ContinuationKey {
        ContinuationKey::Gss {
            tenant: "acme.local".into(),
            context_id: context_id.into(),
        }
    }

    #[tokio::test]
    async fn test_open_and_lock() {
        let store = ContinuationStore::new(Duration::from_secs(60), 10);
        let mut entry = store
            .open(key("ctx"), ContinuationState::Gss(GssState::Init))
            .await;
        assert!(entry.created_at() <= Utc::now());
        // busy while the opening call holds it
        assert!(matches!(store.lock(&key("ctx")).await, EntryLookup::Busy));
        entry.state = ContinuationState::Gss(GssState::Continue);
        drop(entry);

        let EntryLookup::Locked(entry) = store.lock(&key("ctx")).await else {
            panic!("entry must be available");
        };
        assert_eq!(ContinuationState::Gss(GssState::Continue), entry.state);
        assert!(entry.state.is_open());
        drop(entry);

        assert!(matches!(store.lock(&key("other")).await, EntryLookup::Missing));
        let other_tenant = ContinuationKey::Gss {
            tenant: "other.local".into(),
            context_id: "ctx".into(),
        };
        assert!(matches!(store.lock(&other_tenant).await, EntryLookup::Missing));
    }

    #[tokio::test]
    async fn test_ttl() {
        let store = ContinuationStore::new(Duration::from_millis(100), 10);
        drop(
            store
                .open(key("ctx"), ContinuationState::Gss(GssState::Init))
                .await,
        );
        assert!(matches!(store.lock(&key("ctx")).await, EntryLookup::Locked(_)));
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(matches!(store.lock(&key("ctx")).await, EntryLookup::Missing));
    }

    #[test]
    fn test_is_open() {
        assert!(
            !ContinuationState::Gss(GssState::Established(PrincipalId::new("jdoe", "acme.local")))
                .is_open()
        );
        assert!(
            ContinuationState::Otp {
                username: "jdoe".into(),
                state: OtpState::AwaitNewPin
            }
            .is_open()
        );
        assert!(
            !ContinuationState::Otp {
                username: "jdoe".into(),
                state: OtpState::Failed
            }
            .is_open()
        );
    }
}
