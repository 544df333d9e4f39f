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
//! # Time period
//!
//! Half-open time interval used by the token issuance and validation. A
//! period is closed at the start and open at the end: the start instant
//! belongs to the period, the end instant does not. Either boundary may be
//! open (unbounded).

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Time period errors.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum TimePeriodError {
    /// Start of the period is not strictly before its end.
    #[error("period start {start} must be strictly before its end {end}")]
    EmptyPeriod {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// Expansion tolerance is negative.
    #[error("clock tolerance must not be negative, got {0}ms")]
    NegativeTolerance(i64),

    /// The boundary does not fit into the supported time range.
    #[error("time period boundary overflow")]
    Overflow,
}

/// Time interval `[start; end)` with optionally unbounded ends.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(try_from = "RawTimePeriod")]
pub struct TimePeriod {
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
}

/// Unchecked boundaries of a deserialized period.
#[derive(Deserialize)]
struct RawTimePeriod {
    #[serde(default)]
    start: Option<DateTime<Utc>>,
    #[serde(default)]
    end: Option<DateTime<Utc>>,
}

impl TryFrom<RawTimePeriod> for TimePeriod {
    type Error = TimePeriodError;

    fn try_from(value: RawTimePeriod) -> Result<Self, Self::Error> {
        Self::new(value.start, value.end)
    }
}

impl TimePeriod {
    /// Build a new period. Fails when both ends are bounded and `start >= end`.
    pub fn new(
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Self, TimePeriodError> {
        if let (Some(start), Some(end)) = (start, end)
            && start >= end
        {
            return Err(TimePeriodError::EmptyPeriod { start, end });
        }
        Ok(Self { start, end })
    }

    /// Period with both ends bounded.
    pub fn bounded(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, TimePeriodError> {
        Self::new(Some(start), Some(end))
    }

    /// Period starting at `start` and lasting for `lifetime`.
    pub fn starting_at(
        start: DateTime<Utc>,
        lifetime: TimeDelta,
    ) -> Result<Self, TimePeriodError> {
        let end = start
            .checked_add_signed(lifetime)
            .ok_or(TimePeriodError::Overflow)?;
        Self::bounded(start, end)
    }

    /// Period without any boundary.
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.start
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.end
    }

    /// Check whether the point in time falls into the period.
    pub fn contains(&self, point: &DateTime<Utc>) -> bool {
        if let Some(start) = &self.start
            && point < start
        {
            return false;
        }
        if let Some(end) = &self.end
            && point >= end
        {
            return false;
        }
        true
    }

    /// Whether the point in time is before the (bounded) start of the period.
    pub fn is_before_start(&self, point: &DateTime<Utc>) -> bool {
        self.start.is_some_and(|start| *point < start)
    }

    /// Expand the period by the clock tolerance on both bounded ends.
    ///
    /// A bounded start is moved `tolerance_ms` back, a bounded end is moved
    /// `tolerance_ms` forward. Unbounded ends stay unbounded. A zero tolerance
    /// returns the period unchanged.
    pub fn expand(&self, tolerance_ms: i64) -> Result<Self, TimePeriodError> {
        if tolerance_ms < 0 {
            return Err(TimePeriodError::NegativeTolerance(tolerance_ms));
        }
        let tolerance =
            TimeDelta::try_milliseconds(tolerance_ms).ok_or(TimePeriodError::Overflow)?;
        let start = self
            .start
            .map(|start| start.checked_sub_signed(tolerance))
            .map(|start| start.ok_or(TimePeriodError::Overflow))
            .transpose()?;
        let end = self
            .end
            .map(|end| end.checked_add_signed(tolerance))
            .map(|end| end.ok_or(TimePeriodError::Overflow))
            .transpose()?;
        Ok(Self { start, end })
    }
}
