//! Fee and interest accrual arithmetic
//!
//! Pure functions over amounts and timestamps; nothing in this module
//! touches an account or performs I/O. [`crate::core::account_ops`] applies
//! the results to account state.
//!
//! # Model
//!
//! - A fixed maintenance fee is due for every complete fee cycle
//!   (30 days by default) since the last processed boundary.
//! - Locked savings earn simple daily interest over a cycle of the
//!   operator's chosen length. When several cycles are due, each one is
//!   computed on the balance left by the previous cycle, so caught-up
//!   cycles compound.
//! - Boundaries advance in whole cycles and are never snapped to "now".

use chrono::{DateTime, Duration, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

/// Default length of a fee cycle in days
pub const FEE_CYCLE_DAYS: u32 = 30;

/// Default maintenance fee per cycle (10.00)
pub const MONTHLY_FEE: Decimal = Decimal::from_parts(1000, 0, 0, false, 2);

/// Default simple interest per day (0.1%)
pub const DAILY_INTEREST_RATE: Decimal = Decimal::from_parts(1, 0, 0, false, 3);

/// Decimal places of currency precision
const CURRENCY_DP: u32 = 2;

/// Accrual parameters
///
/// Controls the fee charged per cycle and the daily interest rate applied
/// to locked savings.
#[derive(Clone, Debug, PartialEq)]
pub struct AccrualPolicy {
    /// Length of a fee cycle in days
    pub fee_cycle_days: u32,
    /// Fee deducted per elapsed cycle
    pub monthly_fee: Decimal,
    /// Simple interest per day as a fraction (0.001 = 0.1%)
    pub daily_interest_rate: Decimal,
}

impl Default for AccrualPolicy {
    fn default() -> Self {
        Self {
            fee_cycle_days: FEE_CYCLE_DAYS,
            monthly_fee: MONTHLY_FEE,
            daily_interest_rate: DAILY_INTEREST_RATE,
        }
    }
}

impl AccrualPolicy {
    /// Create a policy with custom fee and rate
    ///
    /// Negative values are rejected with a warning and replaced by the
    /// defaults. A zero fee or zero rate is allowed and disables that
    /// accrual.
    pub fn new(monthly_fee: Decimal, daily_interest_rate: Decimal) -> Self {
        let default = Self::default();

        let monthly_fee = if monthly_fee.is_sign_negative() {
            tracing::warn!(
                "Invalid monthly fee ({}), using default ({})",
                monthly_fee,
                default.monthly_fee
            );
            default.monthly_fee
        } else {
            monthly_fee
        };

        let daily_interest_rate = if daily_interest_rate.is_sign_negative() {
            tracing::warn!(
                "Invalid daily interest rate ({}), using default ({})",
                daily_interest_rate,
                default.daily_interest_rate
            );
            default.daily_interest_rate
        } else {
            daily_interest_rate
        };

        Self {
            monthly_fee,
            daily_interest_rate,
            ..default
        }
    }

    /// Interest earned by `principal` over one cycle of `cycle_days`
    ///
    /// `principal * cycle_days * daily_interest_rate`, rounded to cents.
    /// `None` if the result does not fit in a `Decimal`.
    pub fn interest_amount(&self, principal: Decimal, cycle_days: u32) -> Option<Decimal> {
        let cycle_rate = Decimal::from(cycle_days).checked_mul(self.daily_interest_rate)?;
        let interest = principal.checked_mul(cycle_rate)?;
        Some(interest.round_dp_with_strategy(CURRENCY_DP, RoundingStrategy::MidpointAwayFromZero))
    }

    /// Number of complete fee cycles between `last_fee_date` and `now`
    pub fn due_fee_cycles(&self, now: DateTime<Utc>, last_fee_date: DateTime<Utc>) -> u32 {
        complete_cycles(now, last_fee_date, self.fee_cycle_days)
    }

    /// Number of complete interest cycles between `last_interest_date` and `now`
    ///
    /// Zero when there is no active cycle or nothing in savings.
    pub fn due_interest_cycles(
        &self,
        now: DateTime<Utc>,
        last_interest_date: DateTime<Utc>,
        cycle_days: u32,
        principal: Decimal,
    ) -> u32 {
        if cycle_days == 0 || principal <= Decimal::ZERO {
            return 0;
        }
        complete_cycles(now, last_interest_date, cycle_days)
    }
}

/// A span of whole days
pub fn days(count: u32) -> Duration {
    Duration::days(i64::from(count))
}

/// Total span of `cycles` consecutive cycles of `cycle_days` each
pub fn cycle_span(cycle_days: u32, cycles: u32) -> Duration {
    Duration::days(i64::from(cycle_days) * i64::from(cycles))
}

/// Number of whole days until `until`, rounded up; zero once it has passed
pub fn remaining_days(now: DateTime<Utc>, until: DateTime<Utc>) -> i64 {
    let remaining = (until - now).num_milliseconds();
    if remaining <= 0 {
        return 0;
    }
    let day = Duration::days(1).num_milliseconds();
    (remaining + day - 1) / day
}

fn complete_cycles(now: DateTime<Utc>, since: DateTime<Utc>, cycle_days: u32) -> u32 {
    if cycle_days == 0 || now <= since {
        return 0;
    }
    let elapsed = (now - since).num_seconds();
    let cycle = days(cycle_days).num_seconds();
    u32::try_from(elapsed / cycle).unwrap_or(u32::MAX)
}
