//! Amount parsing and the contribution sign policy.

use std::str::FromStr;

use rust_decimal::{prelude::FromPrimitive, Decimal};

use crate::{CoreError, CoreResult};

/// Which contribution amounts the ledger accepts.
///
/// Withdrawals (negative contributions) are opt-in; the default only accepts
/// deposits. Under either policy a goal's balance may never drop below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AmountPolicy {
    #[default]
    DepositsOnly,
    AllowWithdrawals,
}

impl AmountPolicy {
    pub fn from_allow_withdrawals(allow: bool) -> Self {
        if allow {
            AmountPolicy::AllowWithdrawals
        } else {
            AmountPolicy::DepositsOnly
        }
    }

    pub fn allows_withdrawals(self) -> bool {
        matches!(self, AmountPolicy::AllowWithdrawals)
    }

    /// Validates a contribution amount for `add` and `edit`.
    pub fn validate(self, amount: Decimal) -> CoreResult<()> {
        match self {
            AmountPolicy::DepositsOnly if amount <= Decimal::ZERO => Err(CoreError::invalid(
                format!("contribution amount must be positive (got {amount})"),
            )),
            AmountPolicy::AllowWithdrawals if amount.is_zero() => {
                Err(CoreError::invalid("contribution amount must not be zero"))
            }
            _ => Ok(()),
        }
    }
}

/// Parses user-entered text into an amount. Rejects blanks and anything that
/// is not a plain or scientific decimal number (`NaN`, `inf`, `12abc`).
pub fn parse_amount(raw: &str) -> CoreResult<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoreError::invalid("amount is required"));
    }
    let cleaned: String = trimmed.chars().filter(|c| *c != ',' && *c != '_').collect();
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .map(|value| value.normalize())
        .map_err(|_| CoreError::invalid(format!("`{trimmed}` is not a valid amount")))
}

/// Converts a floating point amount, rejecting NaN and infinities.
pub fn amount_from_f64(value: f64) -> CoreResult<Decimal> {
    if !value.is_finite() {
        return Err(CoreError::invalid(format!("amount must be finite (got {value})")));
    }
    Decimal::from_f64(value)
        .map(|value| value.normalize())
        .ok_or_else(|| CoreError::invalid(format!("amount {value} is out of range")))
}

/// Goal targets must be strictly positive.
pub fn validate_target(target: Decimal) -> CoreResult<()> {
    if target <= Decimal::ZERO {
        return Err(CoreError::invalid(format!(
            "target amount must be positive (got {target})"
        )));
    }
    Ok(())
}
