//! Derived, read-only views over goals: progress, history, monthly buckets and
//! the dashboard overview. Nothing here mutates the ledger.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use savings_domain::{Contribution, Goal, GoalLedger};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Contributions of one calendar month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlySummary {
    pub year: i32,
    pub month: u32,
    pub count: usize,
    pub total: Decimal,
}

impl MonthlySummary {
    /// `YYYY-MM` label used by the dashboard.
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

/// Totals across every goal in the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerOverview {
    pub goal_count: usize,
    pub completed_goals: usize,
    pub total_target: Decimal,
    pub total_saved: Decimal,
    pub overall_percentage: Decimal,
}

pub struct SummaryService;

impl SummaryService {
    /// Share of the target reached, clamped to `0..=100`.
    pub fn progress_percentage(goal: &Goal) -> Decimal {
        Self::percentage(goal.current_amount, goal.target_amount)
    }

    pub fn remaining(goal: &Goal) -> Decimal {
        goal.target_amount
            .saturating_sub(goal.current_amount)
            .max(Decimal::ZERO)
    }

    pub fn is_complete(goal: &Goal) -> bool {
        goal.is_complete()
    }

    /// Contributions grouped by year and month, most recent month first.
    pub fn monthly_summary(goal: &Goal) -> Vec<MonthlySummary> {
        let mut buckets: BTreeMap<(i32, u32), (usize, Decimal)> = BTreeMap::new();
        for entry in &goal.contributions {
            let bucket = buckets
                .entry(entry.month_key())
                .or_insert((0, Decimal::ZERO));
            bucket.0 += 1;
            bucket.1 = bucket.1.saturating_add(entry.amount);
        }

        buckets
            .into_iter()
            .rev()
            .map(|((year, month), (count, total))| MonthlySummary {
                year,
                month,
                count,
                total,
            })
            .collect()
    }

    /// Contributions newest first; entries sharing a date keep insertion order.
    pub fn history(goal: &Goal) -> Vec<&Contribution> {
        let mut entries: Vec<&Contribution> = goal.contributions.iter().collect();
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        entries
    }

    /// Days until the deadline, negative once it has passed.
    pub fn days_remaining(goal: &Goal, today: NaiveDate) -> Option<i64> {
        goal.active_deadline()
            .map(|deadline| (deadline - today).num_days())
    }

    /// Amount to save per month to reach the target by the deadline.
    ///
    /// A partially elapsed month counts as a whole one and at least one month
    /// is always assumed, so an overdue goal asks for the full remainder.
    pub fn monthly_target(goal: &Goal, today: NaiveDate) -> Option<Decimal> {
        let deadline = goal.active_deadline()?;
        if goal.is_complete() {
            return None;
        }
        let mut months = (deadline.year() - today.year()) as i64 * 12
            + deadline.month() as i64
            - today.month() as i64;
        if deadline.day() > today.day() {
            months += 1;
        }
        let months = Decimal::from(months.max(1));
        Self::remaining(goal)
            .checked_div(months)
            .map(|amount| amount.round_dp(2))
    }

    pub fn overview(ledger: &GoalLedger) -> LedgerOverview {
        let total_target = Self::total(ledger.iter().map(|goal| goal.target_amount));
        let total_saved = Self::total(ledger.iter().map(|goal| goal.current_amount));
        LedgerOverview {
            goal_count: ledger.len(),
            completed_goals: ledger.iter().filter(|goal| goal.is_complete()).count(),
            total_target,
            total_saved,
            overall_percentage: Self::percentage(total_saved, total_target),
        }
    }

    fn percentage(current: Decimal, target: Decimal) -> Decimal {
        if target <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        // Only an enormous quotient overflows; it is past either bound.
        let ratio = match current.checked_div(target) {
            Some(ratio) => ratio.clamp(Decimal::ZERO, Decimal::ONE),
            None if current > Decimal::ZERO => Decimal::ONE,
            None => Decimal::ZERO,
        };
        ratio * HUNDRED
    }

    /// Sum that sticks at the representable bound instead of overflowing.
    fn total(amounts: impl Iterator<Item = Decimal>) -> Decimal {
        amounts.fold(Decimal::ZERO, |sum, amount| sum.saturating_add(amount))
    }
}
