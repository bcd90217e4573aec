//! Contribution bookkeeping. Every mutation adjusts `current_amount` by the
//! exact change so the balance stays equal to the sum of the entries.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use savings_domain::{Contribution, Goal, GoalLedger};
use uuid::Uuid;

use crate::{amount::AmountPolicy, CoreError, CoreResult};

/// Validated CRUD helpers for a goal's contributions.
pub struct ContributionService;

impl ContributionService {
    /// Records a new (non-initial) contribution and returns its identifier.
    ///
    /// When the balance reaches the target the goal's name gains the completion
    /// marker; the marker is added at most once and never removed.
    pub fn add(
        ledger: &mut GoalLedger,
        goal_id: Uuid,
        amount: Decimal,
        date: NaiveDate,
        policy: AmountPolicy,
    ) -> CoreResult<Uuid> {
        let goal = Self::goal_mut(ledger, goal_id)?;
        policy.validate(amount)?;
        let balance = Self::checked_balance(goal, amount)?;

        let contribution = Contribution::new(amount, date);
        let id = contribution.id;
        goal.contributions.push(contribution);
        goal.current_amount = balance;
        if goal.is_complete() {
            goal.mark_complete();
        }
        Ok(id)
    }

    /// Replaces a contribution's amount and date, applying the difference to the balance.
    ///
    /// `policy` applies to the new amount exactly as it does for [`Self::add`],
    /// so the default policy refuses to edit an entry down to zero or below.
    pub fn edit(
        ledger: &mut GoalLedger,
        goal_id: Uuid,
        contribution_id: Uuid,
        new_amount: Decimal,
        new_date: NaiveDate,
        policy: AmountPolicy,
    ) -> CoreResult<()> {
        let goal = Self::goal_mut(ledger, goal_id)?;
        let old_amount = goal
            .contribution(contribution_id)
            .map(|entry| entry.amount)
            .ok_or(CoreError::ContributionNotFound {
                goal_id,
                contribution_id,
            })?;
        policy.validate(new_amount)?;
        let delta = new_amount
            .checked_sub(old_amount)
            .ok_or_else(Self::out_of_range)?;
        let balance = Self::checked_balance(goal, delta)?;

        if let Some(entry) = goal.contribution_mut(contribution_id) {
            entry.amount = new_amount;
            entry.date = new_date;
        }
        goal.current_amount = balance;
        Ok(())
    }

    /// Removes a contribution and subtracts its amount from the balance.
    pub fn delete(
        ledger: &mut GoalLedger,
        goal_id: Uuid,
        contribution_id: Uuid,
    ) -> CoreResult<Contribution> {
        let goal = Self::goal_mut(ledger, goal_id)?;
        let index = goal
            .contributions
            .iter()
            .position(|entry| entry.id == contribution_id)
            .ok_or(CoreError::ContributionNotFound {
                goal_id,
                contribution_id,
            })?;
        let balance = Self::checked_balance(goal, -goal.contributions[index].amount)?;

        let removed = goal.contributions.remove(index);
        goal.current_amount = balance;
        Ok(removed)
    }

    pub fn list(ledger: &GoalLedger, goal_id: Uuid) -> CoreResult<Vec<&Contribution>> {
        let goal = ledger.goal(goal_id).ok_or(CoreError::GoalNotFound(goal_id))?;
        Ok(goal.contributions.iter().collect())
    }

    fn goal_mut(ledger: &mut GoalLedger, goal_id: Uuid) -> CoreResult<&mut Goal> {
        ledger
            .goal_mut(goal_id)
            .ok_or(CoreError::GoalNotFound(goal_id))
    }

    /// Balance after applying `delta`, refusing to go below zero.
    fn checked_balance(goal: &Goal, delta: Decimal) -> CoreResult<Decimal> {
        let balance = goal
            .current_amount
            .checked_add(delta)
            .ok_or_else(Self::out_of_range)?;
        if balance < Decimal::ZERO {
            return Err(CoreError::invalid(format!(
                "balance of `{}` would drop below zero ({balance})",
                goal.name
            )));
        }
        Ok(balance)
    }

    fn out_of_range() -> CoreError {
        CoreError::invalid("amount out of range")
    }
}
