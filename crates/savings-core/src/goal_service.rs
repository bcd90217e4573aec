//! Goal lifecycle: create, rename, delete.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use savings_domain::{Contribution, Goal, GoalColor, GoalLedger};
use uuid::Uuid;

use crate::{amount::validate_target, time::Clock, CoreError, CoreResult};

/// Parameters for [`GoalService::create`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewGoal {
    pub name: String,
    pub target_amount: Decimal,
    pub has_deadline: bool,
    pub deadline: Option<NaiveDate>,
    pub initial_amount: Option<Decimal>,
    pub color: GoalColor,
}

impl NewGoal {
    pub fn new(name: impl Into<String>, target_amount: Decimal) -> Self {
        Self {
            name: name.into(),
            target_amount,
            has_deadline: false,
            deadline: None,
            initial_amount: None,
            color: GoalColor::default(),
        }
    }

    pub fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.has_deadline = true;
        self.deadline = Some(deadline);
        self
    }

    pub fn with_initial_amount(mut self, amount: Decimal) -> Self {
        self.initial_amount = Some(amount);
        self
    }

    pub fn with_color(mut self, color: GoalColor) -> Self {
        self.color = color;
        self
    }
}

/// Validated CRUD helpers for goals.
pub struct GoalService;

impl GoalService {
    /// Appends a new goal and returns a copy of it.
    ///
    /// A non-zero initial amount becomes a single `is_initial` contribution dated today.
    pub fn create(
        ledger: &mut GoalLedger,
        new_goal: NewGoal,
        clock: &dyn Clock,
    ) -> CoreResult<Goal> {
        let name = Self::validate_name(&new_goal.name)?;
        validate_target(new_goal.target_amount)?;
        let deadline = match (new_goal.has_deadline, new_goal.deadline) {
            (true, Some(date)) => Some(date),
            (true, None) => {
                return Err(CoreError::invalid(
                    "a deadline date is required when the goal has a deadline",
                ))
            }
            (false, _) => None,
        };
        let initial = new_goal.initial_amount.unwrap_or(Decimal::ZERO);
        if initial < Decimal::ZERO {
            return Err(CoreError::invalid(format!(
                "initial amount must not be negative (got {initial})"
            )));
        }

        let mut goal = Goal::new(name, new_goal.target_amount, new_goal.color, clock.now());
        if let Some(deadline) = deadline {
            goal = goal.with_deadline(deadline);
        }
        if !initial.is_zero() {
            goal.contributions.push(Contribution::initial(initial, clock.today()));
            goal.current_amount = initial;
        }

        ledger.push(goal.clone());
        Ok(goal)
    }

    /// Replaces the goal's name; nothing else changes.
    pub fn rename(ledger: &mut GoalLedger, goal_id: Uuid, new_name: &str) -> CoreResult<()> {
        let name = Self::validate_name(new_name)?;
        let goal = ledger
            .goal_mut(goal_id)
            .ok_or(CoreError::GoalNotFound(goal_id))?;
        goal.name = name;
        Ok(())
    }

    /// Removes the goal together with its contributions, returning it.
    pub fn delete(ledger: &mut GoalLedger, goal_id: Uuid) -> CoreResult<Goal> {
        ledger
            .remove(goal_id)
            .ok_or(CoreError::GoalNotFound(goal_id))
    }

    pub fn list(ledger: &GoalLedger) -> Vec<&Goal> {
        ledger.iter().collect()
    }

    fn validate_name(candidate: &str) -> CoreResult<String> {
        let trimmed = candidate.trim();
        if trimmed.is_empty() {
            Err(CoreError::invalid("goal name must not be empty"))
        } else {
            Ok(trimmed.to_string())
        }
    }
}
