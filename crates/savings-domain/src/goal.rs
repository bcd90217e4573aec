//! Domain types representing savings goals.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{color::GoalColor, common::*, contribution::Contribution};

/// Suffix appended to a goal's name the first time its balance reaches the target.
pub const COMPLETION_MARKER: &str = "🎉";

/// A named savings target with a running balance backed by its contributions.
///
/// `current_amount` is kept equal to the sum of `contributions[*].amount`; the
/// services in `savings-core` maintain it incrementally on every mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: Uuid,
    pub name: String,
    pub target_amount: Decimal,
    #[serde(default)]
    pub current_amount: Decimal,
    #[serde(default)]
    pub has_deadline: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub color: GoalColor,
    #[serde(default)]
    pub contributions: Vec<Contribution>,
    pub created_at: DateTime<Utc>,
}

impl Goal {
    /// Creates an empty goal without a deadline.
    pub fn new(
        name: impl Into<String>,
        target_amount: Decimal,
        color: GoalColor,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            target_amount,
            current_amount: Decimal::ZERO,
            has_deadline: false,
            deadline: None,
            color,
            contributions: Vec::new(),
            created_at,
        }
    }

    pub fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.has_deadline = true;
        self.deadline = Some(deadline);
        self
    }

    pub fn contribution(&self, id: Uuid) -> Option<&Contribution> {
        self.contributions.iter().find(|entry| entry.id == id)
    }

    pub fn contribution_mut(&mut self, id: Uuid) -> Option<&mut Contribution> {
        self.contributions.iter_mut().find(|entry| entry.id == id)
    }

    /// Recomputes the balance from scratch. Used for integrity checks, not for updates.
    ///
    /// Saturates at the representable bounds, so a stored document with absurd
    /// amounts reports as unbalanced instead of overflowing.
    pub fn contribution_total(&self) -> Decimal {
        self.contributions
            .iter()
            .fold(Decimal::ZERO, |sum, entry| sum.saturating_add(entry.amount))
    }

    pub fn is_balanced(&self) -> bool {
        self.current_amount == self.contribution_total()
    }

    pub fn is_complete(&self) -> bool {
        self.current_amount >= self.target_amount
    }

    /// The deadline, honouring the `has_deadline` flag.
    pub fn active_deadline(&self) -> Option<NaiveDate> {
        if self.has_deadline {
            self.deadline
        } else {
            None
        }
    }

    pub fn has_completion_marker(&self) -> bool {
        self.name.contains(COMPLETION_MARKER)
    }

    /// Appends the completion marker unless the name already carries it.
    /// Returns `true` when the name changed.
    pub fn mark_complete(&mut self) -> bool {
        if self.has_completion_marker() {
            return false;
        }
        self.name = format!("{} {}", self.name, COMPLETION_MARKER);
        true
    }

    /// Name without the completion marker, for matching user input.
    pub fn base_name(&self) -> &str {
        self.name
            .strip_suffix(COMPLETION_MARKER)
            .map(str::trim_end)
            .unwrap_or(&self.name)
    }
}

impl Identifiable for Goal {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Goal {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Amounted for Goal {
    fn amount(&self) -> Decimal {
        self.current_amount
    }
}

impl Displayable for Goal {
    fn display_label(&self) -> String {
        format!("{} ({} / {})", self.name, self.current_amount, self.target_amount)
    }
}
