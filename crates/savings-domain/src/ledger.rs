//! The goal collection persisted as a single document.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::goal::Goal;

/// Ordered collection of goals. Serializes as a plain JSON array.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct GoalLedger {
    pub goals: Vec<Goal>,
}

impl GoalLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_goals(goals: Vec<Goal>) -> Self {
        Self { goals }
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Goal> {
        self.goals.iter()
    }

    pub fn goal(&self, id: Uuid) -> Option<&Goal> {
        self.goals.iter().find(|goal| goal.id == id)
    }

    pub fn goal_mut(&mut self, id: Uuid) -> Option<&mut Goal> {
        self.goals.iter_mut().find(|goal| goal.id == id)
    }

    pub fn position(&self, id: Uuid) -> Option<usize> {
        self.goals.iter().position(|goal| goal.id == id)
    }

    pub fn push(&mut self, goal: Goal) -> Uuid {
        let id = goal.id;
        self.goals.push(goal);
        id
    }

    pub fn remove(&mut self, id: Uuid) -> Option<Goal> {
        let index = self.position(id)?;
        Some(self.goals.remove(index))
    }

    /// Runs `mutation` against a copy of the collection and returns the copy only
    /// when the mutation succeeds; `self` is never modified.
    pub fn try_apply<T, E, F>(&self, mutation: F) -> Result<(Self, T), E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
    {
        let mut next = self.clone();
        let value = mutation(&mut next)?;
        Ok((next, value))
    }

    pub fn into_goals(self) -> Vec<Goal> {
        self.goals
    }
}

impl<'a> IntoIterator for &'a GoalLedger {
    type Item = &'a Goal;
    type IntoIter = std::slice::Iter<'a, Goal>;

    fn into_iter(self) -> Self::IntoIter {
        self.goals.iter()
    }
}
