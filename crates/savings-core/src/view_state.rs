use uuid::Uuid;

/// What the user is currently looking at or doing. Exactly one state is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Dashboard,
    CreatingGoal,
    GoalDetail(Uuid),
    RenamingGoal(Uuid),
    ConfirmingGoalDelete(Uuid),
    AddingContribution(Uuid),
    EditingContribution { goal: Uuid, contribution: Uuid },
    ConfirmingContributionDelete { goal: Uuid, contribution: Uuid },
}

impl ViewState {
    pub fn open_goal(goal: Uuid) -> Self {
        ViewState::GoalDetail(goal)
    }

    /// One level up: goal-scoped states return to the goal's detail view.
    pub fn back(self) -> Self {
        match self {
            ViewState::Dashboard | ViewState::CreatingGoal | ViewState::GoalDetail(_) => {
                ViewState::Dashboard
            }
            ViewState::RenamingGoal(goal)
            | ViewState::ConfirmingGoalDelete(goal)
            | ViewState::AddingContribution(goal)
            | ViewState::EditingContribution { goal, .. }
            | ViewState::ConfirmingContributionDelete { goal, .. } => ViewState::GoalDetail(goal),
        }
    }

    pub fn focused_goal(self) -> Option<Uuid> {
        match self {
            ViewState::Dashboard | ViewState::CreatingGoal => None,
            ViewState::GoalDetail(goal)
            | ViewState::RenamingGoal(goal)
            | ViewState::ConfirmingGoalDelete(goal)
            | ViewState::AddingContribution(goal)
            | ViewState::EditingContribution { goal, .. }
            | ViewState::ConfirmingContributionDelete { goal, .. } => Some(goal),
        }
    }

    /// Falls back to the dashboard when the state refers to a deleted goal.
    pub fn forget_goal(self, deleted: Uuid) -> Self {
        if self.focused_goal() == Some(deleted) {
            ViewState::Dashboard
        } else {
            self
        }
    }

    /// Short label for prompts.
    pub fn label(self) -> &'static str {
        match self {
            ViewState::Dashboard => "dashboard",
            ViewState::CreatingGoal => "new goal",
            ViewState::GoalDetail(_) => "goal",
            ViewState::RenamingGoal(_) => "rename",
            ViewState::ConfirmingGoalDelete(_) => "delete goal",
            ViewState::AddingContribution(_) => "add contribution",
            ViewState::EditingContribution { .. } => "edit contribution",
            ViewState::ConfirmingContributionDelete { .. } => "delete contribution",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn back_walks_up_one_level() {
        let goal = Uuid::new_v4();
        let contribution = Uuid::new_v4();

        let editing = ViewState::EditingContribution { goal, contribution };
        assert_eq!(editing.back(), ViewState::GoalDetail(goal));
        assert_eq!(editing.back().back(), ViewState::Dashboard);
        assert_eq!(ViewState::CreatingGoal.back(), ViewState::Dashboard);
        assert_eq!(ViewState::default(), ViewState::Dashboard);
    }

    #[test]
    fn forget_goal_only_resets_matching_focus() {
        let goal = Uuid::new_v4();
        let other = Uuid::new_v4();
        let state = ViewState::AddingContribution(goal);

        assert_eq!(state.forget_goal(other), state);
        assert_eq!(state.forget_goal(goal), ViewState::Dashboard);
        assert_eq!(ViewState::open_goal(goal).focused_goal(), Some(goal));
        assert_eq!(ViewState::Dashboard.focused_goal(), None);
    }
}
