use chrono::NaiveDate;
use rust_decimal::Decimal;
use savings_core::{
    storage::{integrity_warnings, load_goals, save_goals},
    AmountPolicy, Clock, ContributionService, CoreResult, GoalService, KeyValueStore, NewGoal,
    SystemClock,
};
use savings_domain::{Contribution, Goal, GoalLedger};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::errors::AppError;

const DEFAULT_MAX_GOALS: usize = 5;

/// Outcome of reading the goal document.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub goal_count: usize,
    pub warnings: Vec<String>,
}

/// Owns the in-memory goal collection and writes it back after every change.
///
/// Writes are optimistic: when the store fails the mutation stays applied in
/// memory, the failure is logged and the manager is flagged out of sync until
/// the next successful write.
pub struct GoalManager {
    ledger: GoalLedger,
    store: Box<dyn KeyValueStore>,
    clock: Box<dyn Clock>,
    policy: AmountPolicy,
    max_goals: usize,
    out_of_sync: bool,
}

impl GoalManager {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self {
            ledger: GoalLedger::new(),
            store,
            clock: Box::new(SystemClock),
            policy: AmountPolicy::default(),
            max_goals: DEFAULT_MAX_GOALS,
            out_of_sync: false,
        }
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_policy(mut self, policy: AmountPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_max_goals(mut self, max_goals: usize) -> Self {
        self.max_goals = max_goals;
        self
    }

    /// Replaces the in-memory collection with the stored one.
    pub fn load(&mut self) -> Result<LoadReport, AppError> {
        let ledger = load_goals(self.store.as_ref())?;
        let warnings = integrity_warnings(&ledger);
        for warning in &warnings {
            warn!(%warning, "stored goals failed an integrity check");
        }
        info!(goals = ledger.len(), "goals loaded");
        self.ledger = ledger;
        self.out_of_sync = false;
        Ok(LoadReport {
            goal_count: self.ledger.len(),
            warnings,
        })
    }

    pub fn ledger(&self) -> &GoalLedger {
        &self.ledger
    }

    pub fn goal(&self, id: Uuid) -> Option<&Goal> {
        self.ledger.goal(id)
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn policy(&self) -> AmountPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: AmountPolicy) {
        self.policy = policy;
    }

    pub fn max_goals(&self) -> usize {
        self.max_goals
    }

    pub fn set_max_goals(&mut self, max_goals: usize) {
        self.max_goals = max_goals;
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// `true` while the last write to the store failed.
    pub fn is_out_of_sync(&self) -> bool {
        self.out_of_sync
    }

    pub fn create_goal(&mut self, new_goal: NewGoal) -> Result<Goal, AppError> {
        if self.ledger.len() >= self.max_goals {
            return Err(AppError::GoalLimitReached(self.max_goals));
        }
        let clock = self.clock.as_ref();
        let (next, goal) = self
            .ledger
            .try_apply(|draft| GoalService::create(draft, new_goal, clock))?;
        self.ledger = next;
        debug!(goal = %goal.id, name = %goal.name, "goal created");
        self.persist();
        Ok(goal)
    }

    pub fn rename_goal(&mut self, goal_id: Uuid, new_name: &str) -> Result<(), AppError> {
        self.commit("rename_goal", |draft| {
            GoalService::rename(draft, goal_id, new_name)
        })
    }

    pub fn delete_goal(&mut self, goal_id: Uuid) -> Result<Goal, AppError> {
        self.commit("delete_goal", |draft| GoalService::delete(draft, goal_id))
    }

    pub fn add_contribution(
        &mut self,
        goal_id: Uuid,
        amount: Decimal,
        date: NaiveDate,
    ) -> Result<Uuid, AppError> {
        let policy = self.policy;
        self.commit("add_contribution", |draft| {
            ContributionService::add(draft, goal_id, amount, date, policy)
        })
    }

    pub fn edit_contribution(
        &mut self,
        goal_id: Uuid,
        contribution_id: Uuid,
        new_amount: Decimal,
        new_date: NaiveDate,
    ) -> Result<(), AppError> {
        let policy = self.policy;
        self.commit("edit_contribution", |draft| {
            ContributionService::edit(draft, goal_id, contribution_id, new_amount, new_date, policy)
        })
    }

    pub fn delete_contribution(
        &mut self,
        goal_id: Uuid,
        contribution_id: Uuid,
    ) -> Result<Contribution, AppError> {
        self.commit("delete_contribution", |draft| {
            ContributionService::delete(draft, goal_id, contribution_id)
        })
    }

    /// Writes the collection now, returning the store error instead of logging it.
    pub fn flush(&mut self) -> Result<(), AppError> {
        save_goals(self.store.as_ref(), &self.ledger)?;
        self.out_of_sync = false;
        Ok(())
    }

    fn commit<T, F>(&mut self, operation: &'static str, mutation: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut GoalLedger) -> CoreResult<T>,
    {
        let (next, value) = self.ledger.try_apply(mutation)?;
        self.ledger = next;
        debug!(operation, goals = self.ledger.len(), "ledger updated");
        self.persist();
        Ok(value)
    }

    fn persist(&mut self) {
        match save_goals(self.store.as_ref(), &self.ledger) {
            Ok(()) => {
                if self.out_of_sync {
                    info!("goal store back in sync");
                }
                self.out_of_sync = false;
            }
            Err(err) => {
                error!(error = %err, "failed to persist goals; keeping in-memory changes");
                self.out_of_sync = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;
    use rust_decimal_macros::dec;
    use savings_core::{CoreError, ErrorKind, FixedClock, MemoryStore, GOALS_STORAGE_KEY};

    /// Store whose writes fail while `failing` is set.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        failing: AtomicBool,
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> CoreResult<Option<String>> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> CoreResult<()> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(CoreError::Persistence("disk full".into()));
            }
            self.inner.set(key, value)
        }
    }

    fn manager() -> GoalManager {
        GoalManager::new(Box::new(MemoryStore::new()))
            .with_clock(Box::new(FixedClock::on(2024, 5, 20)))
    }

    fn stored(manager: &GoalManager) -> GoalLedger {
        load_goals(manager.store()).expect("load stored goals")
    }

    #[test]
    fn every_mutation_is_written_through() {
        let mut manager = manager();
        let goal = manager
            .create_goal(NewGoal::new("Scooter", dec!(700)).with_initial_amount(dec!(70)))
            .unwrap();
        assert_eq!(stored(&manager), *manager.ledger());
        assert_eq!(goal.contributions[0].date, manager.today());

        let id = manager
            .add_contribution(goal.id, dec!(30), manager.today())
            .unwrap();
        manager
            .edit_contribution(goal.id, id, dec!(45), manager.today())
            .unwrap();
        manager.rename_goal(goal.id, "E-scooter").unwrap();
        assert_eq!(stored(&manager), *manager.ledger());

        manager.delete_contribution(goal.id, id).unwrap();
        manager.delete_goal(goal.id).unwrap();
        assert!(stored(&manager).is_empty());
        assert!(!manager.is_out_of_sync());
    }

    #[test]
    fn rejected_mutation_writes_nothing() {
        let mut manager = manager();
        let err = manager
            .create_goal(NewGoal::new("", dec!(10)))
            .expect_err("blank name");
        assert_eq!(err.kind(), Some(ErrorKind::InvalidInput));
        assert!(manager.store().get(GOALS_STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn store_failure_keeps_memory_state_and_flags_out_of_sync() {
        let store = FlakyStore::default();
        store.failing.store(true, Ordering::SeqCst);
        let mut manager = GoalManager::new(Box::new(store));

        let goal = manager
            .create_goal(NewGoal::new("Tent", dec!(250)))
            .expect("mutation succeeds despite the store");
        assert!(manager.goal(goal.id).is_some());
        assert!(manager.is_out_of_sync());
        assert!(manager.store().get(GOALS_STORAGE_KEY).unwrap().is_none());
        assert!(manager.flush().is_err());
    }

    #[test]
    fn goal_cap_rejects_without_mutation() {
        let mut manager = manager().with_max_goals(5);
        for index in 0..5 {
            manager
                .create_goal(NewGoal::new(format!("Goal {index}"), dec!(100)))
                .unwrap();
        }
        let before = manager.ledger().clone();

        let err = manager
            .create_goal(NewGoal::new("Sixth", dec!(100)))
            .unwrap_err();
        assert!(matches!(err, AppError::GoalLimitReached(5)));
        assert_eq!(*manager.ledger(), before);
        assert_eq!(stored(&manager).len(), 5);
    }

    #[test]
    fn policy_controls_withdrawals() {
        let mut manager = manager();
        let goal = manager
            .create_goal(NewGoal::new("Fund", dec!(100)).with_initial_amount(dec!(40)))
            .unwrap();
        let today = manager.today();

        assert!(manager.add_contribution(goal.id, dec!(-10), today).is_err());
        manager.set_policy(AmountPolicy::AllowWithdrawals);
        manager.add_contribution(goal.id, dec!(-10), today).unwrap();
        assert_eq!(manager.goal(goal.id).unwrap().current_amount, dec!(30));
        assert!(manager.add_contribution(goal.id, dec!(-31), today).is_err());
    }

    #[test]
    fn load_reports_integrity_warnings() {
        let raw = r##"[{"id":"8f1c2a4e-4a59-4c6f-9d0b-1f5f8c7e2a10","name":"Broken",
            "targetAmount":100,"currentAmount":50,"hasDeadline":false,"color":"#10B981",
            "contributions":[],"createdAt":"2024-01-01T00:00:00Z"}]"##;
        let mut manager =
            GoalManager::new(Box::new(MemoryStore::with_record(GOALS_STORAGE_KEY, raw)));

        let report = manager.load().unwrap();
        assert_eq!(report.goal_count, 1);
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn corrupt_document_fails_load() {
        let mut manager =
            GoalManager::new(Box::new(MemoryStore::with_record(GOALS_STORAGE_KEY, "[{")));
        let err = manager.load().unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::PersistenceFailure));
    }
}
