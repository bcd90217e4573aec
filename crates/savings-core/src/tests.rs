use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use savings_domain::{GoalLedger, COMPLETION_MARKER};
use uuid::Uuid;

use crate::*;

fn clock() -> FixedClock {
    FixedClock::on(2024, 2, 10)
}

fn march(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
}

fn assert_balanced(ledger: &GoalLedger) {
    for goal in ledger {
        assert_eq!(
            goal.current_amount,
            goal.contribution_total(),
            "goal `{}` out of balance",
            goal.name
        );
    }
}

#[test]
fn balance_matches_contributions_after_every_operation() {
    let mut ledger = GoalLedger::new();
    let policy = AmountPolicy::AllowWithdrawals;
    let goal = GoalService::create(
        &mut ledger,
        NewGoal::new("Emergency fund", dec!(5000)).with_initial_amount(dec!(120.10)),
        &clock(),
    )
    .unwrap();
    assert_balanced(&ledger);

    let mut ids = Vec::new();
    for (day, amount) in [(1, dec!(19.99)), (2, dec!(0.01)), (3, dec!(-40)), (4, dec!(333.33))] {
        ids.push(ContributionService::add(&mut ledger, goal.id, amount, march(day), policy).unwrap());
        assert_balanced(&ledger);
    }

    ContributionService::edit(&mut ledger, goal.id, ids[0], dec!(25), march(5), policy).unwrap();
    assert_balanced(&ledger);
    ContributionService::delete(&mut ledger, goal.id, ids[2]).unwrap();
    assert_balanced(&ledger);
    GoalService::rename(&mut ledger, goal.id, "Rainy day").unwrap();
    assert_balanced(&ledger);

    assert_eq!(ledger.goal(goal.id).unwrap().current_amount, dec!(478.44));
}

#[test]
fn completion_marker_is_applied_at_most_once() {
    let mut ledger = GoalLedger::new();
    let goal =
        GoalService::create(&mut ledger, NewGoal::new("Console", dec!(100)), &clock()).unwrap();

    for _ in 0..3 {
        ContributionService::add(&mut ledger, goal.id, dec!(60), march(1), AmountPolicy::default())
            .unwrap();
    }

    let stored = ledger.goal(goal.id).unwrap();
    assert_eq!(stored.name, "Console 🎉");
    assert_eq!(stored.name.matches(COMPLETION_MARKER).count(), 1);
}

#[test]
fn failed_operations_leave_the_ledger_untouched() {
    let mut ledger = GoalLedger::new();
    let goal = GoalService::create(
        &mut ledger,
        NewGoal::new("Sofa", dec!(800)).with_initial_amount(dec!(50)),
        &clock(),
    )
    .unwrap();
    let snapshot = ledger.clone();
    let missing = Uuid::new_v4();
    let policy = AmountPolicy::default();

    let failures = [
        GoalService::create(&mut ledger, NewGoal::new("", dec!(10)), &clock()).map(|_| ()),
        GoalService::create(&mut ledger, NewGoal::new("Zero", dec!(0)), &clock()).map(|_| ()),
        GoalService::rename(&mut ledger, missing, "x"),
        GoalService::rename(&mut ledger, goal.id, "  "),
        GoalService::delete(&mut ledger, missing).map(|_| ()),
        ContributionService::add(&mut ledger, missing, dec!(5), march(1), policy).map(|_| ()),
        ContributionService::add(&mut ledger, goal.id, dec!(-5), march(1), policy).map(|_| ()),
        ContributionService::edit(&mut ledger, goal.id, missing, dec!(5), march(1), policy),
        ContributionService::delete(&mut ledger, goal.id, missing).map(|_| ()),
    ];

    for result in failures {
        assert!(result.is_err());
    }
    assert_eq!(ledger, snapshot);
}

#[test]
fn try_apply_gives_a_new_collection_and_keeps_the_old_one() {
    let ledger = GoalLedger::new();
    let (next, goal) = ledger
        .try_apply(|draft| GoalService::create(draft, NewGoal::new("Guitar", dec!(650)), &clock()))
        .unwrap();

    assert!(ledger.is_empty());
    assert_eq!(next.goal(goal.id).map(|g| g.name.as_str()), Some("Guitar"));

    let rejected = next.try_apply(|draft| {
        GoalService::rename(draft, goal.id, "Bass")?;
        ContributionService::add(draft, goal.id, Decimal::ZERO, march(2), AmountPolicy::default())
    });
    assert!(rejected.is_err());
    assert_eq!(next.goal(goal.id).unwrap().name, "Guitar");
}

#[test]
fn identifiers_are_unique() {
    let mut ledger = GoalLedger::new();
    let mut goal_ids = std::collections::HashSet::new();
    for index in 0..5 {
        let goal = GoalService::create(
            &mut ledger,
            NewGoal::new(format!("Goal {index}"), dec!(100)).with_initial_amount(dec!(1)),
            &clock(),
        )
        .unwrap();
        assert!(goal_ids.insert(goal.id));
    }

    let target = ledger.goals[0].id;
    let mut contribution_ids = std::collections::HashSet::new();
    contribution_ids.insert(ledger.goals[0].contributions[0].id);
    for _ in 0..20 {
        let id =
            ContributionService::add(&mut ledger, target, dec!(1), march(3), AmountPolicy::default())
                .unwrap();
        assert!(contribution_ids.insert(id));
    }
}

#[test]
fn phone_goal_walkthrough() {
    let mut ledger = GoalLedger::new();
    let policy = AmountPolicy::default();

    let goal = GoalService::create(
        &mut ledger,
        NewGoal::new("New Phone", dec!(1000)).with_initial_amount(dec!(200)),
        &clock(),
    )
    .unwrap();
    {
        let stored = ledger.goal(goal.id).unwrap();
        assert_eq!(stored.current_amount, dec!(200));
        assert_eq!(stored.contributions.len(), 1);
        assert!(stored.contributions[0].is_initial);
        assert_eq!(stored.contributions[0].date, clock().today());
        assert_eq!(SummaryService::progress_percentage(stored), dec!(20));
    }

    let contribution =
        ContributionService::add(&mut ledger, goal.id, dec!(800), march(1), policy).unwrap();
    {
        let stored = ledger.goal(goal.id).unwrap();
        assert_eq!(stored.current_amount, dec!(1000));
        assert_eq!(stored.name, "New Phone 🎉");
        assert_eq!(SummaryService::progress_percentage(stored), dec!(100));
    }

    ContributionService::edit(&mut ledger, goal.id, contribution, dec!(700), march(1), policy)
        .unwrap();
    {
        let stored = ledger.goal(goal.id).unwrap();
        assert_eq!(stored.current_amount, dec!(900));
        assert_eq!(stored.name, "New Phone 🎉");
        assert_eq!(SummaryService::progress_percentage(stored), dec!(90));
    }

    ContributionService::delete(&mut ledger, goal.id, contribution).unwrap();
    let stored = ledger.goal(goal.id).unwrap();
    assert_eq!(stored.current_amount, dec!(200));
    assert_eq!(stored.contributions.len(), 1);
    assert!(stored.is_balanced());
}

#[test]
fn removed_contribution_is_not_found_afterwards() {
    let mut ledger = GoalLedger::new();
    let policy = AmountPolicy::default();
    let goal = GoalService::create(
        &mut ledger,
        NewGoal::new("Camera", dec!(900)).with_initial_amount(dec!(100)),
        &clock(),
    )
    .unwrap();
    let contribution =
        ContributionService::add(&mut ledger, goal.id, dec!(40), march(4), policy).unwrap();
    ContributionService::delete(&mut ledger, goal.id, contribution).unwrap();
    assert_eq!(ledger.goal(goal.id).unwrap().current_amount, dec!(100));

    let err = ContributionService::edit(&mut ledger, goal.id, contribution, dec!(60), march(5), policy)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(ledger.goal(goal.id).unwrap().current_amount, dec!(100));

    let err = ContributionService::delete(&mut ledger, goal.id, contribution).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    let stored = ledger.goal(goal.id).unwrap();
    assert_eq!(stored.current_amount, dec!(100));
    assert_eq!(stored.contributions.len(), 1);
}
