use assert_cmd::Command;
use assert_fs::TempDir;
use predicates::str::contains;
use regex::Regex;
use rust_decimal_macros::dec;
use savings_core::storage::load_goals;
use savings_storage_json::JsonFileStore;

fn shell(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("savings_cli").unwrap();
    cmd.env("SAVINGS_CLI_SCRIPT", "1")
        .env("SAVINGS_TRACKER_HOME", home.path())
        .env("NO_COLOR", "1");
    cmd
}

fn stored_goals(home: &TempDir) -> savings_domain::GoalLedger {
    let data = home.path().join("data");
    let store = JsonFileStore::new(data.clone(), data.join("backups")).unwrap();
    load_goals(&store).unwrap()
}

#[test]
fn script_mode_runs_the_phone_walkthrough() {
    let home = TempDir::new().unwrap();
    let script = "\
goal new \"New Phone\" 1000 --initial 200 --deadline 2030-12-31
contribution add 1 300 2024-02-01
contribution add 1 500 2024-03-15
list
goal show 1
summary
exit
";

    let output = shell(&home)
        .write_stdin(script)
        .assert()
        .success()
        .stdout(contains("Goal created"))
        .stdout(contains("Goal reached!"))
        .stdout(contains("100.0%"))
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8(output).unwrap();
    assert!(stdout.contains("2024-03"), "monthly summary missing:\n{stdout}");

    let ledger = stored_goals(&home);
    assert_eq!(ledger.len(), 1);
    let goal = &ledger.goals[0];
    assert_eq!(goal.name, "New Phone 🎉");
    assert_eq!(goal.current_amount, dec!(1000));
    assert_eq!(goal.contributions.len(), 3);
    assert_eq!(goal.contributions.iter().filter(|c| c.is_initial).count(), 1);
}

#[test]
fn state_survives_between_runs() {
    let home = TempDir::new().unwrap();
    let first = shell(&home)
        .write_stdin("goal new Bike 400\ncontribution add bike 120 2024-05-02\nexit\n")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let first = String::from_utf8(first).unwrap();

    let id_pattern = Regex::new(r"Contribution ([0-9a-f]{8}) of").unwrap();
    let short_id = id_pattern
        .captures(&first)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .expect("contribution id in output");

    shell(&home)
        .write_stdin(format!("contribution edit 1 {short_id} 150\nexit\n"))
        .assert()
        .success()
        .stdout(contains("updated to $150.00"));

    let ledger = stored_goals(&home);
    assert_eq!(ledger.goals[0].current_amount, dec!(150));
    assert_eq!(ledger.goals[0].contributions.len(), 1);
}

#[test]
fn errors_are_reported_without_stopping_the_script() {
    let home = TempDir::new().unwrap();
    shell(&home)
        .write_stdin("lsit\ncontribution add 9 10\ngoal new Trip -5\ngoal new Trip 900\nexit\n")
        .assert()
        .success()
        .stdout(contains("Did you mean `list`?"))
        .stdout(contains("no goal at position 9"))
        .stdout(contains("target amount must be positive"))
        .stdout(contains("Goal created"));

    assert_eq!(stored_goals(&home).len(), 1);
}

#[test]
fn goal_cap_comes_from_config() {
    let home = TempDir::new().unwrap();
    shell(&home)
        .write_stdin("config set max-goals 1\ngoal new One 10\ngoal new Two 10\nexit\n")
        .assert()
        .success()
        .stdout(contains("at most 1 goals"));

    assert_eq!(stored_goals(&home).len(), 1);
    assert!(home.path().join("config").join("config.json").exists());
}
