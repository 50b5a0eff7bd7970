use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn billdesk(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("billdesk").unwrap();
    cmd.env("BILLDESK_DATA_DIR", dir.path()).env_remove("RUST_LOG");
    cmd
}

fn init_with_user(dir: &TempDir) {
    billdesk(dir).arg("init").assert().success();
    billdesk(dir)
        .args([
            "user",
            "create",
            "jdoe",
            "--first-name",
            "Jane",
            "--last-name",
            "Doe",
            "--email",
            "jane@example.com",
            "--address",
            "2 place Royale, Nantes",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created user Jane Doe (jdoe)"));
}

#[test]
fn init_seeds_service_catalogue() {
    let dir = TempDir::new().unwrap();

    billdesk(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Full Time"))
        .stdout(predicate::str::contains("Meeting 1 day"));

    assert!(dir.path().join("config.json").exists());
    assert!(dir.path().join("data/services.json").exists());

    billdesk(&dir)
        .args(["service", "list", "--available"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Mid Time"));
}

#[test]
fn bill_lifecycle() {
    let dir = TempDir::new().unwrap();
    init_with_user(&dir);

    billdesk(&dir)
        .args([
            "bill",
            "create",
            "jdoe",
            "--line",
            "Full Time",
            "--line",
            "Meeting 1 day:2",
            "--date",
            "2018-04-03",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created bill F20180401"))
        .stdout(predicate::str::contains("310.00"));

    billdesk(&dir)
        .args(["bill", "list", "--unpaid"])
        .assert()
        .success()
        .stdout(predicate::str::contains("F20180401"))
        .stdout(predicate::str::contains("https://stripe.com"));

    billdesk(&dir)
        .args(["bill", "pay", "F20180401"])
        .assert()
        .success();

    billdesk(&dir)
        .args(["bill", "list", "--paid"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Paid"));

    billdesk(&dir)
        .args(["bill", "show", "F20180401"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bill to:   2 place Royale, Nantes"))
        .stdout(predicate::str::contains("Meeting 1 day"));

    billdesk(&dir)
        .args(["bill", "delete", "F20180401", "--force"])
        .assert()
        .success();

    billdesk(&dir)
        .args(["bill", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No bills found."));
}

#[test]
fn disabled_service_cannot_be_billed() {
    let dir = TempDir::new().unwrap();
    init_with_user(&dir);

    billdesk(&dir)
        .args(["service", "disable", "Mid Time"])
        .assert()
        .success();

    billdesk(&dir)
        .args(["bill", "create", "jdoe", "--line", "Mid Time"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Service is not available: Mid Time"));
}

#[test]
fn revenue_report_projects_current_year() {
    let dir = TempDir::new().unwrap();
    init_with_user(&dir);

    for date in ["2018-01-10", "2018-02-10", "2018-03-10"] {
        billdesk(&dir)
            .args(["bill", "create", "jdoe", "--line", "Full Time", "--date", date])
            .assert()
            .success();
    }

    // 750.00 over three completed months, annualised
    billdesk(&dir)
        .args(["report", "revenue", "--year", "2018", "--as-of", "2018-04-15"])
        .assert()
        .success()
        .stdout(predicate::str::contains("~3000.00"))
        .stdout(predicate::str::contains("250.00"));

    let csv_path = dir.path().join("revenue.csv");
    billdesk(&dir)
        .args([
            "report",
            "revenue",
            "--all-years",
            "--as-of",
            "2019-06-01",
            "--output",
        ])
        .arg(&csv_path)
        .assert()
        .success();

    let csv = std::fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<_> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("Year,January"));
    assert_eq!(
        lines[1],
        "2018,250.00,250.00,250.00,,,,,,,,,,750.00,false"
    );
    assert!(lines[2].starts_with("2019,"));
}

#[test]
fn revenue_report_collected_basis() {
    let dir = TempDir::new().unwrap();
    init_with_user(&dir);

    billdesk(&dir)
        .args(["bill", "create", "jdoe", "--line", "Full Time", "--date", "2017-05-02"])
        .assert()
        .success();

    billdesk(&dir)
        .args([
            "report", "revenue", "--year", "2017", "--as-of", "2018-01-01", "--basis", "collected",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("collected"))
        .stdout(predicate::str::contains("250.00").not());

    billdesk(&dir)
        .args(["report", "revenue", "--basis", "nonsense"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid revenue basis"));
}

#[test]
fn subscription_report_counts_lines() {
    let dir = TempDir::new().unwrap();
    init_with_user(&dir);

    billdesk(&dir)
        .args([
            "bill",
            "create",
            "jdoe",
            "--line",
            "Full Time",
            "--line",
            "Mid Time",
            "--date",
            "2017-03-01",
        ])
        .assert()
        .success();

    let csv_path = dir.path().join("subs.csv");
    billdesk(&dir)
        .args(["report", "subscriptions", "--year", "2017", "--output"])
        .arg(&csv_path)
        .assert()
        .success();

    let csv = std::fs::read_to_string(&csv_path).unwrap();
    assert!(csv.contains("2017,Full Time,1"));
    assert!(csv.contains("2017,Mid Time,1"));
    assert!(csv.contains("2017,Meeting 1 day,0"));
}

#[test]
fn user_validation_and_email_export() {
    let dir = TempDir::new().unwrap();
    init_with_user(&dir);

    billdesk(&dir)
        .args([
            "user",
            "create",
            "nomail",
            "--first-name",
            "No",
            "--last-name",
            "Mail",
            "--email",
            "",
            "--address",
            "Nantes",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("User email is required"));

    billdesk(&dir)
        .args(["user", "export-emails"])
        .assert()
        .success()
        .stdout("jane@example.com\n");
}

#[test]
fn full_export_and_audit() {
    let dir = TempDir::new().unwrap();
    init_with_user(&dir);

    billdesk(&dir)
        .args(["export", "json", "--compact"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"schema_version\":\"1.0.0\""))
        .stdout(predicate::str::contains("\"user_count\":1"));

    billdesk(&dir)
        .args(["export", "yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("username: jdoe"));

    billdesk(&dir)
        .args(["audit", "--limit", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CREATE User"));
}

#[test]
fn future_year_report_has_no_months() {
    let dir = TempDir::new().unwrap();
    init_with_user(&dir);

    billdesk(&dir)
        .args(["bill", "create", "jdoe", "--line", "Full Time", "--date", "2030-01-01"])
        .assert()
        .success();

    let csv_path = dir.path().join("future.csv");
    billdesk(&dir)
        .args([
            "report",
            "revenue",
            "--year",
            "2030",
            "--as-of",
            "2018-06-01",
            "--output",
        ])
        .arg(&csv_path)
        .assert()
        .success();

    let csv = std::fs::read_to_string(&csv_path).unwrap();
    assert_eq!(csv.lines().nth(1), Some("2030,,,,,,,,,,,,,0.00,false"));
}

#[test]
fn malformed_prices_are_rejected() {
    let dir = TempDir::new().unwrap();
    billdesk(&dir).arg("init").assert().success();

    for price in ["10.€5", "99999999999999999", "ten5"] {
        billdesk(&dir)
            .args(["service", "create", "Locker", price])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid money format"));
    }

    billdesk(&dir)
        .args(["service", "set-price", "Full Time", "270"])
        .assert()
        .success();

    billdesk(&dir)
        .args(["audit", "--limit", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("price: 250.00 -> 270.00"));
}
