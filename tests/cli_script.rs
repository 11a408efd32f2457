use assert_cmd::Command;
use predicates::str::contains;

fn script_command(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("vending_core_cli").unwrap();
    cmd.env("VENDING_CORE_CLI_SCRIPT", "1")
        .env("VENDING_CORE_HOME", home);
    cmd
}

#[test]
fn script_mode_runs_a_full_purchase_flow() {
    let home = tempfile::tempdir().unwrap();

    // welcome, main 2, feed 10, no more, select A1, no more, finish, exit.
    let input = "\n2\n1\n10\nn\n2\nA1\nn\n3\n\n3\n";

    script_command(home.path())
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Balance: $10.00"))
        .stdout(contains("Dispensing Potato Crisps ($3.05). Enjoy!"))
        .stdout(contains("Balance: $6.95"))
        .stdout(contains("1 x $5"))
        .stdout(contains("1 x $1"))
        .stdout(contains("3 x 25\u{a2}"))
        .stdout(contains("2 x 10\u{a2}"))
        .stdout(contains("Total change: $6.95"))
        .stdout(contains("Goodbye!"));

    let log = std::fs::read_to_string(home.path().join("transactions.log")).unwrap();
    assert!(log.contains("FEED MONEY: $10.00 $10.00"));
    assert!(log.contains("Potato Crisps A1: $3.05 $6.95"));
    assert!(log.contains("DISPENSE CHANGE: $6.95 $0.00"));

    // Exit flushed the sales report snapshot.
    let snapshot = std::fs::read_to_string(home.path().join("sales.json")).unwrap();
    assert!(snapshot.contains("Potato Crisps"));
    assert!(snapshot.contains("\"total_cents\": 305"));
}

#[test]
fn selecting_a_product_with_no_funds_asks_for_money() {
    let home = tempfile::tempdir().unwrap();

    let input = "\n2\n2\n\n3\n\n3\n";

    script_command(home.path())
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Please input funds first."));
}

#[test]
fn invalid_menu_selection_reprompts() {
    let home = tempfile::tempdir().unwrap();

    let input = "\n9\n\n3\n";

    script_command(home.path())
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("not a valid selection"));
}

#[test]
fn end_of_input_shuts_down_cleanly() {
    let home = tempfile::tempdir().unwrap();

    // Stream closes in the middle of the purchase menu.
    let input = "\n2\n1\n5\nn\n";

    script_command(home.path())
        .write_stdin(input)
        .assert()
        .success();

    let log = std::fs::read_to_string(home.path().join("transactions.log")).unwrap();
    assert!(log.contains("FEED MONEY: $5.00 $5.00"));
}

#[test]
fn mistyped_product_id_gets_a_suggestion() {
    let home = tempfile::tempdir().unwrap();

    let input = "\n2\n1\n5\nn\n2\nA9\nn\n3\n\n3\n";

    script_command(home.path())
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("The id `A9` is invalid."))
        .stdout(contains("Did you mean `A1`?"));
}
