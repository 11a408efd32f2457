use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    terminal::{Clear, ClearType},
    ExecutableCommand,
};

use crate::currency::{ChangeLine, Money};
use crate::machine::Inventory;
use crate::reporting::SalesReport;

use super::io::CliMode;
use super::output;

/// Clears the terminal between screens in interactive mode. Best effort:
/// a terminal that rejects the escape codes just keeps scrolling.
pub fn clear(mode: CliMode) {
    if mode != CliMode::Interactive {
        return;
    }
    let mut stdout = io::stdout();
    let _ = stdout
        .execute(Clear(ClearType::All))
        .and_then(|out| out.execute(MoveTo(0, 0)));
    let _ = stdout.flush();
}

pub fn welcome() {
    output::section("Vending Machine");
    output::info("Welcome! Snacks and drinks, exact change guaranteed.");
}

pub fn goodbye() {
    output::info("Goodbye!");
}

pub fn main_menu() {
    output::section("Main Menu");
    output::info("1) Display Vending Machine Items");
    output::info("2) Purchase");
    output::info("3) Exit");
    // Option 4 prints the sales report; left off the menu on purpose.
}

pub fn purchase_menu(balance: Money) {
    output::info(format!("Balance: {balance}"));
    output::info("1) Feed Money");
    output::info("2) Select Product");
    output::info("3) Finish Transaction");
}

pub fn balance(balance: Money) {
    output::info(format!("Balance: {balance}"));
}

pub fn inventory_grid(inventory: &Inventory) {
    output::section("Products");
    for slot in inventory.slots() {
        let product = slot.product();
        let stock = if slot.quantity() == 0 {
            "SOLD OUT".to_string()
        } else {
            format!("{} in stock", slot.quantity())
        };
        output::info(format!(
            "{}) {} {} - {}",
            product.id, product.name, product.price, stock
        ));
    }
}

pub fn change_dispensed(change: &[ChangeLine], total: Money) {
    if change.is_empty() {
        output::info("No change to dispense.");
        return;
    }
    output::info("Here's your change!");
    for line in change {
        output::info(format!("{} x {}", line.count, line.denomination));
    }
    output::info("------------");
    output::info(format!("Total change: {total}"));
}

pub fn sales_report(inventory: &Inventory, report: &SalesReport) {
    output::section("Sales Report");
    for slot in inventory.slots() {
        let product = slot.product();
        output::info(format!(
            "{}|{}",
            product.name,
            report.units_sold(&product.id)
        ));
    }
    output::info("");
    output::info(format!("**TOTAL SALES** {}", report.total_sales()));
}

pub fn invalid_selection() {
    output::warning("Sorry, that is not a valid selection. Please try again.");
}
