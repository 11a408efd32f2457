use std::env;

use strsim::levenshtein;

use crate::catalog::Catalog;
use crate::config::{Config, ConfigManager};
use crate::errors::CliError;
use crate::machine::{Inventory, PurchaseError, VendingMachine};
use crate::reporting::{AuditLog, SharedSalesReport};
use crate::utils::{ensure_dir, PathResolver};

use super::io::{CliMode, Prompter};
use super::output::{self, OutputPreferences};
use super::screens;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopControl {
    Continue,
    Exit,
}

pub fn run_cli() -> Result<(), CliError> {
    let mode = if env::var_os("VENDING_CORE_CLI_SCRIPT").is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };
    let prompter = Prompter::new(mode);

    let config = load_config();
    output::set_preferences(OutputPreferences {
        quiet_mode: config.quiet_mode,
        plain: mode == CliMode::Script,
    });

    let base = PathResolver::resolve_base(config.data_dir.clone());
    ensure_dir(&base)?;
    let catalog = Catalog::load_or_seed(&PathResolver::catalog_file_in(&base))?;
    let inventory = Inventory::from_catalog(&catalog);
    tracing::info!(slots = inventory.slots().len(), base = %base.display(), "machine ready");

    let audit = AuditLog::new(PathResolver::transaction_log_in(&base));
    let sales = SharedSalesReport::open(&base)?;
    let mut machine = VendingMachine::new(inventory, Box::new(audit), Box::new(sales.clone()));

    screens::clear(mode);
    screens::welcome();
    if prompter.press_enter()?.is_none() {
        return Ok(());
    }

    loop {
        screens::clear(mode);
        screens::main_menu();
        let Some(choice) = prompter.read_line("Please make a selection")? else {
            break;
        };
        screens::clear(mode);
        match choice.trim() {
            "1" => {
                screens::inventory_grid(machine.inventory());
                if prompter.press_enter()?.is_none() {
                    break;
                }
            }
            "2" => {
                if purchase_menu(&mut machine, &prompter, mode)? == LoopControl::Exit {
                    break;
                }
            }
            "3" => {
                screens::goodbye();
                break;
            }
            // Hidden operator option: print the sales report.
            "4" => {
                screens::sales_report(machine.inventory(), &sales.read());
                if prompter.press_enter()?.is_none() {
                    break;
                }
            }
            _ => {
                screens::invalid_selection();
                if prompter.press_enter()?.is_none() {
                    break;
                }
            }
        }
    }

    sales.flush();
    Ok(())
}

fn load_config() -> Config {
    match ConfigManager::new().and_then(|manager| manager.load()) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(%err, "config load failed; using defaults");
            Config::default()
        }
    }
}

fn purchase_menu(
    machine: &mut VendingMachine,
    prompter: &Prompter,
    mode: CliMode,
) -> Result<LoopControl, CliError> {
    loop {
        screens::clear(mode);
        screens::purchase_menu(machine.balance());
        let Some(choice) = prompter.read_line("Please make a selection")? else {
            return Ok(LoopControl::Exit);
        };
        match choice.trim() {
            "1" => {
                if feed_money(machine, prompter, mode)? == LoopControl::Exit {
                    return Ok(LoopControl::Exit);
                }
            }
            "2" => {
                if select_product(machine, prompter, mode)? == LoopControl::Exit {
                    return Ok(LoopControl::Exit);
                }
            }
            "3" => {
                screens::clear(mode);
                let receipt = machine.finish();
                screens::change_dispensed(&receipt.change, receipt.total);
                if prompter.press_enter()?.is_none() {
                    return Ok(LoopControl::Exit);
                }
                return Ok(LoopControl::Continue);
            }
            _ => {
                screens::invalid_selection();
                if prompter.press_enter()?.is_none() {
                    return Ok(LoopControl::Exit);
                }
            }
        }
    }
}

fn feed_money(
    machine: &mut VendingMachine,
    prompter: &Prompter,
    mode: CliMode,
) -> Result<LoopControl, CliError> {
    loop {
        screens::clear(mode);
        screens::balance(machine.balance());
        let Some(raw) = prompter.read_line("Please enter the dollar amount you wish to add")?
        else {
            return Ok(LoopControl::Exit);
        };
        match machine.deposit(&raw) {
            Ok(balance) => output::success(format!("Balance: {balance}")),
            Err(err) => output::warning(err),
        }
        match prompter.confirm("Add more money? (Y/N)")? {
            None => return Ok(LoopControl::Exit),
            Some(true) => {}
            Some(false) => return Ok(LoopControl::Continue),
        }
    }
}

fn select_product(
    machine: &mut VendingMachine,
    prompter: &Prompter,
    mode: CliMode,
) -> Result<LoopControl, CliError> {
    loop {
        screens::clear(mode);
        screens::inventory_grid(machine.inventory());
        screens::balance(machine.balance());
        if machine.balance().is_zero() {
            output::info("Please input funds first.");
            return match prompter.press_enter()? {
                None => Ok(LoopControl::Exit),
                Some(()) => Ok(LoopControl::Continue),
            };
        }

        let Some(id) = prompter.read_line("Please enter a product id")? else {
            return Ok(LoopControl::Exit);
        };
        match machine.purchase(id.trim()) {
            Ok(product) => {
                output::success(format!("Dispensing {} ({}). Enjoy!", product.name, product.price))
            }
            Err(PurchaseError::InvalidId(bad)) => {
                output::warning(format!("The id `{bad}` is invalid."));
                if let Some(candidate) = suggest_id(machine.inventory(), &bad) {
                    output::info(format!("Did you mean `{candidate}`?"));
                }
            }
            Err(err) => output::warning(err),
        }
        screens::balance(machine.balance());

        if machine.balance().is_zero() {
            return match prompter.press_enter()? {
                None => Ok(LoopControl::Exit),
                Some(()) => Ok(LoopControl::Continue),
            };
        }
        match prompter.confirm("Buy another item? (Y/N)")? {
            None => return Ok(LoopControl::Exit),
            Some(true) => {}
            Some(false) => return Ok(LoopControl::Continue),
        }
    }
}

/// Closest slot id within one edit, for typo hints on invalid ids.
fn suggest_id<'a>(inventory: &'a Inventory, entered: &str) -> Option<&'a str> {
    let entered = entered.to_ascii_uppercase();
    let mut best: Option<(usize, &str)> = None;
    for id in inventory.product_ids() {
        let distance = levenshtein(&id.to_ascii_uppercase(), &entered);
        if distance <= 1 && best.map_or(true, |(closest, _)| distance < closest) {
            best = Some((distance, id));
        }
    }
    best.map(|(_, id)| id)
}
