use crate::calculation::parse_amount;
use crate::cli::core::{CommandResult, ShellContext, NEW_UNSAVED};
use crate::cli::io as cli_io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;

use super::usage_error;

const INCOME_USAGE: &str = "income <amount>";
const ADD_USAGE: &str = "add [description] [cost]";
const EDIT_USAGE: &str = "edit <row> <description> <cost>";
const REMOVE_USAGE: &str = "remove <row>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("income", "Set the monthly income", INCOME_USAGE, cmd_income),
        CommandEntry::new("add", "Append a fixed-cost row", ADD_USAGE, cmd_add),
        CommandEntry::new(
            "edit",
            "Change the description and cost of a row",
            EDIT_USAGE,
            cmd_edit,
        ),
        CommandEntry::new("remove", "Delete one row", REMOVE_USAGE, cmd_remove),
        CommandEntry::new("rows", "Show the income and every row", "rows", cmd_rows),
        CommandEntry::new("calc", "Compute the savable money", "calc", cmd_calc),
    ]
}

fn cmd_income(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let income = match args {
        [] => "",
        [value] => *value,
        _ => return Err(usage_error(INCOME_USAGE)),
    };
    context.session.set_income(income);
    if !income.is_empty() && parse_amount(income).is_none() {
        cli_io::print_warning(format!(
            "`{}` is not a whole number; it counts as 0.",
            income
        ));
    }
    Ok(())
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (description, cost) = match args {
        [] => ("", ""),
        [description] => (*description, ""),
        [description, cost] => (*description, *cost),
        _ => return Err(usage_error(ADD_USAGE)),
    };
    context.session.add_row_with(description, cost);
    cli_io::print_info(format!("Row {} added.", context.session.rows().len()));
    Ok(())
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [row, description, cost] = args else {
        return Err(usage_error(EDIT_USAGE));
    };
    let handle = context.row_handle(row)?;
    context.session.edit_row(handle, *description, *cost)?;
    cli_io::print_info(format!("Row {} updated.", row));
    Ok(())
}

fn cmd_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [row] = args else {
        return Err(usage_error(REMOVE_USAGE));
    };
    let handle = context.row_handle(row)?;
    let removed = context.session.remove_row(handle)?;
    let label = if removed.description.is_empty() {
        "(no description)"
    } else {
        removed.description.as_str()
    };
    cli_io::print_info(format!("Row {} removed: {}", row, label));
    Ok(())
}

fn cmd_rows(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let session = &context.session;
    output::section(format!(
        "Calculation: {}",
        session.loaded_name().unwrap_or(NEW_UNSAVED)
    ));
    output::line(format!("  Income: {}", display_text(session.income())));
    if session.rows().is_empty() {
        output::line("  (no rows)");
        return Ok(());
    }
    for (index, handle) in session.rows().handles().into_iter().enumerate() {
        let Some(row) = context.row(handle) else {
            continue;
        };
        let marker = if parse_amount(&row.cost).is_some() {
            ""
        } else {
            "  (skipped)"
        };
        output::line(format!(
            "  {:>2}. {:<24} {}{}",
            index + 1,
            display_text(&row.description),
            display_text(&row.cost),
            marker
        ));
    }
    Ok(())
}

fn cmd_calc(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.session.calculate();
    let detail = context.session.to_record().breakdown();
    if detail.excluded_rows > 0 {
        cli_io::print_hint(format!(
            "{} row(s) without a whole-number cost were left out.",
            detail.excluded_rows
        ));
    }
    Ok(())
}

fn display_text(text: &str) -> &str {
    if text.is_empty() {
        "-"
    } else {
        text
    }
}
