use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::{CommandEntry, CommandRegistry};

const GROUPS: &[(&str, &[&str])] = &[
    ("Form", &["income", "add", "edit", "remove", "rows", "calc"]),
    ("Saved calculations", &["save", "load", "saved", "new", "delete"]),
    ("Remote copy and settings", &["sync", "config"]),
    ("Shell", &["help", "version", "exit"]),
];

const OTHER_GROUP: &str = "Other";

fn example(name: &str) -> Option<&'static str> {
    Some(match name {
        "income" => "income 2500",
        "add" => "add \"car loan\" 180",
        "edit" => "edit 1 rent 900",
        "remove" => "remove 2",
        "save" => "save March",
        "load" => "load March",
        "config" => "config sync_enabled on",
        "sync" => "sync push",
        _ => return None,
    })
}

/// Commands grouped by what they work on, each rendered as `usage  description`.
pub(crate) fn overview(registry: &CommandRegistry) -> Vec<(&'static str, Vec<String>)> {
    let render = |entry: &CommandEntry| format!("  {:<34}{}", entry.usage, entry.description);
    let mut groups: Vec<(&'static str, Vec<String>)> = GROUPS
        .iter()
        .map(|(title, names)| {
            let lines: Vec<String> = names
                .iter()
                .filter_map(|name| registry.get(name))
                .map(render)
                .collect();
            (*title, lines)
        })
        .filter(|(_, lines)| !lines.is_empty())
        .collect();

    let other: Vec<String> = registry
        .list()
        .into_iter()
        .filter(|entry| !GROUPS.iter().any(|(_, names)| names.contains(&entry.name)))
        .map(render)
        .collect();
    if !other.is_empty() {
        groups.push((OTHER_GROUP, other));
    }
    groups
}

pub fn print_overview(registry: &CommandRegistry) {
    output::section("Savings Calc commands");
    for (title, lines) in overview(registry) {
        output::line(format!("{}:", title));
        for line in lines {
            output::line(line);
        }
    }
    io::print_hint("Rows are numbered from 1 as listed by `rows`. Quote text containing spaces.");
}

pub fn print_command(entry: &CommandEntry) {
    output::section(entry.name);
    output::line(format!("  {}", entry.description));
    output::line(format!("  usage:   {}", entry.usage));
    if let Some(example) = example(entry.name) {
        output::line(format!("  example: {}", example));
    }
}
