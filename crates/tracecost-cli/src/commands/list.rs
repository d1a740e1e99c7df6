use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::io::{self, Write};
use tracecost_core::registry;

#[derive(Serialize)]
struct ListEntry {
    name: &'static str,
    captures_stack: bool,
    description: &'static str,
}

/// Print the benchmark registry.
pub fn run(json: bool) -> Result<()> {
    let entries: Vec<ListEntry> = registry()
        .iter()
        .map(|b| ListEntry {
            name: b.name,
            captures_stack: b.captures_stack(),
            description: b.description,
        })
        .collect();

    if json {
        let out = serde_json::to_string_pretty(&entries).into_diagnostic()?;
        println!("{out}");
        return Ok(());
    }

    let mut out = io::stdout().lock();
    for entry in &entries {
        let stack = if entry.captures_stack {
            "stack"
        } else {
            "no-stack"
        };
        writeln!(out, "{:<32} {:<9} {}", entry.name, stack, entry.description)
            .into_diagnostic()?;
    }
    out.flush().into_diagnostic()?;
    Ok(())
}
