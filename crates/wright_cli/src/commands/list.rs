//! List command - Show the bundled programs.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use wright_programs::ProgramRegistry;

#[derive(Args)]
pub struct ListArgs {
    /// Print the programs as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct ProgramEntry {
    name: String,
    project: String,
    description: String,
}

fn entries(registry: &ProgramRegistry) -> Vec<ProgramEntry> {
    registry
        .list()
        .iter()
        .map(|program| ProgramEntry {
            name: program.name().to_string(),
            project: program.project().to_string(),
            description: program.description().to_string(),
        })
        .collect()
}

pub async fn execute(args: ListArgs) -> Result<()> {
    let entries = entries(&ProgramRegistry::standard());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("📦 Available programs:");
    for entry in &entries {
        println!("   {:<14} {:<13} {}", entry.name, entry.project, entry.description);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_cover_registry() {
        let entries = entries(&ProgramRegistry::standard());
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();

        assert_eq!(names, vec!["civo-cluster", "do-cluster", "nginx-app"]);
        assert_eq!(entries[2].project, "01-solution");
    }
}
