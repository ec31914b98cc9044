//! Types command - list supported document types and their fields.

use clap::Args;
use console::style;

use ldb_core::DocumentType;

/// Arguments for the types command.
#[derive(Args)]
pub struct TypesArgs {
    /// Print as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(args: TypesArgs) -> anyhow::Result<()> {
    if args.json {
        let types: Vec<serde_json::Value> = DocumentType::ALL
            .iter()
            .map(|t| {
                serde_json::json!({
                    "type": t.as_str(),
                    "description": t.description(),
                    "fields": t.expected_fields(),
                    "required": t.required_fields(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&types)?);
        return Ok(());
    }

    for doc_type in DocumentType::ALL {
        println!(
            "{} {}",
            style(doc_type.as_str()).bold().cyan(),
            style(format!("({})", doc_type.description())).dim()
        );
        let required = doc_type.required_fields();
        for field in doc_type.expected_fields() {
            if required.contains(field) {
                println!("  - {} {}", field, style("(required)").yellow());
            } else {
                println!("  - {}", field);
            }
        }
        println!();
    }

    println!(
        "{} Required fields are checked by --validate.",
        style("ℹ").blue()
    );

    Ok(())
}
