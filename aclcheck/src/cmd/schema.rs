use acl_policy::schema::{BodySchema, catalog};
use anyhow::Result;

use crate::style;

/// Handle `aclcheck schema`.
pub fn run(json: bool) -> Result<()> {
    let levels = catalog();

    if json {
        println!("{}", serde_json::to_string_pretty(&levels)?);
    } else {
        println!("{}", style::header("Policy Schema"));
        println!("{}\n", style::dim("─────────────"));

        for level in &levels {
            println!("{}:", style::bold(level.name));
            println!("  {}\n", level.description);
            print_body(level.schema, 2);
            println!();
        }
    }
    Ok(())
}

fn print_body(schema: &BodySchema, indent: usize) {
    let pad = " ".repeat(indent);
    if schema.attributes.is_empty() && schema.blocks.is_empty() {
        println!("{}{}", pad, style::dim("(empty)"));
        return;
    }
    for attr in schema.attributes {
        let req = if attr.required {
            format!(" {}", style::yellow("(required)"))
        } else {
            String::new()
        };
        println!(
            "{}{} = {}{} {} {}",
            pad,
            style::cyan(attr.name),
            style::magenta("string"),
            req,
            style::dim("—"),
            attr.description
        );
    }
    for block in schema.blocks {
        let labels: String = block
            .label_names
            .iter()
            .map(|l| format!(" [{l}]"))
            .collect();
        println!(
            "{}{}{} {} {} {}",
            pad,
            style::cyan(block.type_name),
            style::dim(&labels),
            style::magenta("block"),
            style::dim("—"),
            block.description
        );
    }
}
