use recordkit_core::RecordExt;
use serde::Serialize;
use tracing::info;

use crate::cmd::{load_contact, CheckArgs};
use crate::exit::{CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_json, table, OutputFormat};

#[derive(Serialize)]
struct CheckOutput {
    file: String,
    valid: bool,
    errors: Vec<String>,
}

pub fn run(args: CheckArgs, format: OutputFormat) -> CliResult<i32> {
    let contact = load_contact(&args.file, args.options.as_deref(), args.strict)?;
    let errors: Vec<String> = contact
        .error()
        .map(|error| error.lines().map(str::to_string).collect())
        .unwrap_or_default();

    let output = CheckOutput {
        file: args.file.display().to_string(),
        valid: errors.is_empty(),
        errors,
    };
    info!(file = %output.file, errors = output.errors.len(), "checked contact");
    print_check(&output, format);

    Ok(if output.valid { SUCCESS } else { DATA_INVALID })
}

fn print_check(output: &CheckOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(output),
        OutputFormat::Table => {
            if output.valid {
                println!("{}: valid", output.file);
                return;
            }
            let mut table = table(vec!["PROPERTY", "MESSAGE"]);
            for line in &output.errors {
                let (property, message) = split_line(line);
                table.add_row(vec![property, message]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            if output.valid {
                println!("{}: valid", output.file);
            } else {
                println!("{}: {} error(s)", output.file, output.errors.len());
                for line in &output.errors {
                    println!("  {line}");
                }
            }
        }
    }
}

/// Property path and message of one error line; unbound rules have no path.
fn split_line(line: &str) -> (&str, &str) {
    line.split_once(": ").unwrap_or(("", line))
}
