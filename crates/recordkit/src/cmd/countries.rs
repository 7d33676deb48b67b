use recordkit_core::country::{self, Country};

use crate::cmd::CountriesArgs;
use crate::exit::{CliError, CliResult, FAILURE, SUCCESS};
use crate::output::{print_json, table, OutputFormat};

pub fn run(args: CountriesArgs, format: OutputFormat) -> CliResult<i32> {
    match args.code.as_deref() {
        Some(code) => {
            let entry = country::find(code)
                .ok_or_else(|| CliError::new(FAILURE, format!("unknown country code: {code}")))?;
            match format {
                OutputFormat::Json => print_json(entry),
                _ => print_countries(std::slice::from_ref(entry), format),
            }
        }
        None => match format {
            OutputFormat::Json => print_json(&country::all()),
            _ => print_countries(country::all(), format),
        },
    }
    Ok(SUCCESS)
}

fn print_countries(entries: &[Country], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            let mut table = table(vec!["ALPHA-2", "ALPHA-3", "NUMERIC", "NAME"]);
            for entry in entries {
                table.add_row(vec![
                    entry.two_letter_code,
                    entry.three_letter_code,
                    entry.numeric_code,
                    entry.name,
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Json | OutputFormat::Pretty => {
            for entry in entries {
                println!(
                    "{} {} {} {}",
                    entry.two_letter_code, entry.three_letter_code, entry.numeric_code, entry.name
                );
            }
        }
    }
}
