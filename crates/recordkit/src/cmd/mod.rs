use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand, ValueEnum};
use recordkit_codec::{decode_with, CodecConfig};
use recordkit_core::SerializationOptions;
use tracing::debug;

use crate::exit::{codec_error, io_error, CliError, CliResult, USAGE};
use crate::output::OutputFormat;
use crate::sample::Contact;

pub mod check;
pub mod convert;
pub mod countries;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode a contact document and report its validation errors.
    Check(CheckArgs),
    /// Decode a contact document and re-emit it as keyed JSON or XML.
    Convert(ConvertArgs),
    /// List the country table or look one entry up.
    Countries(CountriesArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Check(args) => check::run(args, format),
        Command::Convert(args) => convert::run(args),
        Command::Countries(args) => countries::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Contact XML document.
    pub file: PathBuf,
    /// JSON file with serialization options for the contact.
    #[arg(long, value_name = "FILE")]
    pub options: Option<PathBuf>,
    /// Reject elements that match no field.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum ConvertTarget {
    Json,
    Xml,
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Contact XML document.
    pub file: PathBuf,
    /// Output representation.
    #[arg(long, value_enum, default_value = "json")]
    pub to: ConvertTarget,
    /// JSON file with serialization options for the contact.
    #[arg(long, value_name = "FILE")]
    pub options: Option<PathBuf>,
    /// Indent output by this many spaces.
    #[arg(long)]
    pub indent: Option<usize>,
    /// Reject elements that match no field.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args, Debug)]
pub struct CountriesArgs {
    /// Alpha-2, alpha-3 or numeric code to look up.
    pub code: Option<String>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Serialization options from a JSON file; defaults when no file is given.
pub fn load_options(path: Option<&Path>) -> CliResult<SerializationOptions> {
    let Some(path) = path else {
        return Ok(SerializationOptions::default());
    };
    let context = format!("read options {}", path.display());
    let file = File::open(path).map_err(|err| io_error(&context, err))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|err| CliError::new(USAGE, format!("{context}: {err}")))
}

/// Decode the contact in `path` using the given options file.
pub fn load_contact(path: &Path, options: Option<&Path>, strict: bool) -> CliResult<Contact> {
    let mut contact = Contact::with_options(load_options(options)?);
    let context = format!("decode {}", path.display());
    let file = File::open(path).map_err(|err| io_error(&context, err))?;

    let config = if strict {
        CodecConfig::strict()
    } else {
        CodecConfig::default()
    };
    decode_with(&mut contact, BufReader::new(file), config)
        .map_err(|err| codec_error(&context, err))?;

    debug!(
        file = %path.display(),
        phones = contact.phones.len(),
        "decoded contact"
    );
    Ok(contact)
}
