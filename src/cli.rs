use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub const DEFAULT_ROW_LIMIT: usize = 100_000;
pub const DEFAULT_SAMPLE_SIZE: usize = 10;

#[derive(Debug, Parser)]
#[command(author, version, about = "Rewrite email domains in CSV files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Replace every email at the old domain and write the rewritten CSV
    Replace(ReplaceArgs),
    /// Show the changes a replacement run would make, without writing anything
    Preview(PreviewArgs),
    /// Scan a CSV file for email addresses and summarize what it contains
    Analyze(AnalyzeArgs),
}

#[derive(Debug, Args)]
pub struct ReplaceArgs {
    /// Input CSV/TSV file to process
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Output file path (defaults to a timestamped name in the output directory)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Directory for the generated output file when --output is omitted
    #[arg(long = "output-dir", default_value = ".")]
    pub output_dir: PathBuf,
    /// Domain to be replaced (e.g. old-company.com)
    #[arg(long = "old-domain", allow_hyphen_values = true)]
    pub old_domain: String,
    /// Replacement domain (e.g. new-company.com)
    #[arg(long = "new-domain", allow_hyphen_values = true)]
    pub new_domain: String,
    /// Maximum number of data rows to process
    #[arg(long = "row-limit", default_value_t = DEFAULT_ROW_LIMIT)]
    pub row_limit: usize,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Emit the run summary as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Input CSV/TSV file to inspect
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Domain to be replaced
    #[arg(long = "old-domain", allow_hyphen_values = true)]
    pub old_domain: String,
    /// Replacement domain
    #[arg(long = "new-domain", allow_hyphen_values = true)]
    pub new_domain: String,
    /// Maximum number of changed cells to display
    #[arg(long = "sample-size", default_value_t = DEFAULT_SAMPLE_SIZE)]
    pub sample_size: usize,
    /// Maximum number of data rows to process
    #[arg(long = "row-limit", default_value_t = DEFAULT_ROW_LIMIT)]
    pub row_limit: usize,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Emit the preview as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Input CSV/TSV file to inspect
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Optional target domain to check for
    #[arg(long = "domain")]
    pub domain: Option<String>,
    /// Maximum number of data rows to process
    #[arg(long = "row-limit", default_value_t = DEFAULT_ROW_LIMIT)]
    pub row_limit: usize,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Emit the analysis as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_delimiter_accepts_named_and_literal_forms() {
        assert_eq!(parse_delimiter("tab").unwrap(), b'\t');
        assert_eq!(parse_delimiter(";").unwrap(), b';');
        assert!(parse_delimiter("ab").is_err());
        assert!(parse_delimiter("").is_err());
    }
}
