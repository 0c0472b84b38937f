//! Full replacement pass: rewrites every scanned cell and counts changes.
//!
//! The input table is never modified; the pass produces a fresh table with
//! identical shape so callers can compare before and after or retry safely.
//! A cell counts as changed once, no matter how many email occurrences it
//! held. The pass is deterministic: column order comes from the source header,
//! never from an unordered container.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::Local;
use log::{info, warn};
use serde::Serialize;

use crate::{
    analyze,
    cli::ReplaceArgs,
    columns::classify_columns,
    domain::{Domain, MatchSpec},
    error::EngineError,
    io_utils,
    table::Table,
};

#[derive(Debug)]
pub struct ReplaceReport {
    pub table: Table,
    pub changed_cells: usize,
    pub row_count: usize,
}

/// Applies `spec` to every scanned column of `table`.
pub fn replace(
    table: &Table,
    spec: &MatchSpec,
    row_limit: usize,
) -> Result<ReplaceReport, EngineError> {
    table.ensure_not_empty()?;
    table.ensure_within_limit(row_limit)?;

    let kinds = classify_columns(table);
    let mut rows = table.rows().to_vec();
    let mut changed_cells = 0usize;

    if !spec.is_noop() {
        for (column, kind) in kinds.iter().enumerate() {
            if !kind.is_scanned() {
                continue;
            }
            for row in &mut rows {
                let (updated, occurrences) = spec.substitute(&row[column]);
                if occurrences > 0 && updated != row[column] {
                    let updated = updated.into_owned();
                    row[column] = updated;
                    changed_cells += 1;
                }
            }
        }
    }

    let output = Table::from_parts(table.column_names().to_vec(), rows)?;
    Ok(ReplaceReport {
        row_count: output.row_count(),
        changed_cells,
        table: output,
    })
}

#[derive(Serialize)]
struct ReplaceSummary<'a> {
    success: bool,
    output_file: String,
    changes_made: usize,
    total_rows: usize,
    old_domain: &'a str,
    new_domain: &'a str,
    generated_at: String,
}

pub fn execute(args: &ReplaceArgs) -> Result<()> {
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let old = Domain::parse(&args.old_domain)?;
    let new = Domain::parse(&args.new_domain)?;
    if old == new {
        bail!("Old and new domains are identical; nothing to replace");
    }
    let spec = MatchSpec::new(old, new)?;

    info!(
        "Replacing '{}' with '{}' in '{}' (delimiter '{}')",
        spec.old_domain(),
        spec.new_domain(),
        args.input.display(),
        io_utils::printable_delimiter(delimiter)
    );

    let bytes = fs::read(&args.input)
        .with_context(|| format!("Reading input file {:?}", args.input))?;
    let table = Table::load(&bytes, delimiter, encoding, args.row_limit)?;

    let analysis = analyze::analyze(&table, Some(spec.old_domain()))?;
    if let Some(target) = &analysis.target
        && !target.found
    {
        warn!(
            "Domain '{}' was not found in the uploaded data",
            spec.old_domain()
        );
    }

    let report = replace(&table, &spec, args.row_limit)?;
    let output_path = resolve_output_path(args);
    let writer = io_utils::create_output_file(&output_path)?;
    report
        .table
        .write_csv(writer, delimiter)
        .with_context(|| format!("Writing output to {output_path:?}"))?;

    let summary = ReplaceSummary {
        success: true,
        output_file: output_path.display().to_string(),
        changes_made: report.changed_cells,
        total_rows: report.row_count,
        old_domain: spec.old_domain().as_str(),
        new_domain: spec.new_domain().as_str(),
        generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    };
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        info!(
            "Rewrote {} cell(s) across {} row(s); output written to {:?}",
            report.changed_cells, report.row_count, output_path
        );
    }
    Ok(())
}

fn resolve_output_path(args: &ReplaceArgs) -> PathBuf {
    match &args.output {
        Some(path) => path.clone(),
        None => {
            let timestamp = Local::now().format("%Y%m%d_%H%M%S");
            args.output_dir
                .join(format!("mailmorph_output_{timestamp}.csv"))
        }
    }
}
