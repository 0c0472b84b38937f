//! Bounded dry run: reports what a replacement would change without
//! materializing a full output table.
//!
//! `total_matches` counts every cell that would differ after substitution,
//! uncapped, so it always agrees with the full pass's changed-cell count for
//! the same table and spec. Only the rendered records are capped, taken in
//! column-major then row-major order.

use std::fs;

use anyhow::{Context, Result, bail};
use log::info;
use serde::Serialize;

use crate::{
    cli::PreviewArgs,
    columns::classify_columns,
    domain::{Domain, MatchSpec},
    error::EngineError,
    io_utils, render,
    table::Table,
};

#[derive(Debug, Clone, Serialize)]
pub struct ChangeRecord {
    pub column: String,
    pub row: usize,
    pub original: String,
    pub updated: String,
}

#[derive(Debug)]
pub struct PreviewReport {
    pub total_matches: usize,
    pub row_count: usize,
    pub records: Vec<ChangeRecord>,
}

/// Dry-runs `spec` over `table`, keeping at most `sample_size` records.
pub fn preview(
    table: &Table,
    spec: &MatchSpec,
    sample_size: usize,
    row_limit: usize,
) -> Result<PreviewReport, EngineError> {
    table.ensure_not_empty()?;
    table.ensure_within_limit(row_limit)?;

    let kinds = classify_columns(table);
    let mut total_matches = 0usize;
    let mut records = Vec::new();

    if !spec.is_noop() {
        for (column, kind) in kinds.iter().enumerate() {
            if !kind.is_scanned() {
                continue;
            }
            let name = &table.column_names()[column];
            for (row, cell) in table.column_cells(column).enumerate() {
                let (updated, occurrences) = spec.substitute(cell);
                if occurrences == 0 || updated == cell {
                    continue;
                }
                total_matches += 1;
                if records.len() < sample_size {
                    records.push(ChangeRecord {
                        column: name.clone(),
                        row,
                        original: cell.to_string(),
                        updated: updated.into_owned(),
                    });
                }
            }
        }
    }

    Ok(PreviewReport {
        total_matches,
        row_count: table.row_count(),
        records,
    })
}

#[derive(Serialize)]
struct PreviewSummary<'a> {
    success: bool,
    total_matches: usize,
    total_rows: usize,
    preview_data: &'a [ChangeRecord],
    old_domain: &'a str,
    new_domain: &'a str,
}

pub fn execute(args: &PreviewArgs) -> Result<()> {
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let old = Domain::parse(&args.old_domain)?;
    let new = Domain::parse(&args.new_domain)?;
    if old == new {
        bail!("Old and new domains are identical; nothing to preview");
    }
    let spec = MatchSpec::new(old, new)?;

    let bytes = fs::read(&args.input)
        .with_context(|| format!("Reading input file {:?}", args.input))?;
    let table = Table::load(&bytes, delimiter, encoding, args.row_limit)?;
    let report = preview(&table, &spec, args.sample_size, args.row_limit)?;

    if args.json {
        let summary = PreviewSummary {
            success: true,
            total_matches: report.total_matches,
            total_rows: report.row_count,
            preview_data: &report.records,
            old_domain: spec.old_domain().as_str(),
            new_domain: spec.new_domain().as_str(),
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    if report.total_matches == 0 {
        info!(
            "No cells containing '{}' found across {} row(s)",
            spec.old_domain(),
            report.row_count
        );
        return Ok(());
    }

    let headers = vec![
        "column".to_string(),
        "row".to_string(),
        "original".to_string(),
        "updated".to_string(),
    ];
    let rows = report
        .records
        .iter()
        .map(|record| {
            vec![
                record.column.clone(),
                record.row.to_string(),
                record.original.clone(),
                record.updated.clone(),
            ]
        })
        .collect::<Vec<_>>();
    render::print_table(&headers, &rows);
    info!(
        "{} matching cell(s) across {} row(s); showing {}",
        report.total_matches,
        report.row_count,
        report.records.len()
    );
    Ok(())
}
