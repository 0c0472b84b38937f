//! Diagnostic email scan: which columns hold addresses, how many, and which
//! domains appear.
//!
//! Uses a generic email-shaped pattern independent of any replacement target,
//! so callers can warn when the domain they are about to rewrite never occurs
//! in the data. Purely read-only.

use std::collections::BTreeSet;
use std::fs;
use std::sync::OnceLock;

use anyhow::{Context, Result};
use itertools::Itertools;
use log::{info, warn};
use regex::Regex;
use serde::Serialize;

use crate::{
    cli::AnalyzeArgs,
    columns::classify_columns,
    domain::Domain,
    error::EngineError,
    io_utils,
    matcher::EmailMatcher,
    render,
    table::Table,
};

const SAMPLE_EMAILS_PER_COLUMN: usize = 5;

static EMAIL_PATTERN: OnceLock<Regex> = OnceLock::new();

fn email_pattern() -> &'static Regex {
    EMAIL_PATTERN.get_or_init(|| {
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")
            .expect("email pattern should compile")
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnEmailStats {
    pub column: String,
    pub email_count: usize,
    pub unique_emails: usize,
    pub sample_emails: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TargetDomainStats {
    pub domain: String,
    pub occurrences: usize,
    pub found: bool,
}

#[derive(Debug, Serialize)]
pub struct AnalysisReport {
    pub columns: Vec<ColumnEmailStats>,
    pub total_emails: usize,
    pub unique_emails: usize,
    pub domains_found: Vec<String>,
    pub has_emails: bool,
    pub target: Option<TargetDomainStats>,
}

/// Scans every textual column of `table` for email-shaped values.
pub fn analyze(table: &Table, target: Option<&Domain>) -> Result<AnalysisReport, EngineError> {
    table.ensure_not_empty()?;

    let target_matcher = match target {
        Some(domain) => Some(EmailMatcher::new(domain)?),
        None => None,
    };

    let kinds = classify_columns(table);
    let mut columns = Vec::new();
    let mut total_emails = 0usize;
    let mut distinct_emails: BTreeSet<String> = BTreeSet::new();
    let mut domains_found: BTreeSet<String> = BTreeSet::new();
    let mut target_occurrences = 0usize;

    for (column, kind) in kinds.iter().enumerate() {
        if !kind.is_scanned() {
            continue;
        }
        let mut email_count = 0usize;
        let mut column_distinct: BTreeSet<String> = BTreeSet::new();
        let mut samples: Vec<String> = Vec::new();

        for cell in table.column_cells(column) {
            for found in email_pattern().find_iter(cell) {
                let email = found.as_str();
                email_count += 1;
                if column_distinct.insert(email.to_string())
                    && samples.len() < SAMPLE_EMAILS_PER_COLUMN
                {
                    samples.push(email.to_string());
                }
                distinct_emails.insert(email.to_string());
                if let Some((_, domain_part)) = email.rsplit_once('@') {
                    domains_found.insert(domain_part.to_ascii_lowercase());
                }
            }
            if let Some(matcher) = &target_matcher {
                target_occurrences += matcher.match_count(cell);
            }
        }

        if email_count > 0 {
            total_emails += email_count;
            columns.push(ColumnEmailStats {
                column: table.column_names()[column].clone(),
                email_count,
                unique_emails: column_distinct.len(),
                sample_emails: samples,
            });
        }
    }

    let target = target.map(|domain| TargetDomainStats {
        domain: domain.as_str().to_string(),
        occurrences: target_occurrences,
        found: target_occurrences > 0,
    });

    Ok(AnalysisReport {
        has_emails: !columns.is_empty(),
        columns,
        total_emails,
        unique_emails: distinct_emails.len(),
        domains_found: domains_found.into_iter().collect(),
        target,
    })
}

#[derive(Serialize)]
struct EmailStatsSummary<'a> {
    total_emails: usize,
    unique_emails: usize,
    domains_found: &'a [String],
    target_domain_count: usize,
}

#[derive(Serialize)]
struct AnalysisSummary<'a> {
    success: bool,
    email_columns: &'a [ColumnEmailStats],
    email_stats: EmailStatsSummary<'a>,
    has_emails: bool,
    target_domain: Option<&'a str>,
    target_domain_found: Option<bool>,
}

pub fn execute(args: &AnalyzeArgs) -> Result<()> {
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let target = match &args.domain {
        Some(raw) => Some(Domain::parse(raw)?),
        None => None,
    };

    let bytes = fs::read(&args.input)
        .with_context(|| format!("Reading input file {:?}", args.input))?;
    let table = Table::load(&bytes, delimiter, encoding, args.row_limit)?;
    let report = analyze(&table, target.as_ref())?;

    if args.json {
        let summary = AnalysisSummary {
            success: true,
            email_columns: &report.columns,
            email_stats: EmailStatsSummary {
                total_emails: report.total_emails,
                unique_emails: report.unique_emails,
                domains_found: &report.domains_found,
                target_domain_count: report.target.as_ref().map_or(0, |t| t.occurrences),
            },
            has_emails: report.has_emails,
            target_domain: report.target.as_ref().map(|t| t.domain.as_str()),
            target_domain_found: report.target.as_ref().map(|t| t.found),
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    if !report.has_emails {
        info!(
            "No email addresses found in '{}' ({} rows)",
            args.input.display(),
            table.row_count()
        );
        if let Some(target) = &report.target {
            warn!("Target domain '{}' was not found in the data", target.domain);
        }
        return Ok(());
    }

    let headers = vec![
        "column".to_string(),
        "emails".to_string(),
        "unique".to_string(),
        "samples".to_string(),
    ];
    let rows = report
        .columns
        .iter()
        .map(|stats| {
            vec![
                stats.column.clone(),
                stats.email_count.to_string(),
                stats.unique_emails.to_string(),
                stats.sample_emails.iter().join(", "),
            ]
        })
        .collect::<Vec<_>>();
    render::print_table(&headers, &rows);

    info!(
        "{} email(s) ({} unique) across {} column(s); domains: {}",
        report.total_emails,
        report.unique_emails,
        report.columns.len(),
        report.domains_found.iter().join(", ")
    );
    if let Some(target) = &report.target {
        if target.found {
            info!(
                "Target domain '{}' found ({} occurrence(s))",
                target.domain, target.occurrences
            );
        } else {
            warn!("Target domain '{}' was not found in the data", target.domain);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::UTF_8;

    fn load(csv: &str) -> Table {
        Table::load(csv.as_bytes(), b',', UTF_8, 1000).expect("load fixture")
    }

    #[test]
    fn reports_domains_and_target_presence() {
        let table = load("contact,notes\nx@old.com,reach y@sample.org\nz@OLD.com,none\n");
        let target = Domain::parse("old.com").unwrap();
        let report = analyze(&table, Some(&target)).expect("analyze");
        assert_eq!(report.domains_found, ["old.com", "sample.org"]);
        assert_eq!(report.total_emails, 3);
        let target = report.target.expect("target stats");
        assert!(target.found);
        assert_eq!(target.occurrences, 2);
    }

    #[test]
    fn distinct_counts_and_samples_are_per_column() {
        let table = load("email\na@x.com\na@x.com\nb@x.com\n");
        let report = analyze(&table, None).expect("analyze");
        assert_eq!(report.columns.len(), 1);
        assert_eq!(report.columns[0].email_count, 3);
        assert_eq!(report.columns[0].unique_emails, 2);
        assert_eq!(report.columns[0].sample_emails, ["a@x.com", "b@x.com"]);
        assert_eq!(report.unique_emails, 2);
    }

    #[test]
    fn numeric_columns_are_not_scanned() {
        let table = load("code,note\n12,mail me at a@x.com\n34,thanks\n");
        let report = analyze(&table, None).expect("analyze");
        assert_eq!(report.columns.len(), 1);
        assert_eq!(report.columns[0].column, "note");
    }

    #[test]
    fn table_without_emails_has_none_flagged() {
        let table = load("a,b\nhello,world\n");
        let report = analyze(&table, None).expect("analyze");
        assert!(!report.has_emails);
        assert!(report.domains_found.is_empty());
        assert_eq!(report.total_emails, 0);
    }

    #[test]
    fn empty_table_is_rejected() {
        let table = Table::from_parts(vec!["a".into()], vec![]).expect("shape");
        assert!(matches!(
            analyze(&table, None).unwrap_err(),
            EngineError::EmptyTable
        ));
    }
}
