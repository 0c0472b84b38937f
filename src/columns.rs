//! Per-column type classification driving the scan/skip rule.
//!
//! Each column is classified exactly once before any matching pass runs.
//! Purely numeric or boolean columns are passed through untouched; columns
//! holding any free text are scanned for email occurrences.

use crate::table::Table;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Every non-empty cell is free text.
    Textual,
    /// Every non-empty cell parses as an integer, float, or boolean.
    Numeric,
    /// Both kinds of cell appear.
    Mixed,
}

impl ColumnKind {
    /// Whether the replacement and analysis passes look inside this column.
    pub fn is_scanned(self) -> bool {
        matches!(self, ColumnKind::Textual | ColumnKind::Mixed)
    }
}

/// Classifies every column of `table` in header order.
///
/// Empty cells are neutral; a column with no non-empty cells is `Textual`
/// (there is nothing to misclassify and scanning it finds nothing).
pub fn classify_columns(table: &Table) -> Vec<ColumnKind> {
    (0..table.column_count())
        .map(|idx| classify_column(table, idx))
        .collect()
}

fn classify_column(table: &Table, column: usize) -> ColumnKind {
    let mut numeric = false;
    let mut textual = false;
    for cell in table.column_cells(column) {
        let trimmed = cell.trim();
        if trimmed.is_empty() {
            continue;
        }
        if is_numeric_like(trimmed) {
            numeric = true;
        } else {
            textual = true;
        }
        if numeric && textual {
            return ColumnKind::Mixed;
        }
    }
    if numeric { ColumnKind::Numeric } else { ColumnKind::Textual }
}

fn is_numeric_like(value: &str) -> bool {
    value.parse::<i64>().is_ok()
        || value.parse::<f64>().is_ok()
        || value.eq_ignore_ascii_case("true")
        || value.eq_ignore_ascii_case("false")
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::UTF_8;

    fn table(csv: &str) -> Table {
        Table::load(csv.as_bytes(), b',', UTF_8, 1000).expect("load fixture")
    }

    #[test]
    fn classification_covers_all_three_kinds() {
        let t = table("id,note,flag,mixed\n1,hello,true,1\n2,world,FALSE,abc\n");
        assert_eq!(
            classify_columns(&t),
            [
                ColumnKind::Numeric,
                ColumnKind::Textual,
                ColumnKind::Numeric,
                ColumnKind::Mixed,
            ]
        );
    }

    #[test]
    fn empty_cells_are_neutral() {
        let t = table("a,b\n,x\n3,\n");
        assert_eq!(
            classify_columns(&t),
            [ColumnKind::Numeric, ColumnKind::Textual]
        );
    }

    #[test]
    fn all_empty_column_is_textual() {
        let t = table("a,b\n,1\n,2\n");
        assert_eq!(classify_columns(&t)[0], ColumnKind::Textual);
    }

    #[test]
    fn numeric_columns_are_skipped_textual_and_mixed_are_scanned() {
        assert!(!ColumnKind::Numeric.is_scanned());
        assert!(ColumnKind::Textual.is_scanned());
        assert!(ColumnKind::Mixed.is_scanned());
    }

    #[test]
    fn floats_and_negatives_count_as_numeric() {
        assert!(is_numeric_like("-3.5"));
        assert!(is_numeric_like("1e6"));
        assert!(!is_numeric_like("3.5kg"));
        assert!(!is_numeric_like("a@old.com"));
    }
}
