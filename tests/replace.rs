use encoding_rs::UTF_8;
use mailmorph::domain::{Domain, MatchSpec};
use mailmorph::error::EngineError;
use mailmorph::replace::replace;
use mailmorph::table::Table;

fn load(csv: &str) -> Table {
    Table::load(csv.as_bytes(), b',', UTF_8, 100_000).expect("load table")
}

fn spec(old: &str, new: &str) -> MatchSpec {
    MatchSpec::new(Domain::parse(old).unwrap(), Domain::parse(new).unwrap()).unwrap()
}

#[test]
fn rewrites_only_cells_at_the_old_domain() {
    let table = load("name,email\nAlice,alice@old.com\nBob,bob@other.com\n");
    let report = replace(&table, &spec("old.com", "new.com"), 100_000).expect("replace");
    assert_eq!(report.changed_cells, 1);
    assert_eq!(report.row_count, 2);
    assert_eq!(report.table.cell(0, 1), "alice@new.com");
    assert_eq!(report.table.cell(1, 1), "bob@other.com");
}

#[test]
fn domain_case_is_canonicalized_local_part_preserved() {
    let table = load("email\nAlice.B@OLD.com\n");
    let report = replace(&table, &spec("old.com", "new.com"), 100_000).expect("replace");
    assert_eq!(report.table.cell(0, 0), "Alice.B@new.com");
}

#[test]
fn output_shape_matches_input_exactly() {
    let table = load("z,a,m\nx@old.com,1,y@old.com\nplain,2,text\n");
    let report = replace(&table, &spec("old.com", "new.com"), 100_000).expect("replace");
    assert_eq!(report.table.column_names(), table.column_names());
    assert_eq!(report.table.row_count(), table.row_count());
}

#[test]
fn numeric_columns_pass_through_untouched() {
    // The numeric column is never scanned even though its text could in
    // principle be rewritten once coerced to a string.
    let table = load("count,email\n1,a@old.com\n2,b@old.com\n3,c@old.com\n");
    let report = replace(&table, &spec("old.com", "new.com"), 100_000).expect("replace");
    assert_eq!(report.changed_cells, 3);
    for row in 0..3 {
        assert_eq!(report.table.cell(row, 0), table.cell(row, 0));
    }
}

#[test]
fn input_table_is_never_mutated() {
    let table = load("email\na@old.com\n");
    let before = table.clone();
    let _ = replace(&table, &spec("old.com", "new.com"), 100_000).expect("replace");
    assert_eq!(table, before);
}

#[test]
fn replace_is_deterministic() {
    let table = load("email,note\na@old.com,ping b@OLD.com\nplain,c@old.com d@old.com\n");
    let first = replace(&table, &spec("old.com", "new.com"), 100_000).expect("first run");
    let second = replace(&table, &spec("old.com", "new.com"), 100_000).expect("second run");
    assert_eq!(first.table, second.table);
    assert_eq!(first.changed_cells, second.changed_cells);
    assert_eq!(
        first.table.to_csv_bytes(b',').expect("serialize"),
        second.table.to_csv_bytes(b',').expect("serialize")
    );
}

#[test]
fn equal_domains_are_a_noop() {
    let table = load("email\na@OLD.com\n");
    let report = replace(&table, &spec("old.com", "OLD.com"), 100_000).expect("replace");
    assert_eq!(report.changed_cells, 0);
    assert_eq!(report.table, table);
}

#[test]
fn empty_table_fails_with_empty_table() {
    let table = Table::from_parts(vec!["email".to_string()], vec![]).expect("shape");
    assert!(matches!(
        replace(&table, &spec("old.com", "new.com"), 100_000).unwrap_err(),
        EngineError::EmptyTable
    ));
}

#[test]
fn row_ceiling_is_enforced_before_scanning() {
    let table = load("email\na@old.com\nb@old.com\n");
    assert!(matches!(
        replace(&table, &spec("old.com", "new.com"), 1).unwrap_err(),
        EngineError::RowLimitExceeded { actual: 2, limit: 1 }
    ));
}
