use std::io::Read;

use csv::{ReaderBuilder, StringRecord, Trim};
use diesel::prelude::*;
use diesel::SqliteConnection;
use thiserror::Error;

use crate::models::catalog_models::{NewIngredient, NewTag};
use crate::schema::{ingredients, tags};

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Row {row}: {source}")]
    Csv { row: u64, source: csv::Error },

    #[error("Row {row}: expected {expected} columns, got {got}")]
    Columns { row: u64, expected: usize, got: usize },

    #[error("Row {row}: {field} may not be blank")]
    Blank { row: u64, field: &'static str },

    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),
}

/// What an import run did. Rows already present are skipped, not updated.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    pub inserted: usize,
    pub skipped: usize,
}

fn read_rows<R: Read>(
    reader: R,
    has_headers: bool,
    columns: &[&'static str],
) -> Result<Vec<Vec<String>>, ImportError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(has_headers)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record: StringRecord = record.map_err(|source| ImportError::Csv {
            row: source.position().map_or(0, |p| p.line()),
            source,
        })?;
        let row = record.position().map_or(0, |p| p.line());
        if record.iter().all(str::is_empty) {
            continue;
        }
        if record.len() != columns.len() {
            return Err(ImportError::Columns {
                row,
                expected: columns.len(),
                got: record.len(),
            });
        }
        for (field, value) in columns.iter().zip(record.iter()) {
            if value.is_empty() {
                return Err(ImportError::Blank { row, field });
            }
        }
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

/// Headerless `name,measurement_unit` rows.
pub fn import_ingredients<R: Read>(
    conn: &mut SqliteConnection,
    reader: R,
) -> Result<ImportReport, ImportError> {
    let rows = read_rows(reader, false, &["name", "measurement_unit"])?;

    conn.immediate_transaction::<_, ImportError, _>(|conn| {
        let mut report = ImportReport::default();
        for row in &rows {
            let inserted = diesel::insert_into(ingredients::table)
                .values(&NewIngredient {
                    name: &row[0],
                    measurement_unit: &row[1],
                })
                .on_conflict_do_nothing()
                .execute(conn)?;
            if inserted == 0 {
                report.skipped += 1;
            } else {
                report.inserted += 1;
            }
        }
        Ok(report)
    })
}

/// `name,color,slug` rows under a header line.
pub fn import_tags<R: Read>(conn: &mut SqliteConnection, reader: R) -> Result<ImportReport, ImportError> {
    let rows = read_rows(reader, true, &["name", "color", "slug"])?;

    conn.immediate_transaction::<_, ImportError, _>(|conn| {
        let mut report = ImportReport::default();
        for row in &rows {
            let inserted = diesel::insert_into(tags::table)
                .values(&NewTag {
                    name: &row[0],
                    color: &row[1],
                    slug: &row[2],
                })
                .on_conflict_do_nothing()
                .execute(conn)?;
            if inserted == 0 {
                report.skipped += 1;
            } else {
                report.inserted += 1;
            }
        }
        Ok(report)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_trimmed_and_blank_lines_skipped() {
        let data = "Salt , g\n\nSugar,g\n";
        let rows = read_rows(data.as_bytes(), false, &["name", "measurement_unit"]).unwrap();
        assert_eq!(rows, vec![vec!["Salt", "g"], vec!["Sugar", "g"]]);
    }

    #[test]
    fn header_line_is_not_imported() {
        let data = "name,color,slug\nBreakfast,#E26C2D,breakfast\n";
        let rows = read_rows(data.as_bytes(), true, &["name", "color", "slug"]).unwrap();
        assert_eq!(rows, vec![vec!["Breakfast", "#E26C2D", "breakfast"]]);
    }

    #[test]
    fn wrong_column_count_names_the_row() {
        let data = "Salt,g\nPepper\n";
        let err = read_rows(data.as_bytes(), false, &["name", "measurement_unit"]).unwrap_err();
        assert!(matches!(err, ImportError::Columns { row: 2, expected: 2, got: 1 }));
    }

    #[test]
    fn blank_values_are_rejected() {
        let data = "name,color,slug\nLunch,,lunch\n";
        let err = read_rows(data.as_bytes(), true, &["name", "color", "slug"]).unwrap_err();
        assert!(matches!(err, ImportError::Blank { row: 2, field: "color" }));
    }

    #[test]
    fn reported_row_is_the_file_line_after_blank_lines() {
        let data = "Salt,g\n\n\nSugar,g\nPepper\n";
        let err = read_rows(data.as_bytes(), false, &["name", "measurement_unit"]).unwrap_err();
        assert!(
            matches!(err, ImportError::Columns { row: 5, expected: 2, got: 1 }),
            "got {err}"
        );
    }
}
