//! Writing the aggregate table to disk and reading it back.
//!
//! Files are written to a temporary sibling and renamed into place, so a
//! reader sees either the previous file or the complete new one.

use std::fs;
use std::io::Write;
use std::path::Path;

use ppa_config::ExportFormat;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::ExportError;
use crate::table::{AggregateTable, Cell};

/// Renders the table as CSV with a header row.
pub fn render_csv(table: &AggregateTable) -> String {
    csv_lines(table).collect()
}

/// Yields the header and every row as a newline-terminated CSV line.
pub(crate) fn csv_lines(table: &AggregateTable) -> impl Iterator<Item = String> + '_ {
    let header = format!("{}\n", table.columns().join(","));
    std::iter::once(header).chain(table.rows().map(|row| {
        let line: Vec<String> = row.iter().map(Cell::to_string).collect();
        format!("{}\n", line.join(","))
    }))
}

struct Row<'a> {
    columns: &'a [String],
    cells: Vec<Cell>,
}

impl Serialize for Row<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, cell) in self.columns.iter().zip(&self.cells) {
            map.serialize_entry(column, cell)?;
        }
        map.end()
    }
}

/// Renders the table as a JSON array of objects, keys in column order.
pub fn render_json(table: &AggregateTable) -> Result<String, ExportError> {
    let rows: Vec<Row<'_>> = table
        .rows()
        .map(|cells| Row {
            columns: table.columns(),
            cells,
        })
        .collect();
    let mut json =
        serde_json::to_string_pretty(&rows).map_err(|e| ExportError::Serialize(e.to_string()))?;
    json.push('\n');
    Ok(json)
}

/// Writes the table to `path` in the given format.
///
/// Parent directories are created. On failure nothing is left at `path`
/// beyond what was there before.
pub fn export(table: &AggregateTable, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
    let content = match format {
        ExportFormat::Csv => render_csv(table),
        ExportFormat::Json => render_json(table)?,
    };
    write_atomic(path, content.as_bytes())?;
    tracing::info!(path = %path.display(), rows = table.len(), "exported table");
    Ok(())
}

fn write_atomic(path: &Path, content: &[u8]) -> Result<(), ExportError> {
    let io_err = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(io_err)?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(content).map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}

/// A table read back from CSV.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedTable {
    /// Header row.
    pub columns: Vec<String>,
    /// Data rows, each as wide as the header.
    pub rows: Vec<Vec<Cell>>,
}

impl ImportedTable {
    /// Returns the index of a column.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Returns `true` if this holds exactly the columns and values of `table`.
    pub fn matches(&self, table: &AggregateTable) -> bool {
        self.columns == table.columns() && self.rows.iter().cloned().eq(table.rows())
    }
}

/// Reads a CSV file written by [`export`].
pub fn import_csv(path: &Path) -> Result<ImportedTable, ExportError> {
    let text = fs::read_to_string(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_csv(&text)
}

/// Parses CSV text written by [`render_csv`].
pub fn parse_csv(text: &str) -> Result<ImportedTable, ExportError> {
    let mut lines = text.lines().enumerate().filter(|(_, l)| !l.trim().is_empty());
    let Some((_, header)) = lines.next() else {
        return Err(ExportError::Parse {
            line: 1,
            reason: "missing header row".to_string(),
        });
    };
    let columns: Vec<String> = header.split(',').map(|c| c.trim().to_string()).collect();

    let mut rows = Vec::new();
    for (idx, line) in lines {
        let row = line
            .split(',')
            .map(|field| {
                Cell::parse(field).ok_or_else(|| ExportError::Parse {
                    line: idx + 1,
                    reason: format!("'{}' is not a number", field.trim()),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        if row.len() != columns.len() {
            return Err(ExportError::Parse {
                line: idx + 1,
                reason: format!("{} fields, header has {}", row.len(), columns.len()),
            });
        }
        rows.push(row);
    }
    Ok(ImportedTable { columns, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::tests::{points, record, schema};

    fn table() -> AggregateTable {
        let mut t = AggregateTable::new(schema());
        for (i, p) in points().into_iter().enumerate() {
            t.push(record(p, i as u64)).unwrap();
        }
        t
    }

    #[test]
    fn csv_header_and_rows() {
        let csv = render_csv(&table());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("frame_length,num_frames,total_power,"));
        assert!(lines[0].ends_with(",max_freq_mhz,max_throughput_msamples_sec"));
        assert!(lines[1].starts_with("128,8,1.234,0.987,0.247,3000,"));
        assert!(lines[4].starts_with("256,16,"));
    }

    #[test]
    fn json_keeps_column_order() {
        let json = render_json(&table()).unwrap();
        let fl = json.find("\"frame_length\"").unwrap();
        let tp = json.find("\"total_power\"").unwrap();
        let thr = json.find("\"max_throughput_msamples_sec\"").unwrap();
        assert!(fl < tp && tp < thr);

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        let rows = parsed.as_array().unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[3]["num_frames"], 16);
        assert_eq!(rows[0]["consumed_cycles"], 20000);
    }

    #[test]
    fn csv_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/results.csv");
        let t = table();
        export(&t, &path, ExportFormat::Csv).unwrap();

        let back = import_csv(&path).unwrap();
        assert_eq!(back.rows.len(), t.len());
        assert_eq!(back.columns, t.columns());
        assert!(back.matches(&t));
        let col = back.column("max_freq_mhz").unwrap();
        assert_eq!(back.rows[0][col], Cell::Float(1000.0 / 15.544));
    }

    #[test]
    fn export_replaces_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        fs::write(&path, "stale\n").unwrap();
        export(&table(), &path, ExportFormat::Csv).unwrap();
        assert!(fs::read_to_string(&path).unwrap().starts_with("frame_length,"));
        // Only the target remains, no temporary siblings.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn failed_export_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the parent directory should be.
        let blocker = dir.path().join("out");
        fs::write(&blocker, "").unwrap();
        let err = export(&table(), &blocker.join("results.csv"), ExportFormat::Csv).unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }));
        assert!(!blocker.join("results.csv").exists());
    }

    #[test]
    fn empty_table_is_header_only() {
        let t = AggregateTable::new(schema());
        let back = parse_csv(&render_csv(&t)).unwrap();
        assert_eq!(back.columns.len(), 21);
        assert!(back.rows.is_empty());
    }

    #[test]
    fn ragged_row_rejected() {
        let err = parse_csv("a,b\n1,2\n3\n").unwrap_err();
        assert!(matches!(err, ExportError::Parse { line: 3, .. }));
        assert!(parse_csv("").is_err());
        assert!(matches!(
            parse_csv("a\nx\n"),
            Err(ExportError::Parse { line: 2, .. })
        ));
    }
}
