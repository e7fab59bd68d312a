use csv::{ReaderBuilder, StringRecord, Writer};
use std::fs::File;
use std::path::Path;

use crate::cell::{parse_list_literal, Cell};
use crate::dataframe::DataFrame;
use crate::error::{Error, Result};
use crate::series::Series;

/// Read a CSV file into a DataFrame.
///
/// Cell types are inferred per value: empty fields become missing, then
/// list literals, integers and floats are tried in turn, and anything else
/// stays text.
pub fn read_csv<P: AsRef<Path>>(path: P, has_header: bool) -> Result<DataFrame> {
    let file = File::open(path.as_ref()).map_err(Error::Io)?;

    let mut rdr = ReaderBuilder::new()
        .has_headers(has_header)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let records: Vec<StringRecord> = rdr
        .records()
        .collect::<std::result::Result<_, _>>()
        .map_err(Error::Csv)?;

    let headers: Vec<String> = if has_header {
        rdr.headers()
            .map_err(Error::Csv)?
            .iter()
            .map(|h| h.to_string())
            .collect()
    } else {
        let width = records.first().map_or(0, |record| record.len());
        (0..width).map(|i| format!("column_{}", i)).collect()
    };

    let mut df = DataFrame::new();
    if headers.is_empty() {
        return Ok(df);
    }

    let mut columns: Vec<Vec<Cell>> = vec![Vec::with_capacity(records.len()); headers.len()];
    for record in &records {
        for (i, column) in columns.iter_mut().enumerate() {
            let value = record.get(i).unwrap_or("");
            column.push(infer_cell(value));
        }
    }

    for (header, values) in headers.into_iter().zip(columns) {
        let series = Series::new(values, Some(header.clone()));
        df.add_column(header, series)?;
    }

    log::debug!(
        "read {} rows x {} columns from {}",
        df.row_count(),
        df.column_count(),
        path.as_ref().display()
    );
    Ok(df)
}

/// Write a DataFrame to a CSV file.
///
/// Missing cells become empty fields; list cells are rendered as quoted
/// list literals so a write/read round trip is stable.
pub fn write_csv<P: AsRef<Path>>(df: &DataFrame, path: P) -> Result<()> {
    let file = File::create(path.as_ref()).map_err(Error::Io)?;
    let mut wtr = Writer::from_writer(file);

    wtr.write_record(df.column_names()).map_err(Error::Csv)?;

    for i in 0..df.row_count() {
        let mut row = Vec::with_capacity(df.column_count());
        for name in df.column_names() {
            let cell = df
                .column(name)
                .and_then(|series| series.get(i))
                .unwrap_or(&Cell::Na);
            row.push(cell.to_string());
        }
        wtr.write_record(&row).map_err(Error::Csv)?;
    }

    wtr.flush().map_err(Error::Io)?;
    Ok(())
}

/// Infer the cell value of one CSV field
fn infer_cell(value: &str) -> Cell {
    if value.is_empty() {
        return Cell::Na;
    }
    if value.starts_with('[') {
        if let Some(items) = parse_list_literal(value) {
            return Cell::List(items);
        }
    }
    if let Ok(v) = value.parse::<i64>() {
        return Cell::Int(v);
    }
    if let Ok(v) = value.parse::<f64>() {
        return Cell::Float(v);
    }
    Cell::Str(value.to_string())
}
