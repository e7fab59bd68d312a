use serde_json::{Map, Number, Value};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::cell::Cell;
use crate::dataframe::DataFrame;
use crate::error::{Error, Result};
use crate::series::Series;

/// Write a DataFrame to a JSON file as an array of row records.
pub fn write_json<P: AsRef<Path>>(df: &DataFrame, path: P) -> Result<()> {
    let mut records = Vec::with_capacity(df.row_count());
    for i in 0..df.row_count() {
        let mut record = Map::new();
        for name in df.column_names() {
            let cell = df
                .column(name)
                .and_then(|series| series.get(i))
                .unwrap_or(&Cell::Na);
            record.insert(name.clone(), cell_to_value(cell));
        }
        records.push(Value::Object(record));
    }

    let file = File::create(path.as_ref()).map_err(Error::Io)?;
    serde_json::to_writer(BufWriter::new(file), &Value::Array(records)).map_err(Error::Json)?;
    Ok(())
}

/// Read a JSON file holding an array of row records into a DataFrame.
///
/// Columns are the union of the record keys; records missing a key get a
/// missing cell.
pub fn read_json<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
    let file = File::open(path.as_ref()).map_err(Error::Io)?;
    let value: Value = serde_json::from_reader(BufReader::new(file)).map_err(Error::Json)?;

    let records = match value {
        Value::Array(records) => records,
        _ => {
            return Err(Error::InvalidValue(
                "expected a top-level JSON array of records".to_string(),
            ))
        }
    };

    // Collect column names in first-encounter order
    let mut names: Vec<String> = Vec::new();
    for record in &records {
        if let Value::Object(map) = record {
            for key in map.keys() {
                if !names.contains(key) {
                    names.push(key.clone());
                }
            }
        } else {
            return Err(Error::InvalidValue(
                "expected every JSON record to be an object".to_string(),
            ));
        }
    }

    let mut df = DataFrame::new();
    for name in names {
        let values: Vec<Cell> = records
            .iter()
            .map(|record| {
                record
                    .get(name.as_str())
                    .map_or(Cell::Na, value_to_cell)
            })
            .collect();
        let series = Series::new(values, Some(name.clone()));
        df.add_column(name, series)?;
    }
    Ok(df)
}

fn cell_to_value(cell: &Cell) -> Value {
    match cell {
        Cell::Na => Value::Null,
        Cell::Int(v) => Value::Number((*v).into()),
        Cell::Float(v) => Number::from_f64(*v).map_or(Value::Null, Value::Number),
        Cell::Str(s) => Value::String(s.clone()),
        Cell::List(items) => Value::Array(
            items
                .iter()
                .map(|item| Value::String(item.clone()))
                .collect(),
        ),
    }
}

fn value_to_cell(value: &Value) -> Cell {
    match value {
        Value::Null => Cell::Na,
        Value::Bool(b) => Cell::Int(i64::from(*b)),
        Value::Number(n) => {
            if let Some(v) = n.as_i64() {
                Cell::Int(v)
            } else {
                n.as_f64().map_or(Cell::Na, Cell::Float)
            }
        }
        Value::String(s) => Cell::Str(s.clone()),
        Value::Array(items) => Cell::List(
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
        ),
        Value::Object(_) => Cell::Na,
    }
}
