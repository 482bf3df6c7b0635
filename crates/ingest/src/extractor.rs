use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};

use crate::types::{Cell, HEADER_ROWS, IngestError, RawRow, Result};

fn to_cell(value: &Data) -> Cell {
    match value {
        Data::Empty => Cell::Empty,
        Data::String(value) => Cell::Text(value.clone()),
        Data::Int(value) => Cell::Int(*value),
        Data::Float(value) => Cell::Number(*value),
        Data::Bool(value) => Cell::Bool(*value),
        Data::DateTime(value) => match value.as_datetime() {
            Some(dt) => Cell::DateTime(dt),
            None => Cell::Number(value.as_f64()),
        },
        Data::DateTimeIso(value) | Data::DurationIso(value) => Cell::Text(value.clone()),
        Data::Error(err) => Cell::Error(err.to_string()),
    }
}

/// Reads the first sheet of a workbook and returns the rows after the
/// header block, which is the first `HEADER_ROWS` rows of the used range.
/// Fully blank rows are dropped.
pub fn extract_rows(bytes: &[u8]) -> Result<Vec<RawRow>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|err| IngestError::MalformedInput(err.to_string()))?;
    let Some(sheet) = workbook.sheet_names().first().cloned() else {
        return Ok(Vec::new());
    };
    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|err| IngestError::MalformedInput(format!("sheet {}: {}", sheet, err)))?;
    let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);

    let mut rows = Vec::new();
    for (offset, cells) in range.rows().enumerate() {
        if offset < HEADER_ROWS {
            continue;
        }
        let number = first_row + offset + 1;
        let cells: Vec<Cell> = cells.iter().map(to_cell).collect();
        if cells.iter().all(Cell::is_blank) {
            tracing::trace!(row = number, "skipping blank row");
            continue;
        }
        rows.push(RawRow { number, cells });
    }
    Ok(rows)
}
