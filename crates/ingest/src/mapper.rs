use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use ledger_core::{MAX_COST_CENTS, NewCallRecord, cents_to_cost, round_cost};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

use crate::types::{Cell, Field, IngestError, ROW_ARITY, RawRow, Result};

pub const MAX_IDENTIFIER_LEN: usize = 20;

const CALL_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d.%m.%Y"];

// Float cells carry binary noise such as 2.67499999; trim it before cent rounding.
const FLOAT_COST_DP: u32 = 6;

// Excel serial day numbers above this are past the year 9999.
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

struct FieldError {
    field: Field,
    message: String,
}

type FieldResult<T> = std::result::Result<T, FieldError>;

fn invalid(field: Field, message: impl Into<String>) -> FieldError {
    FieldError {
        field,
        message: message.into(),
    }
}

fn missing(field: Field) -> FieldError {
    invalid(field, "missing value")
}

fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial <= 0.0 || serial > MAX_EXCEL_SERIAL {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let days = serial.trunc();
    let seconds = ((serial - days) * 86_400.0).round() as i64;
    epoch
        .checked_add_signed(Duration::try_days(days as i64)?)?
        .checked_add_signed(Duration::try_seconds(seconds)?)
}

fn parse_date_text(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc).naive_utc());
    }
    for format in DATE_TIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(raw, format) {
            return parsed.and_hms_opt(0, 0, 0);
        }
    }
    None
}

fn call_date(cell: &Cell) -> FieldResult<String> {
    let field = Field::CallDate;
    let parsed = match cell {
        Cell::DateTime(value) => Some(*value),
        Cell::Number(value) => excel_serial_to_datetime(*value),
        Cell::Int(value) => excel_serial_to_datetime(*value as f64),
        Cell::Text(value) if value.trim().is_empty() => return Err(missing(field)),
        Cell::Text(value) => parse_date_text(value.trim()),
        Cell::Empty => return Err(missing(field)),
        Cell::Bool(_) | Cell::Error(_) => None,
    };
    parsed
        .map(|value| value.format(CALL_DATE_FORMAT).to_string())
        .ok_or_else(|| invalid(field, format!("cannot read {:?} as a date", cell)))
}

fn identifier(cell: &Cell, field: Field) -> FieldResult<String> {
    let value = match cell {
        Cell::Text(value) => value.trim().to_string(),
        Cell::Int(value) => value.to_string(),
        Cell::Number(value) if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 => {
            format!("{}", *value as i64)
        }
        Cell::Empty => String::new(),
        _ => {
            return Err(invalid(
                field,
                format!("cannot read {:?} as a subscriber identifier", cell),
            ));
        }
    };
    if value.is_empty() {
        return Err(missing(field));
    }
    if value.chars().count() > MAX_IDENTIFIER_LEN {
        return Err(invalid(
            field,
            format!("longer than {} characters", MAX_IDENTIFIER_LEN),
        ));
    }
    Ok(value)
}

fn duration(cell: &Cell) -> FieldResult<u32> {
    let field = Field::Duration;
    let value = match cell {
        Cell::Int(value) => *value as f64,
        Cell::Number(value) => *value,
        Cell::Text(value) if value.trim().is_empty() => return Err(missing(field)),
        Cell::Text(value) => value
            .trim()
            .replace(',', ".")
            .parse::<f64>()
            .map_err(|_| invalid(field, format!("{:?} is not a number", value)))?,
        Cell::Empty => return Err(missing(field)),
        _ => return Err(invalid(field, format!("cannot read {:?} as minutes", cell))),
    };
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(invalid(field, format!("{} is not a whole number", value)));
    }
    if value < 0.0 {
        return Err(invalid(field, "must not be negative"));
    }
    if value > f64::from(u32::MAX) {
        return Err(invalid(field, format!("{} is too large", value)));
    }
    Ok(value as u32)
}

fn cost(cell: &Cell) -> FieldResult<Decimal> {
    let field = Field::Cost;
    let value = match cell {
        Cell::Int(value) => Decimal::from(*value),
        Cell::Number(value) => Decimal::from_f64(*value)
            .map(|amount| amount.round_dp(FLOAT_COST_DP))
            .ok_or_else(|| invalid(field, format!("{} is not a finite amount", value)))?,
        Cell::Text(value) if value.trim().is_empty() => return Err(missing(field)),
        Cell::Text(value) => {
            let normalized: String = value
                .trim()
                .chars()
                .filter(|ch| !ch.is_whitespace())
                .map(|ch| if ch == ',' { '.' } else { ch })
                .collect();
            Decimal::from_str(&normalized)
                .map_err(|_| invalid(field, format!("{:?} is not an amount", value)))?
        }
        Cell::Empty => return Err(missing(field)),
        _ => return Err(invalid(field, format!("cannot read {:?} as an amount", cell))),
    };
    if value.is_sign_negative() && !value.is_zero() {
        return Err(invalid(field, "must not be negative"));
    }
    let rounded = round_cost(&value);
    if rounded > cents_to_cost(MAX_COST_CENTS) {
        return Err(invalid(field, format!("{} exceeds the maximum amount", value)));
    }
    Ok(rounded)
}

fn scalar_text(cell: &Cell, field: Field) -> FieldResult<String> {
    match cell {
        Cell::Empty => Ok(String::new()),
        Cell::Text(value) => Ok(value.trim().to_string()),
        Cell::Int(value) => Ok(value.to_string()),
        Cell::Number(value) => Ok(value.to_string()),
        Cell::Bool(value) => Ok(value.to_string()),
        Cell::DateTime(value) => Ok(value.format(CALL_DATE_FORMAT).to_string()),
        Cell::Error(err) => Err(invalid(field, format!("cell error {}", err))),
    }
}

fn map_cells(cells: &[Cell]) -> FieldResult<NewCallRecord> {
    let call_date = call_date(&cells[Field::CallDate.column()])?;
    let caller = identifier(&cells[Field::Caller.column()], Field::Caller)?;
    let receiver = identifier(&cells[Field::Receiver.column()], Field::Receiver)?;
    let duration_minutes = duration(&cells[Field::Duration.column()])?;
    // Read positionally; not stored.
    scalar_text(&cells[Field::Result.column()], Field::Result)?;
    let cost = cost(&cells[Field::Cost.column()])?;
    let service = scalar_text(&cells[Field::Service.column()], Field::Service)?;
    Ok(NewCallRecord {
        call_date,
        caller,
        receiver,
        duration_minutes,
        cost,
        service,
    })
}

/// Converts one positional row into a record. The result column is read
/// positionally but not kept.
pub fn map_row(row: &RawRow) -> Result<NewCallRecord> {
    if row.cells.len() < ROW_ARITY {
        return Err(IngestError::IncompleteRow {
            row: row.number,
            found: row.cells.len(),
        });
    }
    map_cells(&row.cells).map_err(|err| IngestError::InvalidField {
        row: row.number,
        field: err.field,
        message: err.message,
    })
}

/// Maps every row, stopping at the first one that fails.
pub fn map_rows(rows: &[RawRow]) -> Result<Vec<NewCallRecord>> {
    rows.iter().map(map_row).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> Cell {
        Cell::Text(value.to_string())
    }

    fn row(cells: Vec<Cell>) -> RawRow {
        RawRow { number: 8, cells }
    }

    fn valid_cells() -> Vec<Cell> {
        vec![
            text("2024-01-01"),
            text("111"),
            text("222"),
            Cell::Number(10.0),
            text("OK"),
            Cell::Number(0.0),
            text("voice"),
        ]
    }

    fn field_error(cells: Vec<Cell>) -> (usize, Field, String) {
        match map_row(&row(cells)) {
            Err(IngestError::InvalidField {
                row,
                field,
                message,
            }) => (row, field, message),
            other => panic!("expected invalid field, got {:?}", other),
        }
    }

    #[test]
    fn maps_a_complete_row() {
        let record = map_row(&row(valid_cells())).expect("record");
        assert_eq!(record.call_date, "2024-01-01 00:00:00");
        assert_eq!(record.caller, "111");
        assert_eq!(record.receiver, "222");
        assert_eq!(record.duration_minutes, 10);
        assert!(record.cost.is_zero());
        assert_eq!(record.service, "voice");
    }

    #[test]
    fn result_cell_is_checked_but_not_kept() {
        let mut cells = valid_cells();
        cells[4] = Cell::Int(1);
        assert!(map_row(&row(cells)).is_ok());

        let mut cells = valid_cells();
        cells[4] = Cell::Error("#N/A".to_string());
        let (row, field, message) = field_error(cells);
        assert_eq!(row, 8);
        assert_eq!(field, Field::Result);
        assert!(message.contains("#N/A"));
    }

    #[test]
    fn short_row_is_incomplete() {
        let mut cells = valid_cells();
        cells.truncate(6);
        match map_row(&row(cells)) {
            Err(IngestError::IncompleteRow { row, found }) => {
                assert_eq!(row, 8);
                assert_eq!(found, 6);
            }
            other => panic!("expected incomplete row, got {:?}", other),
        }
    }

    #[test]
    fn numeric_strings_are_coerced() {
        let mut cells = valid_cells();
        cells[3] = text(" 15 ");
        cells[5] = text("2,50");
        let record = map_row(&row(cells)).expect("record");
        assert_eq!(record.duration_minutes, 15);
        assert_eq!(record.cost, Decimal::new(250, 2));
    }

    #[test]
    fn cost_is_rounded_to_cents() {
        let mut cells = valid_cells();
        cells[5] = text("1.005");
        let record = map_row(&row(cells)).expect("record");
        assert_eq!(record.cost.to_string(), "1.01");

        let mut cells = valid_cells();
        cells[5] = Cell::Number(2.675);
        let record = map_row(&row(cells)).expect("record");
        assert_eq!(record.cost, Decimal::new(268, 2));

        let mut cells = valid_cells();
        cells[5] = Cell::Number(0.1 + 0.2);
        let record = map_row(&row(cells)).expect("record");
        assert_eq!(record.cost, Decimal::new(30, 2));
    }

    #[test]
    fn numeric_identifiers_drop_the_fraction() {
        let mut cells = valid_cells();
        cells[1] = Cell::Number(79_161_234_567.0);
        cells[2] = Cell::Int(112);
        let record = map_row(&row(cells)).expect("record");
        assert_eq!(record.caller, "79161234567");
        assert_eq!(record.receiver, "112");
    }

    #[test]
    fn invalid_duration_names_row_and_field() {
        let mut cells = valid_cells();
        cells[3] = text("ten");
        let (row, field, message) = field_error(cells);
        assert_eq!(row, 8);
        assert_eq!(field, Field::Duration);
        assert!(message.contains("not a number"));
    }

    #[test]
    fn fractional_and_negative_durations_are_rejected() {
        let mut cells = valid_cells();
        cells[3] = Cell::Number(1.5);
        assert_eq!(field_error(cells).1, Field::Duration);

        let mut cells = valid_cells();
        cells[3] = Cell::Int(-1);
        let (_, field, message) = field_error(cells);
        assert_eq!(field, Field::Duration);
        assert_eq!(message, "must not be negative");
    }

    #[test]
    fn negative_or_missing_cost_is_rejected() {
        let mut cells = valid_cells();
        cells[5] = Cell::Number(-0.5);
        assert_eq!(field_error(cells).1, Field::Cost);

        let mut cells = valid_cells();
        cells[5] = Cell::Empty;
        let (_, field, message) = field_error(cells);
        assert_eq!(field, Field::Cost);
        assert_eq!(message, "missing value");
    }

    #[test]
    fn long_caller_is_rejected() {
        let mut cells = valid_cells();
        cells[1] = text("123456789012345678901");
        assert_eq!(field_error(cells).1, Field::Caller);
    }

    #[test]
    fn dates_accept_common_layouts() {
        let cases = [
            (text("2024-03-05 14:30:00"), "2024-03-05 14:30:00"),
            (text("2024-03-05T14:30"), "2024-03-05 14:30:00"),
            (text("05.03.2024 14:30:15"), "2024-03-05 14:30:15"),
            (text("05.03.2024"), "2024-03-05 00:00:00"),
            (Cell::Number(45_356.5), "2024-03-05 12:00:00"),
        ];
        for (cell, expected) in cases {
            let mut cells = valid_cells();
            cells[0] = cell;
            let record = map_row(&row(cells)).expect("record");
            assert_eq!(record.call_date, expected);
        }
    }

    #[test]
    fn unreadable_date_is_rejected() {
        let mut cells = valid_cells();
        cells[0] = text("yesterday");
        assert_eq!(field_error(cells).1, Field::CallDate);
    }

    #[test]
    fn blank_service_is_allowed() {
        let mut cells = valid_cells();
        cells[6] = Cell::Empty;
        let record = map_row(&row(cells)).expect("record");
        assert_eq!(record.service, "");
    }

    #[test]
    fn map_rows_reports_first_failing_row() {
        let good = row(valid_cells());
        let mut bad_cells = valid_cells();
        bad_cells[5] = text("n/a");
        let first_bad = RawRow {
            number: 10,
            cells: bad_cells.clone(),
        };
        let second_bad = RawRow {
            number: 12,
            cells: bad_cells,
        };
        let err = map_rows(&[good, first_bad, second_bad]).expect_err("should fail");
        assert_eq!(err.row(), Some(10));
    }
}
