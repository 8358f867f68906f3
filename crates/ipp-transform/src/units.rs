//! Interpretation of one series of raw intervals.
//!
//! - Null cells only mark where a value stops applying; their intervals are dropped.
//! - `<number> <unit>` strings are parsed. `%` divides by 100 and implies the
//!   `percent` format; a currency implies `float` and the `monetary` type.
//! - A series mixing units keeps its raw values and gets no format or type.
//! - Integral floats are narrowed to integers.
//! - Gaps left between intervals are filled with zero.

use chrono::NaiveDate;
use tracing::debug;

use ipp_model::{
    CellValue, DiagnosticKind, Diagnostics, Interval, ParamValue, Series, ValueFormat, ValueType,
    day_after, day_before,
};

use crate::intervals::RawInterval;

const CURRENCY_UNITS: &[&str] = &["AF", "CFA", "EUR", "FRF"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Percent,
    Currency,
}

/// Turn the raw intervals of `name` into a chronological, gap-free series.
pub fn infer_series(name: &str, raw: &[RawInterval], diagnostics: &mut Diagnostics) -> Series {
    let kept: Vec<&RawInterval> = raw.iter().filter(|interval| !interval.value.is_null()).collect();

    let mut series = match interpret(&kept) {
        Ok(series) => series,
        Err(message) => {
            diagnostics.warn(DiagnosticKind::InconsistentFormat, name, message);
            Series::new(
                kept.iter()
                    .map(|interval| {
                        Interval::new(interval.start, interval.stop, raw_value(&interval.value))
                    })
                    .collect(),
            )
        }
    };
    let before = series.intervals.len();
    fill_gaps(&mut series.intervals);
    if series.intervals.len() > before {
        debug!(
            parameter = name,
            gaps = series.intervals.len() - before,
            "filled gaps with zero"
        );
    }
    series
}

fn interpret(intervals: &[&RawInterval]) -> Result<Series, String> {
    let mut format: Option<ValueFormat> = None;
    let mut value_type: Option<ValueType> = None;
    let mut converted = Vec::with_capacity(intervals.len());

    for interval in intervals {
        let value = match &interval.value {
            CellValue::Text(text) => match split_unit(text) {
                Some((amount, Unit::Percent)) => {
                    expect_format(&mut format, ValueFormat::Percent, text)?;
                    ParamValue::Float(amount / 100.0)
                }
                Some((amount, Unit::Currency)) => {
                    expect_format(&mut format, ValueFormat::Float, text)?;
                    value_type = Some(ValueType::Monetary);
                    ParamValue::Float(amount)
                }
                None => ParamValue::Raw(text.clone()),
            },
            other => raw_value(other),
        };
        converted.push(Interval::new(interval.start, interval.stop, value.narrowed()));
    }

    Ok(Series {
        intervals: converted,
        format,
        value_type,
        ..Series::default()
    })
}

fn expect_format(
    current: &mut Option<ValueFormat>,
    implied: ValueFormat,
    text: &str,
) -> Result<(), String> {
    match current {
        None => {
            *current = Some(implied);
            Ok(())
        }
        Some(format) if *format == implied => Ok(()),
        Some(format) => Err(format!(
            "value {text:?} implies format {} but the series is already {}; keeping raw values",
            implied.as_str(),
            format.as_str()
        )),
    }
}

fn split_unit(text: &str) -> Option<(f64, Unit)> {
    let mut parts = text.split_whitespace();
    let (Some(amount), Some(unit), None) = (parts.next(), parts.next(), parts.next()) else {
        return None;
    };
    let unit = match unit {
        "%" => Unit::Percent,
        currency if CURRENCY_UNITS.contains(&currency) => Unit::Currency,
        _ => return None,
    };
    amount.parse::<f64>().ok().map(|amount| (amount, unit))
}

fn raw_value(cell: &CellValue) -> ParamValue {
    match cell {
        CellValue::Number(number) => ParamValue::Float(*number).narrowed(),
        other => ParamValue::Raw(other.to_string()),
    }
}

/// Insert a zero interval in every hole between two consecutive intervals.
pub fn fill_gaps(intervals: &mut Vec<Interval>) {
    let mut filled = Vec::with_capacity(intervals.len());
    let mut previous_stop: Option<NaiveDate> = None;
    for interval in intervals.drain(..) {
        if let Some(stop) = previous_stop
            && let (Some(gap_start), Some(gap_stop)) = (day_after(stop), day_before(interval.start))
            && gap_start <= gap_stop
        {
            filled.push(Interval::new(gap_start, Some(gap_stop), ParamValue::zero()));
        }
        previous_stop = interval.stop;
        filled.push(interval);
    }
    *intervals = filled;
}
