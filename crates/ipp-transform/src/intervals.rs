//! Intervals of one value path.

use chrono::NaiveDate;

use ipp_model::{CellValue, ColumnPath, SourceRow, day_before};

/// A source value and the dates it holds for, before any interpretation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawInterval {
    pub start: NaiveDate,
    /// Inclusive; `None` while the value is still in effect.
    pub stop: Option<NaiveDate>,
    pub value: CellValue,
}

/// Walk the date-ordered rows and cut a new interval each time the value changes.
///
/// Absent and unknown cells leave the current interval running. A repeated
/// value extends it. Only the last interval is open-ended.
pub fn build_intervals(rows: &[SourceRow], path: &ColumnPath) -> Vec<RawInterval> {
    let mut intervals: Vec<RawInterval> = Vec::new();
    for row in rows {
        let Some(value) = row.get(path) else {
            continue;
        };
        if value.is_unknown() {
            continue;
        }
        if let Some(last) = intervals.last_mut() {
            if last.value == *value {
                continue;
            }
            last.stop = day_before(row.start);
        }
        intervals.push(RawInterval {
            start: row.start,
            stop: None,
            value: value.clone(),
        });
    }
    intervals
}
