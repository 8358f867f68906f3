//! Validity intervals.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::value::ParamValue;

/// One value of a series together with the dates it applies to.
///
/// `stop` is inclusive. An interval without `stop` is still in effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub start: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<NaiveDate>,
    pub value: ParamValue,
    /// A bound of the interval is not precisely known.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub fuzzy: bool,
}

impl Interval {
    /// Interval produced from source data; an open end is an unknown bound.
    pub fn new(start: NaiveDate, stop: Option<NaiveDate>, value: ParamValue) -> Self {
        Self {
            start,
            stop,
            value,
            fuzzy: stop.is_none(),
        }
    }

    /// Interval read from a document that states fuzziness explicitly.
    pub fn declared(
        start: NaiveDate,
        stop: Option<NaiveDate>,
        value: ParamValue,
        fuzzy: bool,
    ) -> Self {
        Self {
            start,
            stop,
            value,
            fuzzy,
        }
    }

    pub fn is_open(&self) -> bool {
        self.stop.is_none()
    }

    pub fn same_bounds(&self, other: &Interval) -> bool {
        self.start == other.start && self.stop == other.stop
    }
}

pub fn day_before(date: NaiveDate) -> Option<NaiveDate> {
    date.pred_opt()
}

pub fn day_after(date: NaiveDate) -> Option<NaiveDate> {
    date.succ_opt()
}
