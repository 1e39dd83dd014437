//! Turns sparse per-day submission counts into a gapless sequence of colored
//! date ranges covering the whole calendar year.

use crate::models::{DailyAggregate, DateRange, RangeColor};
use std::fmt;

/// Counts strictly below this map to the warning color.
pub const LOW_THRESHOLD: u32 = 2;
/// Counts at or above this map to the positive color.
pub const HIGH_THRESHOLD: u32 = 5;

/// February length selector. The web layer passes `Common`; callers that
/// render a specific leap year can pass `Leap`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YearShape {
    #[default]
    Common,
    Leap,
}

impl YearShape {
    pub fn month_len(self, month: u8) -> u8 {
        match month {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            2 => match self {
                Self::Common => 28,
                Self::Leap => 29,
            },
            _ => 0,
        }
    }

    pub fn day_count(self) -> u16 {
        match self {
            Self::Common => 365,
            Self::Leap => 366,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummarizeError {
    /// Input broke the sorted/unique/in-range precondition.
    InvalidAggregateSequence {
        month: u8,
        day: u8,
        reason: &'static str,
    },
}

impl fmt::Display for SummarizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAggregateSequence { month, day, reason } => {
                write!(f, "invalid aggregate sequence at {month:02}-{day:02}: {reason}")
            }
        }
    }
}

impl std::error::Error for SummarizeError {}

/// Maps one aggregate to its display color. A `count == 0` row cannot come
/// out of the eligible-only aggregate read, but it is still accepted here and
/// maps to the empty color.
pub fn color_for(agg: &DailyAggregate) -> RangeColor {
    if agg.chosen {
        RangeColor::Positive
    } else if agg.count == 0 {
        RangeColor::Empty
    } else if agg.count < LOW_THRESHOLD {
        RangeColor::Warning
    } else if agg.count >= HIGH_THRESHOLD {
        RangeColor::Positive
    } else {
        RangeColor::Neutral
    }
}

/// Summarizes ascending per-day aggregates into a complete, gapless, ordered
/// range sequence over (1,1)..=(12,31). Days present in the input become
/// single-day colored ranges; runs of absent days collapse into one empty
/// range each. Unsorted, duplicate, or out-of-range input fails with
/// [`SummarizeError::InvalidAggregateSequence`].
pub fn summarize(
    aggregates: &[DailyAggregate],
    year: YearShape,
) -> Result<Vec<DateRange>, SummarizeError> {
    let mut ranges = Vec::with_capacity(aggregates.len() * 2 + 1);
    let mut last: Option<(u8, u8)> = None;

    for agg in aggregates {
        let here = (agg.month, agg.day);
        if agg.month < 1 || agg.month > 12 {
            return Err(SummarizeError::InvalidAggregateSequence {
                month: agg.month,
                day: agg.day,
                reason: "month out of range",
            });
        }
        if agg.day < 1 || agg.day > year.month_len(agg.month) {
            return Err(SummarizeError::InvalidAggregateSequence {
                month: agg.month,
                day: agg.day,
                reason: "day out of range for month",
            });
        }
        if let Some(prev) = last {
            if here <= prev {
                return Err(SummarizeError::InvalidAggregateSequence {
                    month: agg.month,
                    day: agg.day,
                    reason: "not strictly ascending",
                });
            }
        }

        let gap_start = match last {
            None => (1, 1),
            // `here > prev` holds, so prev < (12,31) and the successor exists.
            Some(prev) => match next_day(prev, year) {
                Some(next) => next,
                None => here,
            },
        };
        if gap_start < here {
            if let Some(gap_end) = prev_day(here, year) {
                ranges.push(DateRange::new(gap_start, gap_end, RangeColor::Empty));
            }
        }

        ranges.push(DateRange::new(here, here, color_for(agg)));
        last = Some(here);
    }

    match last {
        None => ranges.push(DateRange::new((1, 1), (12, 31), RangeColor::Empty)),
        Some(prev) => {
            if let Some(tail_start) = next_day(prev, year) {
                ranges.push(DateRange::new(tail_start, (12, 31), RangeColor::Empty));
            }
        }
    }

    Ok(ranges)
}

/// Calendar successor of a day, `None` past December 31.
pub fn next_day((month, day): (u8, u8), year: YearShape) -> Option<(u8, u8)> {
    if day < year.month_len(month) {
        Some((month, day + 1))
    } else if month < 12 {
        Some((month + 1, 1))
    } else {
        None
    }
}

/// Calendar predecessor of a day, `None` before January 1.
pub fn prev_day((month, day): (u8, u8), year: YearShape) -> Option<(u8, u8)> {
    if day > 1 {
        Some((month, day - 1))
    } else if month > 1 {
        Some((month - 1, year.month_len(month - 1)))
    } else {
        None
    }
}
