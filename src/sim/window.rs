use std::ops::Range;

use chrono::{DateTime, Duration, NaiveTime, Utc};

use crate::error::{Error, Result};

use super::diurnal::HOURS_PER_DAY;

/// The run's time span: `days` whole UTC days ending with the current day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimWindow {
    /// First hour boundary of the run.
    pub start: DateTime<Utc>,
    /// Number of simulated days (>= 1).
    pub days: u32,
}

impl SimWindow {
    /// Window of `days` days whose last day is the UTC day containing `now`.
    ///
    /// `now` is truncated to midnight, then moved back `days - 1` days.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Usage`] if `days` is zero and [`Error::Generation`]
    /// if the start instant falls outside chrono's representable range.
    pub fn ending_on(now: DateTime<Utc>, days: u32) -> Result<Self> {
        if days == 0 {
            return Err(Error::Usage("days must be a positive integer".to_string()));
        }
        let midnight = now
            .date_naive()
            .and_time(NaiveTime::MIN)
            .and_utc();
        let start = midnight
            .checked_sub_signed(Duration::days(i64::from(days) - 1))
            .ok_or_else(|| {
                Error::Generation(format!("start of a {days}-day window before {now} is out of range"))
            })?;
        Ok(Self { start, days })
    }

    /// Number of hourly ticks in the window.
    pub fn total_hours(&self) -> usize {
        self.days as usize * HOURS_PER_DAY
    }

    /// Every hour index of the window, in order.
    pub fn hours(&self) -> Range<usize> {
        0..self.total_hours()
    }

    /// Absolute instant of hour index `hour`.
    pub fn timestamp(&self, hour: usize) -> DateTime<Utc> {
        self.start + Duration::hours(hour as i64)
    }

    /// Last hour boundary covered by the window.
    pub fn end(&self) -> DateTime<Utc> {
        self.timestamp(self.total_hours() - 1)
    }
}
