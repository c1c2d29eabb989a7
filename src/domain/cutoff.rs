use crate::config::CutoffConfig;
use chrono::{Datelike, NaiveDateTime, NaiveTime, Timelike};
use serde::Serialize;

/// Next-day fulfilment eligibility at a given local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CutoffStatus {
    pub eligible_now: bool,
    pub is_eligible_day: bool,
    pub seconds_to_cutoff: i64,
}

impl CutoffStatus {
    pub fn earliest_fulfilment(&self) -> &'static str {
        if self.eligible_now {
            "Next day"
        } else {
            "Next available day (we'll confirm)"
        }
    }

    pub fn countdown(&self) -> String {
        format_countdown(self.seconds_to_cutoff)
    }
}

/// Pure function of the wall-clock time and the cutoff rule.
pub fn compute_cutoff_status(now: NaiveDateTime, config: &CutoffConfig) -> CutoffStatus {
    let is_eligible_day = config.eligible_days.contains(&now.weekday());
    let before_cutoff = now.hour() < config.cutoff_hour;

    let seconds_to_cutoff = match NaiveTime::from_hms_opt(config.cutoff_hour, 0, 0) {
        Some(cutoff) if is_eligible_day => {
            let cutoff = now.date().and_time(cutoff);
            (cutoff - now).num_seconds().max(0)
        }
        _ => 0,
    };

    CutoffStatus {
        eligible_now: is_eligible_day && before_cutoff,
        is_eligible_day,
        seconds_to_cutoff,
    }
}

/// Renders seconds as `HH:MM hrs`.
pub fn format_countdown(secs: i64) -> String {
    let secs = secs.max(0);
    format!("{:02}:{:02} hrs", secs / 3600, (secs % 3600) / 60)
}
