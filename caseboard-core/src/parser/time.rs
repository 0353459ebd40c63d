//! Time fields: `13:30 - 20:00` or a bare start `13:30`.

use std::sync::LazyLock;

use regex::Regex;

static TIME_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{1,2}):([0-9]{2})\s*-\s*([0-9]{1,2}):([0-9]{2})")
        .expect("valid time range regex")
});
static SINGLE_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]{1,2}):([0-9]{2})").expect("valid single time regex"));

/// Length given to appointments written with only a start time.
pub const DEFAULT_DURATION_HOURS: i64 = 2;

/// Hour and minute as written; `25:00` is allowed and rolls over later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTime {
    pub hour: u32,
    pub minute: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeSpec {
    /// Explicit start and end on the same date
    Range { start: ClockTime, end: ClockTime },
    /// Start only; the end is `DEFAULT_DURATION_HOURS` later
    Start(ClockTime),
}

impl TimeSpec {
    pub fn start(&self) -> ClockTime {
        match self {
            TimeSpec::Range { start, .. } => *start,
            TimeSpec::Start(start) => *start,
        }
    }
}

/// Find a time range, falling back to a single start time.
pub fn parse_time(field: &str) -> Option<TimeSpec> {
    if let Some(caps) = TIME_RANGE.captures(field) {
        return Some(TimeSpec::Range {
            start: clock(&caps[1], &caps[2])?,
            end: clock(&caps[3], &caps[4])?,
        });
    }

    let caps = SINGLE_TIME.captures(field)?;
    Some(TimeSpec::Start(clock(&caps[1], &caps[2])?))
}

fn clock(hour: &str, minute: &str) -> Option<ClockTime> {
    Some(ClockTime {
        hour: hour.parse().ok()?,
        minute: minute.parse().ok()?,
    })
}
