//! Weekly meeting times and the overlap rule used for conflict detection.

mod parse;

pub use parse::parse_schedule;

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt;

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Minutes in a day; valid minute offsets are `0..MINUTES_PER_DAY`.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// A set of weekdays, stored as a bitmask indexed from Monday.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "Vec<Weekday>", from = "Vec<Weekday>")]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    pub fn new() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, day: Weekday) {
        self.0 |= Self::bit(day);
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & Self::bit(day) != 0
    }

    /// Returns true if both sets share at least one day.
    pub fn intersects(&self, other: &WeekdaySet) -> bool {
        self.0 & other.0 != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterates the days in calendar order, Monday first.
    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        WEEK.into_iter().filter(|d| self.contains(*d))
    }

    fn bit(day: Weekday) -> u8 {
        1 << day.num_days_from_monday()
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut set = WeekdaySet::new();
        for day in iter {
            set.insert(day);
        }
        set
    }
}

impl From<Vec<Weekday>> for WeekdaySet {
    fn from(days: Vec<Weekday>) -> Self {
        days.into_iter().collect()
    }
}

impl From<WeekdaySet> for Vec<Weekday> {
    fn from(set: WeekdaySet) -> Self {
        set.iter().collect()
    }
}

impl fmt::Display for WeekdaySet {
    /// Registrar-style abbreviation, e.g. `MWF` or `TuTh`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for day in self.iter() {
            let abbrev = match day {
                Weekday::Mon => "M",
                Weekday::Tue => "Tu",
                Weekday::Wed => "W",
                Weekday::Thu => "Th",
                Weekday::Fri => "F",
                Weekday::Sat => "Sa",
                Weekday::Sun => "Su",
            };
            f.write_str(abbrev)?;
        }
        Ok(())
    }
}

/// A recurring weekly meeting: a set of days and one time window.
///
/// Times are minutes since midnight. A `Schedule` always satisfies
/// `start_minute < end_minute < MINUTES_PER_DAY` and has at least one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawSchedule")]
pub struct Schedule {
    days: WeekdaySet,
    start_minute: u16,
    end_minute: u16,
}

#[derive(Deserialize)]
struct RawSchedule {
    days: WeekdaySet,
    start_minute: u16,
    end_minute: u16,
}

impl TryFrom<RawSchedule> for Schedule {
    type Error = String;

    fn try_from(raw: RawSchedule) -> Result<Self, Self::Error> {
        Schedule::new(raw.days, raw.start_minute, raw.end_minute).ok_or_else(|| {
            format!(
                "invalid meeting window {}-{} on {} day(s)",
                raw.start_minute,
                raw.end_minute,
                raw.days.len()
            )
        })
    }
}

impl Schedule {
    /// Builds a schedule, returning `None` if the window is empty, inverted
    /// or past midnight, or if no days are given.
    pub fn new(days: WeekdaySet, start_minute: u16, end_minute: u16) -> Option<Self> {
        if days.is_empty() || start_minute >= end_minute || end_minute >= MINUTES_PER_DAY {
            return None;
        }

        Some(Self {
            days,
            start_minute,
            end_minute,
        })
    }

    pub fn days(&self) -> WeekdaySet {
        self.days
    }

    pub fn start_minute(&self) -> u16 {
        self.start_minute
    }

    pub fn end_minute(&self) -> u16 {
        self.end_minute
    }

    /// Returns true if the two meetings share a day and their time windows
    /// intersect. Windows are open at both ends, so a class ending at 10:50
    /// does not collide with one starting at 10:50.
    pub fn overlaps(&self, other: &Schedule) -> bool {
        self.days.intersects(&other.days)
            && self.start_minute < other.end_minute
            && other.start_minute < self.end_minute
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:02}:{:02}-{:02}:{:02}",
            self.days,
            self.start_minute / 60,
            self.start_minute % 60,
            self.end_minute / 60,
            self.end_minute % 60
        )
    }
}

/// Overlap check for meetings that may have failed to parse.
///
/// An unknown meeting time can never be shown to collide, so it never does.
pub fn meetings_overlap(a: Option<&Schedule>, b: Option<&Schedule>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.overlaps(b),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn days(list: &[Weekday]) -> WeekdaySet {
        list.iter().copied().collect()
    }

    fn sched(list: &[Weekday], start: u16, end: u16) -> Schedule {
        Schedule::new(days(list), start, end).unwrap()
    }

    #[test]
    fn test_rejects_inverted_and_empty_windows() {
        let mwf = days(&[Weekday::Mon, Weekday::Wed, Weekday::Fri]);
        assert!(Schedule::new(mwf, 600, 600).is_none());
        assert!(Schedule::new(mwf, 650, 600).is_none());
        assert!(Schedule::new(mwf, 600, MINUTES_PER_DAY).is_none());
        assert!(Schedule::new(WeekdaySet::new(), 600, 650).is_none());
    }

    #[test]
    fn test_overlap_same_day() {
        let a = sched(&[Weekday::Mon, Weekday::Wed, Weekday::Fri], 600, 650);
        let b = sched(&[Weekday::Mon], 630, 680);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_touching_windows_do_not_overlap() {
        let a = sched(&[Weekday::Mon], 540, 590);
        let b = sched(&[Weekday::Mon], 590, 640);
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn test_disjoint_days_do_not_overlap() {
        let a = sched(&[Weekday::Tue, Weekday::Thu], 660, 735);
        let b = sched(&[Weekday::Mon, Weekday::Wed, Weekday::Fri], 660, 735);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let samples = [
            sched(&[Weekday::Mon, Weekday::Wed], 600, 650),
            sched(&[Weekday::Mon], 630, 700),
            sched(&[Weekday::Wed], 650, 700),
            sched(&[Weekday::Tue], 0, 1439),
            sched(&[Weekday::Mon, Weekday::Tue], 500, 610),
        ];

        for a in &samples {
            for b in &samples {
                assert_eq!(a.overlaps(b), b.overlaps(a), "{a} vs {b}");
            }
        }
    }

    #[test]
    fn test_unparsed_meeting_never_overlaps() {
        let a = sched(&[Weekday::Mon], 600, 650);
        assert!(!meetings_overlap(Some(&a), None));
        assert!(!meetings_overlap(None, Some(&a)));
        assert!(!meetings_overlap(None, None));
        assert!(meetings_overlap(Some(&a), Some(&a)));
    }

    #[test]
    fn test_display() {
        let a = sched(&[Weekday::Tue, Weekday::Thu], 660, 735);
        assert_eq!(a.to_string(), "TuTh 11:00-12:15");
        assert_eq!(days(&[Weekday::Fri, Weekday::Mon]).to_string(), "MF");
    }

    #[test]
    fn test_weekday_set_serde() {
        let set = days(&[Weekday::Mon, Weekday::Fri]);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["Mon","Fri"]"#);
        let back: WeekdaySet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn test_schedule_deserialize_checks_window() {
        let ok = r#"{"days":["Tue","Thu"],"start_minute":660,"end_minute":735}"#;
        let s: Schedule = serde_json::from_str(ok).unwrap();
        assert_eq!(s, sched(&[Weekday::Tue, Weekday::Thu], 660, 735));

        let inverted = r#"{"days":["Tue"],"start_minute":735,"end_minute":660}"#;
        assert!(serde_json::from_str::<Schedule>(inverted).is_err());
    }
}
