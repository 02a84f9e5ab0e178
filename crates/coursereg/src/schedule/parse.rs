//! Best-effort parsing of registrar schedule strings such as `MWF 10:00-10:50`.

use super::{Schedule, WeekdaySet, WEEK};
use chrono::Weekday;
use regex::Regex;
use std::sync::LazyLock;

static SCHEDULE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^\s*(?P<days>.*?)\s*",
        r"(?P<sh>\d{1,2}):(?P<sm>\d{2})\s*-\s*(?P<eh>\d{1,2}):(?P<em>\d{2})\s*$",
    ))
    .unwrap()
});
static SEGMENT_SPLIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s,/]+").unwrap());

/// Day tokens, longest first so matching is greedy (`thu` wins over `th`+`u`).
///
/// A lone `t` is Tuesday; Thursday is `th` or `r`.
const DAY_TOKENS: &[(&str, Weekday)] = &[
    ("wednesday", Weekday::Wed),
    ("thursday", Weekday::Thu),
    ("saturday", Weekday::Sat),
    ("tuesday", Weekday::Tue),
    ("monday", Weekday::Mon),
    ("friday", Weekday::Fri),
    ("sunday", Weekday::Sun),
    ("thurs", Weekday::Thu),
    ("tues", Weekday::Tue),
    ("thur", Weekday::Thu),
    ("mon", Weekday::Mon),
    ("tue", Weekday::Tue),
    ("wed", Weekday::Wed),
    ("thu", Weekday::Thu),
    ("fri", Weekday::Fri),
    ("sat", Weekday::Sat),
    ("sun", Weekday::Sun),
    ("th", Weekday::Thu),
    ("tu", Weekday::Tue),
    ("sa", Weekday::Sat),
    ("su", Weekday::Sun),
    ("m", Weekday::Mon),
    ("t", Weekday::Tue),
    ("w", Weekday::Wed),
    ("r", Weekday::Thu),
    ("f", Weekday::Fri),
    ("s", Weekday::Sat),
    ("u", Weekday::Sun),
];

/// Parses a schedule string into a [`Schedule`].
///
/// Returns `None` for anything it does not understand: unknown day tokens,
/// out-of-range times, or a window that ends before it starts.
pub fn parse_schedule(text: &str) -> Option<Schedule> {
    let caps = SCHEDULE_REGEX.captures(text)?;

    let days = parse_days(caps.name("days")?.as_str())?;
    let start = to_minutes(caps.name("sh")?.as_str(), caps.name("sm")?.as_str())?;
    let end = to_minutes(caps.name("eh")?.as_str(), caps.name("em")?.as_str())?;

    Schedule::new(days, start, end)
}

/// Parses the day portion, e.g. `MWF`, `TTh`, `Mon-Wed` or `Tue, Thu`.
fn parse_days(text: &str) -> Option<WeekdaySet> {
    let lower = text.to_lowercase();
    let mut set = WeekdaySet::new();

    for segment in SEGMENT_SPLIT.split(lower.trim()).filter(|s| !s.is_empty()) {
        if let Some((from, to)) = segment.split_once('-') {
            for day in day_range(from, to)? {
                set.insert(day);
            }
        } else {
            for day in tokenize_days(segment)? {
                set.insert(day);
            }
        }
    }

    (!set.is_empty()).then_some(set)
}

/// Expands `mon-wed` into Mon, Tue, Wed. Ranges do not wrap past Sunday.
fn day_range(from: &str, to: &str) -> Option<Vec<Weekday>> {
    let from = single_day(from)?.num_days_from_monday() as usize;
    let to = single_day(to)?.num_days_from_monday() as usize;
    if from > to {
        return None;
    }

    Some(WEEK[from..=to].to_vec())
}

fn single_day(token: &str) -> Option<Weekday> {
    match tokenize_days(token)?.as_slice() {
        [day] => Some(*day),
        _ => None,
    }
}

fn tokenize_days(segment: &str) -> Option<Vec<Weekday>> {
    let mut rest = segment;
    let mut days = Vec::new();

    while !rest.is_empty() {
        let (token, day) = DAY_TOKENS
            .iter()
            .find(|(token, _)| rest.starts_with(token))?;
        days.push(*day);
        rest = &rest[token.len()..];
    }

    (!days.is_empty()).then_some(days)
}

fn to_minutes(hours: &str, minutes: &str) -> Option<u16> {
    let hours: u16 = hours.parse().ok()?;
    let minutes: u16 = minutes.parse().ok()?;
    if hours >= 24 || minutes >= 60 {
        return None;
    }

    Some(hours * 60 + minutes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn days_of(text: &str) -> Vec<Weekday> {
        parse_schedule(text).unwrap().days().iter().collect()
    }

    #[test]
    fn test_parse_mwf() {
        let s = parse_schedule("MWF 10:00-10:50").unwrap();
        assert_eq!(s.start_minute(), 600);
        assert_eq!(s.end_minute(), 650);
        assert_eq!(days_of("MWF 10:00-10:50"), vec![Weekday::Mon, Weekday::Wed, Weekday::Fri]);
    }

    #[test]
    fn test_tth_is_tuesday_and_thursday() {
        assert_eq!(days_of("TTH 11:00-12:15"), vec![Weekday::Tue, Weekday::Thu]);
        assert_eq!(days_of("TuTh 11:00-12:15"), vec![Weekday::Tue, Weekday::Thu]);
        assert_eq!(days_of("TR 11:00-12:15"), vec![Weekday::Tue, Weekday::Thu]);
    }

    #[test]
    fn test_tuesday_class_does_not_collide_with_thursday_class() {
        let tue = parse_schedule("T 11:00-12:15").unwrap();
        let thu = parse_schedule("Th 11:00-12:15").unwrap();
        assert!(!tue.overlaps(&thu));
    }

    #[test]
    fn test_named_days_and_ranges() {
        assert_eq!(days_of("Fri 1:00-2:00"), vec![Weekday::Fri]);
        assert_eq!(days_of("Tue 8:00-9:30"), vec![Weekday::Tue]);
        assert_eq!(
            days_of("Mon-Wed 7:00-9:00"),
            vec![Weekday::Mon, Weekday::Tue, Weekday::Wed]
        );
        assert_eq!(days_of("Tue, Thu 14:00-15:15"), vec![Weekday::Tue, Weekday::Thu]);
        assert_eq!(days_of("SaSu 09:00-12:00"), vec![Weekday::Sat, Weekday::Sun]);
    }

    #[test]
    fn test_single_digit_hours() {
        let s = parse_schedule("Fri 1:00-2:00").unwrap();
        assert_eq!(s.start_minute(), 60);
        assert_eq!(s.end_minute(), 120);
    }

    #[test]
    fn test_unparseable_input_is_none() {
        assert!(parse_schedule("").is_none());
        assert!(parse_schedule("TBA").is_none());
        assert!(parse_schedule("10:00-10:50").is_none());
        assert!(parse_schedule("XYZ 10:00-10:50").is_none());
        assert!(parse_schedule("MWF 10:50-10:00").is_none());
        assert!(parse_schedule("MWF 25:00-26:00").is_none());
        assert!(parse_schedule("MWF 10:75-11:00").is_none());
        assert!(parse_schedule("Wed-Mon 10:00-11:00").is_none());
    }
}
