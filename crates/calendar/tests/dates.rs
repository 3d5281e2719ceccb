use chrono::{Datelike, NaiveDate};
use pluvio_calendar::{CalendarError, DateRange, Doy, NoLeapDate, noleap_sequence};

#[test]
fn every_doy_survives_month_day_and_iso_text() {
    for d in 1..=365u16 {
        let doy = Doy::new(d).unwrap();
        let (m, day) = doy.month_day();
        assert_eq!(Doy::from_month_day(m, day).unwrap(), doy, "doy {d}");

        let date = NoLeapDate::from_year_doy(1987, doy);
        let text = date.to_string();
        let back: NoLeapDate = text.parse().unwrap();
        assert_eq!(back, date, "iso text {text}");
    }
}

#[test]
fn sequence_matches_ordinal_steps() {
    let start: NoLeapDate = "1999-11-15".parse().unwrap();
    let dates = noleap_sequence(start, 1000);
    for (i, pair) in dates.windows(2).enumerate() {
        assert_eq!(pair[0].days_until(pair[1]), 1, "step {i}");
        assert!(pair[0] < pair[1]);
    }
    assert_eq!(dates[999], start.add_days(999));
}

#[test]
fn gregorian_year_bridge_drops_only_feb_29() {
    let mut kept = Vec::new();
    let mut day = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
    while day.year() == 2000 {
        if let Some(nl) = NoLeapDate::from_naive(day) {
            kept.push(nl);
        }
        day = day.succ_opt().unwrap();
    }
    assert_eq!(kept.len(), 365);
    let range = DateRange::parse("2000-01-01", "2000-12-31").unwrap();
    assert_eq!(kept, range.dates());
}

#[test]
fn feb_29_is_never_a_noleap_date() {
    let expected = CalendarError::InvalidDay {
        day: 29,
        month: 2,
        max_day: 28,
    };
    assert_eq!(Doy::from_month_day(2, 29).unwrap_err(), expected);
    assert_eq!(NoLeapDate::new(2000, 2, 29).unwrap_err(), expected);
    assert_eq!("2000-02-29".parse::<NoLeapDate>().unwrap_err(), expected);
}

#[test]
fn circular_window_across_new_year() {
    let jan3 = Doy::from_month_day(1, 3).unwrap();
    let within: Vec<u16> = (1..=365u16)
        .filter(|&d| Doy::new(d).unwrap().circular_distance(jan3) <= 7)
        .collect();
    assert_eq!(within.len(), 15);
    assert!(within.contains(&361));
    assert!(within.contains(&10));
    assert!(!within.contains(&11));
}
