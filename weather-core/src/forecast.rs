//! Groups 3-hour forecast samples into per-day summaries.
//!
//! Samples are keyed by weekday only, so two days with the same weekday name
//! in different weeks would land in one group. A 5-day forecast never spans
//! that far, and no date key is added on top.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::model::{DailyAggregate, ForecastEntry, round_half_up};

/// Upper bound on the number of day cards.
pub const MAX_FORECAST_DAYS: usize = 5;

/// Build at most [`MAX_FORECAST_DAYS`] daily aggregates, skipping every sample
/// that falls on `today`. Groups keep the order in which their weekday first
/// appears.
pub fn aggregate_daily(entries: &[ForecastEntry], today: NaiveDate) -> Vec<DailyAggregate> {
    let mut groups: Vec<(Weekday, Vec<&ForecastEntry>)> = Vec::new();

    for entry in entries.iter().filter(|e| e.time.date() != today) {
        let weekday = entry.time.weekday();
        match groups.iter_mut().find(|(day, _)| *day == weekday) {
            Some((_, samples)) => samples.push(entry),
            None => groups.push((weekday, vec![entry])),
        }
    }

    groups
        .into_iter()
        .take(MAX_FORECAST_DAYS)
        .map(|(weekday, samples)| summarize(weekday, &samples))
        .collect()
}

// `samples` is never empty: a group is only created together with its first sample.
fn summarize(weekday: Weekday, samples: &[&ForecastEntry]) -> DailyAggregate {
    let (min, max) = samples
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), e| {
            (lo.min(e.temperature_c), hi.max(e.temperature_c))
        });

    DailyAggregate {
        weekday,
        min_c: round_half_up(min),
        max_c: round_half_up(max),
        representative: samples[samples.len() / 2].descriptor.clone(),
        samples: samples.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Descriptor;
    use chrono::{Duration, NaiveDateTime};
    use proptest::prelude::*;

    fn entry(time: NaiveDateTime, temp: f64, icon: &str) -> ForecastEntry {
        ForecastEntry {
            time,
            temperature_c: temp,
            descriptor: Descriptor {
                description: format!("sky {icon}"),
                icon: icon.to_string(),
            },
        }
    }

    fn at(date: NaiveDate, hour: u32) -> NaiveDateTime {
        date.and_hms_opt(hour, 0, 0).expect("valid hour")
    }

    fn today() -> NaiveDate {
        // A Wednesday.
        NaiveDate::from_ymd_opt(2024, 5, 15).expect("valid date")
    }

    /// Forty 3-hour samples starting at `start`, like the real endpoint returns.
    fn five_day_series(start: NaiveDateTime) -> Vec<ForecastEntry> {
        (0..40)
            .map(|i| {
                let time = start + Duration::hours(3 * i);
                entry(time, 10.0 + (i % 8) as f64 * 0.7, &format!("{:02}d", i % 8))
            })
            .collect()
    }

    #[test]
    fn skips_today_and_caps_at_five_days() {
        let entries = five_day_series(at(today(), 12));
        let days = aggregate_daily(&entries, today());

        let weekdays: Vec<Weekday> = days.iter().map(|d| d.weekday).collect();
        assert_eq!(
            weekdays,
            vec![Weekday::Thu, Weekday::Fri, Weekday::Sat, Weekday::Sun, Weekday::Mon]
        );
        assert!(days.iter().all(|d| d.weekday != Weekday::Wed));
    }

    #[test]
    fn sixth_partial_day_is_dropped_by_the_cap() {
        // Starting just after midnight of "tomorrow" spills into a sixth weekday.
        let tomorrow = today().succ_opt().expect("valid date");
        let mut entries = five_day_series(at(tomorrow, 0));
        entries.push(entry(at(tomorrow + Duration::days(5), 9), 30.0, "01d"));

        let days = aggregate_daily(&entries, today());
        assert_eq!(days.len(), MAX_FORECAST_DAYS);
        assert_eq!(days[0].weekday, Weekday::Thu);
        assert_eq!(days[4].weekday, Weekday::Mon);
    }

    #[test]
    fn min_max_are_rounded_half_up() {
        let day = today().succ_opt().expect("valid date");
        let entries = vec![
            entry(at(day, 0), 7.5, "01n"),
            entry(at(day, 3), 12.2, "02n"),
            entry(at(day, 6), 14.5, "03d"),
        ];

        let days = aggregate_daily(&entries, today());
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].min_c, 8);
        assert_eq!(days[0].max_c, 15);
        assert_eq!(days[0].samples, 3);
    }

    #[test]
    fn representative_is_the_middle_sample() {
        let day = today().succ_opt().expect("valid date");
        let entries = vec![
            entry(at(day, 0), 1.0, "a"),
            entry(at(day, 3), 1.0, "b"),
            entry(at(day, 6), 1.0, "c"),
            entry(at(day, 9), 1.0, "d"),
        ];

        let days = aggregate_daily(&entries, today());
        assert_eq!(days[0].representative.icon, "c");

        let days = aggregate_daily(&entries[..1], today());
        assert_eq!(days[0].representative.icon, "a");
    }

    #[test]
    fn first_seen_order_is_kept() {
        let fri = NaiveDate::from_ymd_opt(2024, 5, 17).expect("valid date");
        let thu = NaiveDate::from_ymd_opt(2024, 5, 16).expect("valid date");
        let entries = vec![entry(at(fri, 0), 1.0, "x"), entry(at(thu, 0), 2.0, "y")];

        let days = aggregate_daily(&entries, today());
        assert_eq!(days[0].weekday, Weekday::Fri);
        assert_eq!(days[1].weekday, Weekday::Thu);
    }

    #[test]
    fn only_today_yields_nothing() {
        let entries = vec![
            entry(at(today(), 15), 20.0, "01d"),
            entry(at(today(), 18), 19.0, "01d"),
        ];
        assert!(aggregate_daily(&entries, today()).is_empty());
        assert!(aggregate_daily(&[], today()).is_empty());
    }

    #[test]
    fn same_weekday_a_week_apart_collides() {
        let thu = NaiveDate::from_ymd_opt(2024, 5, 16).expect("valid date");
        let next_thu = thu + Duration::days(7);
        let entries = vec![entry(at(thu, 0), 1.0, "a"), entry(at(next_thu, 0), 9.0, "b")];

        let days = aggregate_daily(&entries, today());
        assert_eq!(days.len(), 1);
        assert_eq!((days[0].min_c, days[0].max_c), (1, 9));
    }

    fn arb_entries() -> impl Strategy<Value = Vec<(i64, f64)>> {
        // (hours after today's midnight, temperature); stays within one week
        prop::collection::vec((0i64..24 * 7, -40.0f64..45.0), 0..60)
    }

    proptest! {
        #[test]
        fn aggregates_respect_invariants(raw in arb_entries()) {
            let midnight = at(today(), 0);
            let entries: Vec<ForecastEntry> = raw
                .iter()
                .enumerate()
                .map(|(i, (h, t))| entry(midnight + Duration::hours(*h), *t, &i.to_string()))
                .collect();

            let days = aggregate_daily(&entries, today());

            prop_assert!(days.len() <= MAX_FORECAST_DAYS);
            for day in &days {
                prop_assert!(day.weekday != today().weekday());
                prop_assert!(day.min_c <= day.max_c);

                let group: Vec<&ForecastEntry> = entries
                    .iter()
                    .filter(|e| e.time.date() != today() && e.time.weekday() == day.weekday)
                    .collect();
                prop_assert_eq!(group.len(), day.samples);
                prop_assert_eq!(&group[group.len() / 2].descriptor, &day.representative);
            }
        }
    }
}
