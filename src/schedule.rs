use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDateTime, NaiveTime, TimeZone, Timelike, Weekday};

pub const TURNAROUND_HOURS: i64 = 8;
pub const PICKUP_FLOOR_HOUR: u32 = 12;

/// Promised pickup for a drop-off at local wall-clock time `dropoff`.
///
/// Orders are ready eight hours later. Anything that lands on a Wednesday
/// moves one day forward (once, even if that is another Wednesday), and a
/// morning result is pushed to noon of the same date. The Wednesday check
/// looks at the time before the noon floor is applied.
pub fn compute_pickup_time(dropoff: NaiveDateTime) -> NaiveDateTime {
    let mut pickup = dropoff + Duration::hours(TURNAROUND_HOURS);

    if pickup.weekday() == Weekday::Wed {
        pickup += Duration::days(1);
    }

    if pickup.hour() < PICKUP_FLOOR_HOUR {
        pickup = pickup.date().and_time(noon());
    }

    pickup
}

/// Applies [`compute_pickup_time`] to the local clock of a zoned timestamp.
pub fn pickup_for<Tz: TimeZone>(dropoff: &DateTime<Tz>) -> DateTime<Tz> {
    resolve_local(&dropoff.timezone(), compute_pickup_time(dropoff.naive_local()))
}

/// Places a wall-clock time in `tz`. A time repeated by a backward shift
/// takes its earlier instant; a time skipped by a forward shift moves to the
/// first minute that exists after the gap.
pub fn resolve_local<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> DateTime<Tz> {
    let mut candidate = local;
    loop {
        match tz.from_local_datetime(&candidate) {
            LocalResult::Single(t) | LocalResult::Ambiguous(t, _) => return t,
            LocalResult::None => candidate += Duration::minutes(1),
        }
    }
}

fn noon() -> NaiveTime {
    NaiveTime::MIN + Duration::hours(PICKUP_FLOOR_HOUR as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use chrono_tz::America::Los_Angeles;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    // 2024-06-03 is a Monday.

    #[test]
    fn monday_morning_is_same_day() {
        let pickup = compute_pickup_time(at(2024, 6, 3, 9, 0));
        assert_eq!(pickup, at(2024, 6, 3, 17, 0));
    }

    #[test]
    fn tuesday_evening_skips_wednesday_then_floors_to_noon() {
        let pickup = compute_pickup_time(at(2024, 6, 4, 18, 0));
        assert_eq!(pickup, at(2024, 6, 6, 12, 0));
        assert_eq!(pickup.weekday(), Weekday::Thu);
    }

    #[test]
    fn wednesday_afternoon_moves_to_thursday_without_floor() {
        let pickup = compute_pickup_time(at(2024, 6, 5, 8, 0));
        assert_eq!(pickup, at(2024, 6, 6, 16, 0));
    }

    #[test]
    fn late_night_drop_off_floors_to_noon_next_day() {
        // Friday 22:30 + 8h = Saturday 06:30.
        let pickup = compute_pickup_time(at(2024, 6, 7, 22, 30));
        assert_eq!(pickup, at(2024, 6, 8, 12, 0));
    }

    #[test]
    fn floor_keeps_date_and_zeroes_seconds() {
        let dropoff = NaiveDate::from_ymd_opt(2024, 6, 9)
            .unwrap()
            .and_hms_opt(1, 15, 42)
            .unwrap();
        assert_eq!(compute_pickup_time(dropoff), at(2024, 6, 9, 12, 0));
    }

    #[test]
    fn tuesday_late_afternoon_lands_on_wednesday_evening() {
        // Tuesday 16:00 + 8h = Wednesday 00:00 -> Thursday 00:00 -> Thursday 12:00.
        let pickup = compute_pickup_time(at(2024, 6, 4, 16, 0));
        assert_eq!(pickup, at(2024, 6, 6, 12, 0));
    }

    #[test]
    fn wednesday_deferral_is_applied_once() {
        // Tuesday 15:59 + 8h = Tuesday 23:59; not Wednesday, nothing moves.
        let pickup = compute_pickup_time(at(2024, 6, 4, 15, 59));
        assert_eq!(pickup, at(2024, 6, 4, 23, 59));
    }

    #[test]
    fn zoned_pickup_keeps_wall_clock_across_dst() {
        // 2024-03-10 is the US spring-forward Sunday.
        let dropoff = Los_Angeles
            .from_local_datetime(&at(2024, 3, 9, 20, 0))
            .unwrap();
        let pickup = pickup_for(&dropoff);
        assert_eq!(pickup.naive_local(), at(2024, 3, 10, 12, 0));
    }

    #[test]
    fn skipped_local_time_moves_to_end_of_gap() {
        // 02:00-03:00 does not exist in Los Angeles on 2024-03-10.
        let resolved = resolve_local(&Los_Angeles, at(2024, 3, 10, 2, 30));
        assert_eq!(resolved.naive_local(), at(2024, 3, 10, 3, 0));
        assert_eq!(
            resolved,
            Los_Angeles.from_local_datetime(&at(2024, 3, 10, 3, 0)).unwrap()
        );
    }

    #[test]
    fn repeated_local_time_takes_the_earlier_instant() {
        // 01:00-02:00 happens twice on 2024-11-03, first in PDT.
        let resolved = resolve_local(&Los_Angeles, at(2024, 11, 3, 1, 30));
        assert_eq!(resolved.naive_local(), at(2024, 11, 3, 1, 30));
        assert_eq!(resolved.naive_utc(), at(2024, 11, 3, 8, 30));
    }
}
