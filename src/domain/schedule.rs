//! Business opening hours and the advance-notice margin.
//!
//! A business publishes up to two shifts per weekday. An order window is
//! accepted when it lies entirely inside one of the shifts of the weekday
//! selected for its start time.

use chrono::{
    DateTime, Datelike, Months, NaiveDate, NaiveTime, TimeDelta, TimeZone, Timelike, Utc, Weekday,
};
use chrono_tz::Tz;

use super::errors::DomainError;

/// Extra notice always added on top of the business margin, reserved for payment.
pub const PAYMENT_BUFFER_MINUTES: i64 = 10;

/// Local hours `0..=EARLY_MORNING_LAST_HOUR` count as the tail of the night.
const EARLY_MORNING_LAST_HOUR: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl OrderWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, DomainError> {
        if start >= end {
            return Err(DomainError::InvalidInput(
                "start_order_time must be before end_order_time".to_string(),
            ));
        }
        Ok(Self { start, end })
    }
}

/// One opening/closing pair, as time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shift {
    pub opening: NaiveTime,
    pub closing: NaiveTime,
}

impl Shift {
    pub fn new(opening: NaiveTime, closing: NaiveTime) -> Self {
        Self { opening, closing }
    }

    /// Closing before opening, early in the morning, means the shift ends the next day.
    fn crosses_midnight(&self) -> bool {
        self.closing.hour() < self.opening.hour() && self.closing.hour() <= EARLY_MORNING_LAST_HOUR
    }

    /// Concrete instants of this shift when it opens on `date` in `tz`.
    fn on(&self, date: NaiveDate, tz: Tz) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let opening = local_instant(date, self.opening, tz)?;
        let closing_date = if self.crosses_midnight() {
            date.succ_opt()?
        } else {
            date
        };
        let closing = local_instant(closing_date, self.closing, tz)?;
        Some((opening, closing))
    }

    fn contains(&self, date: NaiveDate, tz: Tz, window: &OrderWindow) -> bool {
        self.on(date, tz)
            .is_some_and(|(opening, closing)| window.start >= opening && window.end <= closing)
    }
}

fn local_instant(date: NaiveDate, time: NaiveTime, tz: Tz) -> Option<DateTime<Utc>> {
    let naive = date.and_time(time);
    // A wall-clock time skipped by a DST jump resolves to the first valid time after it.
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(naive + TimeDelta::hours(1))).earliest())
        .map(|local| local.with_timezone(&Utc))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DaySchedule {
    pub first: Option<Shift>,
    pub second: Option<Shift>,
}

impl DaySchedule {
    pub fn closed() -> Self {
        Self::default()
    }

    pub fn single(opening: NaiveTime, closing: NaiveTime) -> Self {
        Self {
            first: Some(Shift::new(opening, closing)),
            second: None,
        }
    }

    pub fn split(first: Shift, second: Shift) -> Self {
        Self {
            first: Some(first),
            second: Some(second),
        }
    }

    /// Builds a day from stored columns; a shift missing either edge is absent.
    pub fn from_columns(
        first_opening: Option<NaiveTime>,
        first_closing: Option<NaiveTime>,
        second_opening: Option<NaiveTime>,
        second_closing: Option<NaiveTime>,
    ) -> Self {
        let shift = |opening: Option<NaiveTime>, closing: Option<NaiveTime>| {
            Some(Shift::new(opening?, closing?))
        };
        Self {
            first: shift(first_opening, first_closing),
            second: shift(second_opening, second_closing),
        }
    }

    pub fn shifts(&self) -> impl Iterator<Item = &Shift> {
        self.first.iter().chain(self.second.iter())
    }
}

/// Seven days of shifts, indexed from Monday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WeeklySchedule {
    days: [DaySchedule; 7],
}

impl WeeklySchedule {
    pub fn new(days: [DaySchedule; 7]) -> Self {
        Self { days }
    }

    pub fn with_day(mut self, weekday: Weekday, day: DaySchedule) -> Self {
        self.days[weekday.num_days_from_monday() as usize] = day;
        self
    }

    pub fn day(&self, weekday: Weekday) -> &DaySchedule {
        &self.days[weekday.num_days_from_monday() as usize]
    }

    pub fn days(&self) -> impl Iterator<Item = (Weekday, &DaySchedule)> {
        let mut weekday = Weekday::Mon;
        self.days.iter().map(move |day| {
            let current = weekday;
            weekday = weekday.succ();
            (current, day)
        })
    }
}

/// Minimum advance notice a business requires before an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeMargin {
    pub months: i32,
    pub days: i32,
    pub hours: i32,
    pub minutes: i32,
}

impl TimeMargin {
    /// Earliest instant an order may end at when placed at `now`.
    pub fn earliest_allowed(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let months = u32::try_from(self.months.max(0)).ok()?;
        let delta = TimeDelta::try_days(i64::from(self.days.max(0)))?
            .checked_add(&TimeDelta::try_hours(i64::from(self.hours.max(0)))?)?
            .checked_add(&TimeDelta::try_minutes(i64::from(self.minutes.max(0)))?)?
            .checked_add(&TimeDelta::try_minutes(PAYMENT_BUFFER_MINUTES)?)?;
        now.checked_add_months(Months::new(months))?
            .checked_add_signed(delta)
    }
}

/// Fails when the window ends before the margin plus payment buffer has elapsed.
pub fn check_margin(
    margin: &TimeMargin,
    now: DateTime<Utc>,
    window: &OrderWindow,
) -> Result<(), DomainError> {
    match margin.earliest_allowed(now) {
        Some(earliest) if earliest <= window.end => Ok(()),
        _ => Err(DomainError::MarginNotFulfilled),
    }
}

/// Weekday whose shifts apply to a window starting at `local_start`.
///
/// Starts in the small hours are matched against the following weekday.
pub fn schedule_weekday<T: TimeZone>(local_start: &DateTime<T>) -> Weekday {
    let weekday = local_start.weekday();
    if local_start.hour() <= EARLY_MORNING_LAST_HOUR {
        weekday.succ()
    } else {
        weekday
    }
}

/// Fails with `BusinessClosed` unless the window fits entirely in one shift.
pub fn check_business_hours(
    schedule: &WeeklySchedule,
    window: &OrderWindow,
    tz: Tz,
) -> Result<(), DomainError> {
    let local_start = window.start.with_timezone(&tz);
    let calendar_date = local_start.date_naive();
    let day = schedule.day(schedule_weekday(&local_start));

    if day
        .shifts()
        .any(|shift| shift.contains(calendar_date, tz, window))
    {
        Ok(())
    } else {
        Err(DomainError::BusinessClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).expect("valid time")
    }

    fn at(date: &str, time: &str) -> DateTime<Utc> {
        format!("{date}T{time}:00Z")
            .parse()
            .expect("valid RFC3339 timestamp")
    }

    fn window(start: DateTime<Utc>, end: DateTime<Utc>) -> OrderWindow {
        OrderWindow::new(start, end).expect("valid window")
    }

    // 2024-01-01 is a Monday.
    const MONDAY: &str = "2024-01-01";
    const TUESDAY: &str = "2024-01-02";
    const FRIDAY: &str = "2024-01-05";
    const SATURDAY: &str = "2024-01-06";

    #[test]
    fn window_inside_single_shift_is_accepted() {
        let schedule = WeeklySchedule::default().with_day(Weekday::Mon, DaySchedule::single(t(8, 0), t(14, 0)));
        let w = window(at(MONDAY, "09:00"), at(MONDAY, "10:00"));
        assert_eq!(check_business_hours(&schedule, &w, Tz::UTC), Ok(()));
    }

    #[test]
    fn window_after_single_shift_is_closed() {
        let schedule = WeeklySchedule::default().with_day(Weekday::Mon, DaySchedule::single(t(8, 0), t(14, 0)));
        let w = window(at(MONDAY, "15:00"), at(MONDAY, "16:00"));
        assert_eq!(
            check_business_hours(&schedule, &w, Tz::UTC),
            Err(DomainError::BusinessClosed)
        );
    }

    #[test]
    fn window_overlapping_closing_time_is_closed() {
        let schedule = WeeklySchedule::default().with_day(Weekday::Mon, DaySchedule::single(t(8, 0), t(14, 0)));
        let w = window(at(MONDAY, "13:30"), at(MONDAY, "14:30"));
        assert_eq!(
            check_business_hours(&schedule, &w, Tz::UTC),
            Err(DomainError::BusinessClosed)
        );
    }

    #[test]
    fn split_day_accepts_either_shift_but_not_the_gap() {
        let day = DaySchedule::split(Shift::new(t(8, 0), t(12, 0)), Shift::new(t(16, 0), t(20, 0)));
        let schedule = WeeklySchedule::default().with_day(Weekday::Tue, day);

        let morning = window(at(TUESDAY, "09:00"), at(TUESDAY, "11:00"));
        let evening = window(at(TUESDAY, "16:30"), at(TUESDAY, "17:00"));
        let across_gap = window(at(TUESDAY, "11:00"), at(TUESDAY, "17:00"));
        let in_gap = window(at(TUESDAY, "13:00"), at(TUESDAY, "14:00"));

        assert_eq!(check_business_hours(&schedule, &morning, Tz::UTC), Ok(()));
        assert_eq!(check_business_hours(&schedule, &evening, Tz::UTC), Ok(()));
        assert_eq!(
            check_business_hours(&schedule, &across_gap, Tz::UTC),
            Err(DomainError::BusinessClosed)
        );
        assert_eq!(
            check_business_hours(&schedule, &in_gap, Tz::UTC),
            Err(DomainError::BusinessClosed)
        );
    }

    #[test]
    fn closed_weekday_rejects_everything() {
        let schedule = WeeklySchedule::default().with_day(Weekday::Mon, DaySchedule::single(t(8, 0), t(14, 0)));
        let w = window(at(TUESDAY, "09:00"), at(TUESDAY, "10:00"));
        assert_eq!(
            check_business_hours(&schedule, &w, Tz::UTC),
            Err(DomainError::BusinessClosed)
        );
    }

    #[test]
    fn shift_crossing_midnight_closes_next_day() {
        let schedule = WeeklySchedule::default().with_day(Weekday::Fri, DaySchedule::single(t(18, 0), t(2, 0)));
        let late = window(at(FRIDAY, "23:00"), at(SATURDAY, "01:30"));
        let too_late = window(at(FRIDAY, "23:00"), at(SATURDAY, "02:30"));

        assert_eq!(check_business_hours(&schedule, &late, Tz::UTC), Ok(()));
        assert_eq!(
            check_business_hours(&schedule, &too_late, Tz::UTC),
            Err(DomainError::BusinessClosed)
        );
    }

    #[test]
    fn late_closing_after_four_does_not_cross_midnight() {
        // 05:00 is outside the early-morning band, so closing stays on the same day.
        let shift = Shift::new(t(18, 0), t(5, 0));
        assert!(!shift.crosses_midnight());
        assert!(Shift::new(t(18, 0), t(4, 59)).crosses_midnight());
    }

    #[test]
    fn early_morning_start_uses_next_weekday_schedule() {
        // Monday has no shifts; Tuesday opens at midnight. A Monday 02:00 start
        // is matched against Tuesday's shifts on Monday's calendar date.
        let schedule = WeeklySchedule::default().with_day(Weekday::Tue, DaySchedule::single(t(0, 0), t(3, 0)));
        let w = window(at(MONDAY, "02:00"), at(MONDAY, "02:30"));
        assert_eq!(check_business_hours(&schedule, &w, Tz::UTC), Ok(()));

        let monday_only = WeeklySchedule::default().with_day(Weekday::Mon, DaySchedule::single(t(0, 0), t(3, 0)));
        assert_eq!(
            check_business_hours(&monday_only, &w, Tz::UTC),
            Err(DomainError::BusinessClosed)
        );
    }

    #[test]
    fn weekday_selection_shifts_only_in_small_hours() {
        assert_eq!(schedule_weekday(&at(MONDAY, "04:59")), Weekday::Tue);
        assert_eq!(schedule_weekday(&at(MONDAY, "05:00")), Weekday::Mon);
        assert_eq!(schedule_weekday(&at(MONDAY, "00:00")), Weekday::Tue);
        assert_eq!(schedule_weekday(&at("2024-01-07", "03:00")), Weekday::Mon);
    }

    #[test]
    fn local_timezone_drives_weekday_and_shift_edges() {
        // 13:30Z on Monday is 08:30 in New York (EST, UTC-5).
        let tz: Tz = "America/New_York".parse().expect("known zone");
        let schedule = WeeklySchedule::default().with_day(Weekday::Mon, DaySchedule::single(t(8, 0), t(14, 0)));
        let inside = window(at(MONDAY, "13:30"), at(MONDAY, "14:00"));
        let before_opening = window(at(MONDAY, "12:30"), at(MONDAY, "13:30"));

        assert_eq!(check_business_hours(&schedule, &inside, tz), Ok(()));
        assert_eq!(
            check_business_hours(&schedule, &before_opening, tz),
            Err(DomainError::BusinessClosed)
        );
    }

    #[test]
    fn day_from_columns_drops_incomplete_shifts() {
        let day = DaySchedule::from_columns(Some(t(8, 0)), Some(t(12, 0)), Some(t(16, 0)), None);
        assert_eq!(day.first, Some(Shift::new(t(8, 0), t(12, 0))));
        assert_eq!(day.second, None);
        assert_eq!(day.shifts().count(), 1);
    }

    #[test]
    fn days_iterates_from_monday() {
        let schedule = WeeklySchedule::default().with_day(Weekday::Sun, DaySchedule::single(t(9, 0), t(10, 0)));
        let weekdays: Vec<Weekday> = schedule.days().map(|(weekday, _)| weekday).collect();
        assert_eq!(weekdays.first(), Some(&Weekday::Mon));
        assert_eq!(weekdays.last(), Some(&Weekday::Sun));
        assert_eq!(schedule.days().filter(|(_, d)| d.first.is_some()).count(), 1);
    }

    #[test]
    fn margin_not_fulfilled_when_end_is_too_soon() {
        let margin = TimeMargin {
            hours: 1,
            ..TimeMargin::default()
        };
        let now = at(MONDAY, "10:00");
        let w = window(at(MONDAY, "10:15"), at(MONDAY, "10:30"));
        assert_eq!(check_margin(&margin, now, &w), Err(DomainError::MarginNotFulfilled));
    }

    #[test]
    fn margin_includes_payment_buffer() {
        let margin = TimeMargin {
            hours: 1,
            ..TimeMargin::default()
        };
        let now = at(MONDAY, "10:00");
        let exactly = window(at(MONDAY, "11:00"), at(MONDAY, "11:10"));
        let one_short = window(at(MONDAY, "11:00"), at(MONDAY, "11:09"));

        assert_eq!(check_margin(&margin, now, &exactly), Ok(()));
        assert_eq!(
            check_margin(&margin, now, &one_short),
            Err(DomainError::MarginNotFulfilled)
        );
    }

    #[test]
    fn margin_adds_calendar_months_and_days() {
        let margin = TimeMargin {
            months: 1,
            days: 2,
            hours: 0,
            minutes: 30,
        };
        let now = at("2024-01-31", "10:00");
        // Jan 31 + 1 month clamps to Feb 29 (leap year), + 2 days, + 40 minutes.
        assert_eq!(margin.earliest_allowed(now), Some(at("2024-03-02", "10:40")));
    }

    #[test]
    fn zero_margin_still_requires_payment_buffer() {
        let now = at(MONDAY, "10:00");
        assert_eq!(
            TimeMargin::default().earliest_allowed(now),
            Some(at(MONDAY, "10:10"))
        );
    }

    #[test]
    fn window_must_be_ordered() {
        assert!(matches!(
            OrderWindow::new(at(MONDAY, "10:00"), at(MONDAY, "10:00")),
            Err(DomainError::InvalidInput(_))
        ));
    }
}
