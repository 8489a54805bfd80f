//! Clock-in rules and attendance statistics.

use std::collections::HashMap;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::model::clock::{ClockRecordDto, ClockStatsDto};

/// Office offset and grace periods applied to clock-ins and clock-outs.
#[derive(Debug, Clone, Copy)]
pub struct ClockRules {
    pub offset: FixedOffset,
    pub late_minutes: i64,
    pub early_leave_minutes: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockStatus {
    Normal,
    Late,
    Early,
}

impl ClockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Late => "late",
            Self::Early => "early",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "normal" => Some(Self::Normal),
            "late" => Some(Self::Late),
            "early" => Some(Self::Early),
            _ => None,
        }
    }
}

/// A shift's start and end as instants on one office-local day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ClockRules {
    pub fn local_date(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.offset).date_naive()
    }

    /// Places a shift on `date`. A shift ending at or before its start ends the next day.
    pub fn shift_window(&self, date: NaiveDate, start: NaiveTime, end: NaiveTime) -> Option<ShiftWindow> {
        let start_at = self.instant(date, start)?;
        let end_date = if end <= start { date.succ_opt()? } else { date };
        let end_at = self.instant(end_date, end)?;
        Some(ShiftWindow {
            start: start_at,
            end: end_at,
        })
    }

    /// Whole minutes late, when the clock-in is past the grace period.
    pub fn minutes_late(&self, shift: &ShiftWindow, clock_in: DateTime<Utc>) -> Option<i64> {
        let late = clock_in - shift.start;
        (late > Duration::minutes(self.late_minutes)).then(|| late.num_minutes())
    }

    /// Whole minutes early, when the clock-out is before the grace period.
    pub fn minutes_early(&self, shift: &ShiftWindow, clock_out: DateTime<Utc>) -> Option<i64> {
        let early = shift.end - clock_out;
        (early > Duration::minutes(self.early_leave_minutes)).then(|| early.num_minutes())
    }

    fn instant(&self, date: NaiveDate, time: NaiveTime) -> Option<DateTime<Utc>> {
        self.offset
            .from_local_datetime(&date.and_time(time))
            .single()
            .map(|at| at.with_timezone(&Utc))
    }
}

/// Hours between clock-in and clock-out rounded to two decimals.
pub fn work_hours(clock_in: DateTime<Utc>, clock_out: DateTime<Utc>) -> f64 {
    let seconds = (clock_out - clock_in).num_seconds().max(0) as f64;
    (seconds / 3600.0 * 100.0).round() / 100.0
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Approved leave and overtime in the same range as the clock records.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApprovedExtras {
    pub leave_count: u64,
    pub overtime_count: u64,
    pub overtime_hours: f64,
}

pub fn clock_stats(
    records: &[entity::attendance_record::Model],
    extras: ApprovedExtras,
) -> ClockStatsDto {
    let count = |status: ClockStatus| {
        records
            .iter()
            .filter(|r| r.status == status.as_str())
            .count() as u64
    };
    let normal_count = count(ClockStatus::Normal);
    let late_count = count(ClockStatus::Late);
    let early_count = count(ClockStatus::Early);

    let clocked_hours: f64 = records.iter().filter_map(|r| r.work_hours).sum();
    let total_work_hours = clocked_hours + extras.overtime_hours;
    let total_days = records.len() as u64 + extras.leave_count + extras.overtime_count;

    let avg_work_hours = if total_days > 0 {
        round1(total_work_hours / total_days as f64)
    } else {
        0.0
    };
    let attendance_base = normal_count + late_count + early_count;
    let attendance_rate = if attendance_base > 0 {
        round1(normal_count as f64 / attendance_base as f64 * 100.0)
    } else {
        0.0
    };

    ClockStatsDto {
        total_days,
        normal_count,
        late_count,
        early_count,
        leave_count: extras.leave_count,
        overtime_count: extras.overtime_count,
        total_work_hours: (total_work_hours * 100.0).round() / 100.0,
        avg_work_hours,
        attendance_rate,
    }
}

pub fn clock_record_into_dto(
    entity: entity::attendance_record::Model,
    employee_names: &HashMap<i32, String>,
) -> ClockRecordDto {
    ClockRecordDto {
        id: entity.id,
        employee_id: entity.employee_id,
        employee_name: employee_names.get(&entity.employee_id).cloned(),
        record_date: entity.record_date,
        clock_in_time: entity.clock_in_time,
        clock_out_time: entity.clock_out_time,
        work_hours: entity.work_hours,
        status: entity.status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> ClockRules {
        ClockRules {
            offset: FixedOffset::east_opt(8 * 3600).unwrap(),
            late_minutes: 30,
            early_leave_minutes: 30,
        }
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn record(status: &str, work_hours: Option<f64>) -> entity::attendance_record::Model {
        let now = Utc::now();
        entity::attendance_record::Model {
            id: 1,
            employee_id: 1,
            record_date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            clock_in_time: Some(now),
            clock_out_time: None,
            work_hours,
            status: status.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn places_shift_in_office_time() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let shift = rules().shift_window(date, hm(9, 0), hm(18, 0)).unwrap();

        assert_eq!(shift.start, Utc.with_ymd_and_hms(2025, 6, 2, 1, 0, 0).unwrap());
        assert_eq!(shift.end, Utc.with_ymd_and_hms(2025, 6, 2, 10, 0, 0).unwrap());
    }

    #[test]
    fn overnight_shift_ends_next_day() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let shift = rules().shift_window(date, hm(22, 0), hm(6, 0)).unwrap();

        assert_eq!(shift.end - shift.start, Duration::hours(8));
    }

    #[test]
    fn lateness_respects_grace_period() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let shift = rules().shift_window(date, hm(9, 0), hm(18, 0)).unwrap();

        assert_eq!(rules().minutes_late(&shift, shift.start + Duration::minutes(30)), None);
        assert_eq!(
            rules().minutes_late(&shift, shift.start + Duration::minutes(45)),
            Some(45)
        );
        assert_eq!(
            rules().minutes_early(&shift, shift.end - Duration::minutes(31)),
            Some(31)
        );
        assert_eq!(rules().minutes_early(&shift, shift.end), None);
    }

    #[test]
    fn rounds_work_hours_to_two_decimals() {
        let start = Utc.with_ymd_and_hms(2025, 6, 2, 1, 0, 0).unwrap();

        assert_eq!(work_hours(start, start + Duration::minutes(500)), 8.33);
        assert_eq!(work_hours(start, start - Duration::minutes(5)), 0.0);
    }

    #[test]
    fn summarizes_records_and_extras() {
        let records = vec![
            record("normal", Some(8.0)),
            record("normal", Some(8.0)),
            record("late", Some(7.5)),
            record("early", None),
        ];

        let stats = clock_stats(
            &records,
            ApprovedExtras {
                leave_count: 1,
                overtime_count: 1,
                overtime_hours: 2.5,
            },
        );

        assert_eq!(stats.total_days, 6);
        assert_eq!(stats.total_work_hours, 26.0);
        assert_eq!(stats.avg_work_hours, 4.3);
        assert_eq!(stats.attendance_rate, 50.0);
    }

    #[test]
    fn empty_range_has_zero_rates() {
        let stats = clock_stats(&[], ApprovedExtras::default());

        assert_eq!(stats.total_days, 0);
        assert_eq!(stats.avg_work_hours, 0.0);
        assert_eq!(stats.attendance_rate, 0.0);
    }
}
