//! Daily clock-in and clock-out against the scheduled shift.
//!
//! Lateness and early leave are judged against the shift scheduled for the record's
//! office-local date. Days without a scheduled working shift always count as normal.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{DatabaseConnection, SqlErr, TransactionTrait};

use crate::{
    model::{
        api::{PageDto, PaginationParams},
        clock::{ClockRecordDto, ClockRecordsDto, ClockRecordsQueryDto, ClockResultDto},
        notification::NotificationDto,
    },
    server::{
        data::{
            attendance::{LeaveRepository, OvertimeRepository},
            clock::{ClockFilter, ClockRepository},
            employee::EmployeeRepository,
            schedule::{ScheduleRepository, ShiftRepository},
        },
        error::AppError,
        middleware::auth::{CurrentUser, Permission},
        model::{
            clock::{
                clock_record_into_dto, clock_stats, work_hours, ApprovedExtras, ClockRules,
                ClockStatus, ShiftWindow,
            },
            notification::{kind, CreateNotificationParams},
        },
        service::{employee::require_employee_visible, notification::notify},
        util::time::parse_hhmm,
    },
};

pub struct ClockService<'a> {
    db: &'a DatabaseConnection,
    rules: ClockRules,
}

impl<'a> ClockService<'a> {
    pub fn new(db: &'a DatabaseConnection, rules: ClockRules) -> Self {
        Self { db, rules }
    }

    /// Clocks the caller in for the office-local day of `now`.
    ///
    /// A late clock-in also notifies the caller; the notification is returned
    /// for pushing after commit.
    pub async fn clock_in(
        &self,
        current: &CurrentUser,
        now: DateTime<Utc>,
    ) -> Result<(ClockResultDto, Option<NotificationDto>), AppError> {
        let employee = self.own_employee(current).await?;
        let date = self.rules.local_date(now);

        if ClockRepository::new(self.db)
            .find_for_day(employee.id, date)
            .await?
            .is_some()
        {
            return Err(already_clocked_in());
        }

        let late_minutes = match self.shift_for(employee.id, date).await? {
            Some(shift) => self.rules.minutes_late(&shift, now),
            None => None,
        };
        let status = if late_minutes.is_some() {
            ClockStatus::Late
        } else {
            ClockStatus::Normal
        };

        let txn = self.db.begin().await?;
        let record = match ClockRepository::new(&txn)
            .clock_in(employee.id, date, now, status.as_str())
            .await
        {
            Ok(record) => record,
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                return Err(already_clocked_in());
            }
            Err(e) => return Err(e.into()),
        };

        let notification = match late_minutes {
            Some(minutes) => Some(
                notify(
                    &txn,
                    CreateNotificationParams {
                        user_id: current.id(),
                        kind: kind::ATTENDANCE_ABNORMAL.to_string(),
                        title: "Late clock-in".to_string(),
                        content: format!("You clocked in {} minutes late on {}", minutes, date),
                        related_type: Some("attendance_record".to_string()),
                        related_id: Some(record.id),
                    },
                )
                .await?,
            ),
            None => None,
        };
        txn.commit().await?;

        tracing::info!(employee_id = employee.id, %date, status = status.as_str(), "clock in");

        let names = EmployeeRepository::new(self.db).names(&[employee.id]).await?;
        Ok((
            ClockResultDto {
                record: clock_record_into_dto(record, &names),
                late_minutes,
                early_minutes: None,
            },
            notification,
        ))
    }

    /// Clocks the caller out of today's record, or of yesterday's when an
    /// overnight shift is still open.
    ///
    /// Leaving early downgrades a `normal` record to `early`; a `late` record stays late.
    pub async fn clock_out(
        &self,
        current: &CurrentUser,
        now: DateTime<Utc>,
    ) -> Result<(ClockResultDto, Option<NotificationDto>), AppError> {
        let employee = self.own_employee(current).await?;
        let today = self.rules.local_date(now);

        let repo = ClockRepository::new(self.db);
        let record = match repo.find_for_day(employee.id, today).await? {
            Some(record) => record,
            None => {
                let open = match today.pred_opt() {
                    Some(day) => repo
                        .find_for_day(employee.id, day)
                        .await?
                        .filter(|r| r.clock_out_time.is_none()),
                    None => None,
                };
                open.ok_or_else(|| AppError::bad_request("Clock in before clocking out"))?
            }
        };
        if record.clock_out_time.is_some() {
            return Err(already_clocked_out());
        }
        let clock_in_time = record
            .clock_in_time
            .ok_or_else(|| AppError::bad_request("Clock in before clocking out"))?;

        let early_minutes = match self.shift_for(employee.id, record.record_date).await? {
            Some(shift) => self.rules.minutes_early(&shift, now),
            None => None,
        };
        let status = match (ClockStatus::parse(&record.status), early_minutes) {
            (Some(ClockStatus::Late), _) => ClockStatus::Late,
            (_, Some(_)) => ClockStatus::Early,
            _ => ClockStatus::Normal,
        };

        let hours = work_hours(clock_in_time, now);
        let txn = self.db.begin().await?;
        let updated = ClockRepository::new(&txn)
            .clock_out(record.id, now, hours, status.as_str())
            .await?
            .ok_or_else(already_clocked_out)?;

        let notification = match early_minutes {
            Some(minutes) => Some(
                notify(
                    &txn,
                    CreateNotificationParams {
                        user_id: current.id(),
                        kind: kind::ATTENDANCE_ABNORMAL.to_string(),
                        title: "Early clock-out".to_string(),
                        content: format!(
                            "You clocked out {} minutes early on {}",
                            minutes, updated.record_date
                        ),
                        related_type: Some("attendance_record".to_string()),
                        related_id: Some(updated.id),
                    },
                )
                .await?,
            ),
            None => None,
        };
        txn.commit().await?;

        tracing::info!(employee_id = employee.id, hours, status = status.as_str(), "clock out");

        let names = EmployeeRepository::new(self.db).names(&[employee.id]).await?;
        Ok((
            ClockResultDto {
                record: clock_record_into_dto(updated, &names),
                late_minutes: None,
                early_minutes,
            },
            notification,
        ))
    }

    /// Today's record of the caller or of a visible employee.
    pub async fn today(
        &self,
        current: &CurrentUser,
        employee_id: Option<i32>,
        now: DateTime<Utc>,
    ) -> Result<Option<ClockRecordDto>, AppError> {
        let employee_id = self.subject(current, employee_id).await?;
        let record = ClockRepository::new(self.db)
            .find_for_day(employee_id, self.rules.local_date(now))
            .await?;

        match record {
            Some(record) => {
                let names = EmployeeRepository::new(self.db).names(&[employee_id]).await?;
                Ok(Some(clock_record_into_dto(record, &names)))
            }
            None => Ok(None),
        }
    }

    /// A page of clock records with statistics over the whole date range.
    pub async fn records(
        &self,
        current: &CurrentUser,
        query: ClockRecordsQueryDto,
        pagination: PaginationParams,
    ) -> Result<ClockRecordsDto, AppError> {
        if let (Some(start), Some(end)) = (query.start_date, query.end_date) {
            if start > end {
                return Err(AppError::bad_request("start_date must not be after end_date"));
            }
        }
        if let Some(status) = &query.status {
            if ClockStatus::parse(status).is_none() {
                return Err(AppError::bad_request(format!("Unknown status {}", status)));
            }
        }

        let employee_id = self.subject(current, query.employee_id).await?;
        let filter = ClockFilter {
            employee_id,
            start_date: query.start_date,
            end_date: query.end_date,
            status: query.status,
        };
        let per_page = pagination.per_page();

        let repo = ClockRepository::new(self.db);
        let (records, total) = repo
            .get_paginated(&filter, pagination.page, per_page)
            .await?;
        let in_range = repo.list_in_range(&filter).await?;

        let (overtime_count, overtime_hours) = OvertimeRepository::new(self.db)
            .approved_between(employee_id, filter.start_date, filter.end_date)
            .await?;
        let leave_count = LeaveRepository::new(self.db)
            .count_approved_between(employee_id, filter.start_date, filter.end_date)
            .await?;

        let stats = clock_stats(
            &in_range,
            ApprovedExtras {
                leave_count,
                overtime_count,
                overtime_hours,
            },
        );
        let names = EmployeeRepository::new(self.db).names(&[employee_id]).await?;

        Ok(ClockRecordsDto {
            records: PageDto::new(
                records
                    .into_iter()
                    .map(|r| clock_record_into_dto(r, &names))
                    .collect(),
                total,
                pagination.page,
                per_page,
            ),
            stats,
        })
    }

    async fn own_employee(
        &self,
        current: &CurrentUser,
    ) -> Result<entity::employee::Model, AppError> {
        EmployeeRepository::new(self.db)
            .find_by_user_id(current.id())
            .await?
            .ok_or_else(|| AppError::bad_request("The current user has no employee record"))
    }

    /// Resolves whose records are read. Others' records need `attendance:approve`
    /// and visibility of that employee.
    async fn subject(&self, current: &CurrentUser, employee_id: Option<i32>) -> Result<i32, AppError> {
        let own = EmployeeRepository::new(self.db)
            .find_by_user_id(current.id())
            .await?;

        match (employee_id, own) {
            (None, Some(own)) => Ok(own.id),
            (None, None) => Err(AppError::bad_request(
                "The current user has no employee record",
            )),
            (Some(id), Some(own)) if own.id == id => Ok(id),
            (Some(id), _) => {
                current.require(Permission::AttendanceApprove)?;
                Ok(require_employee_visible(self.db, current, id).await?.id)
            }
        }
    }

    /// The working shift scheduled for the day, if any.
    async fn shift_for(
        &self,
        employee_id: i32,
        date: NaiveDate,
    ) -> Result<Option<ShiftWindow>, AppError> {
        let Some(row) = ScheduleRepository::new(self.db)
            .find_for_day(employee_id, date)
            .await?
        else {
            return Ok(None);
        };
        if row.is_rest_day {
            return Ok(None);
        }
        let Some(shift) = ShiftRepository::new(self.db).find_by_id(row.shift_id).await? else {
            return Ok(None);
        };
        if shift.is_rest {
            return Ok(None);
        }

        let (Some(start), Some(end)) = (parse_hhmm(&shift.start_time), parse_hhmm(&shift.end_time))
        else {
            tracing::warn!(shift_id = shift.id, "shift has unparseable hours");
            return Ok(None);
        };
        Ok(self.rules.shift_window(date, start, end))
    }
}

fn already_clocked_in() -> AppError {
    AppError::bad_request("Already clocked in today")
}

fn already_clocked_out() -> AppError {
    AppError::bad_request("Already clocked out")
}
