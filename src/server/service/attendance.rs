//! Overtime and leave requests with their approval workflow.
//!
//! Approval side effects (balance deduction, rest-day schedule rows and the requester's
//! notification) are written in one transaction. The created notifications are returned
//! so the caller can push them once the transaction has committed.

use std::collections::HashMap;

use chrono::{Datelike, FixedOffset};
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::{
    model::{
        api::{PageDto, PaginationParams},
        attendance::{
            ApplyLeaveDto, ApplyOvertimeDto, AttendanceFilterDto, LeaveDto, OvertimeDto,
            OvertimeStatsDto,
        },
        notification::NotificationDto,
    },
    server::{
        data::{
            attendance::{
                CreateLeaveParams, CreateOvertimeParams, Decision, LeaveRepository,
                OvertimeRepository,
            },
            employee::EmployeeRepository,
            schedule::{ScheduleRepository, ShiftRepository},
            vacation::{
                AuditLogRepository, BalanceComponents, BalanceRepository, VacationTypeRepository,
            },
        },
        error::AppError,
        middleware::auth::{CurrentUser, Permission},
        model::{
            attendance::{leave_into_dto, overtime_into_dto, AttendanceFilter, RequestStatus},
            notification::{kind, CreateNotificationParams},
            schedule::ScheduleEntry,
            vacation::{remaining_days, AuditEntry, AuditOperation},
        },
        service::{
            balance::sync_balance,
            employee::{require_employee_visible, visible_employee_ids},
            notification::notify,
            schedule::MAX_RANGE_DAYS,
        },
        util::{
            time::{dates_between, hours_between},
            validate::{optional_text, required_text},
        },
    },
};

const LEAVE_SCHEDULE_NOTE: &str = "Leave";
const MAX_OVERTIME_HOURS: f64 = 24.0;

pub struct AttendanceService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AttendanceService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records an overtime request. `overtime_date` must be the office-local date
    /// on which the overtime starts.
    pub async fn apply_overtime(
        &self,
        current: &CurrentUser,
        dto: ApplyOvertimeDto,
        offset: FixedOffset,
    ) -> Result<OvertimeDto, AppError> {
        let employee_id = self.applicant(current, dto.employee_id).await?;
        let reason = required_text("reason", &dto.reason, 500)?;

        let hours = hours_between(dto.start_time, dto.end_time);
        if hours <= 0.0 {
            return Err(AppError::bad_request("end_time must be after start_time"));
        }
        if hours > MAX_OVERTIME_HOURS {
            return Err(AppError::bad_request(format!(
                "Overtime cannot exceed {} hours",
                MAX_OVERTIME_HOURS
            )));
        }
        let start_date = dto.start_time.with_timezone(&offset).date_naive();
        if start_date != dto.overtime_date {
            return Err(AppError::bad_request(format!(
                "overtime_date {} does not match start_time (local date {})",
                dto.overtime_date, start_date
            )));
        }

        let record = OvertimeRepository::new(self.db)
            .create(CreateOvertimeParams {
                employee_id,
                overtime_date: dto.overtime_date,
                start_time: dto.start_time,
                end_time: dto.end_time,
                hours,
                reason,
            })
            .await?;

        let names = EmployeeRepository::new(self.db).names(&[employee_id]).await?;
        Ok(overtime_into_dto(record, &names))
    }

    pub async fn list_overtime(
        &self,
        current: &CurrentUser,
        filter: AttendanceFilterDto,
        pagination: PaginationParams,
    ) -> Result<PageDto<OvertimeDto>, AppError> {
        let filter = self.filter(current, filter).await?;
        let per_page = pagination.per_page();

        let (records, total) = OvertimeRepository::new(self.db)
            .get_paginated(&filter, pagination.page, per_page)
            .await?;

        let employee_ids: Vec<i32> = records.iter().map(|r| r.employee_id).collect();
        let names = EmployeeRepository::new(self.db).names(&employee_ids).await?;

        Ok(PageDto::new(
            records
                .into_iter()
                .map(|r| overtime_into_dto(r, &names))
                .collect(),
            total,
            pagination.page,
            per_page,
        ))
    }

    /// Approves or rejects a pending overtime request and notifies the requester.
    pub async fn decide_overtime(
        &self,
        current: &CurrentUser,
        id: i32,
        status: RequestStatus,
        note: Option<String>,
    ) -> Result<(OvertimeDto, NotificationDto), AppError> {
        let note = optional_text("approval_note", note, 500)?;
        let record = OvertimeRepository::new(self.db)
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Overtime record not found"))?;
        if record.status != RequestStatus::Pending.as_str() {
            return Err(AppError::bad_request("Only pending requests can be decided"));
        }
        let employee = require_employee_visible(self.db, current, record.employee_id).await?;

        let txn = self.db.begin().await?;
        let record = OvertimeRepository::new(&txn)
            .decide(
                record.id,
                Decision {
                    status,
                    approver_id: Some(current.id()),
                    note,
                },
            )
            .await?
            .ok_or_else(already_decided)?;
        let notification = notify(
            &txn,
            CreateNotificationParams {
                user_id: employee.user_id,
                kind: kind::OVERTIME_APPROVAL.to_string(),
                title: format!("Overtime request {}", status.as_str()),
                content: format!(
                    "Your overtime on {} ({} hours) was {}.",
                    record.overtime_date,
                    record.hours,
                    status.as_str()
                ),
                related_type: Some("overtime".to_string()),
                related_id: Some(record.id),
            },
        )
        .await?;
        txn.commit().await?;

        let names = HashMap::from([(employee.id, employee.real_name)]);
        Ok((overtime_into_dto(record, &names), notification))
    }

    /// Approved and pending hours of an employee in a year.
    pub async fn overtime_stats(
        &self,
        current: &CurrentUser,
        employee_id: Option<i32>,
        year: i32,
    ) -> Result<OvertimeStatsDto, AppError> {
        let employee_id = match employee_id {
            Some(id) => require_employee_visible(self.db, current, id).await?.id,
            None => self.own_employee_id(current).await?,
        };

        let totals = OvertimeRepository::new(self.db)
            .totals_by_status(employee_id, Some(year))
            .await?;

        let mut stats = OvertimeStatsDto {
            employee_id,
            year,
            approved_hours: 0.0,
            pending_hours: 0.0,
            approved_count: 0,
            pending_count: 0,
            rejected_count: 0,
        };
        for (status, hours, count) in totals {
            let hours = hours.unwrap_or(0.0);
            let count = count.max(0) as u64;
            match RequestStatus::parse(&status) {
                Some(RequestStatus::Approved) => {
                    stats.approved_hours = hours;
                    stats.approved_count = count;
                }
                Some(RequestStatus::Pending) => {
                    stats.pending_hours = hours;
                    stats.pending_count = count;
                }
                Some(RequestStatus::Rejected) => stats.rejected_count = count,
                _ => {}
            }
        }

        Ok(stats)
    }

    pub async fn apply_leave(
        &self,
        current: &CurrentUser,
        dto: ApplyLeaveDto,
    ) -> Result<LeaveDto, AppError> {
        let employee_id = self.applicant(current, dto.employee_id).await?;
        if dto.start_date > dto.end_date {
            return Err(AppError::bad_request("start_date must not be after end_date"));
        }
        let span = (dto.end_date - dto.start_date).num_days() + 1;
        if span > MAX_RANGE_DAYS {
            return Err(AppError::bad_request(format!(
                "A leave request may cover at most {} days",
                MAX_RANGE_DAYS
            )));
        }
        if !dto.days.is_finite() || dto.days <= 0.0 {
            return Err(AppError::bad_request("days must be greater than 0"));
        }
        if dto.days > span as f64 {
            return Err(AppError::bad_request(format!(
                "days ({}) exceeds the {} calendar days requested",
                dto.days, span
            )));
        }
        let reason = optional_text("reason", dto.reason, 500)?;

        let vacation_type = VacationTypeRepository::new(self.db)
            .find_by_id(dto.vacation_type_id)
            .await?
            .filter(|t| t.enabled)
            .ok_or_else(|| AppError::bad_request("Vacation type does not exist or is disabled"))?;

        let repo = LeaveRepository::new(self.db);
        if repo
            .has_overlap(employee_id, dto.start_date, dto.end_date)
            .await?
        {
            return Err(AppError::bad_request(
                "The requested dates overlap an existing leave request",
            ));
        }

        let record = repo
            .create(CreateLeaveParams {
                employee_id,
                vacation_type_id: vacation_type.id,
                start_date: dto.start_date,
                end_date: dto.end_date,
                days: dto.days,
                reason,
            })
            .await?;

        let names = EmployeeRepository::new(self.db).names(&[employee_id]).await?;
        let type_names = HashMap::from([(vacation_type.id, vacation_type.name)]);
        Ok(leave_into_dto(record, &names, &type_names))
    }

    pub async fn list_leave(
        &self,
        current: &CurrentUser,
        filter: AttendanceFilterDto,
        pagination: PaginationParams,
    ) -> Result<PageDto<LeaveDto>, AppError> {
        let filter = self.filter(current, filter).await?;
        let per_page = pagination.per_page();

        let (records, total) = LeaveRepository::new(self.db)
            .get_paginated(&filter, pagination.page, per_page)
            .await?;
        let items = self.leave_dtos(records).await?;

        Ok(PageDto::new(items, total, pagination.page, per_page))
    }

    /// Pending leave requests inside the caller's scope, oldest first.
    pub async fn pending_leave(
        &self,
        current: &CurrentUser,
        department_id: Option<i32>,
    ) -> Result<Vec<LeaveDto>, AppError> {
        let employee_ids = match department_id {
            Some(_) => {
                let departments = current.scope.narrow(department_id).unwrap_or_default();
                Some(
                    EmployeeRepository::new(self.db)
                        .ids_in_departments(&departments)
                        .await?,
                )
            }
            None => visible_employee_ids(self.db, current).await?,
        };

        let records = LeaveRepository::new(self.db)
            .list_pending(employee_ids.as_deref())
            .await?;
        self.leave_dtos(records).await
    }

    /// Approves a pending leave request.
    ///
    /// Deducts the days from the balance of the start date's year, records the deduction
    /// and marks every date of the range as a rest day.
    pub async fn approve_leave(
        &self,
        current: &CurrentUser,
        id: i32,
        note: Option<String>,
    ) -> Result<(LeaveDto, NotificationDto), AppError> {
        let note = optional_text("approval_note", note, 500)?;
        let record = self.pending_leave_record(id).await?;
        let employee = require_employee_visible(self.db, current, record.employee_id).await?;
        let vacation_type = VacationTypeRepository::new(self.db)
            .find_by_id(record.vacation_type_id)
            .await?
            .ok_or_else(|| AppError::bad_request("Vacation type does not exist"))?;

        let txn = self.db.begin().await?;

        let record = LeaveRepository::new(&txn)
            .decide(
                record.id,
                Decision {
                    status: RequestStatus::Approved,
                    approver_id: Some(current.id()),
                    note,
                },
            )
            .await?
            .ok_or_else(already_decided)?;

        let balance = sync_balance(
            &txn,
            record.employee_id,
            record.start_date.year(),
            &vacation_type,
            Some(current.id()),
        )
        .await?;
        let components = BalanceComponents::from(&balance);
        let remaining = remaining_days(
            components.total_days,
            components.converted_days,
            components.adjusted_days,
            components.used_days,
        );
        if remaining < record.days {
            return Err(AppError::bad_request(format!(
                "Insufficient balance: {} days remaining, {} requested",
                remaining, record.days
            )));
        }

        let before = balance.clone();
        let after = BalanceRepository::new(&txn)
            .set_components(
                balance,
                BalanceComponents {
                    used_days: components.used_days + record.days,
                    ..components
                },
            )
            .await?;
        AuditLogRepository::new(&txn)
            .record(
                &before,
                &after,
                AuditEntry {
                    operation: AuditOperation::Deduct,
                    change_days: -record.days,
                    reason: Some(format!("Leave request #{} approved", record.id)),
                    operator_id: Some(current.id()),
                },
            )
            .await?;

        let rest_shift = ShiftRepository::new(&txn).get_or_create_rest_shift().await?;
        let schedule_repo = ScheduleRepository::new(&txn);
        for date in dates_between(record.start_date, record.end_date) {
            schedule_repo
                .upsert(ScheduleEntry {
                    employee_id: record.employee_id,
                    schedule_date: date,
                    shift_id: rest_shift.id,
                    is_rest_day: true,
                    note: Some(LEAVE_SCHEDULE_NOTE.to_string()),
                })
                .await?;
        }

        let notification = notify(
            &txn,
            CreateNotificationParams {
                user_id: employee.user_id,
                kind: kind::LEAVE_APPROVAL.to_string(),
                title: "Leave request approved".to_string(),
                content: format!(
                    "Your {} leave from {} to {} was approved.",
                    vacation_type.name, record.start_date, record.end_date
                ),
                related_type: Some("leave".to_string()),
                related_id: Some(record.id),
            },
        )
        .await?;

        txn.commit().await?;

        let names = HashMap::from([(employee.id, employee.real_name)]);
        let type_names = HashMap::from([(vacation_type.id, vacation_type.name)]);
        Ok((leave_into_dto(record, &names, &type_names), notification))
    }

    pub async fn reject_leave(
        &self,
        current: &CurrentUser,
        id: i32,
        note: Option<String>,
    ) -> Result<(LeaveDto, NotificationDto), AppError> {
        let note = optional_text("approval_note", note, 500)?;
        let record = self.pending_leave_record(id).await?;
        let employee = require_employee_visible(self.db, current, record.employee_id).await?;

        let txn = self.db.begin().await?;
        let record = LeaveRepository::new(&txn)
            .decide(
                record.id,
                Decision {
                    status: RequestStatus::Rejected,
                    approver_id: Some(current.id()),
                    note,
                },
            )
            .await?
            .ok_or_else(already_decided)?;
        let notification = notify(
            &txn,
            CreateNotificationParams {
                user_id: employee.user_id,
                kind: kind::LEAVE_APPROVAL.to_string(),
                title: "Leave request rejected".to_string(),
                content: format!(
                    "Your leave from {} to {} was rejected.",
                    record.start_date, record.end_date
                ),
                related_type: Some("leave".to_string()),
                related_id: Some(record.id),
            },
        )
        .await?;
        txn.commit().await?;

        let mut items = self.leave_dtos(vec![record]).await?;
        let dto = items
            .pop()
            .ok_or_else(|| AppError::InternalError("Leave record vanished".to_string()))?;
        Ok((dto, notification))
    }

    /// Withdraws a pending request. Allowed for the requester and for approvers.
    pub async fn cancel_leave(&self, current: &CurrentUser, id: i32) -> Result<LeaveDto, AppError> {
        let record = self.pending_leave_record(id).await?;
        let employee = EmployeeRepository::new(self.db)
            .find_by_id(record.employee_id)
            .await?
            .ok_or_else(|| AppError::not_found("Employee not found"))?;

        let is_owner = employee.user_id == current.id();
        if !is_owner {
            current.require(Permission::AttendanceApprove)?;
            current.require_visible(employee.department_id, employee.user_id)?;
        }

        let record = LeaveRepository::new(self.db)
            .decide(
                record.id,
                Decision {
                    status: RequestStatus::Cancelled,
                    approver_id: (!is_owner).then(|| current.id()),
                    note: None,
                },
            )
            .await?
            .ok_or_else(already_decided)?;

        let mut items = self.leave_dtos(vec![record]).await?;
        items
            .pop()
            .ok_or_else(|| AppError::InternalError("Leave record vanished".to_string()))
    }

    /// Resolves whose request this is. Applying for someone else needs
    /// `attendance:approve` and visibility of that employee.
    async fn applicant(
        &self,
        current: &CurrentUser,
        employee_id: Option<i32>,
    ) -> Result<i32, AppError> {
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

    async fn own_employee_id(&self, current: &CurrentUser) -> Result<i32, AppError> {
        EmployeeRepository::new(self.db)
            .find_by_user_id(current.id())
            .await?
            .map(|e| e.id)
            .ok_or_else(|| AppError::bad_request("The current user has no employee record"))
    }

    async fn filter(
        &self,
        current: &CurrentUser,
        dto: AttendanceFilterDto,
    ) -> Result<AttendanceFilter, AppError> {
        if let Some(status) = &dto.status {
            if RequestStatus::parse(status).is_none() {
                return Err(AppError::bad_request(format!("Unknown status {}", status)));
            }
        }

        Ok(AttendanceFilter {
            employee_id: dto.employee_id,
            status: dto.status,
            employee_ids: visible_employee_ids(self.db, current).await?,
        })
    }

    async fn pending_leave_record(&self, id: i32) -> Result<entity::leave_record::Model, AppError> {
        let record = LeaveRepository::new(self.db)
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Leave record not found"))?;
        if record.status != RequestStatus::Pending.as_str() {
            return Err(AppError::bad_request("Only pending requests can be changed"));
        }
        Ok(record)
    }

    async fn leave_dtos(
        &self,
        records: Vec<entity::leave_record::Model>,
    ) -> Result<Vec<LeaveDto>, AppError> {
        let employee_ids: Vec<i32> = records.iter().map(|r| r.employee_id).collect();
        let names = EmployeeRepository::new(self.db).names(&employee_ids).await?;
        let type_names: HashMap<i32, String> = VacationTypeRepository::new(self.db)
            .list(false)
            .await?
            .into_iter()
            .map(|t| (t.id, t.name))
            .collect();

        Ok(records
            .into_iter()
            .map(|r| leave_into_dto(r, &names, &type_names))
            .collect())
    }
}

fn already_decided() -> AppError {
    AppError::bad_request("Only pending requests can be changed")
}
