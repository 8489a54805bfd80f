//! Work shifts and the per-employee, per-date shift schedule.

use chrono::{Duration, NaiveDate};
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};

use crate::{
    model::schedule::{
        BatchScheduleDto, CopySchedulesDto, CopySchedulesResultDto, CreateShiftDto, ScheduleDto,
        ScheduleQueryDto, ShiftDto, UpdateScheduleDto, UpdateShiftDto, UpsertScheduleDto,
    },
    server::{
        data::{
            department::DepartmentRepository,
            employee::EmployeeRepository,
            schedule::{ScheduleRepository, ShiftRepository},
        },
        error::{auth::AuthError, AppError},
        middleware::auth::CurrentUser,
        model::schedule::{
            shift_into_dto, CreateShiftParams, ScheduleEntry, ScheduleFilter, ScheduleLookup,
            UpdateShiftParams,
        },
        service::employee::{
            require_employee_visible, require_employees_visible, visible_employee_ids,
        },
        util::{
            time::parse_hhmm,
            validate::{dedup_ids, optional_text, required_text},
        },
    },
};

/// Longest range, in days, a schedule query or copy may span.
pub const MAX_RANGE_DAYS: i64 = 93;

pub struct ScheduleService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ScheduleService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list_shifts(&self, current: &CurrentUser) -> Result<Vec<ShiftDto>, AppError> {
        let department_ids = current.scope.department_ids();
        let shifts = ShiftRepository::new(self.db)
            .list_visible(department_ids.as_deref())
            .await?;
        Ok(shifts.into_iter().map(shift_into_dto).collect())
    }

    pub async fn create_shift(
        &self,
        current: &CurrentUser,
        dto: CreateShiftDto,
    ) -> Result<ShiftDto, AppError> {
        let mut params = CreateShiftParams::from_dto(dto);
        params.name = required_text("name", &params.name, 50)?;
        params.start_time = validate_time("start_time", &params.start_time)?;
        params.end_time = validate_time("end_time", &params.end_time)?;
        params.color = optional_text("color", params.color, 20)?;

        if let Some(department_id) = params.department_id {
            if DepartmentRepository::new(self.db)
                .find_by_id(department_id)
                .await?
                .is_none()
            {
                return Err(AppError::bad_request("Department does not exist"));
            }
            require_department_in_scope(current, Some(department_id))?;
        }

        let shift = ShiftRepository::new(self.db).create(params).await?;
        Ok(shift_into_dto(shift))
    }

    pub async fn update_shift(
        &self,
        current: &CurrentUser,
        id: i32,
        dto: UpdateShiftDto,
    ) -> Result<ShiftDto, AppError> {
        let shift = self.visible_shift(current, id).await?;

        let mut params = UpdateShiftParams::from_dto(dto);
        if let Some(name) = &params.name {
            params.name = Some(required_text("name", name, 50)?);
        }
        if let Some(start_time) = &params.start_time {
            params.start_time = Some(validate_time("start_time", start_time)?);
        }
        if let Some(end_time) = &params.end_time {
            params.end_time = Some(validate_time("end_time", end_time)?);
        }

        let shift = ShiftRepository::new(self.db).update(shift, params).await?;
        Ok(shift_into_dto(shift))
    }

    /// Deletes a shift no schedule row references.
    pub async fn delete_shift(&self, current: &CurrentUser, id: i32) -> Result<(), AppError> {
        self.visible_shift(current, id).await?;

        let repo = ShiftRepository::new(self.db);
        if repo.count_schedules(id).await? > 0 {
            return Err(AppError::bad_request(
                "Shift is used by schedules and cannot be deleted",
            ));
        }

        repo.delete(id).await?;
        Ok(())
    }

    pub async fn list(
        &self,
        current: &CurrentUser,
        query: ScheduleQueryDto,
    ) -> Result<Vec<ScheduleDto>, AppError> {
        validate_range(query.start_date, query.end_date)?;

        let employee_ids = match (query.employee_id, query.department_id) {
            (Some(employee_id), _) => {
                require_employee_visible(self.db, current, employee_id).await?;
                Some(vec![employee_id])
            }
            (None, Some(department_id)) => {
                let departments = current.scope.narrow(Some(department_id)).unwrap_or_default();
                Some(
                    EmployeeRepository::new(self.db)
                        .ids_in_departments(&departments)
                        .await?,
                )
            }
            (None, None) => visible_employee_ids(self.db, current).await?,
        };

        let rows = ScheduleRepository::new(self.db)
            .list(&ScheduleFilter {
                start_date: query.start_date,
                end_date: query.end_date,
                employee_ids,
            })
            .await?;

        render(self.db, rows).await
    }

    /// Creates or replaces the schedule of one employee on one date.
    pub async fn upsert(
        &self,
        current: &CurrentUser,
        dto: UpsertScheduleDto,
    ) -> Result<ScheduleDto, AppError> {
        require_employee_visible(self.db, current, dto.employee_id).await?;
        let entry = self.entry(current, dto).await?;

        let row = ScheduleRepository::new(self.db).upsert(entry).await?;
        first(render(self.db, vec![row]).await?)
    }

    /// Upserts every entry in one transaction.
    pub async fn batch_upsert(
        &self,
        current: &CurrentUser,
        dto: BatchScheduleDto,
    ) -> Result<Vec<ScheduleDto>, AppError> {
        if dto.entries.is_empty() {
            return Err(AppError::bad_request("entries must not be empty"));
        }

        let employee_ids = dedup_ids(
            &dto.entries
                .iter()
                .map(|e| e.employee_id)
                .collect::<Vec<_>>(),
        );
        require_employees_visible(self.db, current, &employee_ids).await?;

        let mut entries = Vec::with_capacity(dto.entries.len());
        for entry in dto.entries {
            entries.push(self.entry(current, entry).await?);
        }

        let txn = self.db.begin().await?;
        let repo = ScheduleRepository::new(&txn);
        let mut rows = Vec::with_capacity(entries.len());
        for entry in entries {
            rows.push(repo.upsert(entry).await?);
        }
        txn.commit().await?;

        render(self.db, rows).await
    }

    pub async fn update(
        &self,
        current: &CurrentUser,
        id: i32,
        dto: UpdateScheduleDto,
    ) -> Result<ScheduleDto, AppError> {
        let schedule = self.visible_schedule(current, id).await?;

        let is_rest_day = match dto.shift_id {
            Some(shift_id) => Some(self.visible_shift(current, shift_id).await?.is_rest),
            None => None,
        };
        let note = optional_text("note", dto.note, 200)?;

        let row = ScheduleRepository::new(self.db)
            .update(schedule, dto.shift_id, is_rest_day, note)
            .await?;
        first(render(self.db, vec![row]).await?)
    }

    pub async fn delete(&self, current: &CurrentUser, id: i32) -> Result<(), AppError> {
        self.visible_schedule(current, id).await?;
        ScheduleRepository::new(self.db).delete_many(&[id]).await?;
        Ok(())
    }

    /// Deletes the rows among `ids` that exist, returning how many were removed.
    pub async fn batch_delete(&self, current: &CurrentUser, ids: &[i32]) -> Result<u64, AppError> {
        let ids = dedup_ids(ids);
        if ids.is_empty() {
            return Err(AppError::bad_request("ids must not be empty"));
        }

        let repo = ScheduleRepository::new(self.db);
        let rows = repo.find_by_ids(&ids).await?;
        let employee_ids = dedup_ids(&rows.iter().map(|r| r.employee_id).collect::<Vec<_>>());
        require_employees_visible(self.db, current, &employee_ids).await?;

        let existing: Vec<i32> = rows.iter().map(|r| r.id).collect();
        Ok(repo.delete_many(&existing).await?)
    }

    /// Copies the rows of a source range to a range starting at `target_start`.
    ///
    /// Target dates that already have a row are left untouched and counted as skipped.
    pub async fn copy(
        &self,
        current: &CurrentUser,
        dto: CopySchedulesDto,
    ) -> Result<CopySchedulesResultDto, AppError> {
        validate_range(dto.source_start, dto.source_end)?;
        let offset = dto.target_start - dto.source_start;
        if offset.is_zero() {
            return Err(AppError::bad_request(
                "target_start must differ from source_start",
            ));
        }
        dto.target_start
            .checked_add_signed(dto.source_end - dto.source_start)
            .ok_or_else(|| AppError::bad_request("Target range is out of the supported dates"))?;

        let employee_ids = match dto.employee_ids {
            Some(ids) => {
                let ids = dedup_ids(&ids);
                require_employees_visible(self.db, current, &ids).await?;
                Some(ids)
            }
            None => visible_employee_ids(self.db, current).await?,
        };

        let source = ScheduleRepository::new(self.db)
            .list(&ScheduleFilter {
                start_date: dto.source_start,
                end_date: dto.source_end,
                employee_ids,
            })
            .await?;

        let txn = self.db.begin().await?;
        let result = copy_rows(&txn, source, offset).await?;
        txn.commit().await?;

        Ok(result)
    }

    async fn entry(
        &self,
        current: &CurrentUser,
        dto: UpsertScheduleDto,
    ) -> Result<ScheduleEntry, AppError> {
        let shift = self.visible_shift(current, dto.shift_id).await?;
        Ok(ScheduleEntry {
            employee_id: dto.employee_id,
            schedule_date: dto.schedule_date,
            shift_id: shift.id,
            is_rest_day: shift.is_rest,
            note: optional_text("note", dto.note, 200)?,
        })
    }

    async fn visible_shift(
        &self,
        current: &CurrentUser,
        id: i32,
    ) -> Result<entity::work_shift::Model, AppError> {
        let shift = ShiftRepository::new(self.db)
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Shift not found"))?;
        if shift.department_id.is_some() {
            require_department_in_scope(current, shift.department_id)?;
        }
        Ok(shift)
    }

    async fn visible_schedule(
        &self,
        current: &CurrentUser,
        id: i32,
    ) -> Result<entity::shift_schedule::Model, AppError> {
        let schedule = ScheduleRepository::new(self.db)
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Schedule not found"))?;
        require_employee_visible(self.db, current, schedule.employee_id).await?;
        Ok(schedule)
    }
}

async fn copy_rows<C: ConnectionTrait>(
    db: &C,
    source: Vec<entity::shift_schedule::Model>,
    offset: Duration,
) -> Result<CopySchedulesResultDto, AppError> {
    let repo = ScheduleRepository::new(db);
    let mut result = CopySchedulesResultDto {
        created: 0,
        skipped: 0,
    };

    for row in source {
        let target_date = row
            .schedule_date
            .checked_add_signed(offset)
            .ok_or_else(|| AppError::bad_request("Target range is out of the supported dates"))?;
        if repo.find_for_day(row.employee_id, target_date).await?.is_some() {
            result.skipped += 1;
            continue;
        }

        repo.upsert(ScheduleEntry {
            employee_id: row.employee_id,
            schedule_date: target_date,
            shift_id: row.shift_id,
            is_rest_day: row.is_rest_day,
            note: row.note,
        })
        .await?;
        result.created += 1;
    }

    Ok(result)
}

/// Resolves shift and employee names for schedule rows.
pub async fn render<C: ConnectionTrait>(
    db: &C,
    rows: Vec<entity::shift_schedule::Model>,
) -> Result<Vec<ScheduleDto>, AppError> {
    let shift_ids = dedup_ids(&rows.iter().map(|r| r.shift_id).collect::<Vec<_>>());
    let employee_ids = dedup_ids(&rows.iter().map(|r| r.employee_id).collect::<Vec<_>>());

    let lookup = ScheduleLookup {
        shifts: ShiftRepository::new(db)
            .find_by_ids(&shift_ids)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect(),
        employees: EmployeeRepository::new(db).directory(&employee_ids).await?,
    };

    Ok(rows.into_iter().map(|r| lookup.into_dto(r)).collect())
}

fn first(mut rows: Vec<ScheduleDto>) -> Result<ScheduleDto, AppError> {
    rows.pop()
        .ok_or_else(|| AppError::InternalError("Schedule row vanished".to_string()))
}

fn require_department_in_scope(
    current: &CurrentUser,
    department_id: Option<i32>,
) -> Result<(), AppError> {
    if current.scope.contains(department_id) {
        return Ok(());
    }
    Err(AuthError::AccessDenied(
        current.id(),
        format!("department {:?} is outside the viewable scope", department_id),
    )
    .into())
}

/// Rejects inverted ranges and ranges longer than [`MAX_RANGE_DAYS`].
pub fn validate_range(start: NaiveDate, end: NaiveDate) -> Result<(), AppError> {
    if end < start {
        return Err(AppError::bad_request("end date must not be before start date"));
    }
    if (end - start).num_days() + 1 > MAX_RANGE_DAYS {
        return Err(AppError::bad_request(format!(
            "date range must not exceed {} days",
            MAX_RANGE_DAYS
        )));
    }
    Ok(())
}

fn validate_time(field: &str, value: &str) -> Result<String, AppError> {
    parse_hhmm(value)
        .map(|t| t.format("%H:%M").to_string())
        .ok_or_else(|| AppError::bad_request(format!("{} must use HH:MM", field)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_limit_is_inclusive() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

        assert!(validate_range(start, start + Duration::days(92)).is_ok());
        assert!(validate_range(start, start + Duration::days(93)).is_err());
        assert!(validate_range(start, start - Duration::days(1)).is_err());
    }

    #[test]
    fn times_are_normalized() {
        assert_eq!(validate_time("start_time", "9:05").unwrap(), "09:05");
        assert!(validate_time("start_time", "25:00").is_err());
    }
}
