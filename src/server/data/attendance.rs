use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::server::model::attendance::{AttendanceFilter, RequestStatus};

#[derive(Debug, Clone)]
pub struct CreateOvertimeParams {
    pub employee_id: i32,
    pub overtime_date: NaiveDate,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub hours: f64,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct CreateLeaveParams {
    pub employee_id: i32,
    pub vacation_type_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: f64,
    pub reason: Option<String>,
}

/// Outcome applied to a pending request.
#[derive(Debug, Clone)]
pub struct Decision {
    pub status: RequestStatus,
    pub approver_id: Option<i32>,
    pub note: Option<String>,
}

pub struct OvertimeRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> OvertimeRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        params: CreateOvertimeParams,
    ) -> Result<entity::overtime_record::Model, DbErr> {
        entity::overtime_record::ActiveModel {
            employee_id: ActiveValue::Set(params.employee_id),
            overtime_date: ActiveValue::Set(params.overtime_date),
            start_time: ActiveValue::Set(params.start_time),
            end_time: ActiveValue::Set(params.end_time),
            hours: ActiveValue::Set(params.hours),
            reason: ActiveValue::Set(params.reason),
            status: ActiveValue::Set(RequestStatus::Pending.as_str().to_string()),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    pub async fn find_by_id(
        &self,
        id: i32,
    ) -> Result<Option<entity::overtime_record::Model>, DbErr> {
        entity::prelude::OvertimeRecord::find_by_id(id).one(self.db).await
    }

    /// Records matching the filter, newest first.
    pub async fn get_paginated(
        &self,
        filter: &AttendanceFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<entity::overtime_record::Model>, u64), DbErr> {
        let mut query = entity::prelude::OvertimeRecord::find();
        if let Some(employee_id) = filter.employee_id {
            query = query.filter(entity::overtime_record::Column::EmployeeId.eq(employee_id));
        }
        if let Some(status) = &filter.status {
            query = query.filter(entity::overtime_record::Column::Status.eq(status.as_str()));
        }
        if let Some(ids) = &filter.employee_ids {
            query = query.filter(entity::overtime_record::Column::EmployeeId.is_in(ids.clone()));
        }

        let paginator = query
            .order_by_desc(entity::overtime_record::Column::OvertimeDate)
            .order_by_desc(entity::overtime_record::Column::Id)
            .paginate(self.db, per_page);

        let total = paginator.num_items().await?;
        let records = paginator.fetch_page(page).await?;
        Ok((records, total))
    }

    /// Moves a pending record to the decided status.
    ///
    /// The update only matches while the record is still pending, so of two
    /// concurrent decisions exactly one wins. Returns `None` for the loser.
    pub async fn decide(
        &self,
        id: i32,
        decision: Decision,
    ) -> Result<Option<entity::overtime_record::Model>, DbErr> {
        let result = entity::prelude::OvertimeRecord::update_many()
            .col_expr(
                entity::overtime_record::Column::Status,
                Expr::value(decision.status.as_str()),
            )
            .col_expr(
                entity::overtime_record::Column::ApproverId,
                Expr::value(decision.approver_id),
            )
            .col_expr(
                entity::overtime_record::Column::ApprovedAt,
                Expr::value(Some(Utc::now())),
            )
            .col_expr(
                entity::overtime_record::Column::ApprovalNote,
                Expr::value(decision.note),
            )
            .filter(entity::overtime_record::Column::Id.eq(id))
            .filter(entity::overtime_record::Column::Status.eq(RequestStatus::Pending.as_str()))
            .exec(self.db)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    /// Sum of hours and count of records per status for an employee and year.
    pub async fn totals_by_status(
        &self,
        employee_id: i32,
        year: Option<i32>,
    ) -> Result<Vec<(String, Option<f64>, i64)>, DbErr> {
        let mut query = entity::prelude::OvertimeRecord::find()
            .select_only()
            .column(entity::overtime_record::Column::Status)
            .column_as(entity::overtime_record::Column::Hours.sum(), "hours")
            .column_as(entity::overtime_record::Column::Id.count(), "records")
            .filter(entity::overtime_record::Column::EmployeeId.eq(employee_id));
        if let Some(year) = year {
            let (start, end) = year_bounds(year);
            query = query
                .filter(entity::overtime_record::Column::OvertimeDate.gte(start))
                .filter(entity::overtime_record::Column::OvertimeDate.lte(end));
        }

        query
            .group_by(entity::overtime_record::Column::Status)
            .into_tuple::<(String, Option<f64>, i64)>()
            .all(self.db)
            .await
    }

    /// Total approved overtime hours of an employee across all years.
    pub async fn approved_hours(&self, employee_id: i32) -> Result<f64, DbErr> {
        let total = entity::prelude::OvertimeRecord::find()
            .select_only()
            .column_as(entity::overtime_record::Column::Hours.sum(), "hours")
            .filter(entity::overtime_record::Column::EmployeeId.eq(employee_id))
            .filter(entity::overtime_record::Column::Status.eq(RequestStatus::Approved.as_str()))
            .into_tuple::<Option<f64>>()
            .one(self.db)
            .await?;
        Ok(total.flatten().unwrap_or(0.0))
    }

    /// Count and total hours of approved overtime dated inside the optional bounds.
    pub async fn approved_between(
        &self,
        employee_id: i32,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<(u64, f64), DbErr> {
        let mut query = entity::prelude::OvertimeRecord::find()
            .select_only()
            .column_as(entity::overtime_record::Column::Id.count(), "count")
            .column_as(entity::overtime_record::Column::Hours.sum(), "hours")
            .filter(entity::overtime_record::Column::EmployeeId.eq(employee_id))
            .filter(entity::overtime_record::Column::Status.eq(RequestStatus::Approved.as_str()));
        if let Some(start) = start {
            query = query.filter(entity::overtime_record::Column::OvertimeDate.gte(start));
        }
        if let Some(end) = end {
            query = query.filter(entity::overtime_record::Column::OvertimeDate.lte(end));
        }

        let totals = query
            .into_tuple::<(i64, Option<f64>)>()
            .one(self.db)
            .await?;
        Ok(totals
            .map(|(count, hours)| (count.max(0) as u64, hours.unwrap_or(0.0)))
            .unwrap_or((0, 0.0)))
    }
}

pub struct LeaveRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> LeaveRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(&self, params: CreateLeaveParams) -> Result<entity::leave_record::Model, DbErr> {
        entity::leave_record::ActiveModel {
            employee_id: ActiveValue::Set(params.employee_id),
            vacation_type_id: ActiveValue::Set(params.vacation_type_id),
            start_date: ActiveValue::Set(params.start_date),
            end_date: ActiveValue::Set(params.end_date),
            days: ActiveValue::Set(params.days),
            reason: ActiveValue::Set(params.reason),
            status: ActiveValue::Set(RequestStatus::Pending.as_str().to_string()),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<entity::leave_record::Model>, DbErr> {
        entity::prelude::LeaveRecord::find_by_id(id).one(self.db).await
    }

    /// Whether a pending or approved record of the employee intersects the range.
    pub async fn has_overlap(
        &self,
        employee_id: i32,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<bool, DbErr> {
        let count = entity::prelude::LeaveRecord::find()
            .filter(entity::leave_record::Column::EmployeeId.eq(employee_id))
            .filter(entity::leave_record::Column::Status.is_in([
                RequestStatus::Pending.as_str(),
                RequestStatus::Approved.as_str(),
            ]))
            .filter(entity::leave_record::Column::StartDate.lte(end_date))
            .filter(entity::leave_record::Column::EndDate.gte(start_date))
            .count(self.db)
            .await?;
        Ok(count > 0)
    }

    /// Approved requests overlapping the optional bounds.
    pub async fn count_approved_between(
        &self,
        employee_id: i32,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<u64, DbErr> {
        let mut query = entity::prelude::LeaveRecord::find()
            .filter(entity::leave_record::Column::EmployeeId.eq(employee_id))
            .filter(entity::leave_record::Column::Status.eq(RequestStatus::Approved.as_str()));
        if let Some(start) = start {
            query = query.filter(entity::leave_record::Column::EndDate.gte(start));
        }
        if let Some(end) = end {
            query = query.filter(entity::leave_record::Column::StartDate.lte(end));
        }
        query.count(self.db).await
    }

    /// Records matching the filter, newest first.
    pub async fn get_paginated(
        &self,
        filter: &AttendanceFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<entity::leave_record::Model>, u64), DbErr> {
        let mut query = entity::prelude::LeaveRecord::find();
        if let Some(employee_id) = filter.employee_id {
            query = query.filter(entity::leave_record::Column::EmployeeId.eq(employee_id));
        }
        if let Some(status) = &filter.status {
            query = query.filter(entity::leave_record::Column::Status.eq(status.as_str()));
        }
        if let Some(ids) = &filter.employee_ids {
            query = query.filter(entity::leave_record::Column::EmployeeId.is_in(ids.clone()));
        }

        let paginator = query
            .order_by_desc(entity::leave_record::Column::StartDate)
            .order_by_desc(entity::leave_record::Column::Id)
            .paginate(self.db, per_page);

        let total = paginator.num_items().await?;
        let records = paginator.fetch_page(page).await?;
        Ok((records, total))
    }

    /// Pending records, oldest first; `employee_ids` restricts when `Some`.
    pub async fn list_pending(
        &self,
        employee_ids: Option<&[i32]>,
    ) -> Result<Vec<entity::leave_record::Model>, DbErr> {
        let mut query = entity::prelude::LeaveRecord::find()
            .filter(entity::leave_record::Column::Status.eq(RequestStatus::Pending.as_str()));
        if let Some(ids) = employee_ids {
            query = query.filter(entity::leave_record::Column::EmployeeId.is_in(ids.to_vec()));
        }
        query
            .order_by_asc(entity::leave_record::Column::CreatedAt)
            .order_by_asc(entity::leave_record::Column::Id)
            .all(self.db)
            .await
    }

    /// Moves a pending record to the decided status; `None` when it is no longer pending.
    ///
    /// Cancellations carry no decision time.
    pub async fn decide(
        &self,
        id: i32,
        decision: Decision,
    ) -> Result<Option<entity::leave_record::Model>, DbErr> {
        let decided_at = match decision.status {
            RequestStatus::Cancelled => None,
            _ => Some(Utc::now()),
        };
        let result = entity::prelude::LeaveRecord::update_many()
            .col_expr(
                entity::leave_record::Column::Status,
                Expr::value(decision.status.as_str()),
            )
            .col_expr(
                entity::leave_record::Column::ApproverId,
                Expr::value(decision.approver_id),
            )
            .col_expr(entity::leave_record::Column::ApprovedAt, Expr::value(decided_at))
            .col_expr(
                entity::leave_record::Column::ApprovalNote,
                Expr::value(decision.note),
            )
            .filter(entity::leave_record::Column::Id.eq(id))
            .filter(entity::leave_record::Column::Status.eq(RequestStatus::Pending.as_str()))
            .exec(self.db)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }
}

fn year_bounds(year: i32) -> (NaiveDate, NaiveDate) {
    let start = NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MIN);
    let end = NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(NaiveDate::MAX);
    (start, end)
}
