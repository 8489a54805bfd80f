use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};

/// Date range and status filter over one employee's clock records.
#[derive(Debug, Clone, Default)]
pub struct ClockFilter {
    pub employee_id: i32,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<String>,
}

pub struct ClockRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ClockRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_for_day(
        &self,
        employee_id: i32,
        record_date: NaiveDate,
    ) -> Result<Option<entity::attendance_record::Model>, DbErr> {
        entity::prelude::AttendanceRecord::find()
            .filter(entity::attendance_record::Column::EmployeeId.eq(employee_id))
            .filter(entity::attendance_record::Column::RecordDate.eq(record_date))
            .one(self.db)
            .await
    }

    /// Inserts the day's record with its clock-in time.
    ///
    /// Fails with a unique violation when the employee already has a record for
    /// the date and the migration index is present.
    pub async fn clock_in(
        &self,
        employee_id: i32,
        record_date: NaiveDate,
        at: DateTime<Utc>,
        status: &str,
    ) -> Result<entity::attendance_record::Model, DbErr> {
        let now = Utc::now();
        entity::attendance_record::ActiveModel {
            employee_id: ActiveValue::Set(employee_id),
            record_date: ActiveValue::Set(record_date),
            clock_in_time: ActiveValue::Set(Some(at)),
            clock_out_time: ActiveValue::Set(None),
            work_hours: ActiveValue::Set(None),
            status: ActiveValue::Set(status.to_string()),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    /// Sets the clock-out of a record that has none yet.
    ///
    /// Returns `None` when the record was already clocked out.
    pub async fn clock_out(
        &self,
        id: i32,
        at: DateTime<Utc>,
        work_hours: f64,
        status: &str,
    ) -> Result<Option<entity::attendance_record::Model>, DbErr> {
        let result = entity::prelude::AttendanceRecord::update_many()
            .col_expr(
                entity::attendance_record::Column::ClockOutTime,
                Expr::value(Some(at)),
            )
            .col_expr(
                entity::attendance_record::Column::WorkHours,
                Expr::value(Some(work_hours)),
            )
            .col_expr(entity::attendance_record::Column::Status, Expr::value(status))
            .col_expr(
                entity::attendance_record::Column::UpdatedAt,
                Expr::value(Utc::now()),
            )
            .filter(entity::attendance_record::Column::Id.eq(id))
            .filter(entity::attendance_record::Column::ClockOutTime.is_null())
            .exec(self.db)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        entity::prelude::AttendanceRecord::find_by_id(id)
            .one(self.db)
            .await
    }

    /// Records matching the filter, newest day first.
    pub async fn get_paginated(
        &self,
        filter: &ClockFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<entity::attendance_record::Model>, u64), DbErr> {
        let mut query = self.range_query(filter);
        if let Some(status) = &filter.status {
            query = query.filter(entity::attendance_record::Column::Status.eq(status.as_str()));
        }

        let paginator = query
            .order_by_desc(entity::attendance_record::Column::RecordDate)
            .paginate(self.db, per_page);

        let total = paginator.num_items().await?;
        let records = paginator.fetch_page(page).await?;
        Ok((records, total))
    }

    /// Every record in the filter's date range, ignoring its status.
    pub async fn list_in_range(
        &self,
        filter: &ClockFilter,
    ) -> Result<Vec<entity::attendance_record::Model>, DbErr> {
        self.range_query(filter)
            .order_by_asc(entity::attendance_record::Column::RecordDate)
            .all(self.db)
            .await
    }

    fn range_query(&self, filter: &ClockFilter) -> sea_orm::Select<entity::prelude::AttendanceRecord> {
        let mut query = entity::prelude::AttendanceRecord::find()
            .filter(entity::attendance_record::Column::EmployeeId.eq(filter.employee_id));
        if let Some(start) = filter.start_date {
            query = query.filter(entity::attendance_record::Column::RecordDate.gte(start));
        }
        if let Some(end) = filter.end_date {
            query = query.filter(entity::attendance_record::Column::RecordDate.lte(end));
        }
        query
    }
}
