use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::server::model::schedule::{
    palette_color, CreateShiftParams, ScheduleEntry, ScheduleFilter, UpdateShiftParams,
    REST_SHIFT_NAME,
};

pub struct ShiftRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ShiftRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Inserts a shift, picking a palette color when none was given.
    pub async fn create(&self, params: CreateShiftParams) -> Result<entity::work_shift::Model, DbErr> {
        let color = match params.color {
            Some(color) => color,
            None => palette_color(entity::prelude::WorkShift::find().count(self.db).await?),
        };

        entity::work_shift::ActiveModel {
            name: ActiveValue::Set(params.name),
            start_time: ActiveValue::Set(params.start_time),
            end_time: ActiveValue::Set(params.end_time),
            color: ActiveValue::Set(color),
            is_rest: ActiveValue::Set(params.is_rest),
            department_id: ActiveValue::Set(params.department_id),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<entity::work_shift::Model>, DbErr> {
        entity::prelude::WorkShift::find_by_id(id).one(self.db).await
    }

    pub async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<entity::work_shift::Model>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        entity::prelude::WorkShift::find()
            .filter(entity::work_shift::Column::Id.is_in(ids.to_vec()))
            .all(self.db)
            .await
    }

    /// Global shifts plus those of `department_ids`; `None` lists every shift.
    pub async fn list_visible(
        &self,
        department_ids: Option<&[i32]>,
    ) -> Result<Vec<entity::work_shift::Model>, DbErr> {
        let mut query = entity::prelude::WorkShift::find();
        if let Some(ids) = department_ids {
            query = query.filter(
                Condition::any()
                    .add(entity::work_shift::Column::DepartmentId.is_null())
                    .add(entity::work_shift::Column::DepartmentId.is_in(ids.to_vec())),
            );
        }
        query
            .order_by_asc(entity::work_shift::Column::StartTime)
            .order_by_asc(entity::work_shift::Column::Id)
            .all(self.db)
            .await
    }

    /// Returns the global rest shift, creating it on first use.
    pub async fn get_or_create_rest_shift(&self) -> Result<entity::work_shift::Model, DbErr> {
        let existing = entity::prelude::WorkShift::find()
            .filter(entity::work_shift::Column::IsRest.eq(true))
            .filter(entity::work_shift::Column::Name.eq(REST_SHIFT_NAME))
            .filter(entity::work_shift::Column::DepartmentId.is_null())
            .one(self.db)
            .await?;
        if let Some(shift) = existing {
            return Ok(shift);
        }

        self.create(CreateShiftParams {
            name: REST_SHIFT_NAME.to_string(),
            start_time: "00:00".to_string(),
            end_time: "00:00".to_string(),
            color: Some("#d9d9d9".to_string()),
            is_rest: true,
            department_id: None,
        })
        .await
    }

    pub async fn update(
        &self,
        shift: entity::work_shift::Model,
        params: UpdateShiftParams,
    ) -> Result<entity::work_shift::Model, DbErr> {
        let mut active_model: entity::work_shift::ActiveModel = shift.clone().into();
        if let Some(name) = params.name {
            active_model.name = ActiveValue::Set(name);
        }
        if let Some(start_time) = params.start_time {
            active_model.start_time = ActiveValue::Set(start_time);
        }
        if let Some(end_time) = params.end_time {
            active_model.end_time = ActiveValue::Set(end_time);
        }
        if let Some(color) = params.color {
            active_model.color = ActiveValue::Set(color);
        }
        if let Some(is_rest) = params.is_rest {
            active_model.is_rest = ActiveValue::Set(is_rest);
        }
        if !active_model.is_changed() {
            return Ok(shift);
        }
        active_model.update(self.db).await
    }

    pub async fn delete(&self, id: i32) -> Result<u64, DbErr> {
        let result = entity::prelude::WorkShift::delete_by_id(id).exec(self.db).await?;
        Ok(result.rows_affected)
    }

    pub async fn count_schedules(&self, shift_id: i32) -> Result<u64, DbErr> {
        entity::prelude::ShiftSchedule::find()
            .filter(entity::shift_schedule::Column::ShiftId.eq(shift_id))
            .count(self.db)
            .await
    }
}

pub struct ScheduleRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ScheduleRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<entity::shift_schedule::Model>, DbErr> {
        entity::prelude::ShiftSchedule::find_by_id(id).one(self.db).await
    }

    pub async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<entity::shift_schedule::Model>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        entity::prelude::ShiftSchedule::find()
            .filter(entity::shift_schedule::Column::Id.is_in(ids.to_vec()))
            .all(self.db)
            .await
    }

    pub async fn find_for_day(
        &self,
        employee_id: i32,
        schedule_date: NaiveDate,
    ) -> Result<Option<entity::shift_schedule::Model>, DbErr> {
        entity::prelude::ShiftSchedule::find()
            .filter(entity::shift_schedule::Column::EmployeeId.eq(employee_id))
            .filter(entity::shift_schedule::Column::ScheduleDate.eq(schedule_date))
            .one(self.db)
            .await
    }

    /// Creates the row for (employee, date) or replaces the existing one's shift.
    pub async fn upsert(&self, entry: ScheduleEntry) -> Result<entity::shift_schedule::Model, DbErr> {
        let now = Utc::now();
        match self.find_for_day(entry.employee_id, entry.schedule_date).await? {
            Some(existing) => {
                let mut active_model: entity::shift_schedule::ActiveModel = existing.into();
                active_model.shift_id = ActiveValue::Set(entry.shift_id);
                active_model.is_rest_day = ActiveValue::Set(entry.is_rest_day);
                active_model.note = ActiveValue::Set(entry.note);
                active_model.updated_at = ActiveValue::Set(now);
                active_model.update(self.db).await
            }
            None => {
                entity::shift_schedule::ActiveModel {
                    employee_id: ActiveValue::Set(entry.employee_id),
                    schedule_date: ActiveValue::Set(entry.schedule_date),
                    shift_id: ActiveValue::Set(entry.shift_id),
                    is_rest_day: ActiveValue::Set(entry.is_rest_day),
                    note: ActiveValue::Set(entry.note),
                    created_at: ActiveValue::Set(now),
                    updated_at: ActiveValue::Set(now),
                    ..Default::default()
                }
                .insert(self.db)
                .await
            }
        }
    }

    /// Rows inside the inclusive date range, ordered by date then employee.
    pub async fn list(&self, filter: &ScheduleFilter) -> Result<Vec<entity::shift_schedule::Model>, DbErr> {
        let mut query = entity::prelude::ShiftSchedule::find()
            .filter(entity::shift_schedule::Column::ScheduleDate.gte(filter.start_date))
            .filter(entity::shift_schedule::Column::ScheduleDate.lte(filter.end_date));
        if let Some(ids) = &filter.employee_ids {
            query = query.filter(entity::shift_schedule::Column::EmployeeId.is_in(ids.clone()));
        }
        query
            .order_by_asc(entity::shift_schedule::Column::ScheduleDate)
            .order_by_asc(entity::shift_schedule::Column::EmployeeId)
            .all(self.db)
            .await
    }

    pub async fn update(
        &self,
        schedule: entity::shift_schedule::Model,
        shift_id: Option<i32>,
        is_rest_day: Option<bool>,
        note: Option<String>,
    ) -> Result<entity::shift_schedule::Model, DbErr> {
        let mut active_model: entity::shift_schedule::ActiveModel = schedule.clone().into();
        if let Some(shift_id) = shift_id {
            active_model.shift_id = ActiveValue::Set(shift_id);
        }
        if let Some(is_rest_day) = is_rest_day {
            active_model.is_rest_day = ActiveValue::Set(is_rest_day);
        }
        if let Some(note) = note {
            active_model.note = ActiveValue::Set(Some(note));
        }
        if !active_model.is_changed() {
            return Ok(schedule);
        }
        active_model.updated_at = ActiveValue::Set(Utc::now());
        active_model.update(self.db).await
    }

    pub async fn delete_many(&self, ids: &[i32]) -> Result<u64, DbErr> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = entity::prelude::ShiftSchedule::delete_many()
            .filter(entity::shift_schedule::Column::Id.is_in(ids.to_vec()))
            .exec(self.db)
            .await?;
        Ok(result.rows_affected)
    }
}
