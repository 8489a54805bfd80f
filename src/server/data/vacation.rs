use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::server::model::vacation::{
    balance_snapshot, AuditEntry, CreateConversionParams, CreateConversionRuleParams,
    CreateVacationTypeParams, HolidayParams, UpdateConversionRuleParams, UpdateHolidayParams,
    UpdateVacationTypeParams,
};

pub struct VacationTypeRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> VacationTypeRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        params: CreateVacationTypeParams,
        sort_order: i32,
    ) -> Result<entity::vacation_type::Model, DbErr> {
        entity::vacation_type::ActiveModel {
            code: ActiveValue::Set(params.code),
            name: ActiveValue::Set(params.name),
            description: ActiveValue::Set(params.description),
            enabled: ActiveValue::Set(params.enabled),
            sort_order: ActiveValue::Set(sort_order),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<entity::vacation_type::Model>, DbErr> {
        entity::prelude::VacationType::find_by_id(id).one(self.db).await
    }

    pub async fn find_by_code(
        &self,
        code: &str,
    ) -> Result<Option<entity::vacation_type::Model>, DbErr> {
        entity::prelude::VacationType::find()
            .filter(entity::vacation_type::Column::Code.eq(code))
            .one(self.db)
            .await
    }

    /// Lists vacation types by sort order; `enabled_only` hides disabled types.
    pub async fn list(&self, enabled_only: bool) -> Result<Vec<entity::vacation_type::Model>, DbErr> {
        let mut query = entity::prelude::VacationType::find();
        if enabled_only {
            query = query.filter(entity::vacation_type::Column::Enabled.eq(true));
        }
        query
            .order_by_asc(entity::vacation_type::Column::SortOrder)
            .order_by_asc(entity::vacation_type::Column::Id)
            .all(self.db)
            .await
    }

    pub async fn max_sort_order(&self) -> Result<Option<i32>, DbErr> {
        let max = entity::prelude::VacationType::find()
            .select_only()
            .column_as(entity::vacation_type::Column::SortOrder.max(), "max_sort")
            .into_tuple::<Option<i32>>()
            .one(self.db)
            .await?;
        Ok(max.flatten())
    }

    pub async fn update(
        &self,
        vacation_type: entity::vacation_type::Model,
        params: UpdateVacationTypeParams,
    ) -> Result<entity::vacation_type::Model, DbErr> {
        let mut active_model: entity::vacation_type::ActiveModel = vacation_type.clone().into();
        if let Some(code) = params.code {
            active_model.code = ActiveValue::Set(code);
        }
        if let Some(name) = params.name {
            active_model.name = ActiveValue::Set(name);
        }
        if let Some(description) = params.description {
            active_model.description = ActiveValue::Set(Some(description));
        }
        if let Some(enabled) = params.enabled {
            active_model.enabled = ActiveValue::Set(enabled);
        }
        if let Some(sort_order) = params.sort_order {
            active_model.sort_order = ActiveValue::Set(sort_order);
        }
        if !active_model.is_changed() {
            return Ok(vacation_type);
        }
        active_model.update(self.db).await
    }

    pub async fn delete(&self, id: i32) -> Result<u64, DbErr> {
        let result = entity::prelude::VacationType::delete_by_id(id)
            .exec(self.db)
            .await?;
        Ok(result.rows_affected)
    }

    /// Counts holidays, balances and leave records referencing the type.
    pub async fn count_references(&self, id: i32) -> Result<u64, DbErr> {
        let holidays = entity::prelude::Holiday::find()
            .filter(entity::holiday::Column::VacationTypeId.eq(id))
            .count(self.db)
            .await?;
        let balances = entity::prelude::VacationBalance::find()
            .filter(entity::vacation_balance::Column::VacationTypeId.eq(id))
            .count(self.db)
            .await?;
        let leaves = entity::prelude::LeaveRecord::find()
            .filter(entity::leave_record::Column::VacationTypeId.eq(id))
            .count(self.db)
            .await?;
        Ok(holidays + balances + leaves)
    }
}

pub struct HolidayRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> HolidayRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(&self, params: HolidayParams) -> Result<entity::holiday::Model, DbErr> {
        entity::holiday::ActiveModel {
            name: ActiveValue::Set(params.name),
            days: ActiveValue::Set(params.days),
            month: ActiveValue::Set(params.month),
            year: ActiveValue::Set(params.year),
            vacation_type_id: ActiveValue::Set(params.vacation_type_id),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<entity::holiday::Model>, DbErr> {
        entity::prelude::Holiday::find_by_id(id).one(self.db).await
    }

    /// Holidays of a year with their vacation type, ordered by month.
    pub async fn list_by_year(
        &self,
        year: i32,
    ) -> Result<Vec<(entity::holiday::Model, Option<entity::vacation_type::Model>)>, DbErr> {
        entity::prelude::Holiday::find()
            .find_also_related(entity::prelude::VacationType)
            .filter(entity::holiday::Column::Year.eq(year))
            .order_by_asc(entity::holiday::Column::Month)
            .order_by_asc(entity::holiday::Column::Id)
            .all(self.db)
            .await
    }

    /// (month, total days, count) for every month that has at least one entry.
    pub async fn monthly_totals(&self, year: i32) -> Result<Vec<(i32, Option<i64>, i64)>, DbErr> {
        entity::prelude::Holiday::find()
            .select_only()
            .column(entity::holiday::Column::Month)
            .column_as(entity::holiday::Column::Days.sum(), "total_days")
            .column_as(entity::holiday::Column::Id.count(), "entries")
            .filter(entity::holiday::Column::Year.eq(year))
            .group_by(entity::holiday::Column::Month)
            .into_tuple::<(i32, Option<i64>, i64)>()
            .all(self.db)
            .await
    }

    /// Statutory entitlement: total holiday days for a year and vacation type.
    pub async fn sum_days(&self, year: i32, vacation_type_id: i32) -> Result<i64, DbErr> {
        let total = entity::prelude::Holiday::find()
            .select_only()
            .column_as(entity::holiday::Column::Days.sum(), "total_days")
            .filter(entity::holiday::Column::Year.eq(year))
            .filter(entity::holiday::Column::VacationTypeId.eq(vacation_type_id))
            .into_tuple::<Option<i64>>()
            .one(self.db)
            .await?;
        Ok(total.flatten().unwrap_or(0))
    }

    pub async fn update(
        &self,
        holiday: entity::holiday::Model,
        params: UpdateHolidayParams,
    ) -> Result<entity::holiday::Model, DbErr> {
        let mut active_model: entity::holiday::ActiveModel = holiday.clone().into();
        if let Some(name) = params.name {
            active_model.name = ActiveValue::Set(name);
        }
        if let Some(days) = params.days {
            active_model.days = ActiveValue::Set(days);
        }
        if let Some(month) = params.month {
            active_model.month = ActiveValue::Set(month);
        }
        if let Some(year) = params.year {
            active_model.year = ActiveValue::Set(year);
        }
        if let Some(vacation_type_id) = params.vacation_type_id {
            active_model.vacation_type_id = ActiveValue::Set(vacation_type_id);
        }
        if !active_model.is_changed() {
            return Ok(holiday);
        }
        active_model.update(self.db).await
    }

    pub async fn delete(&self, id: i32) -> Result<u64, DbErr> {
        let result = entity::prelude::Holiday::delete_by_id(id).exec(self.db).await?;
        Ok(result.rows_affected)
    }
}

pub struct ConversionRuleRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ConversionRuleRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        params: CreateConversionRuleParams,
    ) -> Result<entity::conversion_rule::Model, DbErr> {
        let now = Utc::now();
        entity::conversion_rule::ActiveModel {
            name: ActiveValue::Set(params.name),
            source_type: ActiveValue::Set(params.source_type),
            target_type: ActiveValue::Set(params.target_type),
            ratio: ActiveValue::Set(params.ratio),
            enabled: ActiveValue::Set(params.enabled),
            description: ActiveValue::Set(params.description),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    pub async fn find_by_id(
        &self,
        id: i32,
    ) -> Result<Option<entity::conversion_rule::Model>, DbErr> {
        entity::prelude::ConversionRule::find_by_id(id).one(self.db).await
    }

    pub async fn list(
        &self,
        enabled: Option<bool>,
    ) -> Result<Vec<entity::conversion_rule::Model>, DbErr> {
        let mut query = entity::prelude::ConversionRule::find();
        if let Some(enabled) = enabled {
            query = query.filter(entity::conversion_rule::Column::Enabled.eq(enabled));
        }
        query
            .order_by_desc(entity::conversion_rule::Column::Enabled)
            .order_by_asc(entity::conversion_rule::Column::Id)
            .all(self.db)
            .await
    }

    /// The enabled rule crediting the vacation type `code`, if any.
    pub async fn find_enabled_for_target(
        &self,
        code: &str,
    ) -> Result<Option<entity::conversion_rule::Model>, DbErr> {
        entity::prelude::ConversionRule::find()
            .filter(entity::conversion_rule::Column::Enabled.eq(true))
            .filter(entity::conversion_rule::Column::TargetType.eq(code))
            .one(self.db)
            .await
    }

    /// Disables every rule except `keep_id`.
    pub async fn disable_others(&self, keep_id: i32) -> Result<u64, DbErr> {
        let result = entity::prelude::ConversionRule::update_many()
            .col_expr(entity::conversion_rule::Column::Enabled, Expr::value(false))
            .col_expr(entity::conversion_rule::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(entity::conversion_rule::Column::Id.ne(keep_id))
            .filter(entity::conversion_rule::Column::Enabled.eq(true))
            .exec(self.db)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn update(
        &self,
        rule: entity::conversion_rule::Model,
        params: UpdateConversionRuleParams,
    ) -> Result<entity::conversion_rule::Model, DbErr> {
        let mut active_model: entity::conversion_rule::ActiveModel = rule.clone().into();
        if let Some(name) = params.name {
            active_model.name = ActiveValue::Set(name);
        }
        if let Some(target_type) = params.target_type {
            active_model.target_type = ActiveValue::Set(target_type);
        }
        if let Some(ratio) = params.ratio {
            active_model.ratio = ActiveValue::Set(ratio);
        }
        if let Some(enabled) = params.enabled {
            active_model.enabled = ActiveValue::Set(enabled);
        }
        if let Some(description) = params.description {
            active_model.description = ActiveValue::Set(Some(description));
        }
        if !active_model.is_changed() {
            return Ok(rule);
        }
        active_model.updated_at = ActiveValue::Set(Utc::now());
        active_model.update(self.db).await
    }

    pub async fn delete(&self, id: i32) -> Result<u64, DbErr> {
        let result = entity::prelude::ConversionRule::delete_by_id(id)
            .exec(self.db)
            .await?;
        Ok(result.rows_affected)
    }
}

/// New values for the four balance components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BalanceComponents {
    pub total_days: f64,
    pub converted_days: f64,
    pub adjusted_days: f64,
    pub used_days: f64,
}

impl From<&entity::vacation_balance::Model> for BalanceComponents {
    fn from(balance: &entity::vacation_balance::Model) -> Self {
        Self {
            total_days: balance.total_days,
            converted_days: balance.converted_days,
            adjusted_days: balance.adjusted_days,
            used_days: balance.used_days,
        }
    }
}

pub struct BalanceRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> BalanceRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find(
        &self,
        employee_id: i32,
        year: i32,
        vacation_type_id: i32,
    ) -> Result<Option<entity::vacation_balance::Model>, DbErr> {
        entity::prelude::VacationBalance::find()
            .filter(entity::vacation_balance::Column::EmployeeId.eq(employee_id))
            .filter(entity::vacation_balance::Column::Year.eq(year))
            .filter(entity::vacation_balance::Column::VacationTypeId.eq(vacation_type_id))
            .one(self.db)
            .await
    }

    pub async fn create(
        &self,
        employee_id: i32,
        year: i32,
        vacation_type_id: i32,
        total_days: f64,
    ) -> Result<entity::vacation_balance::Model, DbErr> {
        let now = Utc::now();
        entity::vacation_balance::ActiveModel {
            employee_id: ActiveValue::Set(employee_id),
            year: ActiveValue::Set(year),
            vacation_type_id: ActiveValue::Set(vacation_type_id),
            total_days: ActiveValue::Set(total_days),
            converted_days: ActiveValue::Set(0.0),
            adjusted_days: ActiveValue::Set(0.0),
            used_days: ActiveValue::Set(0.0),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    pub async fn set_components(
        &self,
        balance: entity::vacation_balance::Model,
        components: BalanceComponents,
    ) -> Result<entity::vacation_balance::Model, DbErr> {
        let mut active_model: entity::vacation_balance::ActiveModel = balance.into();
        active_model.total_days = ActiveValue::Set(components.total_days);
        active_model.converted_days = ActiveValue::Set(components.converted_days);
        active_model.adjusted_days = ActiveValue::Set(components.adjusted_days);
        active_model.used_days = ActiveValue::Set(components.used_days);
        active_model.updated_at = ActiveValue::Set(Utc::now());
        active_model.update(self.db).await
    }
}

pub struct AuditLogRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> AuditLogRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Records a balance mutation with snapshots of the row before and after.
    pub async fn record(
        &self,
        before: &entity::vacation_balance::Model,
        after: &entity::vacation_balance::Model,
        entry: AuditEntry,
    ) -> Result<entity::vacation_audit_log::Model, DbErr> {
        entity::vacation_audit_log::ActiveModel {
            employee_id: ActiveValue::Set(after.employee_id),
            balance_id: ActiveValue::Set(after.id),
            year: ActiveValue::Set(after.year),
            vacation_type_id: ActiveValue::Set(after.vacation_type_id),
            operation: ActiveValue::Set(entry.operation.as_str().to_string()),
            change_days: ActiveValue::Set(entry.change_days),
            before_snapshot: ActiveValue::Set(Some(balance_snapshot(before))),
            after_snapshot: ActiveValue::Set(Some(balance_snapshot(after))),
            reason: ActiveValue::Set(entry.reason),
            operator_id: ActiveValue::Set(entry.operator_id),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    /// Audit entries of an employee, newest first.
    pub async fn get_paginated(
        &self,
        employee_id: i32,
        year: Option<i32>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<entity::vacation_audit_log::Model>, u64), DbErr> {
        let mut query = entity::prelude::VacationAuditLog::find()
            .filter(entity::vacation_audit_log::Column::EmployeeId.eq(employee_id));
        if let Some(year) = year {
            query = query.filter(entity::vacation_audit_log::Column::Year.eq(year));
        }

        let paginator = query
            .order_by_desc(entity::vacation_audit_log::Column::CreatedAt)
            .order_by_desc(entity::vacation_audit_log::Column::Id)
            .paginate(self.db, per_page);

        let total = paginator.num_items().await?;
        let entries = paginator.fetch_page(page).await?;
        Ok((entries, total))
    }
}

pub struct OvertimeConversionRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> OvertimeConversionRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        params: CreateConversionParams,
    ) -> Result<entity::overtime_conversion::Model, DbErr> {
        entity::overtime_conversion::ActiveModel {
            employee_id: ActiveValue::Set(params.employee_id),
            year: ActiveValue::Set(params.year),
            overtime_hours: ActiveValue::Set(params.overtime_hours),
            vacation_type_id: ActiveValue::Set(params.vacation_type_id),
            converted_days: ActiveValue::Set(params.converted_days),
            conversion_rule_id: ActiveValue::Set(params.conversion_rule_id),
            conversion_ratio: ActiveValue::Set(params.conversion_ratio),
            created_by: ActiveValue::Set(params.created_by),
            created_at: ActiveValue::Set(params.created_at),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    /// Overtime hours of an employee already converted to leave.
    pub async fn converted_hours(&self, employee_id: i32) -> Result<f64, DbErr> {
        let total = entity::prelude::OvertimeConversion::find()
            .select_only()
            .column_as(
                entity::overtime_conversion::Column::OvertimeHours.sum(),
                "converted_hours",
            )
            .filter(entity::overtime_conversion::Column::EmployeeId.eq(employee_id))
            .into_tuple::<Option<f64>>()
            .one(self.db)
            .await?;
        Ok(total.flatten().unwrap_or(0.0))
    }

    /// Conversions newest first; `employee_ids` restricts when `Some`.
    pub async fn get_paginated(
        &self,
        employee_ids: Option<&[i32]>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<entity::overtime_conversion::Model>, u64), DbErr> {
        let mut query = entity::prelude::OvertimeConversion::find();
        if let Some(ids) = employee_ids {
            query = query.filter(entity::overtime_conversion::Column::EmployeeId.is_in(ids.to_vec()));
        }

        let paginator = query
            .order_by_desc(entity::overtime_conversion::Column::CreatedAt)
            .order_by_desc(entity::overtime_conversion::Column::Id)
            .paginate(self.db, per_page);

        let total = paginator.num_items().await?;
        let conversions = paginator.fetch_page(page).await?;
        Ok((conversions, total))
    }
}
