//! The vacation balance ledger.
//!
//! Every balance row is keyed by (employee, year, vacation type). Its statutory total
//! is re-derived from the holiday table whenever the row is read through
//! [`sync_balance`]; the other components only move through the operations below, each
//! of which writes an audit row in the same transaction.

use chrono::Utc;
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};

use crate::{
    model::{
        api::{PageDto, PaginationParams},
        vacation::{
            AdjustBalanceDto, AdjustMode, AuditLogDto, AvailableOvertimeDto, BalanceDto,
            BalanceOverviewQueryDto, BatchAdjustBalanceDto, ConvertOvertimeDto,
            EmployeeBalancesDto, OvertimeConversionDto,
        },
    },
    server::{
        data::{
            attendance::OvertimeRepository,
            employee::EmployeeRepository,
            vacation::{
                AuditLogRepository, BalanceComponents, BalanceRepository,
                ConversionRuleRepository, HolidayRepository, OvertimeConversionRepository,
                VacationTypeRepository,
            },
        },
        error::AppError,
        middleware::auth::CurrentUser,
        model::{
            employee::{Employee, EmployeeFilter},
            vacation::{
                adjusted_days_after, audit_log_into_dto, conversion_into_dto, hours_to_days,
                AuditEntry, AuditOperation, Balance, CreateConversionParams,
            },
        },
        service::employee::{
            require_employee_visible, require_employees_visible, visible_employee_ids,
        },
        util::validate::{dedup_ids, optional_text},
    },
};

/// Loads the balance row, creating it when missing, and re-syncs its statutory total.
///
/// A changed total is recorded as a `statutory_sync` audit entry.
pub async fn sync_balance<C: ConnectionTrait>(
    db: &C,
    employee_id: i32,
    year: i32,
    vacation_type: &entity::vacation_type::Model,
    operator_id: Option<i32>,
) -> Result<entity::vacation_balance::Model, AppError> {
    let statutory = HolidayRepository::new(db)
        .sum_days(year, vacation_type.id)
        .await? as f64;

    let balance_repo = BalanceRepository::new(db);
    let Some(balance) = balance_repo.find(employee_id, year, vacation_type.id).await? else {
        return Ok(balance_repo
            .create(employee_id, year, vacation_type.id, statutory)
            .await?);
    };

    if balance.total_days == statutory {
        return Ok(balance);
    }

    let before = balance.clone();
    let mut components = BalanceComponents::from(&balance);
    components.total_days = statutory;
    let after = balance_repo.set_components(balance, components).await?;

    AuditLogRepository::new(db)
        .record(
            &before,
            &after,
            AuditEntry {
                operation: AuditOperation::StatutorySync,
                change_days: statutory - before.total_days,
                reason: Some("Statutory entitlement re-synced from holidays".to_string()),
                operator_id,
            },
        )
        .await?;

    Ok(after)
}

/// A manual adjustment applied to one or more balances.
struct Adjustment<'t> {
    year: i32,
    vacation_type: &'t entity::vacation_type::Model,
    mode: AdjustMode,
    days: f64,
    operation: AuditOperation,
    reason: Option<String>,
    operator_id: i32,
}

async fn adjust_balance<C: ConnectionTrait>(
    db: &C,
    employee_id: i32,
    adjustment: &Adjustment<'_>,
) -> Result<entity::vacation_balance::Model, AppError> {
    let balance = sync_balance(
        db,
        employee_id,
        adjustment.year,
        adjustment.vacation_type,
        Some(adjustment.operator_id),
    )
    .await?;
    let before = balance.clone();

    let mut components = BalanceComponents::from(&balance);
    components.adjusted_days = adjusted_days_after(
        balance.total_days,
        balance.converted_days,
        balance.adjusted_days,
        balance.used_days,
        adjustment.mode,
        adjustment.days,
    );
    let change_days = components.adjusted_days - balance.adjusted_days;

    let after = BalanceRepository::new(db)
        .set_components(balance, components)
        .await?;

    AuditLogRepository::new(db)
        .record(
            &before,
            &after,
            AuditEntry {
                operation: adjustment.operation,
                change_days,
                reason: adjustment.reason.clone(),
                operator_id: Some(adjustment.operator_id),
            },
        )
        .await?;

    Ok(after)
}

pub struct BalanceService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> BalanceService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// One balance per enabled vacation type for an employee.
    pub async fn employee_balances(
        &self,
        current: &CurrentUser,
        employee_id: i32,
        year: i32,
    ) -> Result<EmployeeBalancesDto, AppError> {
        let employee = require_employee_visible(self.db, current, employee_id).await?;
        let types = VacationTypeRepository::new(self.db).list(true).await?;

        let txn = self.db.begin().await?;
        let balances = balances_for(&txn, &employee, year, &types, current.id()).await?;
        txn.commit().await?;

        Ok(balances)
    }

    /// Paged balances of every employee in scope.
    pub async fn overview(
        &self,
        current: &CurrentUser,
        query: BalanceOverviewQueryDto,
        year: i32,
        pagination: PaginationParams,
    ) -> Result<PageDto<EmployeeBalancesDto>, AppError> {
        let filter = EmployeeFilter {
            keyword: query.keyword.filter(|k| !k.trim().is_empty()),
            department_ids: current.scope.narrow(query.department_id),
            status: None,
        };
        let per_page = pagination.per_page();

        let (employees, total) = EmployeeRepository::new(self.db)
            .get_paginated(&filter, pagination.page, per_page)
            .await?;
        let types = VacationTypeRepository::new(self.db).list(true).await?;

        let txn = self.db.begin().await?;
        let mut items = Vec::with_capacity(employees.len());
        for employee in &employees {
            items.push(balances_for(&txn, employee, year, &types, current.id()).await?);
        }
        txn.commit().await?;

        Ok(PageDto::new(items, total, pagination.page, per_page))
    }

    /// Balances of every active employee in scope, for exports.
    pub async fn all_in_scope(
        &self,
        current: &CurrentUser,
        department_id: Option<i32>,
        year: i32,
    ) -> Result<Vec<EmployeeBalancesDto>, AppError> {
        let filter = EmployeeFilter {
            keyword: None,
            department_ids: current.scope.narrow(department_id),
            status: Some("active".to_string()),
        };
        let employees = EmployeeRepository::new(self.db).list(&filter).await?;
        let types = VacationTypeRepository::new(self.db).list(true).await?;

        let txn = self.db.begin().await?;
        let mut items = Vec::with_capacity(employees.len());
        for employee in &employees {
            items.push(balances_for(&txn, employee, year, &types, current.id()).await?);
        }
        txn.commit().await?;

        Ok(items)
    }

    pub async fn adjust(
        &self,
        current: &CurrentUser,
        employee_id: i32,
        dto: AdjustBalanceDto,
    ) -> Result<BalanceDto, AppError> {
        require_employee_visible(self.db, current, employee_id).await?;
        validate_adjust_days(dto.days)?;
        let reason = optional_text("reason", dto.reason, 500)?;
        let vacation_type = self.require_type(dto.vacation_type_id).await?;

        let txn = self.db.begin().await?;
        let adjustment = Adjustment {
            year: dto.year,
            vacation_type: &vacation_type,
            mode: dto.mode,
            days: dto.days,
            operation: AuditOperation::Adjust,
            reason,
            operator_id: current.id(),
        };
        let balance = adjust_balance(&txn, employee_id, &adjustment).await?;
        txn.commit().await?;

        Ok(Balance::from_entity(balance, &vacation_type).into_dto())
    }

    /// Adjusts several employees in one transaction, returning how many were adjusted.
    pub async fn batch_adjust(
        &self,
        current: &CurrentUser,
        dto: BatchAdjustBalanceDto,
    ) -> Result<u64, AppError> {
        let employee_ids = dedup_ids(&dto.employee_ids);
        if employee_ids.is_empty() {
            return Err(AppError::bad_request("employee_ids must not be empty"));
        }
        validate_adjust_days(dto.days)?;
        let reason = optional_text("reason", dto.reason, 500)?;
        let vacation_type = self.require_type(dto.vacation_type_id).await?;

        require_employees_visible(self.db, current, &employee_ids).await?;

        let adjustment = Adjustment {
            year: dto.year,
            vacation_type: &vacation_type,
            mode: dto.mode,
            days: dto.days,
            operation: AuditOperation::BatchAdjust,
            reason,
            operator_id: current.id(),
        };

        let txn = self.db.begin().await?;
        for id in &employee_ids {
            adjust_balance(&txn, *id, &adjustment).await?;
        }
        txn.commit().await?;

        Ok(employee_ids.len() as u64)
    }

    pub async fn history(
        &self,
        current: &CurrentUser,
        employee_id: i32,
        year: Option<i32>,
        pagination: PaginationParams,
    ) -> Result<PageDto<AuditLogDto>, AppError> {
        require_employee_visible(self.db, current, employee_id).await?;
        let per_page = pagination.per_page();

        let (entries, total) = AuditLogRepository::new(self.db)
            .get_paginated(employee_id, year, pagination.page, per_page)
            .await?;

        Ok(PageDto::new(
            entries.into_iter().map(audit_log_into_dto).collect(),
            total,
            pagination.page,
            per_page,
        ))
    }

    /// Converts approved overtime hours into vacation days.
    ///
    /// The ratio comes from the requested enabled rule, else the enabled rule targeting
    /// the vacation type's code, else 1.0.
    pub async fn convert_overtime(
        &self,
        current: &CurrentUser,
        dto: ConvertOvertimeDto,
        year: i32,
    ) -> Result<OvertimeConversionDto, AppError> {
        require_employee_visible(self.db, current, dto.employee_id).await?;
        if !dto.overtime_hours.is_finite() || dto.overtime_hours <= 0.0 {
            return Err(AppError::bad_request("overtime_hours must be greater than 0"));
        }

        let vacation_type = self.require_type(dto.target_type_id).await?;
        let rule_repo = ConversionRuleRepository::new(self.db);
        let rule = match dto.conversion_rule_id {
            Some(rule_id) => {
                let rule = rule_repo
                    .find_by_id(rule_id)
                    .await?
                    .ok_or_else(|| AppError::bad_request("Conversion rule does not exist"))?;
                if !rule.enabled {
                    return Err(AppError::bad_request("Conversion rule is disabled"));
                }
                Some(rule)
            }
            None => rule_repo.find_enabled_for_target(&vacation_type.code).await?,
        };
        let ratio = rule.as_ref().map(|r| r.ratio).unwrap_or(1.0);

        let txn = self.db.begin().await?;

        let available = available_hours(&txn, dto.employee_id).await?;
        if dto.overtime_hours > available.available_hours {
            return Err(AppError::bad_request(format!(
                "Only {} overtime hours are available for conversion",
                available.available_hours
            )));
        }

        let days = hours_to_days(dto.overtime_hours, ratio);
        let balance = sync_balance(&txn, dto.employee_id, year, &vacation_type, Some(current.id()))
            .await?;
        let before = balance.clone();
        let mut components = BalanceComponents::from(&balance);
        components.converted_days += days;
        let after = BalanceRepository::new(&txn)
            .set_components(balance, components)
            .await?;

        AuditLogRepository::new(&txn)
            .record(
                &before,
                &after,
                AuditEntry {
                    operation: AuditOperation::Convert,
                    change_days: days,
                    reason: Some(format!(
                        "Converted {} overtime hours at ratio {}",
                        dto.overtime_hours, ratio
                    )),
                    operator_id: Some(current.id()),
                },
            )
            .await?;

        let conversion = OvertimeConversionRepository::new(&txn)
            .create(CreateConversionParams {
                employee_id: dto.employee_id,
                year,
                overtime_hours: dto.overtime_hours,
                vacation_type_id: vacation_type.id,
                converted_days: days,
                conversion_rule_id: rule.map(|r| r.id),
                conversion_ratio: ratio,
                created_by: Some(current.id()),
                created_at: Utc::now(),
            })
            .await?;

        txn.commit().await?;

        Ok(conversion_into_dto(conversion))
    }

    pub async fn conversions(
        &self,
        current: &CurrentUser,
        employee_id: Option<i32>,
        pagination: PaginationParams,
    ) -> Result<PageDto<OvertimeConversionDto>, AppError> {
        let employee_ids = match employee_id {
            Some(id) => {
                require_employee_visible(self.db, current, id).await?;
                Some(vec![id])
            }
            None => visible_employee_ids(self.db, current).await?,
        };
        let per_page = pagination.per_page();

        let (conversions, total) = OvertimeConversionRepository::new(self.db)
            .get_paginated(employee_ids.as_deref(), pagination.page, per_page)
            .await?;

        Ok(PageDto::new(
            conversions.into_iter().map(conversion_into_dto).collect(),
            total,
            pagination.page,
            per_page,
        ))
    }

    pub async fn available(
        &self,
        current: &CurrentUser,
        employee_id: i32,
    ) -> Result<AvailableOvertimeDto, AppError> {
        require_employee_visible(self.db, current, employee_id).await?;
        available_hours(self.db, employee_id).await
    }

    async fn require_type(&self, id: i32) -> Result<entity::vacation_type::Model, AppError> {
        VacationTypeRepository::new(self.db)
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::bad_request("Vacation type does not exist"))
    }
}

async fn available_hours<C: ConnectionTrait>(
    db: &C,
    employee_id: i32,
) -> Result<AvailableOvertimeDto, AppError> {
    let approved_hours = OvertimeRepository::new(db).approved_hours(employee_id).await?;
    let converted_hours = OvertimeConversionRepository::new(db)
        .converted_hours(employee_id)
        .await?;

    Ok(AvailableOvertimeDto {
        employee_id,
        approved_hours,
        converted_hours,
        available_hours: (approved_hours - converted_hours).max(0.0),
    })
}

async fn balances_for<C: ConnectionTrait>(
    db: &C,
    employee: &Employee,
    year: i32,
    types: &[entity::vacation_type::Model],
    operator_id: i32,
) -> Result<EmployeeBalancesDto, AppError> {
    let mut balances = Vec::with_capacity(types.len());
    for vacation_type in types {
        let balance = sync_balance(db, employee.id, year, vacation_type, Some(operator_id)).await?;
        balances.push(Balance::from_entity(balance, vacation_type).into_dto());
    }

    Ok(EmployeeBalancesDto {
        employee_id: employee.id,
        employee_no: employee.employee_no.clone(),
        real_name: employee.real_name.clone(),
        department_id: employee.department_id,
        department_name: employee.department_name.clone(),
        balances,
    })
}

fn validate_adjust_days(days: f64) -> Result<(), AppError> {
    if !days.is_finite() || days < 0.0 {
        return Err(AppError::bad_request("days must be a non-negative number"));
    }
    Ok(())
}
