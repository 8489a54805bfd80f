//! Vacation types, statutory holidays, conversion rules and the balance ledger.

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::model::vacation::{
    AdjustMode, AuditLogDto, BalanceDto, ConversionRuleDto, CreateConversionRuleDto, CreateHolidayDto,
    CreateVacationTypeDto, HolidayDto, OvertimeConversionDto, UpdateConversionRuleDto,
    UpdateHolidayDto, UpdateVacationTypeDto, VacationTypeDto,
};

pub fn vacation_type_into_dto(entity: entity::vacation_type::Model) -> VacationTypeDto {
    VacationTypeDto {
        id: entity.id,
        code: entity.code,
        name: entity.name,
        description: entity.description,
        enabled: entity.enabled,
        sort_order: entity.sort_order,
        created_at: entity.created_at,
    }
}

#[derive(Debug, Clone)]
pub struct CreateVacationTypeParams {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub enabled: bool,
    pub sort_order: Option<i32>,
}

impl CreateVacationTypeParams {
    pub fn from_dto(dto: CreateVacationTypeDto) -> Self {
        Self {
            code: dto.code.trim().to_string(),
            name: dto.name.trim().to_string(),
            description: dto.description,
            enabled: dto.enabled.unwrap_or(true),
            sort_order: dto.sort_order,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpdateVacationTypeParams {
    pub code: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub enabled: Option<bool>,
    pub sort_order: Option<i32>,
}

impl UpdateVacationTypeParams {
    pub fn from_dto(dto: UpdateVacationTypeDto) -> Self {
        Self {
            code: dto.code.map(|c| c.trim().to_string()),
            name: dto.name.map(|n| n.trim().to_string()),
            description: dto.description,
            enabled: dto.enabled,
            sort_order: dto.sort_order,
        }
    }
}

pub fn holiday_into_dto(
    entity: entity::holiday::Model,
    vacation_type: Option<entity::vacation_type::Model>,
) -> HolidayDto {
    HolidayDto {
        id: entity.id,
        name: entity.name,
        days: entity.days,
        month: entity.month,
        year: entity.year,
        vacation_type_id: entity.vacation_type_id,
        vacation_type_name: vacation_type.map(|t| t.name),
        created_at: entity.created_at,
    }
}

#[derive(Debug, Clone)]
pub struct HolidayParams {
    pub name: String,
    pub days: i32,
    pub month: i32,
    pub year: i32,
    pub vacation_type_id: i32,
}

impl HolidayParams {
    pub fn from_dto(dto: CreateHolidayDto) -> Self {
        Self {
            name: dto.name.trim().to_string(),
            days: dto.days,
            month: dto.month,
            year: dto.year,
            vacation_type_id: dto.vacation_type_id,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpdateHolidayParams {
    pub name: Option<String>,
    pub days: Option<i32>,
    pub month: Option<i32>,
    pub year: Option<i32>,
    pub vacation_type_id: Option<i32>,
}

impl UpdateHolidayParams {
    pub fn from_dto(dto: UpdateHolidayDto) -> Self {
        Self {
            name: dto.name.map(|n| n.trim().to_string()),
            days: dto.days,
            month: dto.month,
            year: dto.year,
            vacation_type_id: dto.vacation_type_id,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.days.is_none()
            && self.month.is_none()
            && self.year.is_none()
            && self.vacation_type_id.is_none()
    }
}

pub fn conversion_rule_into_dto(entity: entity::conversion_rule::Model) -> ConversionRuleDto {
    ConversionRuleDto {
        id: entity.id,
        name: entity.name,
        source_type: entity.source_type,
        target_type: entity.target_type,
        ratio: entity.ratio,
        enabled: entity.enabled,
        description: entity.description,
        created_at: entity.created_at,
        updated_at: entity.updated_at,
    }
}

#[derive(Debug, Clone)]
pub struct CreateConversionRuleParams {
    pub name: String,
    pub source_type: String,
    pub target_type: String,
    pub ratio: f64,
    pub enabled: bool,
    pub description: Option<String>,
}

impl CreateConversionRuleParams {
    pub fn from_dto(dto: CreateConversionRuleDto) -> Self {
        Self {
            name: dto.name.trim().to_string(),
            source_type: dto.source_type.unwrap_or_else(|| "overtime".to_string()),
            target_type: dto.target_type.trim().to_string(),
            ratio: dto.ratio,
            enabled: dto.enabled.unwrap_or(true),
            description: dto.description,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpdateConversionRuleParams {
    pub name: Option<String>,
    pub target_type: Option<String>,
    pub ratio: Option<f64>,
    pub enabled: Option<bool>,
    pub description: Option<String>,
}

impl UpdateConversionRuleParams {
    pub fn from_dto(dto: UpdateConversionRuleDto) -> Self {
        Self {
            name: dto.name.map(|n| n.trim().to_string()),
            target_type: dto.target_type.map(|t| t.trim().to_string()),
            ratio: dto.ratio,
            enabled: dto.enabled,
            description: dto.description,
        }
    }
}

/// A balance row with its vacation type resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Balance {
    pub id: i32,
    pub employee_id: i32,
    pub year: i32,
    pub vacation_type_id: i32,
    pub vacation_type_code: String,
    pub vacation_type_name: String,
    pub total_days: f64,
    pub converted_days: f64,
    pub adjusted_days: f64,
    pub used_days: f64,
}

impl Balance {
    pub fn from_entity(
        entity: entity::vacation_balance::Model,
        vacation_type: &entity::vacation_type::Model,
    ) -> Self {
        Self {
            id: entity.id,
            employee_id: entity.employee_id,
            year: entity.year,
            vacation_type_id: entity.vacation_type_id,
            vacation_type_code: vacation_type.code.clone(),
            vacation_type_name: vacation_type.name.clone(),
            total_days: entity.total_days,
            converted_days: entity.converted_days,
            adjusted_days: entity.adjusted_days,
            used_days: entity.used_days,
        }
    }

    pub fn remaining_days(&self) -> f64 {
        remaining_days(
            self.total_days,
            self.converted_days,
            self.adjusted_days,
            self.used_days,
        )
    }

    pub fn into_dto(self) -> BalanceDto {
        let remaining_days = self.remaining_days();
        BalanceDto {
            id: self.id,
            employee_id: self.employee_id,
            year: self.year,
            vacation_type_id: self.vacation_type_id,
            vacation_type_code: self.vacation_type_code,
            vacation_type_name: self.vacation_type_name,
            total_days: self.total_days,
            converted_days: self.converted_days,
            adjusted_days: self.adjusted_days,
            used_days: self.used_days,
            remaining_days,
        }
    }
}

pub fn remaining_days(total: f64, converted: f64, adjusted: f64, used: f64) -> f64 {
    total + converted + adjusted - used
}

/// JSON snapshot of a balance row stored in the audit log.
pub fn balance_snapshot(balance: &entity::vacation_balance::Model) -> serde_json::Value {
    json!({
        "total_days": balance.total_days,
        "converted_days": balance.converted_days,
        "adjusted_days": balance.adjusted_days,
        "used_days": balance.used_days,
        "remaining_days": remaining_days(
            balance.total_days,
            balance.converted_days,
            balance.adjusted_days,
            balance.used_days,
        ),
    })
}

/// Ledger operations recorded in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditOperation {
    Adjust,
    BatchAdjust,
    Deduct,
    Convert,
    StatutorySync,
}

impl AuditOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Adjust => "adjust",
            Self::BatchAdjust => "batch_adjust",
            Self::Deduct => "deduct",
            Self::Convert => "convert",
            Self::StatutorySync => "statutory_sync",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub operation: AuditOperation,
    pub change_days: f64,
    pub reason: Option<String>,
    pub operator_id: Option<i32>,
}

pub fn audit_log_into_dto(entity: entity::vacation_audit_log::Model) -> AuditLogDto {
    AuditLogDto {
        id: entity.id,
        employee_id: entity.employee_id,
        balance_id: entity.balance_id,
        year: entity.year,
        vacation_type_id: entity.vacation_type_id,
        operation: entity.operation,
        change_days: entity.change_days,
        before_snapshot: entity.before_snapshot,
        after_snapshot: entity.after_snapshot,
        reason: entity.reason,
        operator_id: entity.operator_id,
        created_at: entity.created_at,
    }
}

#[derive(Debug, Clone)]
pub struct CreateConversionParams {
    pub employee_id: i32,
    pub year: i32,
    pub overtime_hours: f64,
    pub vacation_type_id: i32,
    pub converted_days: f64,
    pub conversion_rule_id: Option<i32>,
    pub conversion_ratio: f64,
    pub created_by: Option<i32>,
    pub created_at: DateTime<Utc>,
}

pub fn conversion_into_dto(entity: entity::overtime_conversion::Model) -> OvertimeConversionDto {
    OvertimeConversionDto {
        id: entity.id,
        employee_id: entity.employee_id,
        year: entity.year,
        overtime_hours: entity.overtime_hours,
        vacation_type_id: entity.vacation_type_id,
        converted_days: entity.converted_days,
        conversion_rule_id: entity.conversion_rule_id,
        conversion_ratio: entity.conversion_ratio,
        created_by: entity.created_by,
        created_at: entity.created_at,
    }
}

/// Working hours in one vacation day.
pub const HOURS_PER_DAY: f64 = 8.0;

/// Days credited for `hours` of overtime at `ratio`, rounded to two decimals.
pub fn hours_to_days(hours: f64, ratio: f64) -> f64 {
    (hours * ratio / HOURS_PER_DAY * 100.0).round() / 100.0
}

/// The `adjusted_days` value that applies `mode` with `days` to a balance.
///
/// The resulting remaining balance is never below zero.
pub fn adjusted_days_after(
    total: f64,
    converted: f64,
    adjusted: f64,
    used: f64,
    mode: AdjustMode,
    days: f64,
) -> f64 {
    let remaining = remaining_days(total, converted, adjusted, used);
    let target = match mode {
        AdjustMode::Set => days,
        AdjustMode::Increase => remaining + days,
        AdjustMode::Decrease => remaining - days,
    }
    .max(0.0);

    adjusted + (target - remaining)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_sums_components() {
        assert_eq!(remaining_days(5.0, 1.5, -0.5, 2.0), 4.0);
    }

    #[test]
    fn hours_convert_at_ratio() {
        assert_eq!(hours_to_days(8.0, 1.0), 1.0);
        assert_eq!(hours_to_days(12.0, 1.5), 2.25);
        assert_eq!(hours_to_days(1.0, 1.0), 0.13);
    }

    #[test]
    fn empty_holiday_update_detected() {
        assert!(UpdateHolidayParams::default().is_empty());
        assert!(!UpdateHolidayParams {
            days: Some(1),
            ..Default::default()
        }
        .is_empty());
    }

    #[test]
    fn adjustments_move_remaining_and_clamp() {
        // remaining = 5 + 0 + 0 - 2 = 3
        assert_eq!(adjusted_days_after(5.0, 0.0, 0.0, 2.0, AdjustMode::Set, 10.0), 7.0);
        assert_eq!(adjusted_days_after(5.0, 0.0, 0.0, 2.0, AdjustMode::Increase, 1.5), 1.5);
        assert_eq!(adjusted_days_after(5.0, 0.0, 0.0, 2.0, AdjustMode::Decrease, 1.0), -1.0);
        assert_eq!(adjusted_days_after(5.0, 0.0, 0.0, 2.0, AdjustMode::Decrease, 9.0), -3.0);
    }
}
