use std::collections::HashMap;

use chrono::NaiveDate;

use crate::model::schedule::{CreateShiftDto, ScheduleDto, ShiftDto, UpdateShiftDto};

/// Name of the shift used to mark rest days.
pub const REST_SHIFT_NAME: &str = "Rest";

/// Colors assigned to new shifts in creation order.
pub const SHIFT_PALETTE: [&str; 8] = [
    "#1890ff", "#52c41a", "#faad14", "#f5222d", "#722ed1", "#13c2c2", "#eb2f96", "#fa8c16",
];

pub fn palette_color(existing_shifts: u64) -> String {
    SHIFT_PALETTE[(existing_shifts % SHIFT_PALETTE.len() as u64) as usize].to_string()
}

pub fn shift_into_dto(entity: entity::work_shift::Model) -> ShiftDto {
    ShiftDto {
        id: entity.id,
        name: entity.name,
        start_time: entity.start_time,
        end_time: entity.end_time,
        color: entity.color,
        is_rest: entity.is_rest,
        department_id: entity.department_id,
        created_at: entity.created_at,
    }
}

#[derive(Debug, Clone)]
pub struct CreateShiftParams {
    pub name: String,
    pub start_time: String,
    pub end_time: String,
    pub color: Option<String>,
    pub is_rest: bool,
    pub department_id: Option<i32>,
}

impl CreateShiftParams {
    pub fn from_dto(dto: CreateShiftDto) -> Self {
        Self {
            name: dto.name.trim().to_string(),
            start_time: dto.start_time,
            end_time: dto.end_time,
            color: dto.color,
            is_rest: dto.is_rest,
            department_id: dto.department_id,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpdateShiftParams {
    pub name: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub color: Option<String>,
    pub is_rest: Option<bool>,
}

impl UpdateShiftParams {
    pub fn from_dto(dto: UpdateShiftDto) -> Self {
        Self {
            name: dto.name.map(|n| n.trim().to_string()),
            start_time: dto.start_time,
            end_time: dto.end_time,
            color: dto.color,
            is_rest: dto.is_rest,
        }
    }
}

/// One schedule write: the row for (`employee_id`, `schedule_date`) is created or replaced.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleEntry {
    pub employee_id: i32,
    pub schedule_date: NaiveDate,
    pub shift_id: i32,
    pub is_rest_day: bool,
    pub note: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ScheduleFilter {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub employee_ids: Option<Vec<i32>>,
}

/// Display context needed to render schedule rows.
#[derive(Debug, Default)]
pub struct ScheduleLookup {
    pub shifts: HashMap<i32, entity::work_shift::Model>,
    /// Employee id to (real name, department id).
    pub employees: HashMap<i32, (String, Option<i32>)>,
}

impl ScheduleLookup {
    pub fn into_dto(&self, entity: entity::shift_schedule::Model) -> ScheduleDto {
        let shift = self.shifts.get(&entity.shift_id);
        let employee = self.employees.get(&entity.employee_id);
        ScheduleDto {
            id: entity.id,
            employee_id: entity.employee_id,
            employee_name: employee.map(|(name, _)| name.clone()),
            department_id: employee.and_then(|(_, department_id)| *department_id),
            schedule_date: entity.schedule_date,
            shift_id: entity.shift_id,
            shift_name: shift.map(|s| s.name.clone()),
            shift_color: shift.map(|s| s.color.clone()),
            is_rest_day: entity.is_rest_day,
            note: entity.note,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_wraps_around() {
        assert_eq!(palette_color(0), "#1890ff");
        assert_eq!(palette_color(9), "#52c41a");
    }
}
