use crate::server::{
    data::attendance::{CreateLeaveParams, Decision, LeaveRepository},
    model::attendance::RequestStatus,
};
use chrono::NaiveDate;
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod decide;
mod has_overlap;

fn leave(employee_id: i32, vacation_type_id: i32, start: u32, end: u32) -> CreateLeaveParams {
    CreateLeaveParams {
        employee_id,
        vacation_type_id,
        start_date: NaiveDate::from_ymd_opt(2025, 6, start).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2025, 6, end).unwrap(),
        days: f64::from(end - start + 1),
        reason: None,
    }
}
