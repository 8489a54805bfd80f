use crate::server::{
    data::schedule::{ScheduleRepository, ShiftRepository},
    model::schedule::{ScheduleEntry, ScheduleFilter, REST_SHIFT_NAME},
};
use chrono::NaiveDate;
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod list;
mod upsert;
mod shift;

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
}
