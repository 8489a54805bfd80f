use crate::server::data::vacation::{
    BalanceComponents, BalanceRepository, HolidayRepository, VacationTypeRepository,
};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod balance;
mod holiday;
mod vacation_type;
