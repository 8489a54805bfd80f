use crate::server::{
    data::department::DepartmentRepository,
    model::department::{CreateDepartmentParams, UpdateDepartmentParams},
};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod create;
mod list;
mod update;
