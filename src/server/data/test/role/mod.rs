use crate::server::data::role::RoleRepository;
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod access_for_user;
mod set_user_roles;
mod super_admin_exists;
