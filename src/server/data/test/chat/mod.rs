use crate::server::{data::chat::ChatRepository, model::chat::member_role};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod create_group;
mod history;
mod unread_count;
