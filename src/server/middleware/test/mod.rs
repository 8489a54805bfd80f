use std::collections::BTreeSet;

use crate::server::{
    error::{auth::AuthError, AppError},
    middleware::{
        auth::{AuthGuard, DepartmentScope, Permission},
        session::AuthSession,
    },
};
use test_utils::{builder::TestBuilder, factory};

mod require;
mod scope;
mod session;
