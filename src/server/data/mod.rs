//! Database repository layer for all domain entities.
//!
//! This module contains repository structs that handle database operations (CRUD) for each
//! domain in the application. Repositories are generic over `ConnectionTrait` so the same
//! code runs against the pool or inside a `DatabaseTransaction`; services open the
//! transaction and hand it to every repository taking part in a multi-step mutation.

pub mod assessment;
pub mod attendance;
pub mod broadcast;
pub mod chat;
pub mod clock;
pub mod department;
pub mod employee;
pub mod inventory;
pub mod memo;
pub mod notification;
pub mod reimbursement;
pub mod role;
pub mod schedule;
pub mod user;
pub mod vacation;

#[cfg(test)]
mod test;
