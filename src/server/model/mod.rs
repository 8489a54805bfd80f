//! Domain models and operation parameters.
//!
//! Domain models are converted from entities at the repository boundary and into DTOs at
//! the controller boundary. `*Params` types carry validated input from controllers into
//! services and repositories.

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
pub mod vacation;
