//! API data transfer objects shared by every controller.

pub mod api;
pub mod assessment;
pub mod attendance;
pub mod auth;
pub mod broadcast;
pub mod chat;
pub mod clock;
pub mod department;
pub mod employee;
pub mod export;
pub mod inventory;
pub mod memo;
pub mod notification;
pub mod reimbursement;
pub mod role;
pub mod schedule;
pub mod vacation;
