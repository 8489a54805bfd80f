//! HTTP handlers.
//!
//! Handlers authenticate through `AuthGuard`, call one service and wrap the result in
//! the `{ success, data }` envelope. Realtime events are pushed only after the service
//! has committed.

pub mod assessment;
pub mod attendance;
pub mod auth;
pub mod balance;
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
pub mod ws;
