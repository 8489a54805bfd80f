//! Service layer for business logic and orchestration.
//!
//! This module contains the service layer of the application, which sits between the
//! controller (API) layer and the data (repository) layer. Services are responsible for:
//!
//! - **Business Logic**: Implementing core business rules and validation
//! - **Orchestration**: Coordinating multiple repository calls
//! - **Domain Models**: Working with domain models rather than DTOs or entity models
//! - **Transaction Management**: Handling complex multi-step operations

pub mod assessment;
pub mod attendance;
pub mod auth;
pub mod balance;
pub mod bootstrap;
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

#[cfg(test)]
mod test;
