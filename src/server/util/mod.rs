//! Small helpers shared by services and controllers.

pub mod password;
pub mod time;
pub mod validate;
