mod attendance;
mod chat;
mod department;
mod memo;
mod notification;
mod role;
mod schedule;
mod vacation;
