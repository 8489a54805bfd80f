pub mod notification_cleanup;
