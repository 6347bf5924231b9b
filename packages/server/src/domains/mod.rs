// Business domains
pub mod auth;
pub mod notifications;
pub mod submissions;
pub mod users;
