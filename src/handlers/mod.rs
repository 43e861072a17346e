pub mod admin;
pub mod auth;
pub mod themes;
pub mod users;
