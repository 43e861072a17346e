pub mod attempt;
pub mod question;
pub mod theme;
pub mod user;
