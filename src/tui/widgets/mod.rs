pub mod question;
pub mod results;
pub mod setup;
