pub mod clients;
pub mod lifecycle;
pub mod reports;
