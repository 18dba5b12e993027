pub mod catalog;
pub mod extract;
pub mod health;
pub mod markers;
pub mod reports;
