pub mod calendar;
pub mod emails;
pub mod health;
