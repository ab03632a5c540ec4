pub mod attendees;
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod scan;
