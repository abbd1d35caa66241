pub mod applications;
pub mod auth;
pub mod billing;
pub mod cv;
pub mod health;
pub mod profile;
pub mod usage;
