pub mod application;
pub mod ats;
pub mod auth;
pub mod billing;
pub mod coaching;
pub mod profile;
pub mod tailoring;
pub mod templates;
pub mod usage;
pub mod user;
