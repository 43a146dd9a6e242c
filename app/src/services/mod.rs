// app/src/services/mod.rs

pub mod account_service;
pub mod auth_service;
pub mod lead_intake;
