//! Business services for the admin service.

pub mod auth;
pub mod mollie;
