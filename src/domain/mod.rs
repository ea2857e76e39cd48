//! Domain aggregates exposed by the intranet service layer.

pub mod alert;
pub mod auth;
pub mod branch;
pub mod calendar_event;
pub mod company;
pub mod document;
pub mod news;
pub mod product;
pub mod types;
pub mod user;
