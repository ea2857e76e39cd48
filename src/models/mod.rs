//! Database models shared across the intranet repository.

pub mod alert;
pub mod branch;
pub mod calendar_event;
pub mod company;
#[cfg(feature = "server")]
pub mod config;
pub mod document;
pub mod news;
pub mod product;
pub mod user;
