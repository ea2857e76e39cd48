//! DTO modules that bridge services with templates and APIs.

pub mod alerts;
pub mod api;
pub mod branches;
pub mod calendar;
pub mod companies;
pub mod documents;
pub mod main;
pub mod news;
pub mod products;
pub mod users;
