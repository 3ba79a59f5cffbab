//! Domain models

pub mod book;
pub mod lend;
pub mod publisher;
pub mod stats;
pub mod user;
