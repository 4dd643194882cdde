pub mod db;
pub mod ids;
pub mod models;
mod sessions;
mod tables;
mod tools;
mod users;

pub use db::{Database, DatabaseError};
pub use tables::*;
