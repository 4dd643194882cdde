pub mod generator;
pub mod session;

pub use generator::{generate_secret, hash_secret, verify_secret};
