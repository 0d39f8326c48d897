pub mod common;
pub mod recognition;
