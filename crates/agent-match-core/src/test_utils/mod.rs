//! Test doubles shared by unit tests, integration tests and the server crate.

pub mod fakes;

pub use fakes::*;
