//! Query/command layer - all SQL lives here
//!
//! Each operation is a single parameterized statement or one small
//! transaction against a pool connection. Uniqueness violations are
//! translated into typed errors at this boundary.

pub mod settings;
pub mod tweetbooks;
pub mod tweets;
