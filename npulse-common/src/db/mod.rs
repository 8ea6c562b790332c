//! Database initialization and learning-path table access

pub mod init;
pub mod source;

pub use init::*;
pub use source::*;
