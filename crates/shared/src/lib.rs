//! Wire contract shared between the intake controller and its front-ends.

pub mod domain;
pub mod error;
pub mod protocol;
