//! Main module for linker script editing support

pub mod comments;
pub mod document;
pub mod highlight;
pub mod indentation;
pub mod mode;
pub mod processor;
pub mod testing;
