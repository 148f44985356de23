//! Tasks Module
//!
//! Background maintenance for the cache registry.

pub mod sweeper;

pub use sweeper::spawn_sweeper;
