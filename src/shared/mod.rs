//! Data shared between threads.

pub mod snapshot;
