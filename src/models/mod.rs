pub mod level;
pub mod settings;
pub mod stats;
