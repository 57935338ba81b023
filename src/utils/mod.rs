pub mod file_parsing;
pub mod growable;
pub mod math;
pub mod memory;
pub mod system;
