pub mod batch;
pub mod file;
pub mod line;
pub mod pattern;
