pub mod job;
pub mod options;
