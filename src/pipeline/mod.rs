pub mod bloodwork;
pub mod report;
