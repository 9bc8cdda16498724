pub mod catalog;
pub mod scan;
