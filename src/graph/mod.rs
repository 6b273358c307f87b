pub mod catalog;
pub mod explorer;
