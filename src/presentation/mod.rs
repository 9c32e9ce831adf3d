pub mod cli;
pub mod format;
pub mod table;
pub mod view;
