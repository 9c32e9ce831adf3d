pub mod delete;
pub mod form;
pub mod management;
