pub mod a001_supplier;
pub mod a002_employee;
pub mod common;
