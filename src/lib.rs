//! Employee roster kept in a SQLite table, with a csv bulk loader and a numbered text menu.

pub mod config;
pub mod data_handling;
pub mod employee;
pub mod loader;
pub mod textinterface;

pub use config::Config;
pub use data_handling::{DataError, Roster};
pub use employee::{Column, Employee, EmployeeRow, RecordError};
pub use loader::{BulkLoader, LoadError, RawRow};
