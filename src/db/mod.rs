//! Local persistence module

pub mod sqlite;
