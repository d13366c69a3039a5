//! Dialect generators.

pub mod mariadb;
pub mod mysql;
pub mod postgres;
pub mod snowflake;
pub mod sqlite;
pub mod sqlserver;
