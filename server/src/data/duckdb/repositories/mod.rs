//! DuckDB repository modules

pub mod sales;
