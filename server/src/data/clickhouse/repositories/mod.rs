//! ClickHouse repository modules

pub mod sales;
