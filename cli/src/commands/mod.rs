pub mod check;
pub mod config;
pub mod filter;
pub mod select;
