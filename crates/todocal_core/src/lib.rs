pub mod calendar;
pub mod codec;
pub mod config;
pub mod error;
pub mod filter;
pub mod model;
pub mod notify;
pub mod storage;
pub mod store;
