pub mod cli;
pub mod views;
