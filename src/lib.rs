// src/lib.rs

pub mod blockchain;
pub mod cli;
pub mod core;
pub mod session;
pub mod ui;
