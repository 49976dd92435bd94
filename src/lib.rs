//! Budgety
//!
//! This crate provides an in-memory budget ledger that tracks income and
//! expense entries, the net budget and each expense's share of income.

pub mod config;
pub mod core;
pub mod display;
pub mod input;
pub mod logging;
pub mod session;
