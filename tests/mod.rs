//! Test suite for MarketSync
//!
//! This module organizes all tests

#[macro_use]
pub mod common;
pub mod integration;
