//! Unit tests for qsm
//!
//! These tests drive the services through the real executor with a scripted
//! process runner and run fast without spawning anything.

mod executor;
mod lifecycle_flows;
mod property_tests;
