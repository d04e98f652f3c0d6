//! Shared helpers for tradelog integration tests.

#![allow(dead_code)]

pub mod assertions;
pub mod fixtures;
