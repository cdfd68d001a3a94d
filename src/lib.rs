// Allow dead code for items that are part of the public API but only used in tests
#![allow(dead_code)]

pub mod bench;
pub mod runner;
pub mod writer;
