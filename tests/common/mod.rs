#![allow(dead_code)]

pub mod fake_store;
pub mod utils;
