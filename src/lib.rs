// src/lib.rs

//! Reddit top-posts digest library

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod utils;
