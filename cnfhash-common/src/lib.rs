//! Internal modules for cnfhash

pub mod config;
#[macro_use]
pub mod macros;
pub mod output;
pub mod error;
pub mod input;
pub mod line;
pub mod token;
pub mod parser;
pub mod hasher;
pub mod pipeline;

#[doc(hidden)]
pub use ansi_term;

pub use crate::{
    config::Config,
    error::{Error, Result},
    pipeline::{hash_dimacs, hash_file},
};
