#![doc = include_str!("../README.md")]

pub mod apk;
pub mod config;
pub mod devices;
pub mod error;
pub mod fleet;
pub mod monkey;
pub mod resolver;
pub mod result;
pub mod traits;
pub mod types;
pub mod utils;

pub(crate) mod adb;
pub(crate) mod am;
pub(crate) mod client;
pub(crate) mod heap_dump;
pub(crate) mod impls;
pub(crate) mod output_util;
pub(crate) mod pm;
pub(crate) mod prelude;
pub(crate) mod shell;
pub(crate) mod snapshot;

pub use output_util::generate_name;
