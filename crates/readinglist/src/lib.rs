#![doc = include_str!("../README.md")]

mod config;
pub mod content;
pub mod date;
pub mod html;
pub mod render;
mod site;
pub mod storage;
pub mod template;

pub use config::*;
pub use site::*;
