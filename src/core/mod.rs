//! Core module - Result model and output rendering shared by all commands

pub mod model;
pub mod render;
