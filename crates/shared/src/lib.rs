//! Map interaction engine for the Taiwan county map.
//!
//! Everything here is platform independent: the web frontend feeds pointer
//! input and frame timestamps in and renders what comes out.

pub mod animation;
pub mod assets;
pub mod camera;
pub mod config;
pub mod content;
pub mod error;
pub mod loading;
pub mod models;
pub mod projection;
pub mod render;
pub mod state;
pub mod topology;
