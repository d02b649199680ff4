// src/lib.rs
//! Pyramid hologram viewer library.
//!
//! Renders a model from four cameras into four off-screen views and lays the
//! views out in a cross, ready for a pyramid prism placed on the screen.

pub mod app;
pub mod catalog;
pub mod config;
pub mod data;
pub mod input;
pub mod renderer;
pub mod rig;
pub mod scene;
pub mod ui;
