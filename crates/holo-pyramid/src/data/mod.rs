// src/data/mod.rs
//! Data handling modules for the pyramid viewer.
//!
//! This module provides functionality for:
//! - Loading OBJ models (with a torus fallback) and preparing them for the GPU.
//! - Defining the data structures for GPU buffers.

pub mod model;
pub mod types;

// Re-export commonly used types for convenience.
pub use self::types::{GpuLight, LightingUniformStd140, ModelGpu, ViewUniformStd140, MAX_LIGHTS};
