//! Stateful kernels shared by the streaming indicators.
//!
//! # Kernels
//!
//! - [`circular_buffer`]: fixed-capacity ring holding the current window

pub mod circular_buffer;

pub use circular_buffer::CircularBuffer;
