#![cfg_attr(not(test), no_std)]

#[cfg(target_os = "none")]
pub mod board;
pub mod config;
pub mod drivers;
pub mod sample;
pub mod sampler;
pub mod stats;
#[cfg(target_os = "none")]
pub mod tasks;

#[cfg(target_os = "none")]
pub use board::Board;
pub use sample::Sample;
pub use sampler::Sampler;
