pub mod sampler;

pub use sampler::{auto_zero, sampler_task};
