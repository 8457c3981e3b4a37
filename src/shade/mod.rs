pub mod density;
pub mod sampler;
