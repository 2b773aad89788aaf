pub mod sampler;
pub mod trial;
