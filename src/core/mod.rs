pub mod config;
pub mod discovery;
pub mod report;
pub mod selection;
pub mod subsampler;
