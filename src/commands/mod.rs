pub mod gather;
pub mod sample_config;
