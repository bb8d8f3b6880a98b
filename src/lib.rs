pub mod advisor;
pub mod config;
pub mod output;
pub mod scoring;
pub mod sensors;
pub mod watch;
