pub mod config;
pub mod logging;

pub mod checksum;
pub mod download;
pub mod fetcher;
pub mod manifest;
pub mod report;
pub mod source;
pub mod storage;
pub mod verify;
pub mod workflow;
