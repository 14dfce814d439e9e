pub mod config_io;
pub mod gateway;
pub mod mirror;
pub mod state;
pub mod storage;
pub mod transfer;
