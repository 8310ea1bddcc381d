pub mod backend;
pub mod bridge;
pub mod channel;
pub mod error;
pub mod events;
pub mod storage;
