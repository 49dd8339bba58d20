#![forbid(unsafe_code)]

pub mod client;
pub mod gateway;
pub mod objects;
pub mod signature;
