pub mod cli;
pub mod config;
pub mod data;
pub mod encounter;
pub mod export;
pub mod filter;
pub mod normalize;
pub mod render;
pub mod server;
pub mod session;
