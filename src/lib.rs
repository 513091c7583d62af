pub mod cli;
pub mod client;
pub mod error;
pub mod invoke;
pub mod logger;
pub mod payload;
pub mod retry;
pub mod rpc;
#[cfg(test)]
pub mod tests;
