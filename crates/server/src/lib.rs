pub mod cli;
pub mod http;
pub mod session;
pub mod state;
pub mod stdio;
