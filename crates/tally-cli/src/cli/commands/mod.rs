use super::args::*;

pub mod cache;
pub mod init;
pub mod providers;
pub mod run;

mod dispatch;
pub use dispatch::dispatch;
