//! CLI subcommand implementations.

pub mod edit;
pub mod export;
pub mod init;
pub mod next;
pub mod remove;
pub mod rename;
pub mod show;
pub mod split;
pub mod start;
pub mod stop;
pub mod upload;
pub mod util;
pub mod watch;
