//! CLI Commands

pub mod canon;
pub mod diff;
pub mod init;
pub mod run;
