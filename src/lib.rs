#![forbid(unsafe_code)]

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod draft;
pub mod formats;
pub mod frontmatter;
pub mod logging;
pub mod preview;
pub mod save;
pub mod store;
pub mod upload;
pub mod widget;
