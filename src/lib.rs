pub mod assets;
pub mod audio;
pub mod compute;
pub mod config;
pub mod constants;
pub mod entities;
pub mod error;
pub mod ledger;
pub mod menu;
pub mod render;
pub mod session;
