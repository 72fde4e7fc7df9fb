pub mod app;
pub mod bundle;
pub mod config;
pub mod error;
pub mod install;
pub mod launcher;
pub mod layout;
pub mod spawn;
