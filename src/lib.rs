pub mod client;
pub mod config;
pub mod handlers;
pub mod i18n;
pub mod proxy;
pub mod server;
pub mod session;
