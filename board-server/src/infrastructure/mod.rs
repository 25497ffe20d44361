pub mod database;
pub(crate) mod jwt;
pub mod logging;
pub mod settings;
