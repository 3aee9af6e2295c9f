pub mod ai;
pub mod assess;
pub mod breathe;
pub mod config;
pub mod dashboard;
pub mod profile;

use rooted_core::{Config, SessionLog, SqliteStore};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

pub fn open_store() -> Result<SqliteStore, Box<dyn std::error::Error>> {
    Ok(SqliteStore::open()?)
}

pub fn load_config() -> Result<Config, Box<dyn std::error::Error>> {
    Ok(Config::load()?)
}

pub fn session_log<'a>(store: &'a SqliteStore, config: &Config) -> SessionLog<&'a SqliteStore> {
    SessionLog::new(store).with_limit(config.storage.session_log_limit)
}

pub fn runtime() -> Result<tokio::runtime::Runtime, Box<dyn std::error::Error>> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}

pub fn print_json<T: serde::Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
