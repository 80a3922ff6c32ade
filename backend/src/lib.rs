pub mod types;
pub mod helpers;
pub mod logger;
pub mod book_index;
pub mod reference_parser;
pub mod semantic_search;
pub mod api;

pub mod db;

use std::env;
use std::fs::create_dir_all;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use anyhow::Result;
use app_dirs::{AppDataType, AppInfo, get_app_root};

use crate::book_index::BookNameResolver;
use crate::db::DbManager;
use crate::reference_parser::ReferenceParser;

pub static API_PORT: i32 = 4841;
pub static API_URL: &'static str = "http://localhost:4841";

pub const APP_INFO: AppInfo = AppInfo { name: "biblia-self-hosted", author: "biblia" };

/// Returns the application data directory, creating it if necessary.
/// The BIBLIA_DIR environment variable overrides the per-user default.
pub fn get_create_biblia_dir() -> Result<PathBuf> {
    let p = match env::var("BIBLIA_DIR") {
        Ok(s) if !s.is_empty() => PathBuf::from(s),
        _ => get_app_root(AppDataType::UserData, &APP_INFO)?,
    };
    if !p.exists() {
        create_dir_all(&p)?;
    }
    Ok(p)
}

pub fn get_biblia_db_path() -> Result<PathBuf> {
    Ok(get_create_biblia_dir()?.join("biblia.sqlite3"))
}

pub fn biblia_db_exists() -> bool {
    match get_biblia_db_path() {
        Ok(p) => p.exists(),
        Err(_) => false,
    }
}

/// Process-wide application state: the database manager, the book-name
/// resolver (fed by the books table) and the reference parser built on it.
pub struct AppData {
    pub dbm: DbManager,
    pub resolver: Arc<BookNameResolver>,
    pub parser: ReferenceParser,
    pub api_url: String,
}

impl AppData {
    pub fn new() -> Result<Self> {
        let dbm = DbManager::new()?;
        let resolver = Arc::new(BookNameResolver::new(dbm.bible.clone()));
        let parser = ReferenceParser::new(resolver.clone());

        Ok(AppData {
            dbm,
            resolver,
            parser,
            api_url: API_URL.to_string(),
        })
    }
}

static APP_DATA: OnceLock<AppData> = OnceLock::new();

pub fn init_app_data() -> Result<()> {
    if APP_DATA.get().is_some() {
        return Ok(());
    }
    let app_data = AppData::new()?;
    let _ = APP_DATA.set(app_data);
    Ok(())
}

pub fn get_app_data() -> &'static AppData {
    APP_DATA.get().expect("init_app_data() must be called first")
}
