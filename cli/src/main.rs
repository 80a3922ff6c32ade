mod import_bible;

use std::env;
use std::path::PathBuf;
use std::process::exit;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;

use biblia_backend::book_index::BookNameResolver;
use biblia_backend::reference_parser::ReferenceParser;
use biblia_backend::{api, get_app_data, init_app_data, logger};

#[derive(Parser, Debug)]
#[command(author, version, about = "Biblia self-hosted CLI", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Optional path to the data directory holding biblia.sqlite3.
    /// If not provided, the BIBLIA_DIR environment variable will be used.
    #[arg(long, global = true, value_name = "DIRECTORY_PATH", env = "BIBLIA_DIR")]
    biblia_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve,

    /// Import a Bible JSON file ([{abbrev, chapters: [[verse text]]}])
    /// as a new version
    #[command(arg_required_else_help = true)]
    ImportJson {
        /// Path to the JSON file
        #[arg(value_name = "FILE_PATH")]
        path: PathBuf,

        /// Version abbreviation, e.g. "ARA"
        #[arg(long, default_value = "ARA")]
        version_abbrev: String,

        /// Full version name
        #[arg(long, default_value = "Almeida Revista e Atualizada")]
        version_name: String,

        /// Import the version as inactive
        #[arg(long, default_value_t = false)]
        inactive: bool,
    },

    /// Parse a reference string and print the verse lookups it denotes
    #[command(arg_required_else_help = true)]
    Parse {
        /// Reference string, e.g. "João 3:16-18; 1Pe 2:22"
        reference: String,
    },

    /// Parse a reference string and print verse texts from the local store
    #[command(arg_required_else_help = true)]
    Verse {
        /// Reference string, e.g. "João 3:16-18; 1Pe 2:22"
        reference: String,

        /// Version abbreviation to read from
        #[arg(long, default_value = "ARA")]
        versao: String,
    },
}

fn main() {
    if dotenv().is_err() {
        println!("Info: No .env file found or failed to load.");
    }
    logger::init();

    let cli = Cli::parse();

    if let Some(dir) = &cli.biblia_dir {
        // Safety: set before any threads are spawned; the backend reads
        // BIBLIA_DIR when resolving the database path.
        unsafe {
            env::set_var("BIBLIA_DIR", dir);
        }
    }

    let res = match cli.command {
        Commands::Serve => cmd_serve(),
        Commands::ImportJson { path, version_abbrev, version_name, inactive } => {
            import_bible::import_bible_json(&path, &version_abbrev, &version_name, !inactive)
        }
        Commands::Parse { reference } => cmd_parse(&reference),
        Commands::Verse { reference, versao } => cmd_verse(&reference, &versao),
    };

    if let Err(e) = res {
        eprintln!("Error: {:#}", e);
        exit(1);
    }
}

fn cmd_serve() -> Result<()> {
    init_app_data()?;
    api::start_webserver()?;
    Ok(())
}

fn cmd_parse(reference: &str) -> Result<()> {
    let resolver = Arc::new(BookNameResolver::fallback_only());
    let parser = ReferenceParser::new(resolver);

    let refs = parser.parse(reference)?;
    for r in &refs {
        println!("{}", r);
    }
    println!("{} verse reference(s)", refs.len());
    Ok(())
}

fn cmd_verse(reference: &str, versao: &str) -> Result<()> {
    init_app_data()?;
    let app_data = get_app_data();

    let refs = app_data.parser.parse(reference)?;
    for r in refs {
        let text = app_data
            .dbm
            .bible
            .get_verse_text(versao, &r.book_abbrev, r.chapter, r.verse)?;
        match text {
            Some(t) => println!("{} {}:{} ({})  {}", r.book_abbrev, r.chapter, r.verse, versao, t),
            None => println!("{} {}:{} ({})  [not found]", r.book_abbrev, r.chapter, r.verse, versao),
        }
    }
    Ok(())
}
