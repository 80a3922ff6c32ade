use rocket::http::Status;
use rocket::response::content::RawHtml;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use rocket::{Shutdown, get, routes};
use rocket_cors::CorsOptions;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::logger::{error, info};
use crate::semantic_search::{SemanticHit, SemanticSearchClient};
use crate::{API_PORT, get_app_data};
use crate::db::bible_models::ReadingList;

pub const DEFAULT_VERSION_ABBREV: &str = "ARA";

/// One resolved verse on the wire; `text` is null when the verse does not
/// exist in the requested version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerseText {
    pub version_abbrev: String,
    pub book_abbrev: String,
    pub chapter: i32,
    pub verse: i32,
    pub text: Option<String>,
}

type ApiError = Custom<Json<Value>>;

fn bad_request(message: String) -> ApiError {
    Custom(Status::BadRequest, Json(json!({ "error": message })))
}

fn server_error(message: &str) -> ApiError {
    Custom(Status::InternalServerError, Json(json!({ "error": message })))
}

#[get("/hello")]
fn hello() -> Json<Value> {
    Json(json!({ "info": "Biblia self-hosted API is running" }))
}

/// Reference lookup: parse `q` into atomic references, attach the version
/// and read each verse text from the store. Parse errors are client
/// errors; store faults are server errors that still identify the verse
/// being read, without leaking internals.
#[get("/biblia/verse?<q>&<versao>")]
fn bible_verse_search(q: &str, versao: Option<&str>) -> Result<Json<Vec<VerseText>>, ApiError> {
    let app_data = get_app_data();
    let version = versao.unwrap_or(DEFAULT_VERSION_ABBREV);

    let refs = app_data
        .parser
        .parse(q)
        .map_err(|e| bad_request(e.to_string()))?;

    let mut results = Vec::with_capacity(refs.len());
    for r in refs.into_iter().map(|r| r.with_version(version)) {
        let text = match app_data
            .dbm
            .bible
            .get_verse_text(version, &r.book_abbrev, r.chapter, r.verse)
        {
            Ok(text) => text,
            Err(e) => {
                error(&format!(
                    "Verse lookup failed for {} {}:{}: {}",
                    r.book_abbrev, r.chapter, r.verse, e
                ));
                return Err(Custom(
                    Status::InternalServerError,
                    Json(json!({
                        "error": "Could not read the verse store",
                        "book_abbrev": r.book_abbrev,
                        "chapter": r.chapter,
                        "verse": r.verse,
                    })),
                ));
            }
        };

        results.push(VerseText {
            version_abbrev: version.to_string(),
            book_abbrev: r.book_abbrev,
            chapter: r.chapter,
            verse: r.verse,
            text,
        });
    }

    Ok(Json(results))
}

#[get("/reading-lists?<q>")]
fn reading_lists(q: Option<&str>) -> Result<Json<Vec<ReadingList>>, ApiError> {
    let app_data = get_app_data();

    app_data.dbm.bible.search_reading_lists(q).map(Json).map_err(|e| {
        error(&format!("Reading list query failed: {}", e));
        server_error("Could not read the reading lists")
    })
}

/// Delegates to the semantic-search collaborators. The blocking HTTP
/// client must not run on the async executor.
#[get("/search/semantic?<q>&<limit>&<versao>&<livro>")]
async fn semantic_search(
    q: String,
    limit: Option<usize>,
    versao: Option<String>,
    livro: Option<String>,
) -> Result<Json<Vec<SemanticHit>>, ApiError> {
    let limit = limit.unwrap_or(5).min(50);

    let result = rocket::tokio::task::spawn_blocking(move || {
        let client = SemanticSearchClient::from_env()?;
        client.search(&q, limit, versao.as_deref(), livro.as_deref())
    })
    .await;

    match result {
        Ok(Ok(hits)) => Ok(Json(hits)),
        Ok(Err(e)) => {
            error(&format!("Semantic search failed: {}", e));
            Err(Custom(
                Status::BadGateway,
                Json(json!({ "error": "Semantic search collaborator is unavailable" })),
            ))
        }
        Err(e) => {
            error(&format!("Semantic search task failed: {}", e));
            Err(server_error("Semantic search failed"))
        }
    }
}

#[get("/")]
fn index() -> RawHtml<String> {
    let html = String::from(
        "<h1>Biblia Self-Hosted</h1>\n\
         <p>Reference lookup: <code>/api/v1/biblia/verse?q=Jo 3:16&versao=ARA</code></p>\n\
         <p>Liveness check: <code>/api/v1/hello</code></p>",
    );
    RawHtml(html)
}

#[get("/shutdown")]
fn shutdown(shutdown: Shutdown) -> &'static str {
    shutdown.notify();
    info("Webserver shutting down...");
    "Shutting down..."
}

#[rocket::main]
pub async fn start_webserver() -> Result<(), rocket::Error> {
    let cors = CorsOptions::default().to_cors().expect("Cors options error");

    let config = rocket::Config::figment()
        .merge(("address", "127.0.0.1"))
        .merge(("port", API_PORT));

    info(&format!("Starting webserver on port {}", API_PORT));

    let _rocket = rocket::build()
        .configure(config)
        .attach(cors)
        .mount("/", routes![index, shutdown])
        .mount(
            "/api/v1",
            routes![hello, bible_verse_search, reading_lists, semantic_search],
        )
        .launch()
        .await?;

    Ok(())
}
