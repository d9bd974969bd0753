use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, Json},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use storymap_acquire::{clipboard, fetch_text, OcrEngine};
use storymap_core::{PlaceExtractor, Sentiment, TravelMode};
use storymap_extract::{merge_candidates, GeminiExtractor, PatternExtractor};
use storymap_maps::render::{google, leaflet};
use storymap_maps::share;
use storymap_maps::{ColorScheme, Directions, Geocoder, MapView};
use storymap_store::MapStore;

use crate::session::Session;
use crate::ui;

/// Shared application state for API handlers. The provider handles are
/// `None` when the corresponding credential is not configured; the routes
/// that need them degrade to warning payloads.
pub struct AppState {
    pub session: Mutex<Session>,
    pub store: MapStore,
    pub http: reqwest::Client,
    pub ocr: OcrEngine,
    pub gemini: Option<GeminiExtractor>,
    pub geocoder: Option<Geocoder>,
    pub directions: Option<Directions>,
    pub maps_api_key: Option<String>,
}

/// Build the Axum router with all API routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(ui::page))
        .route("/api/health", get(health))
        .route("/api/text", post(set_text))
        .route("/api/text/clipboard", post(text_from_clipboard))
        .route("/api/text/image", post(text_from_image))
        .route("/api/text/url", post(text_from_url))
        .route("/api/extract", post(run_extraction))
        .route("/api/places", get(get_places))
        .route("/api/places/{index}/annotate", post(annotate_place))
        .route("/api/map", get(leaflet_map))
        .route("/api/map/google", get(google_map))
        .route("/api/maps", get(list_maps))
        .route("/api/maps/save", post(save_map))
        .route("/api/maps/load", post(load_map))
        .route("/api/route", post(plan_route))
        .with_state(state)
}

fn warning(message: impl Into<String>) -> Json<Value> {
    let message = message.into();
    warn!(warning = %message, "Request degraded");
    Json(json!({ "warning": message }))
}

/// Health check endpoint.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "storymap",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[derive(Deserialize)]
struct TextRequest {
    text: String,
}

/// Set the working text directly.
async fn set_text(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TextRequest>,
) -> Json<Value> {
    let mut session = state.session.lock().await;
    session.set_text(req.text);
    info!(chars = session.input_text.len(), "Working text replaced");
    Json(json!({ "status": "ok", "chars": session.input_text.len() }))
}

/// Pull the working text from the system clipboard.
async fn text_from_clipboard(State(state): State<Arc<AppState>>) -> Json<Value> {
    // arboard talks to the display server synchronously.
    let read = tokio::task::spawn_blocking(clipboard::read_text).await;
    let text = match read {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => return warning(format!("clipboard read failed: {e}")),
        Err(e) => {
            error!(error = %e, "Clipboard task panicked");
            return warning("clipboard read failed");
        }
    };
    let mut session = state.session.lock().await;
    session.set_text(text);
    Json(json!({ "status": "ok", "chars": session.input_text.len() }))
}

/// OCR the image currently on the clipboard into working text.
async fn text_from_image(State(state): State<Arc<AppState>>) -> Json<Value> {
    let read = tokio::task::spawn_blocking(clipboard::read_image_png).await;
    let png = match read {
        Ok(Ok(png)) => png,
        Ok(Err(e)) => return warning(format!("clipboard image read failed: {e}")),
        Err(e) => {
            error!(error = %e, "Clipboard task panicked");
            return warning("clipboard image read failed");
        }
    };
    let text = match state.ocr.extract_text(&png).await {
        Ok(text) => text,
        Err(e) => return warning(format!("OCR failed: {e}")),
    };
    let mut session = state.session.lock().await;
    session.set_text(text);
    Json(json!({ "status": "ok", "chars": session.input_text.len() }))
}

#[derive(Deserialize)]
struct UrlRequest {
    url: String,
}

/// Scrape a web page into working text.
async fn text_from_url(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UrlRequest>,
) -> Json<Value> {
    let text = match fetch_text(&state.http, &req.url).await {
        Ok(text) => text,
        Err(e) => return warning(format!("fetch failed: {e}")),
    };
    let mut session = state.session.lock().await;
    session.set_text(text);
    info!(url = %req.url, chars = session.input_text.len(), "Scraped page into working text");
    Json(json!({ "status": "ok", "chars": session.input_text.len() }))
}

fn default_true() -> bool {
    true
}

#[derive(Deserialize)]
struct ExtractRequest {
    #[serde(default = "default_true")]
    use_ner: bool,
    #[serde(default = "default_true")]
    use_llm: bool,
}

/// Run the enabled extractors over the working text, merge their candidates,
/// and geocode the merged list.
async fn run_extraction(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ExtractRequest>,
) -> Json<Value> {
    let mut session = state.session.lock().await;
    if session.input_text.trim().is_empty() {
        return warning("no working text to extract from");
    }

    let mut warnings: Vec<String> = Vec::new();
    let text = session.input_text.clone();

    let ner = PatternExtractor;
    let pattern_candidates = if req.use_ner {
        match ner.extract(&text).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warnings.push(format!("pattern extraction failed: {e}"));
                Vec::new()
            }
        }
    } else {
        Vec::new()
    };

    let llm_candidates = match (&state.gemini, req.use_llm) {
        (Some(gemini), true) => match gemini.extract(&text).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warnings.push(format!("llm extraction failed: {e}"));
                Vec::new()
            }
        },
        (None, true) => {
            warnings.push("llm extraction disabled: GEMINI_API_KEY is not set".to_string());
            Vec::new()
        }
        _ => Vec::new(),
    };

    let merged = merge_candidates(&pattern_candidates, &llm_candidates);
    info!(
        pattern = pattern_candidates.len(),
        llm = llm_candidates.len(),
        merged = merged.len(),
        "Extraction complete"
    );

    let geocoded = match &state.geocoder {
        Some(geocoder) => {
            geocoder
                .geocode_all(&merged, |progress| {
                    debug!(progress, "Geocoding");
                })
                .await
        }
        None => {
            warnings.push("geocoding disabled: GOOGLE_MAPS_API_KEY is not set".to_string());
            Vec::new()
        }
    };

    session.set_places(merged, geocoded);
    Json(json!({
        "status": "ok",
        "places": session.places.len(),
        "geocoded": session.geocoded.len(),
        "warnings": warnings,
    }))
}

/// Current canonical and geocoded place lists, plus the active route.
async fn get_places(State(state): State<Arc<AppState>>) -> Json<Value> {
    let session = state.session.lock().await;
    Json(json!({
        "places": session.places,
        "geocoded": session.geocoded,
        "map_name": session.map_name,
        "selected": session.selected,
        "route": session.route,
    }))
}

#[derive(Deserialize)]
struct AnnotateRequest {
    notes: Option<String>,
    sentiment: Option<Sentiment>,
}

/// Mutate one geocoded place in the session.
async fn annotate_place(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
    Json(req): Json<AnnotateRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let mut session = state.session.lock().await;
    let count = session.geocoded.len();
    let Some(place) = session.geocoded.get_mut(index) else {
        return Err((
            StatusCode::NOT_FOUND,
            warning(format!("place index {index} out of range (have {count})")),
        ));
    };
    if let Some(notes) = req.notes {
        place.notes = if notes.trim().is_empty() {
            None
        } else {
            Some(notes)
        };
    }
    if let Some(sentiment) = req.sentiment {
        place.sentiment = sentiment;
    }
    Ok(Json(json!({ "status": "ok", "place": place })))
}

/// Leaflet HTML artifact for the current session.
async fn leaflet_map(State(state): State<Arc<AppState>>) -> Html<String> {
    let session = state.session.lock().await;
    let view = MapView::build(
        &session.geocoded,
        &session.selected,
        session.route.as_ref(),
        ColorScheme::Sentiment,
    );
    let title = session.map_name.as_deref().unwrap_or("storymap");
    Html(leaflet::render(&view, title))
}

/// Google Maps HTML artifact for the current session. Needs the maps key
/// because the page loads the JS API in the browser.
async fn google_map(
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, (StatusCode, Json<Value>)> {
    let Some(api_key) = state.maps_api_key.as_deref() else {
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            warning("Google map disabled: GOOGLE_MAPS_API_KEY is not set"),
        ));
    };
    let session = state.session.lock().await;
    let view = MapView::build(
        &session.geocoded,
        &session.selected,
        session.route.as_ref(),
        ColorScheme::Sentiment,
    );
    let title = session.map_name.as_deref().unwrap_or("storymap");
    Ok(Html(google::render(&view, title, api_key)))
}

/// List saved map names.
async fn list_maps(State(state): State<Arc<AppState>>) -> Result<Json<Value>, StatusCode> {
    match state.store.list().await {
        Ok(names) => Ok(Json(json!({ "maps": names }))),
        Err(e) => {
            error!(error = %e, "Failed to list saved maps");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

#[derive(Deserialize)]
struct NamedMapRequest {
    name: String,
}

/// Save the session's geocoded places plus the rendered sidecars.
async fn save_map(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NamedMapRequest>,
) -> Json<Value> {
    let name = req.name.trim();
    if name.is_empty() {
        return warning("map name must not be empty");
    }

    let mut session = state.session.lock().await;
    if session.geocoded.is_empty() {
        return warning("nothing to save: no geocoded places in the session");
    }
    if let Err(e) = state.store.save(name, &session.geocoded).await {
        error!(error = %e, map = name, "Failed to save map");
        return warning(format!("save failed: {e}"));
    }

    // Sidecars are best-effort: the JSON document is already on disk.
    let view = MapView::build(
        &session.geocoded,
        &session.selected,
        session.route.as_ref(),
        ColorScheme::Sentiment,
    );
    if let Err(e) = state.store.save_html(name, &leaflet::render(&view, name)).await {
        warn!(error = %e, map = name, "Failed to write Leaflet sidecar");
    }
    if let Some(api_key) = state.maps_api_key.as_deref() {
        let html = google::render(&view, name, api_key);
        if let Err(e) = state.store.save_google_html(name, &html).await {
            warn!(error = %e, map = name, "Failed to write Google sidecar");
        }
    }
    let share_url = share::directions_url(&session.geocoded);
    if let Some(url) = &share_url {
        if let Err(e) = state.store.save_share_url(name, url).await {
            warn!(error = %e, map = name, "Failed to write share URL sidecar");
        }
    }

    session.map_name = Some(name.to_string());
    Json(json!({
        "status": "saved",
        "name": name,
        "places": session.geocoded.len(),
        "share_url": share_url,
    }))
}

/// Load a saved map into the session.
async fn load_map(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NamedMapRequest>,
) -> Json<Value> {
    let geocoded = match state.store.load(&req.name).await {
        Ok(Some(geocoded)) => geocoded,
        Ok(None) => return warning(format!("no saved map named {:?}", req.name)),
        Err(e) => {
            error!(error = %e, map = %req.name, "Failed to load map");
            return warning(format!("load failed: {e}"));
        }
    };
    let mut session = state.session.lock().await;
    session.load_map(req.name.clone(), geocoded);
    info!(map = %req.name, places = session.geocoded.len(), "Loaded saved map");
    Json(json!({
        "status": "loaded",
        "name": req.name,
        "places": session.geocoded.len(),
    }))
}

#[derive(Deserialize)]
struct RouteRequest {
    /// Index into the session's geocoded list.
    origin: usize,
    destination: usize,
    #[serde(default)]
    waypoints: Vec<usize>,
    #[serde(default)]
    mode: TravelMode,
}

/// Compute a route between two geocoded places and keep it on the session.
async fn plan_route(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RouteRequest>,
) -> Json<Value> {
    let Some(directions) = &state.directions else {
        return warning("routing disabled: GOOGLE_MAPS_API_KEY is not set");
    };
    if req.origin == req.destination {
        return warning("origin and destination must differ");
    }

    let mut session = state.session.lock().await;
    let count = session.geocoded.len();
    let indices = [req.origin, req.destination]
        .into_iter()
        .chain(req.waypoints.iter().copied());
    for index in indices {
        if index >= count {
            return warning(format!("place index {index} out of range (have {count})"));
        }
    }

    let origin = session.geocoded[req.origin].clone();
    let destination = session.geocoded[req.destination].clone();
    let waypoints: Vec<_> = req
        .waypoints
        .iter()
        .map(|&i| session.geocoded[i].clone())
        .collect();

    let route = match directions.route(&origin, &destination, &waypoints, req.mode).await {
        Ok(Some(route)) => route,
        Ok(None) => return warning("no route found between the selected places"),
        Err(e) => return warning(format!("routing failed: {e}")),
    };

    info!(
        origin = %origin.name,
        destination = %destination.name,
        distance = %route.distance,
        duration = %route.duration,
        "Route computed"
    );
    session.selected = std::iter::once(origin.name.clone())
        .chain(waypoints.iter().map(|w| w.name.clone()))
        .chain(std::iter::once(destination.name.clone()))
        .collect();
    let summary = route_summary(&route);
    session.route = Some(route);
    Json(summary)
}

/// The `/api/route` response body: headline figures plus the full ordered
/// step-by-step directions.
fn route_summary(route: &storymap_core::Route) -> Value {
    json!({
        "status": "ok",
        "distance": route.distance,
        "duration": route.duration,
        "start_address": route.start_address,
        "end_address": route.end_address,
        "steps": route.steps,
    })
}
