//! Saved-map persistence: one JSON document per map name, plus optional
//! rendered HTML and share-URL sidecars.
//!
//! Single-user local state. No schema version, no file locking; the last
//! writer wins. Missing files are `Ok(None)`, malformed files are recoverable
//! errors, and nothing here ever touches in-memory session state.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use storymap_core::{GeocodedPlace, StorymapError};

pub struct MapStore {
    data_dir: PathBuf,
}

impl MapStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Save the full ordered place list under `<name>.json`, overwriting
    /// unconditionally.
    pub async fn save(&self, name: &str, places: &[GeocodedPlace]) -> Result<()> {
        self.ensure_dir().await?;
        let path = self.json_path(name);
        let json = serde_json::to_string_pretty(places)
            .context("failed to serialize place list")?;
        tokio::fs::write(&path, json)
            .await
            .map_err(|e| StorymapError::Storage(format!("write {}: {e}", path.display())))?;
        info!(map = name, places = places.len(), path = %path.display(), "Saved map");
        Ok(())
    }

    /// Load a saved map. `Ok(None)` when no such map exists.
    pub async fn load(&self, name: &str) -> Result<Option<Vec<GeocodedPlace>>> {
        let path = self.json_path(name);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(
                    StorymapError::Storage(format!("read {}: {e}", path.display())).into(),
                )
            }
        };
        let places: Vec<GeocodedPlace> = serde_json::from_str(&raw).map_err(|e| {
            StorymapError::Storage(format!("malformed map file {}: {e}", path.display()))
        })?;
        debug!(map = name, places = places.len(), "Loaded map");
        Ok(Some(places))
    }

    /// Names of all saved maps, sorted: the `.json` stems in the data dir.
    pub async fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut entries = match tokio::fs::read_dir(&self.data_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(names),
            Err(e) => return Err(StorymapError::Storage(e.to_string()).into()),
        };
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Write the rendered Leaflet artifact sidecar (`<name>.html`).
    pub async fn save_html(&self, name: &str, html: &str) -> Result<()> {
        self.write_sidecar(&format!("{}.html", stem(name)), html).await
    }

    /// Write the Google Maps artifact sidecar (`<name>_google.html`).
    pub async fn save_google_html(&self, name: &str, html: &str) -> Result<()> {
        self.write_sidecar(&format!("{}_google.html", stem(name)), html)
            .await
    }

    /// Write the shareable directions link sidecar (`<name>_url.txt`).
    pub async fn save_share_url(&self, name: &str, url: &str) -> Result<()> {
        self.write_sidecar(&format!("{}_url.txt", stem(name)), url).await
    }

    /// Read a previously written share link, if any.
    pub async fn load_share_url(&self, name: &str) -> Result<Option<String>> {
        let path = self.data_dir.join(format!("{}_url.txt", stem(name)));
        match tokio::fs::read_to_string(&path).await {
            Ok(url) => Ok(Some(url.trim().to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorymapError::Storage(e.to_string()).into()),
        }
    }

    async fn write_sidecar(&self, file_name: &str, content: &str) -> Result<()> {
        self.ensure_dir().await?;
        let path = self.data_dir.join(file_name);
        tokio::fs::write(&path, content)
            .await
            .map_err(|e| StorymapError::Storage(format!("write {}: {e}", path.display())))?;
        debug!(path = %path.display(), "Wrote sidecar");
        Ok(())
    }

    async fn ensure_dir(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.data_dir)
            .await
            .map_err(|e| {
                StorymapError::Storage(format!(
                    "create {}: {e}",
                    self.data_dir.display()
                ))
            })?;
        Ok(())
    }

    fn json_path(&self, name: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", stem(name)))
    }
}

/// Append `.json` lazily: names are stored without an extension, but a name
/// typed with one is accepted as-is.
fn stem(name: &str) -> &str {
    name.strip_suffix(".json").unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(name: &str, lat: f64, lng: f64) -> GeocodedPlace {
        serde_json::from_str(&format!(
            r#"{{"name": "{name}", "lat": {lat}, "lng": {lng}, "notes": "seen"}}"#
        ))
        .unwrap()
    }

    #[tokio::test]
    async fn save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = MapStore::new(dir.path());
        let places = vec![place("Paris", 48.85, 2.35), place("Rome", 41.9, 12.5)];

        store.save("trip", &places).await.unwrap();
        let loaded = store.load("trip").await.unwrap().unwrap();
        assert_eq!(loaded, places);
    }

    #[tokio::test]
    async fn json_suffix_in_the_name_is_not_doubled() {
        let dir = tempfile::tempdir().unwrap();
        let store = MapStore::new(dir.path());
        store.save("trip.json", &[]).await.unwrap();
        assert!(dir.path().join("trip.json").exists());
        assert_eq!(store.list().await.unwrap(), vec!["trip"]);
    }

    #[tokio::test]
    async fn missing_map_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = MapStore::new(dir.path());
        assert!(store.load("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn malformed_file_is_a_recoverable_error() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("bad.json"), "{not json")
            .await
            .unwrap();
        let store = MapStore::new(dir.path());
        let err = store.load("bad").await.unwrap_err();
        assert!(err.to_string().contains("malformed"));
    }

    #[tokio::test]
    async fn save_overwrites_unconditionally() {
        let dir = tempfile::tempdir().unwrap();
        let store = MapStore::new(dir.path());
        store.save("m", &[place("Paris", 1.0, 2.0)]).await.unwrap();
        store.save("m", &[place("Rome", 3.0, 4.0)]).await.unwrap();
        let loaded = store.load("m").await.unwrap().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "Rome");
    }

    #[tokio::test]
    async fn list_only_counts_json_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = MapStore::new(dir.path());
        store.save("b", &[]).await.unwrap();
        store.save("a", &[]).await.unwrap();
        store.save_html("a", "<html></html>").await.unwrap();
        store.save_share_url("a", "https://example.com").await.unwrap();
        assert_eq!(store.list().await.unwrap(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn share_url_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = MapStore::new(dir.path());
        store.save_share_url("m", "https://example.com/dir\n").await.unwrap();
        assert_eq!(
            store.load_share_url("m").await.unwrap().unwrap(),
            "https://example.com/dir"
        );
        assert!(store.load_share_url("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn listing_a_missing_directory_is_empty() {
        let store = MapStore::new("/definitely/not/a/real/storymap/dir");
        assert!(store.list().await.unwrap().is_empty());
    }
}
