//! Boundary geometry loading: local GeoJSON files, remote URLs, or
//! already-parsed documents.

use crate::error::{ChartError, Result};
use anyhow::{Context, bail};
use geojson::{Feature, FeatureCollection, GeoJson};
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

/// Where a boundary layer comes from.
#[derive(Debug, Clone)]
pub enum GeoSource {
    /// Local `.geojson` / `.json` file.
    File(PathBuf),
    /// Remote URL returning a GeoJSON document.
    Url(String),
    /// In-memory document, passed through unchanged.
    GeoJson(GeoJson),
}

impl GeoSource {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        GeoSource::File(path.into())
    }

    pub fn url(url: impl Into<String>) -> Self {
        GeoSource::Url(url.into())
    }
}

/// Load a source into a feature collection.
///
/// Fails with `Load` on an unreadable file, an unsupported extension, an
/// unreachable URL, or a document that does not parse as GeoJSON. A bare
/// `Feature` or `Geometry` document is wrapped into a single-feature
/// collection.
pub fn load_geojson(source: &GeoSource) -> Result<FeatureCollection> {
    match source {
        GeoSource::GeoJson(doc) => Ok(to_feature_collection(doc.clone())),
        GeoSource::File(path) => {
            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_ascii_lowercase())
                .unwrap_or_default();
            if ext != "geojson" && ext != "json" {
                return Err(ChartError::load(format!(
                    "unsupported boundary file type: {:?} ({})",
                    ext,
                    path.display()
                )));
            }
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("read {}", path.display()))
                .map_err(|e| ChartError::load(format!("{e:#}")))?;
            parse_document(&text, &path.display().to_string())
        }
        GeoSource::Url(url) => {
            let text = fetch_text(url).map_err(|e| ChartError::load(format!("{e:#}")))?;
            parse_document(&text, url)
        }
    }
}

fn parse_document(text: &str, origin: &str) -> Result<FeatureCollection> {
    let doc: GeoJson = text
        .parse()
        .map_err(|e| ChartError::load(format!("parse geojson from {origin}: {e}")))?;
    Ok(to_feature_collection(doc))
}

fn to_feature_collection(doc: GeoJson) -> FeatureCollection {
    match doc {
        GeoJson::FeatureCollection(fc) => fc,
        GeoJson::Feature(feature) => FeatureCollection {
            bbox: None,
            features: vec![feature],
            foreign_members: None,
        },
        GeoJson::Geometry(geometry) => FeatureCollection {
            bbox: None,
            features: vec![Feature {
                bbox: None,
                geometry: Some(geometry),
                id: None,
                properties: None,
                foreign_members: None,
            }],
            foreign_members: None,
        },
    }
}

fn http_client() -> &'static HttpClient {
    static CLIENT: OnceLock<HttpClient> = OnceLock::new();
    CLIENT.get_or_init(|| {
        HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .redirect(Policy::limited(5))
            .user_agent(concat!("echarts_opts/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("reqwest client build")
    })
}

/// GET with a small retry for transient failures (5xx / network errors).
fn fetch_text(url: &str) -> anyhow::Result<String> {
    let mut last_err: Option<anyhow::Error> = None;
    for backoff_ms in [100u64, 300, 700] {
        match http_client().get(url).send() {
            Ok(r) if r.status().is_success() => {
                return r.text().with_context(|| format!("read body of {url}"));
            }
            Ok(r) if r.status().is_server_error() => { /* retry */ }
            Ok(r) => bail!("GET {} failed with HTTP {}", url, r.status()),
            Err(e) => last_err = Some(e.into()),
        }
        std::thread::sleep(Duration::from_millis(backoff_ms));
    }
    bail!("GET {} failed: {:?}", url, last_err)
}

/// File-extension gate used by [`load_geojson`]; exposed for callers that
/// want to pre-validate configured paths.
pub fn is_supported_extension(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref(),
        Some("geojson") | Some("json")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shapefiles_are_rejected() {
        let err = load_geojson(&GeoSource::file("counties.shp")).unwrap_err();
        match err {
            ChartError::Load(msg) => assert!(msg.contains("shp"), "{msg}"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn bare_geometry_documents_are_wrapped() {
        let doc: GeoJson = r#"{"type":"Point","coordinates":[-6.26,53.35]}"#.parse().unwrap();
        let fc = load_geojson(&GeoSource::GeoJson(doc)).unwrap();
        assert_eq!(fc.features.len(), 1);
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let err = load_geojson(&GeoSource::file("/no/such/file.geojson")).unwrap_err();
        assert!(matches!(err, ChartError::Load(_)));
    }
}
