//! URL scraping: fetch a page and reduce it to readable plain text.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use tracing::{debug, warn};

const MAX_BODY_BYTES: usize = 1_000_000;
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";
const SSRF_BLOCKED_HOSTS: &[&str] =
    &["localhost", "127.0.0.1", "0.0.0.0", "::1", "169.254.169.254"];

/// Container elements whose entire content is dropped before tag stripping.
static ELIDED_BLOCK_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    ["script", "style", "head", "nav", "header", "footer"]
        .iter()
        .map(|tag| Regex::new(&format!(r"(?is)<{tag}\b.*?</{tag}\s*>")).unwrap())
        .collect()
});

/// Fetch a URL and return its visible text content.
///
/// Scheme-less input is normalized to `https://`. SSRF targets are refused.
pub async fn fetch_text(client: &Client, url: &str) -> Result<String> {
    let url = normalize_url(url);
    let parsed = url::Url::parse(&url).with_context(|| format!("invalid URL: {url}"))?;
    let host = parsed.host_str().unwrap_or("").to_lowercase();
    if SSRF_BLOCKED_HOSTS.iter().any(|b| host == *b) {
        bail!("refusing to fetch blocked host {host}");
    }

    debug!(url = %url, "Fetching page text");
    let resp = client
        .get(parsed)
        .header("User-Agent", USER_AGENT)
        .timeout(FETCH_TIMEOUT)
        .send()
        .await
        .context("page fetch failed")?;

    let status = resp.status();
    if !status.is_success() {
        bail!("page fetch returned {status}");
    }

    let bytes = resp.bytes().await.context("page body read failed")?;
    if bytes.len() > MAX_BODY_BYTES {
        warn!(bytes = bytes.len(), "Page body truncated");
    }
    let raw = String::from_utf8_lossy(&bytes[..bytes.len().min(MAX_BODY_BYTES)]).to_string();
    Ok(html_to_text(&raw))
}

/// Prefix `https://` when the input carries no scheme.
pub fn normalize_url(url: &str) -> String {
    let trimmed = url.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

/// Reduce an HTML document to readable plain text: drop chrome containers,
/// strip remaining tags, decode common entities, collapse whitespace per line.
pub fn html_to_text(html: &str) -> String {
    let mut without_blocks = html.to_string();
    for re in ELIDED_BLOCK_RES.iter() {
        without_blocks = re.replace_all(&without_blocks, " ").into_owned();
    }

    let mut out = String::with_capacity(without_blocks.len() / 2);
    let mut in_tag = false;
    for ch in without_blocks.chars() {
        match ch {
            '<' => {
                in_tag = true;
                // Tag boundaries separate words; block tags get a line break
                // from the per-line collapse below either way.
                out.push('\n');
            }
            '>' => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }

    let decoded = decode_entities(&out);
    decoded
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}
