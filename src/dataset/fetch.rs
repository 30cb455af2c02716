//! Fetches the static dataset document through the browser.

use log::{debug, info};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

use super::error::{LoadError, Result};
use super::model::CanonicalGraph;
use super::normalize::{self, DatasetFormat};

fn fetch_error(url: &str, err: impl std::fmt::Debug) -> LoadError {
	LoadError::Fetch {
		url: url.to_string(),
		message: format!("{err:?}"),
	}
}

/// GETs `url` and returns the response body as text.
pub async fn fetch_text(url: &str) -> Result<String> {
	let opts = RequestInit::new();
	opts.set_method("GET");
	let request = Request::new_with_str_and_init(url, &opts).map_err(|e| fetch_error(url, e))?;

	let window = web_sys::window().ok_or(LoadError::NoWindow)?;
	let resp: Response = JsFuture::from(window.fetch_with_request(&request))
		.await
		.map_err(|e| fetch_error(url, e))?
		.dyn_into()
		.map_err(|e| fetch_error(url, e))?;
	debug!("{url}: HTTP {}", resp.status());

	if !resp.ok() {
		return Err(LoadError::Status {
			url: url.to_string(),
			status: resp.status(),
		});
	}

	let text = JsFuture::from(resp.text().map_err(|e| fetch_error(url, e))?)
		.await
		.map_err(|e| fetch_error(url, e))?
		.as_string()
		.ok_or_else(|| fetch_error(url, "response body is not text"))?;
	Ok(text)
}

/// Fetches and normalizes the dataset at `url`.
pub async fn load_graph(url: &str) -> Result<CanonicalGraph> {
	info!("loading dataset from {url}");
	let text = fetch_text(url).await?;
	let format = DatasetFormat::detect(url, &text);
	let (graph, report) = normalize::normalize(format, &text)?;
	info!(
		"loaded {} bytes as {format:?}: {} nodes, {} links ({} rows skipped, {} placeholders)",
		text.len(),
		graph.nodes.len(),
		graph.links.len(),
		report.skipped_rows,
		report.placeholders
	);
	Ok(graph)
}
