/// Result alias for dataset loading.
pub type Result<T> = std::result::Result<T, LoadError>;

/// Reasons a dataset could not be turned into a graph.
///
/// Row-level CSV problems are not represented here; those rows are skipped.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
	/// The browser window is not available.
	#[error("no window available")]
	NoWindow,

	/// The request could not be made or the body could not be read.
	#[error("fetch of {url} failed: {message}")]
	Fetch {
		/// Requested resource.
		url: String,
		/// JS-side error description.
		message: String,
	},

	/// The server answered with a non-success status.
	#[error("fetch of {url} returned HTTP {status}")]
	Status {
		/// Requested resource.
		url: String,
		/// HTTP status code.
		status: u16,
	},

	/// The JSON payload did not match the user-map shape.
	#[error("malformed user map: {0}")]
	Json(#[from] serde_json::Error),

	/// The CSV payload could not be read at all (e.g. a broken header).
	#[error("malformed relationship table: {0}")]
	Csv(#[from] csv::Error),

	/// The CSV header does not name one of the required columns.
	#[error("relationship table header has no `{column}` column")]
	MissingColumn {
		/// Name of the absent column.
		column: &'static str,
	},
}
