use leptos::prelude::*;
use leptos_router::hooks::use_query_map;
use log::error;

use crate::components::force_graph::ForceGraphCanvas;
use crate::config::AppConfig;
use crate::dataset::fetch::load_graph;

/// Default Home Page: loads the dataset named by the query string and draws it.
#[component]
pub fn Home() -> impl IntoView {
	let query = use_query_map();
	let config = Memo::new(move |_| query.with(AppConfig::from_query));

	// errors are terminal for the session, so only their text is kept
	let dataset = LocalResource::new(move || {
		let url = config.with(|c| c.data_url.clone());
		async move {
			load_graph(&url).await.map_err(|err| {
				error!("{err}");
				err.to_string()
			})
		}
	});

	view! {
		<div class="fullscreen-graph">
			<Suspense fallback=|| {
				view! { <div class="loading">"Loading network data..."</div> }
			}>
				{move || {
					dataset
						.get()
						.map(|loaded| match loaded {
							Ok(graph) => {
								let anchor_root = config.with(|c| c.anchor_root);
								view! {
									<ForceGraphCanvas
										data=Signal::derive(move || graph.clone())
										fullscreen=true
										anchor_root=anchor_root
									/>
								}
									.into_any()
							}
							Err(message) => {
								view! {
									<div class="error">
										<h2>"Failed to load network data"</h2>
										<p>{message}</p>
									</div>
								}
									.into_any()
							}
						})
				}}
			</Suspense>
			<div class="graph-overlay">
				<h1>"Follower Network"</h1>
				<p class="subtitle">
					"Drag accounts to reposition. Scroll to zoom. Drag background to pan."
				</p>
			</div>
		</div>
	}
}
