use follower_graph::{App, init_logging};
use leptos::prelude::*;

// used through the library crate
use {
	console_error_panic_hook as _, console_log as _, csv as _, indexmap as _, leptos_meta as _,
	leptos_router as _, log as _, serde as _, serde_json as _, thiserror as _, wasm_bindgen as _,
	wasm_bindgen_futures as _, web_sys as _,
};

fn main() {
	init_logging();
	mount_to_body(|| view! { <App /> })
}
