use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::frame_loop::FrameLoop;
use super::render;
use super::simulation::ForceConfig;
use super::state::{ForceGraphState, LayoutOptions, PointerAction};
use super::transform::ZoomConfig;
use crate::dataset::CanonicalGraph;

type Shared<T> = Rc<RefCell<Option<T>>>;

fn window_size(window: &Window) -> (f64, f64) {
	let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
	(dim(window.inner_width()), dim(window.inner_height()))
}

fn local_point(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

fn set_cursor(canvas: &HtmlCanvasElement, cursor: &str) {
	let _ = web_sys::HtmlElement::style(canvas).set_property("cursor", cursor);
}

/// Interactive force-directed view of one canonical graph.
///
/// A new graph on `data` tears the running layout down and rebuilds it from
/// scratch. Unmounting stops the frame loop before the canvas goes away.
#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] data: Signal<CanonicalGraph>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	/// Pin the dataset's root account at the center.
	#[prop(default = true)]
	anchor_root: bool,
	#[prop(optional)] forces: Option<ForceConfig>,
	#[prop(optional)] zoom: Option<ZoomConfig>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Shared<ForceGraphState> = Rc::new(RefCell::new(None));
	let frame_loop: Shared<FrameLoop> = Rc::new(RefCell::new(None));
	let resize_cb: Shared<Closure<dyn FnMut()>> = Rc::new(RefCell::new(None));
	let (state_init, loop_init, resize_cb_init) =
		(state.clone(), frame_loop.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		// full rebuild: the previous loop must be dead before the new state exists
		if let Some(prev) = loop_init.borrow_mut().take() {
			prev.stop();
		}
		if let Some(ref mut s) = *state_init.borrow_mut() {
			s.stop();
		}

		let (w, h) = if fullscreen {
			window_size(&window)
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => return,
			},
			_ => {
				warn!("canvas has no 2d context");
				return;
			}
		};

		let options = LayoutOptions {
			anchor_root,
			forces: forces.clone().unwrap_or_default(),
			zoom: zoom.clone().unwrap_or_default(),
		};
		let mut graph_state = data.with(|graph| ForceGraphState::new(graph, w, h, options));
		graph_state.start();
		*state_init.borrow_mut() = Some(graph_state);

		let state_step = state_init.clone();
		let next_loop = FrameLoop::new(move || {
			let mut guard = state_step.borrow_mut();
			let Some(s) = guard.as_mut() else {
				return false;
			};
			let more = s.step();
			render::render(&s.frame(), &ctx);
			more || s.is_active()
		});
		next_loop.wake();
		*loop_init.borrow_mut() = Some(next_loop);

		if fullscreen && resize_cb_init.borrow().is_none() {
			let (state_resize, loop_resize, canvas_resize) =
				(state_init.clone(), loop_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some(win) = web_sys::window() else {
					return;
				};
				let (nw, nh) = window_size(&win);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
				if let Some(ref l) = *loop_resize.borrow() {
					l.wake();
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}
	});

	let teardown = StoredValue::new_local((state.clone(), frame_loop.clone(), resize_cb.clone()));
	on_cleanup(move || {
		teardown.try_with_value(|(state, frame_loop, resize_cb)| {
			if let Some(l) = frame_loop.borrow_mut().take() {
				l.stop();
			}
			if let Some(ref mut s) = *state.borrow_mut() {
				s.stop();
			}
			if let (Some(cb), Some(window)) = (resize_cb.borrow_mut().take(), web_sys::window()) {
				let _ = window
					.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
			info!("force graph unmounted");
		});
	});

	// Runs `f` against the live state, then wakes the loop so the change is drawn.
	let interact = {
		let (state, frame_loop) = (state.clone(), frame_loop.clone());
		move |f: &mut dyn FnMut(&mut ForceGraphState)| {
			if let Some(ref mut s) = *state.borrow_mut() {
				f(s);
			}
			if let Some(ref l) = *frame_loop.borrow() {
				l.wake();
			}
		}
	};

	let interact_md = interact.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let (x, y) = local_point(&canvas, &ev);
		interact_md(&mut |s| match s.pointer_down(x, y) {
			PointerAction::Drag(_) | PointerAction::Pan => set_cursor(&canvas, "grabbing"),
			PointerAction::Ignored => {}
		});
	};

	let interact_mm = interact.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let (x, y) = local_point(&canvas, &ev);
		interact_mm(&mut |s| s.pointer_move(x, y));
	};

	let interact_mu = interact.clone();
	let on_mouseup = move |_: MouseEvent| {
		interact_mu(&mut |s| s.pointer_up());
		if let Some(canvas) = canvas_ref.get_untracked() {
			set_cursor(&canvas, "grab");
		}
	};

	let interact_ml = interact.clone();
	let on_mouseleave = move |_: MouseEvent| {
		interact_ml(&mut |s| s.pointer_leave());
		if let Some(canvas) = canvas_ref.get_untracked() {
			set_cursor(&canvas, "grab");
		}
	};

	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let (x, y) = local_point(&canvas, &ev);
		// line and page deltas arrive in much larger units than pixels
		let delta = match ev.delta_mode() {
			WheelEvent::DOM_DELTA_LINE => ev.delta_y() * 25.0,
			WheelEvent::DOM_DELTA_PAGE => ev.delta_y() * 500.0,
			_ => ev.delta_y(),
		};
		interact(&mut |s| s.wheel(x, y, delta));
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
