//! Self-rescheduling animation-frame loop that can be cancelled deterministically.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use log::warn;
use wasm_bindgen::prelude::*;

/// Source of frame callbacks.
pub trait FrameScheduler: 'static {
	/// Arranges for `tick` to run once on the next frame and returns a handle
	/// for [`FrameScheduler::cancel`], or `None` if no frame could be requested.
	fn request(&self, tick: &Rc<dyn Fn()>) -> Option<i32>;

	/// Withdraws a request that has not run yet.
	fn cancel(&self, handle: i32);
}

/// `window.requestAnimationFrame`, with one JS closure reused for every request.
#[derive(Default)]
pub struct AnimationFrames {
	callback: RefCell<Option<Closure<dyn FnMut()>>>,
}

impl FrameScheduler for AnimationFrames {
	fn request(&self, tick: &Rc<dyn Fn()>) -> Option<i32> {
		let window = web_sys::window()?;
		let mut callback = self.callback.borrow_mut();
		let cb = callback.get_or_insert_with(|| {
			let tick = tick.clone();
			Closure::new(move || tick())
		});
		window
			.request_animation_frame(cb.as_ref().unchecked_ref())
			.map_err(|err| warn!("request_animation_frame failed: {err:?}"))
			.ok()
	}

	fn cancel(&self, handle: i32) {
		if let Some(window) = web_sys::window() {
			let _ = window.cancel_animation_frame(handle);
		}
	}
}

struct Inner<S> {
	scheduler: S,
	tick: Rc<dyn Fn()>,
	step: RefCell<Option<Box<dyn FnMut() -> bool>>>,
	pending: Cell<Option<i32>>,
	stopped: Cell<bool>,
}

impl<S: FrameScheduler> Inner<S> {
	fn schedule(&self) {
		if self.stopped.get() || self.pending.get().is_some() {
			return;
		}
		if let Some(handle) = self.scheduler.request(&self.tick) {
			self.pending.set(Some(handle));
		}
	}

	fn run(&self) {
		self.pending.set(None);
		if self.stopped.get() {
			return;
		}
		let more = match self.step.try_borrow_mut() {
			Ok(mut step) => step.as_mut().is_some_and(|step| step()),
			Err(_) => false,
		};
		if more {
			self.schedule();
		}
	}
}

/// Runs `step` once per animation frame for as long as it returns `true`.
///
/// An idle loop costs nothing until [`FrameLoop::wake`]. After
/// [`FrameLoop::stop`] (or drop) no further step runs, even one already
/// requested.
pub struct FrameLoop<S: FrameScheduler = AnimationFrames> {
	inner: Rc<Inner<S>>,
}

impl FrameLoop {
	pub fn new(step: impl FnMut() -> bool + 'static) -> Self {
		Self::with_scheduler(AnimationFrames::default(), step)
	}
}

impl<S: FrameScheduler> FrameLoop<S> {
	pub fn with_scheduler(scheduler: S, step: impl FnMut() -> bool + 'static) -> Self {
		let inner = Rc::new_cyclic(|weak: &Weak<Inner<S>>| {
			let weak = weak.clone();
			Inner {
				scheduler,
				tick: Rc::new(move || {
					if let Some(inner) = weak.upgrade() {
						inner.run();
					}
				}),
				step: RefCell::new(Some(Box::new(step))),
				pending: Cell::new(None),
				stopped: Cell::new(false),
			}
		});
		Self { inner }
	}

	/// Requests a frame unless one is already pending.
	pub fn wake(&self) {
		self.inner.schedule();
	}

	/// Cancels any pending frame and releases the step. Idempotent.
	pub fn stop(&self) {
		if self.inner.stopped.replace(true) {
			return;
		}
		if let Some(handle) = self.inner.pending.take() {
			self.inner.scheduler.cancel(handle);
		}
		// a stop from inside the step leaves it to be dropped with the loop
		if let Ok(mut step) = self.inner.step.try_borrow_mut() {
			step.take();
		}
	}
}

impl<S: FrameScheduler> Drop for FrameLoop<S> {
	fn drop(&mut self) {
		self.stop();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	/// Frames that only run when the test flushes them.
	#[derive(Default)]
	struct ManualFrames {
		queue: RefCell<Vec<(i32, Rc<dyn Fn()>)>>,
		next: Cell<i32>,
	}

	impl ManualFrames {
		fn pending(&self) -> usize {
			self.queue.borrow().len()
		}

		/// Runs the frames requested so far; returns how many ran.
		fn flush(&self) -> usize {
			let due = std::mem::take(&mut *self.queue.borrow_mut());
			for (_, tick) in &due {
				tick();
			}
			due.len()
		}
	}

	impl FrameScheduler for Rc<ManualFrames> {
		fn request(&self, tick: &Rc<dyn Fn()>) -> Option<i32> {
			let handle = self.next.get() + 1;
			self.next.set(handle);
			self.queue.borrow_mut().push((handle, tick.clone()));
			Some(handle)
		}

		fn cancel(&self, handle: i32) {
			self.queue.borrow_mut().retain(|(h, _)| *h != handle);
		}
	}

	fn counting_loop(
		frames: &Rc<ManualFrames>,
		limit: usize,
	) -> (FrameLoop<Rc<ManualFrames>>, Rc<Cell<usize>>) {
		let count = Rc::new(Cell::new(0));
		let seen = count.clone();
		let frame_loop = FrameLoop::with_scheduler(frames.clone(), move || {
			seen.set(seen.get() + 1);
			seen.get() < limit
		});
		(frame_loop, count)
	}

	#[test]
	fn stop_cancels_a_requested_frame() {
		let frames = Rc::new(ManualFrames::default());
		let (frame_loop, count) = counting_loop(&frames, usize::MAX);
		frame_loop.wake();
		assert_eq!(frames.pending(), 1);

		frame_loop.stop();
		assert_eq!(frames.pending(), 0);
		frame_loop.wake();
		assert_eq!(frames.flush(), 0);
		assert_eq!(count.get(), 0);
	}

	#[test]
	fn dropping_the_loop_cancels_it() {
		let frames = Rc::new(ManualFrames::default());
		let (frame_loop, count) = counting_loop(&frames, usize::MAX);
		frame_loop.wake();
		drop(frame_loop);
		assert_eq!(frames.pending(), 0);
		frames.flush();
		assert_eq!(count.get(), 0);
	}

	#[test]
	fn a_frame_already_handed_out_does_not_step_after_stop() {
		let frames = Rc::new(ManualFrames::default());
		let (frame_loop, count) = counting_loop(&frames, usize::MAX);
		frame_loop.wake();
		let (_, tick) = frames.queue.borrow()[0].clone();
		frame_loop.stop();
		tick();
		assert_eq!(count.get(), 0);
	}

	#[test]
	fn reschedules_until_the_step_declines() {
		let frames = Rc::new(ManualFrames::default());
		let (frame_loop, count) = counting_loop(&frames, 3);
		frame_loop.wake();
		while frames.flush() > 0 {}
		assert_eq!(count.get(), 3);

		// idle until woken again
		assert_eq!(frames.pending(), 0);
		frame_loop.wake();
		assert_eq!(frames.flush(), 1);
		assert_eq!(count.get(), 4);
	}

	#[test]
	fn wakes_coalesce_into_one_frame() {
		let frames = Rc::new(ManualFrames::default());
		let (frame_loop, _count) = counting_loop(&frames, usize::MAX);
		frame_loop.wake();
		frame_loop.wake();
		assert_eq!(frames.pending(), 1);
	}

	#[test]
	fn rebuild_replaces_the_running_loop() {
		let frames = Rc::new(ManualFrames::default());
		let (old, old_count) = counting_loop(&frames, usize::MAX);
		old.wake();
		frames.flush();
		assert_eq!(old_count.get(), 1);

		old.stop();
		let (new, new_count) = counting_loop(&frames, usize::MAX);
		new.wake();
		frames.flush();
		assert_eq!((old_count.get(), new_count.get()), (1, 1));
		assert_eq!(frames.pending(), 1);
	}
}
