use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use zap_motion::{FrameCallback, FrameQueue, FrameRequest, FrameSource};

/// `FrameSource` backed by `window.requestAnimationFrame`.
///
/// Callbacks wait in a `FrameQueue`. One persistent JS closure is registered
/// with the browser while the queue has work and drains it each frame.
pub struct RafSource {
    shared: Rc<RafShared>,
    on_frame: Closure<dyn FnMut(f64)>,
}

struct RafShared {
    queue: FrameQueue,
    /// Browser handle of the outstanding rAF registration, if any.
    handle: Cell<Option<i32>>,
}

impl RafShared {
    /// Hand back the browser registration once no callback needs it.
    fn release_if_idle(&self) -> Option<i32> {
        if self.queue.is_empty() {
            self.handle.take()
        } else {
            None
        }
    }
}

impl RafSource {
    pub fn new() -> Self {
        let shared = Rc::new(RafShared {
            queue: FrameQueue::new(),
            handle: Cell::new(None),
        });
        let frame_shared = Rc::clone(&shared);
        let on_frame = Closure::<dyn FnMut(f64)>::new(move |timestamp: f64| {
            frame_shared.handle.set(None);
            frame_shared.queue.fire(timestamp);
        });
        Self { shared, on_frame }
    }

    fn ensure_registered(&self) {
        if self.shared.handle.get().is_some() {
            return;
        }
        let Some(window) = web_sys::window() else {
            log::error!("requestAnimationFrame unavailable: no window");
            return;
        };
        let callback: &js_sys::Function = self.on_frame.as_ref().unchecked_ref();
        match window.request_animation_frame(callback) {
            Ok(handle) => self.shared.handle.set(Some(handle)),
            Err(err) => log::error!("requestAnimationFrame failed: {:?}", err),
        }
    }

    /// Drop every pending callback and the browser registration.
    pub fn clear(&self) {
        self.shared.queue.clear();
        if let (Some(handle), Some(window)) = (self.shared.handle.take(), web_sys::window()) {
            let _ = window.cancel_animation_frame(handle);
        }
    }
}

impl Default for RafSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSource for RafSource {
    fn now(&self) -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0)
    }

    fn request_frame(&self, callback: FrameCallback) -> FrameRequest {
        let request = self.shared.queue.push(callback);
        self.ensure_registered();
        request
    }

    fn cancel_frame(&self, request: FrameRequest) {
        self.shared.queue.cancel(request);
        if let Some(handle) = self.shared.release_if_idle() {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(handle);
            }
        }
    }
}

impl Drop for RafSource {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shared_with_handle(handle: i32) -> RafShared {
        RafShared {
            queue: FrameQueue::new(),
            handle: Cell::new(Some(handle)),
        }
    }

    #[test]
    fn cancelling_the_last_callback_releases_the_registration() {
        let shared = shared_with_handle(7);
        let request = shared.queue.push(Box::new(|_| {}));

        assert_eq!(shared.release_if_idle(), None);
        shared.queue.cancel(request);
        assert_eq!(shared.release_if_idle(), Some(7));
        assert_eq!(shared.handle.get(), None);
    }

    #[test]
    fn registration_kept_while_other_callbacks_wait() {
        let shared = shared_with_handle(3);
        let first = shared.queue.push(Box::new(|_| {}));
        shared.queue.push(Box::new(|_| {}));

        shared.queue.cancel(first);
        assert_eq!(shared.release_if_idle(), None);
        assert_eq!(shared.handle.get(), Some(3));
    }
}
