use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;
use zap_motion::{
    css_translate3d, translate, AnimationManifest, FrameSource, MotionBuffer, MotionError,
    Subscriber, Subscription,
};

use crate::raf::RafSource;

/// Errors raised while wiring a runner to the page.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("no document available")]
    NoDocument,
    #[error("no element matches selector {0:?}")]
    ElementNotFound(String),
    #[error("element {0:?} is not an HTML element")]
    NotHtmlElement(String),
    #[error(transparent)]
    Motion(#[from] MotionError),
}

/// Drives one DOM element from two scalar tracks of a manifest.
///
/// wasm-bindgen cannot export a struct holding `Rc` state, so the crate keeps
/// a single `thread_local!` runner and exposes free functions in `lib.rs`.
pub struct MotionRunner {
    _source: Rc<RafSource>,
    state: Rc<RunnerState>,
    guard: Subscription,
}

/// State touched from inside frame callbacks.
struct RunnerState {
    buffer: RefCell<MotionBuffer>,
    frames_seen: Cell<u32>,
    element: HtmlElement,
}

impl RunnerState {
    fn apply(&self, offset: Vec2) {
        self.buffer.borrow_mut().write_translate(offset.into());
        self.frames_seen.set(self.frames_seen.get() + 1);

        let css = css_translate3d(offset);
        if let Err(err) = self.element.style().set_property("transform", &css) {
            log::error!("failed to set transform: {:?}", err);
        }
    }
}

impl MotionRunner {
    /// Resolve the element, build the `x_track`/`y_track` pair and start it.
    pub fn start(
        selector: &str,
        manifest_json: &str,
        x_track: &str,
        y_track: &str,
    ) -> Result<Self, RunnerError> {
        let element = find_element(selector)?;
        let manifest = AnimationManifest::from_json(manifest_json)?;

        let source = Rc::new(RafSource::new());
        let frames: Rc<dyn FrameSource> = source.clone();
        let x = manifest.track(x_track, &frames)?;
        let y = manifest.track(y_track, &frames)?;
        let offsets = translate(&x, &y);

        let state = Rc::new(RunnerState {
            buffer: RefCell::new(MotionBuffer::new()),
            frames_seen: Cell::new(0),
            element,
        });
        state.buffer.borrow_mut().set_running(true);

        // Cancelling the guard cancels the run; it also caps runaway tracks.
        let guard = Subscription::new();
        let max_frames = manifest.config.max_frames;

        let on_value = Rc::clone(&state);
        let budget = guard.clone();
        let on_done = Rc::clone(&state);
        let subscriber = Subscriber::new(
            move |offset| {
                on_value.apply(offset);
                if on_value.frames_seen.get() >= max_frames {
                    log::warn!("frame budget of {} exhausted, stopping", max_frames);
                    budget.unsubscribe();
                }
            },
            move || {
                let mut buffer = on_done.buffer.borrow_mut();
                buffer.set_running(false);
                buffer.set_completed(true);
                log::info!("motion complete after {} frames", on_done.frames_seen.get());
            },
        );
        guard.add(offsets.subscribe_with(subscriber));

        let stop_state = Rc::clone(&state);
        guard.add_teardown(move || stop_state.buffer.borrow_mut().set_running(false));

        log::info!("motion started on {} ({} x {})", selector, x_track, y_track);
        Ok(Self {
            _source: source,
            state,
            guard,
        })
    }

    /// Cancel the run. The element keeps its last transform.
    pub fn stop(&self) {
        if !self.guard.is_closed() {
            self.guard.unsubscribe();
            log::info!("motion stopped after {} frames", self.frames_seen());
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.buffer.borrow().is_running()
    }

    pub fn frames_seen(&self) -> u32 {
        self.state.frames_seen.get()
    }

    // ---- Pointer accessors for JS reads ----

    pub fn translate_ptr(&self) -> *const f32 {
        self.state.buffer.borrow().as_ptr()
    }

    pub fn translate_floats(&self) -> u32 {
        self.state.buffer.borrow().len() as u32
    }
}

impl Drop for MotionRunner {
    fn drop(&mut self) {
        self.guard.unsubscribe();
    }
}

fn find_element(selector: &str) -> Result<HtmlElement, RunnerError> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or(RunnerError::NoDocument)?;
    let element = document
        .query_selector(selector)
        .ok()
        .flatten()
        .ok_or_else(|| RunnerError::ElementNotFound(selector.to_string()))?;
    element
        .dyn_into::<HtmlElement>()
        .map_err(|_| RunnerError::NotHtmlElement(selector.to_string()))
}
