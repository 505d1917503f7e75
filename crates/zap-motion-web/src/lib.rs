//! WASM bridge for zap-motion.
//!
//! Exports free functions around one `thread_local!` `MotionRunner`:
//!
//! ```text
//! motion_init("#box", manifestJson, "x", "y");
//! const ptr = get_translate_ptr();           // Float32Array view into memory
//! const floats = get_translate_floats();
//! motion_stop();
//! ```

pub mod raf;
pub mod runner;

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

pub use raf::RafSource;
pub use runner::{MotionRunner, RunnerError};

thread_local! {
    static RUNNER: RefCell<Option<MotionRunner>> = RefCell::new(None);
}

fn with_runner<R>(f: impl FnOnce(&MotionRunner) -> R) -> Option<R> {
    RUNNER.with(|cell| cell.borrow().as_ref().map(f))
}

/// Start moving the element matched by `selector`. Any previous run is
/// stopped first. Returns false (and logs why) if nothing could be started.
#[wasm_bindgen]
pub fn motion_init(selector: &str, manifest_json: &str, x_track: &str, y_track: &str) -> bool {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let previous = RUNNER.with(|cell| cell.borrow_mut().take());
    drop(previous);

    match MotionRunner::start(selector, manifest_json, x_track, y_track) {
        Ok(runner) => {
            RUNNER.with(|cell| *cell.borrow_mut() = Some(runner));
            true
        }
        Err(err) => {
            log::error!("motion_init failed: {}", err);
            false
        }
    }
}

#[wasm_bindgen]
pub fn motion_stop() {
    with_runner(|r| r.stop());
}

#[wasm_bindgen]
pub fn motion_is_running() -> bool {
    with_runner(|r| r.is_running()).unwrap_or(false)
}

#[wasm_bindgen]
pub fn get_frames_seen() -> u32 {
    with_runner(|r| r.frames_seen()).unwrap_or(0)
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_translate_ptr() -> *const f32 {
    with_runner(|r| r.translate_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_translate_floats() -> u32 {
    with_runner(|r| r.translate_floats()).unwrap_or(0)
}
