// extensions/mod.rs
//
// Motion composers built on the sequence core.
// Nothing here touches a host API; the frame source is always passed in.

pub mod easing;
pub mod motion;
pub mod tween;
pub mod wave;

pub use easing::{Easing, interpolate};
pub use motion::{translate, css_translate3d};
pub use tween::{TweenSpec, tween};
pub use wave::{WaveSpec, wave};
