pub mod api;
pub mod core;
pub mod systems;
pub mod bridge;
pub mod assets;
pub mod extensions;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export key types at crate root for convenience
pub use api::config::MotionConfig;
pub use api::error::MotionError;
pub use api::types::{FrameRequest, FrameSample};
pub use core::clock::{FrameCallback, FrameQueue, FrameSource, ManualClock};
pub use core::frames::animation_frames;
pub use core::sequence::{Sequence, Subscriber, Subscription, empty, from_iter, of};
pub use systems::combine::{combine_latest, combine_latest_all};
pub use systems::concat::{concat, concat_indexed};
pub use bridge::protocol::{MotionBuffer, Translate};
pub use assets::manifest::{AnimationManifest, TrackDescriptor};

pub use extensions::{
    Easing, interpolate,
    TweenSpec, tween,
    WaveSpec, wave,
    translate, css_translate3d,
};
