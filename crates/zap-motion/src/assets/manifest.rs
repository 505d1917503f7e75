use std::collections::HashMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::api::config::MotionConfig;
use crate::api::error::MotionError;
use crate::core::clock::FrameSource;
use crate::core::sequence::Sequence;
use crate::extensions::tween::TweenSpec;
use crate::extensions::wave::WaveSpec;
use crate::systems::concat::concat;

/// Animation manifest describing named motion tracks.
/// Loaded from a JSON file at runtime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnimationManifest {
    /// Runtime settings.
    #[serde(default)]
    pub config: MotionConfig,
    /// Named tracks: name → descriptor.
    #[serde(default)]
    pub tracks: HashMap<String, TrackDescriptor>,
}

/// Describes one scalar track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackDescriptor {
    /// A single interpolation.
    Tween(TweenSpec),
    /// An oscillation around zero.
    Wave(WaveSpec),
    /// Child tracks played back to back.
    Sequence(Vec<TrackDescriptor>),
}

impl TrackDescriptor {
    /// Validate and build the sequence for this track.
    pub fn build(&self, source: &Rc<dyn FrameSource>) -> Result<Sequence<f64>, MotionError> {
        match self {
            TrackDescriptor::Tween(spec) => {
                spec.validate()?;
                Ok(spec.sequence(Rc::clone(source)))
            }
            TrackDescriptor::Wave(spec) => {
                spec.validate()?;
                Ok(spec.sequence(Rc::clone(source)))
            }
            TrackDescriptor::Sequence(children) => {
                let segments = children
                    .iter()
                    .map(|child| child.build(source))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(concat(segments))
            }
        }
    }
}

impl AnimationManifest {
    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, MotionError> {
        let manifest: Self = serde_json::from_str(json)?;
        manifest.config.validate()?;
        Ok(manifest)
    }

    /// Build the named track against `source`.
    pub fn track(&self, name: &str, source: &Rc<dyn FrameSource>) -> Result<Sequence<f64>, MotionError> {
        let descriptor = self
            .tracks
            .get(name)
            .ok_or_else(|| MotionError::UnknownTrack(name.to_string()))?;
        descriptor.build(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;
    use crate::extensions::easing::Easing;
    use crate::test_support::Recorder;

    const DEMO: &str = r#"{
        "config": { "frame_interval_ms": 10 },
        "tracks": {
            "x": { "tween": { "start": 0, "end": 200, "duration": 3600 } },
            "y": { "wave": { "amplitude": 25, "duration": 1200, "repeat": 3 } },
            "fade": { "sequence": [
                { "tween": { "start": 0, "end": 1, "duration": 20, "easing": "quad_out" } },
                { "tween": { "start": 1, "end": 0, "duration": 20 } }
            ] }
        }
    }"#;

    #[test]
    fn parse_demo_manifest() {
        let manifest = AnimationManifest::from_json(DEMO).unwrap();
        assert_eq!(manifest.config.frame_interval_ms, 10.0);
        assert_eq!(manifest.config.max_frames, MotionConfig::default().max_frames);
        assert_eq!(manifest.tracks.len(), 3);
        assert_eq!(
            manifest.tracks["y"],
            TrackDescriptor::Wave(WaveSpec { amplitude: 25.0, duration: 1200.0, repeat: 3 })
        );
        match &manifest.tracks["fade"] {
            TrackDescriptor::Sequence(children) => {
                assert_eq!(children.len(), 2);
                assert!(matches!(children[0], TrackDescriptor::Tween(t) if t.easing == Easing::QuadOut));
            }
            other => panic!("expected sequence, got {:?}", other),
        }
    }

    #[test]
    fn wave_repeat_defaults_to_one() {
        let manifest = AnimationManifest::from_json(
            r#"{ "tracks": { "y": { "wave": { "amplitude": 1, "duration": 4 } } } }"#,
        )
        .unwrap();
        assert!(matches!(manifest.tracks["y"], TrackDescriptor::Wave(w) if w.repeat == 1));
    }

    #[test]
    fn builds_and_runs_a_sequence_track() {
        let manifest = AnimationManifest::from_json(DEMO).unwrap();
        let clock = Rc::new(ManualClock::new());
        let source: Rc<dyn FrameSource> = clock.clone();
        let rec = Recorder::new();
        manifest.track("fade", &source).unwrap().subscribe_with(rec.subscriber());

        clock.run(&manifest.config);

        let values = rec.values();
        assert!(rec.completed());
        assert!(values.contains(&1.0));
        assert_eq!(values.last(), Some(&0.0));
    }

    #[test]
    fn unknown_track_is_an_error() {
        let manifest = AnimationManifest::from_json(DEMO).unwrap();
        let source: Rc<dyn FrameSource> = Rc::new(ManualClock::new());
        assert!(matches!(
            manifest.track("z", &source),
            Err(MotionError::UnknownTrack(name)) if name == "z"
        ));
    }

    #[test]
    fn invalid_descriptor_fails_at_build() {
        let manifest = AnimationManifest::from_json(
            r#"{ "tracks": { "bad": { "sequence": [
                { "tween": { "start": 0, "end": 1, "duration": 10 } },
                { "wave": { "amplitude": 1, "duration": 10, "repeat": 0 } }
            ] } } }"#,
        )
        .unwrap();
        let source: Rc<dyn FrameSource> = Rc::new(ManualClock::new());
        assert!(matches!(manifest.track("bad", &source), Err(MotionError::InvalidRepeat(0))));
    }

    #[test]
    fn malformed_json_is_a_manifest_error() {
        assert!(matches!(
            AnimationManifest::from_json("{ \"tracks\": "),
            Err(MotionError::Manifest(_))
        ));
    }

    #[test]
    fn zero_frame_interval_is_rejected_on_load() {
        let result = AnimationManifest::from_json(
            r#"{ "config": { "frame_interval_ms": 0 }, "tracks": {} }"#,
        );
        assert!(matches!(result, Err(MotionError::InvalidFrameInterval(v)) if v == 0.0));
    }
}
