// extensions/motion.rs
//
// 2D motion from two scalar tracks.
//
// Usage:
//   let offset = translate(&tween(clock.clone(), 0.0, 200.0, 3600.0)?,
//                          &wave(clock.clone(), 25.0, 1200.0, 3)?);
//   offset.subscribe(|v| element.set_transform(&css_translate3d(v)), || {});

use glam::Vec2;

use crate::core::sequence::Sequence;
use crate::systems::combine::combine_latest;

/// Pair an x track and a y track into positions.
///
/// Starts once both tracks have produced a value; every later value from
/// either track yields a new position built from the latest of each.
pub fn translate(x: &Sequence<f64>, y: &Sequence<f64>) -> Sequence<Vec2> {
    combine_latest(x, y).map(|(x, y)| Vec2::new(x as f32, y as f32))
}

/// CSS transform string for an offset in pixels.
pub fn css_translate3d(offset: Vec2) -> String {
    format!("translate3d({}px, {}px, 0)", offset.x, offset.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;
    use crate::api::config::MotionConfig;
    use crate::core::clock::ManualClock;
    use crate::extensions::tween::tween;
    use crate::extensions::wave::wave;
    use crate::test_support::Recorder;

    #[test]
    fn css_format() {
        assert_eq!(css_translate3d(Vec2::new(12.5, -3.0)), "translate3d(12.5px, -3px, 0)");
    }

    #[test]
    fn tween_and_wave_drive_one_position() {
        let clock = Rc::new(ManualClock::new());
        let x = tween(clock.clone(), 0.0, 200.0, 3600.0).unwrap();
        let y = wave(clock.clone(), 25.0, 1200.0, 3).unwrap();
        let rec = Recorder::new();
        translate(&x, &y).subscribe_with(rec.subscriber());

        clock.run(&MotionConfig::default());

        let positions = rec.values();
        assert!(rec.completed());
        assert_eq!(clock.pending(), 0);

        let last = *positions.last().unwrap();
        assert_eq!(last, Vec2::new(200.0, 0.0));
        assert!(positions.iter().all(|p| (0.0..=200.0).contains(&p.x)));
        assert!(positions.iter().all(|p| (-25.0..=25.0).contains(&p.y)));
        // x never moves backwards.
        assert!(positions.windows(2).all(|w| w[1].x >= w[0].x));
    }

    #[test]
    fn both_tracks_emit_each_frame() {
        let clock = Rc::new(ManualClock::new());
        let x = tween(clock.clone(), 0.0, 100.0, 100.0).unwrap();
        let y = tween(clock.clone(), 0.0, -100.0, 100.0).unwrap();
        let rec = Recorder::new();
        translate(&x, &y).subscribe_with(rec.subscriber());

        clock.advance_to(50.0);
        // y has not emitted when x's first value arrives, so the first pair
        // forms on y's emission.
        assert_eq!(rec.values(), vec![Vec2::new(50.0, -50.0)]);

        clock.advance_to(100.0);
        assert_eq!(
            rec.values(),
            vec![
                Vec2::new(50.0, -50.0),
                Vec2::new(100.0, -50.0),
                Vec2::new(100.0, -100.0),
            ]
        );
        assert!(rec.completed());
    }
}
