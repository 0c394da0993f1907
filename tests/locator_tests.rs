use navassist::config::LocatorThresholds;
use navassist::error::LocatorError;
use navassist::vision::detector::BoundingBox;
use navassist::vision::locator::{Horizontal, Proximity, SpatialLocator, Vertical};

const W: u32 = 1280;
const H: u32 = 720;

#[test]
fn test_small_box_upper_left_is_left_and_distant() {
    let locator = SpatialLocator::default();
    let bbox = BoundingBox::new(100.0, 100.0, 300.0, 200.0);

    let position = locator.locate(&bbox, W, H).unwrap();

    assert_eq!(position.horizontal, Horizontal::Left);
    assert_eq!(position.vertical, Vertical::Above);
    assert_eq!(position.proximity, Proximity::Distant);
    let phrase = position.phrase();
    assert!(phrase.contains("left"), "{}", phrase);
    assert!(phrase.contains("distant"), "{}", phrase);
    assert_eq!(phrase, "on your left, distant");
}

#[test]
fn test_full_frame_box_is_ahead_eye_level_very_close() {
    let locator = SpatialLocator::default();
    let bbox = BoundingBox::new(0.0, 0.0, W as f32, H as f32);

    let position = locator.locate(&bbox, W, H).unwrap();

    assert_eq!(position.horizontal, Horizontal::Ahead);
    assert_eq!(position.vertical, Vertical::EyeLevel);
    assert_eq!(position.proximity, Proximity::VeryClose);
    assert_eq!(position.phrase_with_elevation(), "straight ahead, at eye level, very close");
}

#[test]
fn test_nearby_band() {
    let locator = SpatialLocator::default();
    // 640x288 of 1280x720 is 0.2 of the frame.
    let bbox = BoundingBox::new(0.0, 0.0, 640.0, 288.0);

    let position = locator.locate(&bbox, W, H).unwrap();

    assert_eq!(position.proximity, Proximity::Nearby);
    assert_eq!(position.horizontal, Horizontal::Left);
}

#[test]
fn test_lower_right_corner() {
    let locator = SpatialLocator::default();
    let bbox = BoundingBox::new(1000.0, 600.0, 1200.0, 700.0);

    let position = locator.locate(&bbox, W, H).unwrap();

    assert_eq!(position.horizontal, Horizontal::Right);
    assert_eq!(position.vertical, Vertical::Below);
    assert_eq!(position.proximity, Proximity::Distant);
    assert_eq!(position.phrase(), "on your right, distant");
}

#[test]
fn test_zones_are_total_over_a_grid() {
    let locator = SpatialLocator::default();
    let t = LocatorThresholds::default();

    for step_x in 0..16 {
        for step_y in 0..9 {
            for size in [10.0f32, 200.0, 500.0, 900.0] {
                let left = step_x as f32 * 80.0;
                let top = step_y as f32 * 80.0;
                let bbox = BoundingBox::new(left, top, left + size, top + size * 0.5);

                let position = locator.locate(&bbox, W, H).unwrap();

                let (cx, cy) = bbox.center();
                let cx = cx / W as f32;
                let cy = cy / H as f32;
                let area = bbox.width() * bbox.height() / (W as f32 * H as f32);

                let expected_h = if cx < t.left_max {
                    Horizontal::Left
                } else if cx > t.right_min {
                    Horizontal::Right
                } else {
                    Horizontal::Ahead
                };
                let expected_v = if cy < t.above_max {
                    Vertical::Above
                } else if cy > t.below_min {
                    Vertical::Below
                } else {
                    Vertical::EyeLevel
                };
                let expected_p = if area > t.very_close_area {
                    Proximity::VeryClose
                } else if area > t.nearby_area {
                    Proximity::Nearby
                } else {
                    Proximity::Distant
                };

                assert_eq!(position.horizontal, expected_h, "box {:?}", bbox);
                assert_eq!(position.vertical, expected_v, "box {:?}", bbox);
                assert_eq!(position.proximity, expected_p, "box {:?}", bbox);
            }
        }
    }
}

#[test]
fn test_zero_width_frame_is_rejected() {
    let locator = SpatialLocator::default();
    let bbox = BoundingBox::new(10.0, 10.0, 20.0, 20.0);

    assert_eq!(locator.locate(&bbox, 0, H), Err(LocatorError::DegenerateFrame { width: 0, height: H }));
    assert_eq!(locator.locate(&bbox, W, 0), Err(LocatorError::DegenerateFrame { width: W, height: 0 }));
}

#[test]
fn test_non_finite_box_is_rejected() {
    let locator = SpatialLocator::default();
    let bbox = BoundingBox::new(f32::NAN, 0.0, 10.0, 10.0);

    assert_eq!(locator.locate(&bbox, W, H), Err(LocatorError::NonFiniteBox));
}

#[test]
fn test_custom_thresholds_are_honoured() {
    let thresholds = LocatorThresholds { left_max: 0.1, ..LocatorThresholds::default() };
    let locator = SpatialLocator::new(thresholds);
    let bbox = BoundingBox::new(100.0, 100.0, 300.0, 200.0);

    let position = locator.locate(&bbox, W, H).unwrap();

    assert_eq!(position.horizontal, Horizontal::Ahead);
}
