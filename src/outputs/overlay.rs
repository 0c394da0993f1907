use crate::vision::detector::BoundingBox;

/// Maps a frame-pixel box onto a view of a different size.
/// Returns None for a zero-sized frame.
pub fn scale_box(bbox: &BoundingBox, frame_width: u32, frame_height: u32, view_width: f32, view_height: f32) -> Option<BoundingBox> {
    if frame_width == 0 || frame_height == 0 {
        return None;
    }
    let sx = view_width / frame_width as f32;
    let sy = view_height / frame_height as f32;
    Some(BoundingBox::new(bbox.left * sx, bbox.top * sy, bbox.right * sx, bbox.bottom * sy))
}

pub fn scale_boxes(
    boxes: &[BoundingBox],
    frame_width: u32,
    frame_height: u32,
    view_width: f32,
    view_height: f32,
) -> Vec<BoundingBox> {
    boxes
        .iter()
        .filter_map(|b| scale_box(b, frame_width, frame_height, view_width, view_height))
        .collect()
}
