use std::time::Duration;

use image::DynamicImage;

use navassist::error::FrameError;
use navassist::kernel::time::Timestamp;
use navassist::vision::frame::{Capture, Frame};
use navassist::vision::source::{frame_feed, FrameSource};

fn blank(ms: u64) -> Capture {
    Capture::Decoded(Frame::blank(64, 48, Timestamp::from_millis(ms)).unwrap())
}

#[tokio::test]
async fn test_only_latest_capture_is_kept() {
    let (feed, mut source) = frame_feed();

    assert!(feed.offer(blank(0)));
    assert!(feed.offer(blank(33)));
    assert!(feed.offer(blank(66)));

    let frame = source.next_frame(Duration::from_millis(50)).await.unwrap().unwrap();
    assert_eq!(frame.seq, 2);
    assert_eq!(frame.captured_at, Timestamp::from_millis(66));
    assert_eq!(feed.dropped(), 2);

    assert!(source.next_frame(Duration::from_millis(20)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_empty_feed_waits_bounded() {
    let (_feed, mut source) = frame_feed();
    let started = tokio::time::Instant::now();

    let next = source.next_frame(Duration::from_millis(30)).await.unwrap();

    assert!(next.is_none());
    assert!(started.elapsed() >= Duration::from_millis(30));
}

#[tokio::test]
async fn test_waiting_consumer_is_woken_by_offer() {
    let (feed, mut source) = frame_feed();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        feed.offer(blank(20));
    });

    let frame = source.next_frame(Duration::from_secs(2)).await.unwrap();
    assert_eq!(frame.map(|f| f.seq), Some(0));
}

#[tokio::test]
async fn test_backwards_timestamp_is_rejected() {
    let (feed, mut source) = frame_feed();

    assert!(feed.offer(blank(100)));
    assert!(!feed.offer(blank(50)));

    let frame = source.next_frame(Duration::from_millis(20)).await.unwrap().unwrap();
    assert_eq!(frame.captured_at, Timestamp::from_millis(100));
    assert_eq!(feed.dropped(), 0);
}

#[tokio::test]
async fn test_close_drains_then_reports_closed() {
    let (feed, mut source) = frame_feed();
    feed.offer(blank(0));
    feed.close();

    assert!(!feed.offer(blank(10)));
    assert!(source.next_frame(Duration::from_millis(20)).await.unwrap().is_some());
    assert!(matches!(source.next_frame(Duration::from_millis(20)).await, Err(FrameError::Closed)));
}

#[tokio::test]
async fn test_encoded_capture_is_decoded_on_pull() {
    let mut png = Vec::new();
    DynamicImage::new_rgb8(8, 6).write_to(&mut png, image::ImageOutputFormat::Png).unwrap();
    let (feed, mut source) = frame_feed();

    feed.offer(Capture::Encoded { bytes: png, rotation: 90, captured_at: Timestamp::from_millis(7) });

    let frame = source.next_frame(Duration::from_millis(20)).await.unwrap().unwrap();
    assert_eq!((frame.width(), frame.height()), (8, 6));
    assert_eq!(frame.rotation, 90);
}

#[tokio::test]
async fn test_undecodable_capture_is_an_error() {
    let (feed, mut source) = frame_feed();

    feed.offer(Capture::Encoded { bytes: b"not an image".to_vec(), rotation: 0, captured_at: Timestamp::ZERO });

    assert!(matches!(source.next_frame(Duration::from_millis(20)).await, Err(FrameError::Decode(_))));
}

#[test]
fn test_zero_sized_frame_is_rejected() {
    let result = Frame::new(DynamicImage::new_rgb8(0, 10), 0, Timestamp::ZERO);

    assert!(matches!(result, Err(FrameError::Empty { width: 0, height: 10 })));
}
