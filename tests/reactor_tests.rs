use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use navassist::config::{PipelineConfig, UserProfile};
use navassist::kernel::event::{Event, FrameAnalysis, FrameReport, UserAction};
use navassist::kernel::mode::{Mode, ModeEpoch};
use navassist::kernel::reactor::Reactor;
use navassist::kernel::scheduler::SideEffect;
use navassist::kernel::telemetry::event::TelemetryEvent;
use navassist::kernel::time::{Clock, Timestamp};
use navassist::outputs::realizer::{CLOSING, GREETING, SCANNING_PLACEHOLDER, TEXT_PLACEHOLDER};
use navassist::outputs::{HapticSink, Sinks, SpeechSink, VisualSink};
use navassist::vision::aggregator::{Aggregator, SceneDescription};
use navassist::vision::detector::{BoundingBox, Detections, RawDetection, RecognizedText};
use navassist::vision::locator::SpatialLocator;

const CHAIR_LINE: &str = "• chair (87%) — on your left, nearby";
const CHAIR_SPOKEN: &str = "chair 87 percent — on your left, nearby";

fn reactor_with(config: PipelineConfig) -> (Reactor, mpsc::Sender<Event>) {
    let (tx, rx) = mpsc::channel(100);
    (Reactor::new(rx, &config, Clock::new()), tx)
}

fn reactor() -> Reactor {
    reactor_with(PipelineConfig::default()).0
}

fn chair() -> SceneDescription {
    let detection = RawDetection::new(BoundingBox::new(100.0, 300.0, 400.0, 700.0)).with_label("chair", 0.87);
    Aggregator::new(SpatialLocator::default(), 0.75).aggregate(&[Detections::Objects(vec![detection])], 1280, 720)
}

fn described(seq: u64, epoch: u64, description: SceneDescription) -> Event {
    Event::Frame(FrameReport {
        seq,
        captured_at: Timestamp::ZERO,
        epoch: ModeEpoch(epoch),
        analysis: FrameAnalysis::Described(description),
    })
}

fn read(seq: u64, epoch: u64, text: &str) -> Event {
    Event::Frame(FrameReport {
        seq,
        captured_at: Timestamp::ZERO,
        epoch: ModeEpoch(epoch),
        analysis: FrameAnalysis::Read(RecognizedText::new(text)),
    })
}

fn at(ms: u64) -> Timestamp {
    Timestamp::from_millis(ms)
}

fn speeches(effects: &[SideEffect]) -> Vec<String> {
    effects
        .iter()
        .filter_map(|e| match e {
            SideEffect::Speak { phrase, .. } => Some(phrase.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn test_boot_shows_mode_placeholder_and_greets() {
    let mut reactor = reactor();

    let effects = reactor.boot(at(0));

    assert_eq!(
        effects,
        vec![
            SideEffect::ShowMode(Mode::ObjectDetection.indicator().to_string()),
            SideEffect::Render {
                lines: vec![SCANNING_PLACEHOLDER.to_string()],
                boxes: Vec::new(),
                frame_width: 0,
                frame_height: 0,
            },
            SideEffect::Speak { phrase: GREETING.to_string(), delay: Duration::ZERO },
        ]
    );
}

#[test]
fn test_published_description_renders_then_speaks() {
    let mut reactor = reactor();
    let description = chair();

    let effects = reactor.tick_step(vec![described(1, 0, description.clone())], at(250));

    assert_eq!(
        effects,
        vec![
            SideEffect::Render {
                lines: vec![CHAIR_LINE.to_string()],
                boxes: description.boxes.clone(),
                frame_width: 1280,
                frame_height: 720,
            },
            SideEffect::Pulse(Duration::from_millis(80)),
            SideEffect::Speak { phrase: CHAIR_SPOKEN.to_string(), delay: Duration::ZERO },
        ]
    );
    assert_eq!(reactor.current_description(), Some(&description));

    let snapshot = reactor.telemetry.snapshot();
    assert_eq!(snapshot.frame_stats.published, 1);
    assert_eq!(snapshot.frame_stats.max_latency_ms, 250);
    assert_eq!(snapshot.speech_stats.detections, 1);
}

#[test]
fn test_empty_description_shows_placeholder_silently() {
    let mut reactor = reactor();

    let effects = reactor.tick_step(vec![described(1, 0, SceneDescription::default())], at(0));

    assert_eq!(
        effects,
        vec![SideEffect::Render {
            lines: vec![SCANNING_PLACEHOLDER.to_string()],
            boxes: Vec::new(),
            frame_width: 0,
            frame_height: 0,
        }]
    );
    assert_eq!(reactor.telemetry.snapshot().speech_stats.silent, 1);
}

#[test]
fn test_toggle_switches_display_and_announces() {
    let mut reactor = reactor();
    let mode_rx = reactor.mode_receiver();
    reactor.tick_step(vec![described(1, 0, chair())], at(0));

    let effects = reactor.tick_step(vec![Event::Action(UserAction::ToggleMode)], at(500));

    assert_eq!(
        effects,
        vec![
            SideEffect::ShowMode(Mode::TextReading.indicator().to_string()),
            SideEffect::Render {
                lines: vec![TEXT_PLACEHOLDER.to_string()],
                boxes: Vec::new(),
                frame_width: 0,
                frame_height: 0,
            },
            SideEffect::Speak { phrase: Mode::TextReading.announcement().to_string(), delay: Duration::ZERO },
        ]
    );
    assert_eq!(reactor.mode.mode(), Mode::TextReading);
    assert_eq!(mode_rx.borrow().epoch, ModeEpoch(1));
    assert_eq!(mode_rx.borrow().mode, Mode::TextReading);
    assert!(reactor.current_description().is_none());
    assert_eq!(reactor.telemetry.snapshot().mode_transitions, 1);
}

#[test]
fn test_report_from_before_switch_is_discarded() {
    let mut reactor = reactor();
    reactor.tick_step(vec![Event::Action(UserAction::ToggleMode)], at(0));

    // Analyzed as objects while the switch was in flight.
    let effects = reactor.tick_step(vec![described(7, 0, chair())], at(100));

    assert!(effects.is_empty());
    assert!(reactor.current_description().is_none());
    assert_eq!(reactor.telemetry.snapshot().frame_stats.stale, 1);

    let effects = reactor.tick_step(vec![read(8, 1, "EXIT")], at(200));
    assert_eq!(
        effects,
        vec![
            SideEffect::Render {
                lines: vec!["📝 TEXT FOUND:".to_string(), "EXIT".to_string()],
                boxes: Vec::new(),
                frame_width: 0,
                frame_height: 0,
            },
            SideEffect::Speak { phrase: "I can read: EXIT".to_string(), delay: Duration::from_millis(4000) },
        ]
    );
}

#[test]
fn test_only_text_shaped_output_after_switch() {
    let mut reactor = reactor();
    let events = vec![
        described(1, 0, chair()),
        Event::Action(UserAction::ToggleMode),
        described(2, 0, chair()),
        read(3, 1, "Platform 2"),
        described(4, 0, chair()),
    ];

    let effects = reactor.tick_step(events, at(5000));

    let after_switch: Vec<_> = effects
        .iter()
        .skip_while(|e| !matches!(e, SideEffect::ShowMode(_)))
        .collect();
    for effect in &after_switch {
        if let SideEffect::Render { lines, boxes, .. } = effect {
            assert!(boxes.is_empty());
            assert!(!lines.iter().any(|l| l.contains("chair")), "{:?}", lines);
        }
    }
    assert_eq!(reactor.telemetry.snapshot().frame_stats.stale, 2);
}

#[test]
fn test_wrong_shape_under_current_epoch_is_stale() {
    let mut reactor = reactor();

    let effects = reactor.tick_step(vec![read(1, 0, "EXIT")], at(0));

    assert!(effects.is_empty());
    assert_eq!(reactor.telemetry.snapshot().frame_stats.stale, 1);
}

#[test]
fn test_overtaken_report_is_stale() {
    let mut reactor = reactor();
    reactor.tick_step(vec![described(5, 0, SceneDescription::default())], at(0));

    let effects = reactor.tick_step(vec![described(4, 0, chair())], at(10));

    assert!(effects.is_empty());
    assert_eq!(reactor.current_description(), Some(&SceneDescription::default()));
}

#[test]
fn test_blank_text_leaves_display_alone() {
    let mut reactor = reactor();
    reactor.toggle_mode(at(0));

    assert!(reactor.tick_step(vec![read(1, 1, "  ")], at(10)).is_empty());
}

#[test]
fn test_speak_all_reads_current_description() {
    let mut reactor = reactor();
    reactor.boot(at(0));
    reactor.tick_step(vec![described(1, 0, chair())], at(100));

    let effects = reactor.tick_step(vec![Event::Action(UserAction::SpeakAll)], at(200));

    assert_eq!(speeches(&effects), vec![format!("I can see: {}.", CHAIR_SPOKEN)]);
}

#[test]
fn test_telemetry_events_are_recorded() {
    let mut reactor = reactor();

    let effects = reactor.tick_step(vec![Event::Telemetry(TelemetryEvent::FrameSkipped)], at(0));

    assert!(effects.is_empty());
    assert_eq!(reactor.telemetry.snapshot().frame_stats.skipped, 1);
}

#[test]
fn test_deaf_profile_never_speaks() {
    let config = PipelineConfig { profile: UserProfile::Deaf, ..PipelineConfig::default() };
    let (mut reactor, _tx) = reactor_with(config);

    let mut effects = reactor.boot(at(0));
    effects.extend(reactor.tick_step(vec![described(1, 0, chair())], at(5000)));
    effects.extend(reactor.toggle_mode(at(6000)));
    effects.extend(reactor.shutdown());

    assert!(speeches(&effects).is_empty());
    assert!(effects.contains(&SideEffect::Pulse(Duration::from_millis(80))));
    assert!(effects.iter().any(|e| matches!(e, SideEffect::Render { lines, .. } if lines[0] == CHAIR_LINE)));
}

#[test]
fn test_shutdown_says_goodbye() {
    let mut reactor = reactor();

    assert_eq!(speeches(&reactor.shutdown()), vec![CLOSING.to_string()]);
}

#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<String>>>);

impl Recorder {
    fn push(&self, entry: String) {
        self.0.lock().unwrap().push(entry);
    }

    fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl SpeechSink for Recorder {
    fn speak(&mut self, phrase: &str, _delay: Duration) {
        self.push(format!("speak:{}", phrase));
    }

    fn stop(&mut self) {}
}

impl HapticSink for Recorder {
    fn pulse(&mut self, duration: Duration) {
        self.push(format!("pulse:{}", duration.as_millis()));
    }
}

impl VisualSink for Recorder {
    fn render(&mut self, lines: &[String], _boxes: &[BoundingBox], _w: u32, _h: u32) {
        self.push(format!("render:{}", lines.join("|")));
    }

    fn show_mode(&mut self, indicator: &str) {
        self.push(format!("mode:{}", indicator));
    }
}

#[tokio::test]
async fn test_driver_loop_delivers_effects_until_cancelled() {
    let (mut reactor, tx) = reactor_with(PipelineConfig::default());
    let recorder = Recorder::default();
    let mut sinks = Sinks {
        speech: Box::new(recorder.clone()),
        haptic: Box::new(recorder.clone()),
        visual: Box::new(recorder.clone()),
    };
    let cancel = CancellationToken::new();

    let stopper = cancel.clone();
    tokio::spawn(async move {
        tx.send(described(1, 0, chair())).await.unwrap();
        tokio::time::sleep(Duration::from_millis(150)).await;
        stopper.cancel();
    });

    reactor.run(&mut sinks, cancel).await;

    let entries = recorder.entries();
    assert_eq!(entries.first(), Some(&format!("mode:{}", Mode::ObjectDetection.indicator())));
    assert!(entries.contains(&format!("speak:{}", GREETING)));
    assert!(entries.contains(&format!("render:{}", CHAIR_LINE)));
    // Still inside the greeting's throttle window.
    assert!(!entries.contains(&format!("speak:{}", CHAIR_SPOKEN)));
    assert_eq!(entries.last(), Some(&format!("speak:{}", CLOSING)));
}
