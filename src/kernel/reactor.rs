use tokio::sync::{mpsc, watch};
use tokio::time::{interval, Duration}; // Only for the loop driver
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::arbitrator::{Announcement, OutputArbitrator, Verdict};
use super::event::{Event, FrameAnalysis, FrameReport, UserAction};
use super::mode::{Mode, ModeController, ModeSnapshot};
use super::scheduler::{Scheduler, SideEffect};
use super::telemetry::event::{FrameEventKind, TelemetryEvent};
use super::telemetry::recorder::TelemetryRecorder;
use super::time::{Clock, Timestamp, TICK_MS};
use crate::config::PipelineConfig;
use crate::outputs::realizer::{self, SCANNING_PLACEHOLDER, TEXT_PLACEHOLDER};
use crate::outputs::Sinks;
use crate::vision::aggregator::SceneDescription;

pub struct Reactor {
    pub receiver: mpsc::Receiver<Event>,
    pub arbitrator: OutputArbitrator,
    pub mode: ModeController,
    pub telemetry: TelemetryRecorder,
    scheduler: Scheduler,
    /// Latest published description; what speak-all reads in object mode.
    current: Option<SceneDescription>,
    last_seq: Option<u64>,
    clock: Clock,
}

impl Reactor {
    /// `clock` must be the one the camera stamps captures with.
    pub fn new(receiver: mpsc::Receiver<Event>, config: &PipelineConfig, clock: Clock) -> Self {
        Self {
            receiver,
            arbitrator: OutputArbitrator::new(config),
            mode: ModeController::new(),
            telemetry: TelemetryRecorder::new(),
            scheduler: Scheduler::new(config.profile, config.haptic_pulse()),
            current: None,
            last_seq: None,
            clock,
        }
    }

    pub fn mode_receiver(&self) -> watch::Receiver<ModeSnapshot> {
        self.mode.subscribe()
    }

    pub fn current_description(&self) -> Option<&SceneDescription> {
        self.current.as_ref()
    }

    /// Session start: mode indicator, scanning placeholder, greeting.
    pub fn boot(&mut self, now: Timestamp) -> Vec<SideEffect> {
        let mut effects = vec![
            SideEffect::ShowMode(self.mode.mode().indicator().to_string()),
            placeholder(SCANNING_PLACEHOLDER),
        ];
        let greeting = self.arbitrator.greeting(now);
        effects.extend(self.announce(greeting));
        effects
    }

    /// Pure step: consumes drained events, returns what the driver must do.
    /// MUST NOT await I/O or timers.
    pub fn tick_step(&mut self, events: Vec<Event>, now: Timestamp) -> Vec<SideEffect> {
        let mut effects = Vec::new();
        for event in events {
            match event {
                Event::Frame(report) => effects.extend(self.on_report(report, now)),
                Event::Action(UserAction::ToggleMode) => effects.extend(self.toggle_mode(now)),
                Event::Action(UserAction::SpeakAll) => effects.extend(self.speak_all()),
                Event::Telemetry(t) => self.telemetry.record(t),
            }
        }
        effects
    }

    pub fn toggle_mode(&mut self, now: Timestamp) -> Vec<SideEffect> {
        let transition = self.mode.toggle();
        self.telemetry.record(TelemetryEvent::ModeTransition { from: transition.from, to: transition.to });
        self.current = None;

        let waiting = match transition.to {
            Mode::ObjectDetection => SCANNING_PLACEHOLDER,
            Mode::TextReading => TEXT_PLACEHOLDER,
        };
        let mut effects = vec![SideEffect::ShowMode(transition.to.indicator().to_string()), placeholder(waiting)];
        let announcement = self.arbitrator.on_mode_entered(transition.to, now);
        effects.extend(self.announce(announcement));
        effects
    }

    pub fn speak_all(&mut self) -> Vec<SideEffect> {
        let announcement = self.arbitrator.speak_all(self.current.as_ref());
        self.announce(announcement)
    }

    pub fn shutdown(&mut self) -> Vec<SideEffect> {
        let closing = self.arbitrator.closing();
        self.announce(closing)
    }

    fn on_report(&mut self, report: FrameReport, now: Timestamp) -> Vec<SideEffect> {
        let overtaken = self.last_seq.map(|last| report.seq <= last).unwrap_or(false);
        if overtaken || !self.mode.is_current(report.epoch) || report.analysis.mode() != self.mode.mode() {
            debug!("Discarded stale report: seq {} epoch {}", report.seq, report.epoch.0);
            self.telemetry.record(TelemetryEvent::FrameLifecycle { seq: report.seq, event: FrameEventKind::Stale });
            return Vec::new();
        }

        self.last_seq = Some(report.seq);
        self.telemetry.record(TelemetryEvent::FrameLifecycle { seq: report.seq, event: FrameEventKind::Published });
        self.telemetry.record(TelemetryEvent::AnalysisCompleted {
            seq: report.seq,
            latency_ms: now.since(report.captured_at),
        });

        match report.analysis {
            FrameAnalysis::Described(description) => {
                let mut effects = vec![render_description(&description)];
                let verdict = self.arbitrator.on_description(&description, now);
                self.current = Some(description);
                effects.extend(self.resolve(verdict));
                effects
            }
            FrameAnalysis::Read(text) => {
                let verdict = self.arbitrator.on_text(&text);
                let mut effects = Vec::new();
                if matches!(verdict, Verdict::Speak(_)) {
                    effects.push(SideEffect::Render {
                        lines: realizer::text_caption(text.trimmed()),
                        boxes: Vec::new(),
                        frame_width: 0,
                        frame_height: 0,
                    });
                }
                effects.extend(self.resolve(verdict));
                effects
            }
        }
    }

    fn resolve(&mut self, verdict: Verdict) -> Vec<SideEffect> {
        match verdict {
            Verdict::Speak(announcement) => self.announce(announcement),
            Verdict::Silent(reason) => {
                self.telemetry.record(TelemetryEvent::Suppressed { reason });
                Vec::new()
            }
        }
    }

    fn announce(&mut self, announcement: Announcement) -> Vec<SideEffect> {
        self.telemetry.record(TelemetryEvent::Utterance { kind: announcement.kind });
        self.scheduler.schedule(announcement)
    }

    /// Async Driver Loop. Runs until `cancel` fires, then says goodbye.
    pub async fn run(&mut self, sinks: &mut Sinks, cancel: CancellationToken) {
        info!("Reactor started. Tick: {}ms", TICK_MS);

        for effect in self.boot(self.clock.now()) {
            sinks.execute(effect);
        }

        let mut cadence = interval(Duration::from_millis(TICK_MS));
        cadence.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = cadence.tick() => {}
            }

            let mut events: Vec<Event> = Vec::new();
            while let Ok(event) = self.receiver.try_recv() {
                events.push(event);
            }
            if events.is_empty() {
                continue;
            }

            let now = self.clock.now();
            for effect in self.tick_step(events, now) {
                sinks.execute(effect);
            }
        }

        for effect in self.shutdown() {
            sinks.execute(effect);
        }
        info!("Reactor stopped. {} telemetry events recorded", self.telemetry.len());
    }
}

fn placeholder(line: &str) -> SideEffect {
    SideEffect::Render { lines: vec![line.to_string()], boxes: Vec::new(), frame_width: 0, frame_height: 0 }
}

fn render_description(description: &SceneDescription) -> SideEffect {
    if description.is_empty() {
        return placeholder(SCANNING_PLACEHOLDER);
    }
    SideEffect::Render {
        lines: description.lines(),
        boxes: description.boxes.clone(),
        frame_width: description.frame_width,
        frame_height: description.frame_height,
    }
}
