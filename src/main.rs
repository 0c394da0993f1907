use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use navassist::kernel::event::{Event, UserAction};
use navassist::kernel::time::Clock;
use navassist::outputs::speech::{CommandVoice, FlushingSpeaker, LogVoice};
use navassist::outputs::text::{ConsoleDisplay, ConsoleHaptic};
use navassist::outputs::{SpeechSink, Sinks};
use navassist::vision::detector::{BoundingBox, RawDetection, SceneTag};
use navassist::vision::source::frame_feed;
use navassist::vision::stub::{Scripted, SyntheticCamera};
use navassist::{Detectors, PipelineConfig, Reactor, VisionPipeline};

const FRAME_WIDTH: u32 = 1280;
const FRAME_HEIGHT: u32 = 720;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = PipelineConfig::from_env()?;
    tracing::info!("Starting NavAssist demo ({:?} profile)", config.profile);

    let (tx, rx) = mpsc::channel(100);
    let clock = Clock::new();
    let cancel = CancellationToken::new();

    let mut reactor = Reactor::new(rx, &config, clock);
    let (feed, source) = frame_feed();

    let camera = SyntheticCamera { width: FRAME_WIDTH, height: FRAME_HEIGHT, interval: Duration::from_millis(500) };
    tokio::spawn(camera.run(feed, clock, cancel.clone()));

    let pipeline = VisionPipeline::new(source, demo_detectors(&config), &config, reactor.mode_receiver(), tx.clone());
    tokio::spawn(pipeline.run(cancel.clone()));

    let input_tx = tx.clone();
    let input_cancel = cancel.clone();
    tokio::spawn(async move {
        println!("Commands: m = toggle mode, r = read aloud, q = quit");
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let action = match line.trim() {
                "m" => UserAction::ToggleMode,
                "r" => UserAction::SpeakAll,
                "q" => break,
                other => {
                    println!("Unknown command '{}'", other);
                    continue;
                }
            };
            if input_tx.send(Event::Action(action)).await.is_err() {
                break;
            }
        }
        input_cancel.cancel();
    });

    let ctrl_c_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c_cancel.cancel();
        }
    });

    let speech: Box<dyn SpeechSink> = match std::env::var("NAVASSIST_VOICE") {
        Ok(program) if !program.is_empty() => Box::new(FlushingSpeaker::new(CommandVoice::new(program))),
        _ => Box::new(FlushingSpeaker::new(LogVoice)),
    };
    let mut sinks = Sinks {
        speech,
        haptic: Box::new(ConsoleHaptic),
        visual: Box::new(ConsoleDisplay::new(FRAME_WIDTH as f32 / 2.0, FRAME_HEIGHT as f32 / 2.0)),
    };

    reactor.run(&mut sinks, cancel).await;

    // Let the closing line play before the speaker is dropped.
    tokio::time::sleep(Duration::from_secs(2)).await;

    let snapshot = reactor.telemetry.snapshot();
    tracing::info!(
        "Published {} frames ({} stale), spoke {} detections, {} throttled",
        snapshot.frame_stats.published,
        snapshot.frame_stats.stale,
        snapshot.speech_stats.detections,
        snapshot.speech_stats.throttled
    );
    Ok(())
}

fn demo_detectors(config: &PipelineConfig) -> Detectors {
    let chair = RawDetection::new(BoundingBox::new(100.0, 300.0, 400.0, 700.0)).with_label("chair", 0.87);
    let door = RawDetection::new(BoundingBox::new(560.0, 40.0, 760.0, 500.0)).with_label("door", 0.72);
    let cup = RawDetection::new(BoundingBox::new(1000.0, 500.0, 1060.0, 560.0));

    let objects = Scripted::new(vec![Ok(vec![chair.clone(), door]), Ok(vec![chair, cup]), Ok(Vec::new())])
        .with_latency(Duration::from_millis(120));
    let scene = Scripted::constant(vec![SceneTag::new("Room", 0.81), SceneTag::new("Furniture", 0.6)])
        .with_latency(Duration::from_millis(80));
    let text = Scripted::new(vec![Ok("EXIT".to_string()), Ok(String::new()), Ok("Platform 2".to_string())])
        .with_latency(Duration::from_millis(150));

    Detectors::new(objects, scene, text, config)
}
