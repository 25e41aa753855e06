//! Replays a short scripted session through the tracker and prints every
//! render call.
//!
//! ```text
//! RUST_LOG=anchor_track=debug cargo run --example replay --features std
//! ```

use anchor_track::prelude::*;
use anchor_track::TrackerResult;
use tracing_subscriber::EnvFilter;

/// Sink that prints each call instead of drawing.
#[derive(Default)]
struct PrintSink {
    next: u32,
}

impl RenderSink for PrintSink {
    type Handle = u32;

    fn spawn(&mut self, class_label: &str, pose: &Pose, kind: AnchorKind) -> u32 {
        self.next += 1;
        let p = pose.position;
        println!(
            "  spawn   #{:<2} {class_label:<6} {kind:?} at ({:.2}, {:.2}, {:.2})",
            self.next, p.x, p.y, p.z
        );
        self.next
    }

    fn move_to(&mut self, handle: &u32, pose: &Pose) {
        let p = pose.position;
        println!("  move    #{handle:<2} to ({:.2}, {:.2}, {:.2})", p.x, p.y, p.z);
    }

    fn destroy(&mut self, handle: u32) {
        println!("  destroy #{handle}");
    }
}

struct Step {
    label: &'static str,
    detections: Vec<Detection>,
    commit_held: bool,
}

fn script() -> Vec<Step> {
    let step = |label, detections, commit_held| Step { label, detections, commit_held };
    vec![
        step("chair appears", vec![Detection::at("chair", 2.00, 0.0, 1.00)], false),
        step("chair jitters", vec![Detection::at("chair", 2.03, 0.0, 1.01)], false),
        step("chair lost", vec![], false),
        step(
            "two chair hits, commit pressed",
            vec![Detection::at("chair", 2.00, 0.0, 1.00), Detection::at("chair", 2.10, 0.0, 1.00)],
            true,
        ),
        step(
            "commit released",
            vec![Detection::at("chair", 2.00, 0.0, 1.00), Detection::at("chair", 2.10, 0.0, 1.00)],
            false,
        ),
        step("scene empty", vec![], false),
    ]
}

fn main() -> TrackerResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut tracker = TrackerBuilder::new(TrackerConfig::default())
        .pose_resolver(PassthroughResolver)
        .render_sink(PrintSink::default())
        .build()?;
    tracker.mark_ready();

    for (frame, step) in script().iter().enumerate() {
        println!("frame {frame}: {}", step.label);
        let input = FrameInput::new(&step.detections)
            .with_commit_held(step.commit_held)
            .with_delta(1.0 / 72.0);
        let report = tracker.tick(input);
        for event in &report.events {
            println!("  event   {event:?}");
        }
    }

    println!("reset");
    for event in tracker.reset() {
        println!("  event   {event:?}");
    }
    Ok(())
}
