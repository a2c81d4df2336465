//! Headless host for the trajectory engine: replays a recorded snapshot feed
//! against a synthetic clock and prints each frame's draw state as a JSON
//! line. A real deployment swaps this for a display loop; the engine doesn't
//! care which.

#[macro_use]
extern crate log;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use structopt::StructOpt;

use engine::{Config, Engine, EntityFrame, Sample, Time};

#[derive(StructOpt)]
#[structopt(name = "skylight")]
struct Args {
    /// Path to a JSON config file; engine defaults are used when omitted
    #[structopt(long)]
    config: Option<String>,
    /// A recorded feed: either a JSON array of snapshot batches, or an array
    /// of the upstream service's {"planes": [...]} documents
    #[structopt(long)]
    feed: String,
    /// Viewport size in pixels
    #[structopt(long, default_value = "800")]
    width: f64,
    #[structopt(long, default_value = "450")]
    height: f64,
    /// Animation-clock seconds between snapshot batches
    #[structopt(long, default_value = "15")]
    feed_interval: f64,
    /// Pin the curve generator for reproducible output
    #[structopt(long)]
    seed: Option<u64>,
    /// Stop after this many animation-clock seconds, even if aircraft remain
    #[structopt(long)]
    run_for: Option<f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FeedFile {
    Batches(Vec<Vec<Sample>>),
    Recorded(Vec<RecordedBatch>),
}

#[derive(Deserialize)]
struct RecordedBatch {
    planes: Vec<Sample>,
}

#[derive(Serialize)]
struct FrameOut<'a> {
    t: f64,
    entities: &'a [EntityFrame],
}

fn load_feed(path: &str) -> Result<Vec<Vec<Sample>>> {
    let bytes = fs_err::read(path)?;
    match serde_json::from_slice(&bytes)? {
        FeedFile::Batches(batches) => Ok(batches),
        FeedFile::Recorded(batches) => Ok(batches.into_iter().map(|b| b.planes).collect()),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::from_args();

    let config: Config = match &args.config {
        Some(path) => serde_json::from_slice(&fs_err::read(path)?)?,
        None => Config::default(),
    };
    let batches = load_feed(&args.feed)?;
    info!("Replaying {} snapshot batches", batches.len());

    let mut engine = Engine::new(config, args.width, args.height, args.seed)?;

    let dt = 1.0 / engine.config().target_fps;
    let mut batches = batches.into_iter();
    let mut next_feed = 0.0;
    let mut exhausted = false;
    let mut t = 0.0;
    loop {
        if !exhausted && t >= next_feed {
            match batches.next() {
                Some(batch) => engine.reconcile(&batch, Time::seconds(t)),
                None => exhausted = true,
            }
            next_feed += args.feed_interval;
        }

        if let Some(frames) = engine.tick(Time::seconds(t)) {
            println!(
                "{}",
                serde_json::to_string(&FrameOut {
                    t,
                    entities: &frames
                })?
            );
        }
        t += dt;

        if let Some(limit) = args.run_for {
            if t >= limit {
                break;
            }
        } else if exhausted && engine.registry().is_empty() {
            break;
        }
    }
    info!("Done after {:.1}s of animation", t);
    Ok(())
}
