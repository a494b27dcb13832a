//! Lays out a Blockflow document and writes it as SVG next to a re-export.
//!
//! Usage: `flow-demo [INPUT.json] [OUT_DIR]`. Without an input the built-in
//! sample flow is used.

mod sample;
mod svg;

use anyhow::Context;
use blockflow_canvas::prelude::*;
use std::fs;
use std::path::PathBuf;
use svg::SvgSurface;

/// Measured bodies can grow blocks, which moves their tails; settle first.
const MAX_FRAMES: usize = 8;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let mut args = std::env::args().skip(1);
    let input = args.next();
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| ".".to_owned()));

    let mut canvas = Canvas::new(SvgSurface::new(), CanvasConfig::default());
    canvas.subscribe_all(|event| log::debug!("{}: {event:?}", event.kind().name()));

    match input {
        Some(path) => {
            let text =
                fs::read_to_string(&path).with_context(|| format!("failed to read {path}"))?;
            let report = canvas.import_str(&text);
            log::info!(
                "imported {} blocks, {} connections ({} snapped, {} skipped)",
                report.blocks,
                report.connections,
                report.snapped,
                report.skipped_links
            );
            if canvas.graph().is_empty() {
                anyhow::bail!("{path} holds no importable blocks");
            }
        }
        None => {
            log::info!("no input given, using the sample flow");
            sample::populate(&mut canvas);
        }
    }

    canvas.set_viewport_size(1024.0, 768.0);
    let mut frames = 0;
    while canvas.needs_frame() && frames < MAX_FRAMES {
        canvas.frame();
        frames += 1;
    }
    log::info!(
        "settled after {frames} frame(s), {} requested",
        canvas.surface().frames_requested()
    );

    fs::create_dir_all(&out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;
    let svg_path = out_dir.join("flow.svg");
    fs::write(&svg_path, canvas.surface().to_svg())
        .with_context(|| format!("failed to write {}", svg_path.display()))?;
    let json_path = out_dir.join("flow.json");
    let document = serde_json::to_string_pretty(&canvas.export())?;
    fs::write(&json_path, document)
        .with_context(|| format!("failed to write {}", json_path.display()))?;

    println!("wrote {} and {}", svg_path.display(), json_path.display());
    Ok(())
}
