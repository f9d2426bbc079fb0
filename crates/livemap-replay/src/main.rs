// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Replays a recorded update stream through a live map session.
//!
//! Input is JSON lines. Each line is either an attribute snapshot,
//! `{"attributes": {"data-polyline": "...", ...}}`, or a pushed message,
//! `{"event": "route", "payload": {...}}`. The session runs against a
//! recording surface and the resulting operation log is written to stdout.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use livemap_app_core::config::ConfigService;
use livemap_app_core::prefs::MapPrefs;
use livemap_codec::{PushedMessage, RecordingSurface, SurfaceOp, ATTR_DESTINATION};
use livemap_config_fs::FsConfigStore;
use livemap_surface_port::LatLng;
use livemap_sync::{AttributeBag, MapSession, PassReport, UpdateSource};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Replay a livemap update stream against a recording surface")]
struct Args {
    /// Destination record, e.g. '{"lat":42.35,"lon":-71.07}'
    #[arg(long)]
    destination: String,
    /// JSON-lines update stream; `-` reads stdin
    #[arg(long, default_value = "-")]
    input: PathBuf,
    /// Map preferences JSON file. Defaults to the saved user prefs.
    #[arg(long)]
    prefs: Option<PathBuf>,
    /// Output format for the operation log
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ReplayLine {
    Attributes { attributes: AttributeBag },
    Pushed(PushedMessage),
}

impl From<ReplayLine> for UpdateSource {
    fn from(line: ReplayLine) -> Self {
        match line {
            ReplayLine::Attributes { attributes } => Self::Attributes(attributes),
            ReplayLine::Pushed(message) => Self::Pushed(message),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(io::stderr)
        .init();

    let prefs = load_prefs(args.prefs.as_deref())?;
    let initial = AttributeBag::new().with(ATTR_DESTINATION, args.destination.as_str());
    let (mut session, report) =
        MapSession::from_attributes(&initial, &prefs, RecordingSurface::new())
            .context("failed to start session")?;

    let mut out = io::stdout().lock();
    let mut pass = 0_u64;
    emit(&mut out, args.format, pass, &mut session, &report)?;

    let reader = open_input(&args.input)?;
    for (index, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read line {}", index + 1))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let update: ReplayLine = match serde_json::from_str(trimmed) {
            Ok(update) => update,
            Err(err) => {
                warn!(line = index + 1, error = %err, "skipping unrecognized line");
                continue;
            }
        };
        pass += 1;
        let report = session.apply(&update.into());
        emit(&mut out, args.format, pass, &mut session, &report)?;
    }

    let (surface, _) = session.close();
    info!(
        passes = pass + 1,
        rejected = surface.rejected,
        "replay finished"
    );
    Ok(())
}

fn load_prefs(path: Option<&Path>) -> Result<MapPrefs> {
    if let Some(path) = path {
        let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        return serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("invalid prefs in {}", path.display()));
    }
    match FsConfigStore::new() {
        Ok(store) => ConfigService::new(store)
            .load_map_prefs()
            .context("failed to load saved map prefs"),
        Err(err) => {
            warn!(error = %err, "no config dir; using default prefs");
            Ok(MapPrefs::default())
        }
    }
}

fn open_input(path: &Path) -> Result<Box<dyn BufRead>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    Ok(Box::new(BufReader::new(file)))
}

fn emit(
    out: &mut impl Write,
    format: Format,
    pass: u64,
    session: &mut MapSession<RecordingSurface>,
    report: &PassReport,
) -> Result<()> {
    for issue in &report.issues {
        match format {
            Format::Text => writeln!(out, "{pass:>4}  ! {}: {}", issue.field, issue.reason)?,
            Format::Json => writeln!(
                out,
                "{}",
                json!({"pass": pass, "issue": issue.field, "reason": issue.reason})
            )?,
        }
    }
    for op in session.surface_mut().take_ops() {
        match format {
            Format::Text => writeln!(out, "{pass:>4}  {}", describe(&op))?,
            Format::Json => {
                let mut record = op_json(&op);
                record["pass"] = json!(pass);
                writeln!(out, "{record}")?;
            }
        }
    }
    for failure in &report.outcome.failures {
        match format {
            Format::Text => writeln!(out, "{pass:>4}  x {}: {}", failure.op, failure.error)?,
            Format::Json => writeln!(
                out,
                "{}",
                json!({"pass": pass, "failed": failure.op, "error": failure.error.to_string()})
            )?,
        }
    }
    for name in &report.outcome.deferred {
        match format {
            Format::Text => writeln!(out, "{pass:>4}  - {name} deferred")?,
            Format::Json => writeln!(out, "{}", json!({"pass": pass, "deferred": name}))?,
        }
    }
    Ok(())
}

fn point(p: LatLng) -> Value {
    json!([p.lat, p.lon])
}

fn op_json(op: &SurfaceOp) -> Value {
    let mut record = match op {
        SurfaceOp::CreateMarker { handle, def } => json!({
            "handle": handle.0,
            "position": point(def.position),
            "icon": format!("{:?}", def.icon.kind).to_lowercase(),
            "heading": def.heading.map(|h| h.degrees()),
            "label": def.label,
        }),
        SurfaceOp::UpdateMarker {
            handle,
            position,
            heading,
            label,
        } => json!({
            "handle": handle.0,
            "position": point(*position),
            "heading": heading.map(|h| h.degrees()),
            "label": label,
        }),
        SurfaceOp::RemoveMarker { handle } => json!({ "handle": handle.0 }),
        SurfaceOp::CreateLine { handle, points } | SurfaceOp::UpdateLine { handle, points } => {
            json!({
                "handle": handle.0,
                "points": points.iter().copied().map(point).collect::<Vec<_>>(),
            })
        }
        SurfaceOp::RemoveLine { handle } => json!({ "handle": handle.0 }),
        SurfaceOp::FrameToBound { bounds, padding } => json!({
            "southwest": point(bounds.southwest),
            "northeast": point(bounds.northeast),
            "padding": [padding.x, padding.y],
        }),
        SurfaceOp::FrameToCenter { center, zoom } => json!({
            "center": point(*center),
            "zoom": zoom,
        }),
        SurfaceOp::ShowPopup {
            handle,
            anchor,
            text,
        } => json!({
            "handle": handle.0,
            "anchor": point(*anchor),
            "text": text,
        }),
        SurfaceOp::UpdatePopup { handle, text } => json!({ "handle": handle.0, "text": text }),
        SurfaceOp::HidePopup { handle } => json!({ "handle": handle.0 }),
        SurfaceOp::InvalidateSize => json!({}),
    };
    record["op"] = json!(op.name());
    record
}

fn describe(op: &SurfaceOp) -> String {
    match op {
        SurfaceOp::CreateMarker { handle, def } => format!(
            "create_marker #{} {:?} at {} heading {}",
            handle.0,
            def.icon.kind,
            fmt_point(def.position),
            fmt_heading(def.heading.map(|h| h.degrees())),
        ),
        SurfaceOp::UpdateMarker {
            handle,
            position,
            heading,
            ..
        } => format!(
            "update_marker #{} to {} heading {}",
            handle.0,
            fmt_point(*position),
            fmt_heading(heading.map(|h| h.degrees())),
        ),
        SurfaceOp::RemoveMarker { handle } => format!("remove_marker #{}", handle.0),
        SurfaceOp::CreateLine { handle, points } => {
            format!("create_line #{} ({} points)", handle.0, points.len())
        }
        SurfaceOp::UpdateLine { handle, points } => {
            format!("update_line #{} ({} points)", handle.0, points.len())
        }
        SurfaceOp::RemoveLine { handle } => format!("remove_line #{}", handle.0),
        SurfaceOp::FrameToBound { bounds, padding } => format!(
            "frame_to_bound {} .. {} padding {}x{}",
            fmt_point(bounds.southwest),
            fmt_point(bounds.northeast),
            padding.x,
            padding.y
        ),
        SurfaceOp::FrameToCenter { center, zoom } => {
            format!("frame_to_center {} zoom {zoom}", fmt_point(*center))
        }
        SurfaceOp::ShowPopup { handle, text, .. } => {
            format!("show_popup #{} {text:?}", handle.0)
        }
        SurfaceOp::UpdatePopup { handle, text } => format!("update_popup #{} {text:?}", handle.0),
        SurfaceOp::HidePopup { handle } => format!("hide_popup #{}", handle.0),
        SurfaceOp::InvalidateSize => op.name().to_owned(),
    }
}

fn fmt_point(p: LatLng) -> String {
    format!("({:.5}, {:.5})", p.lat, p.lon)
}

fn fmt_heading(degrees: Option<f64>) -> String {
    degrees.map_or_else(|| "-".to_owned(), |d| format!("{d}"))
}
