use std::{path::PathBuf, sync::Arc};

use alphaplay::{
    BuiltinShaders, Compositor, DataSource, DrawOutcome, FrameSync, Orientation, PixelSize,
    PixelTextureProducer, RecordingGl, RendererConfig, ScaleMode, compute_geometry,
    render::ContinuousRendering,
};
use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "alphaplay", version)]
struct Cli {
    /// Log filter, e.g. `info` or `alphaplay=debug`. Overrides `RUST_LOG`.
    #[arg(long, global = true)]
    log: Option<String>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the quad computed for a viewport, frame and scale mode as JSON.
    Geometry(GeometryArgs),
    /// Validate a data-source JSON file and show which file each orientation plays.
    CheckSource(CheckSourceArgs),
    /// Replay a first-frame / completion sequence against a recording GL context.
    DryRun(DryRunArgs),
}

#[derive(Parser, Debug)]
struct GeometryArgs {
    /// Viewport size as WIDTHxHEIGHT.
    #[arg(long, value_parser = parse_size)]
    viewport: PixelSize,

    /// Color-frame size as WIDTHxHEIGHT.
    #[arg(long, value_parser = parse_size)]
    frame: PixelSize,

    /// Scale mode, e.g. `aspect-fill`, `fit-inside`, `fill-top`.
    #[arg(long, value_parser = parse_mode, default_value = "aspect-fill")]
    mode: ScaleMode,
}

#[derive(Parser, Debug)]
struct CheckSourceArgs {
    /// Data-source JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct DryRunArgs {
    #[arg(long, value_parser = parse_size, default_value = "1080x1920")]
    viewport: PixelSize,

    #[arg(long, value_parser = parse_size, default_value = "1920x1080")]
    frame: PixelSize,

    #[arg(long, value_parser = parse_mode, default_value = "aspect-fill")]
    mode: ScaleMode,

    /// Draw ticks to run between first frame and completion.
    #[arg(long, default_value_t = 2)]
    ticks: u32,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log.as_deref())?;
    match cli.cmd {
        Command::Geometry(args) => cmd_geometry(args),
        Command::CheckSource(args) => cmd_check_source(args),
        Command::DryRun(args) => cmd_dry_run(args),
    }
}

fn init_tracing(filter: Option<&str>) -> anyhow::Result<()> {
    let filter = match filter {
        Some(f) => EnvFilter::try_new(f).with_context(|| format!("invalid log filter '{f}'"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn parse_size(s: &str) -> Result<PixelSize, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let w: u32 = w.trim().parse().map_err(|e| format!("bad width '{w}': {e}"))?;
    let h: u32 = h.trim().parse().map_err(|e| format!("bad height '{h}': {e}"))?;
    Ok(PixelSize::new(w, h))
}

fn parse_mode(s: &str) -> Result<ScaleMode, String> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|_| format!("unknown scale mode '{s}'"))
}

fn cmd_geometry(args: GeometryArgs) -> anyhow::Result<()> {
    let geometry = compute_geometry(args.viewport.to_size(), args.frame.to_size(), args.mode)
        .with_context(|| {
            format!(
                "dimensions must be positive (viewport {}x{}, frame {}x{})",
                args.viewport.width, args.viewport.height, args.frame.width, args.frame.height
            )
        })?;
    let vertices: Vec<[f32; 5]> = geometry
        .vertices()
        .iter()
        .map(|v| [v.position[0], v.position[1], v.position[2], v.uv[0], v.uv[1]])
        .collect();
    let out = serde_json::json!({
        "mode": args.mode,
        "viewport": args.viewport,
        "frame": args.frame,
        "vertices": vertices,
        "position_bounds": geometry.position_bounds(),
        "uv_bounds": geometry.uv_bounds(),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn cmd_check_source(args: CheckSourceArgs) -> anyhow::Result<()> {
    let source = DataSource::from_path(&args.in_path)?;
    for orientation in [Orientation::Portrait, Orientation::Landscape] {
        let path = source.resolve_path(orientation)?;
        let mode = source
            .entry_for(orientation)
            .map(|e| e.scale_mode)
            .unwrap_or_default();
        let exists = if path.is_file() { "ok" } else { "missing" };
        println!("{orientation:?}: {} ({mode:?}) [{exists}]", path.display());
    }
    println!("looping: {}", source.looping);
    Ok(())
}

fn cmd_dry_run(args: DryRunArgs) -> anyhow::Result<()> {
    let sync = Arc::new(FrameSync::new());
    let config = RendererConfig {
        scale_mode: args.mode,
        ..RendererConfig::default()
    };
    let mut comp = Compositor::new(
        RecordingGl::new(),
        config,
        BuiltinShaders,
        PixelTextureProducer,
        Arc::clone(&sync),
        Arc::new(ContinuousRendering),
    )?;

    comp.on_surface_created()?;
    comp.on_surface_changed(args.viewport.width, args.viewport.height);
    comp.set_frame_size(args.frame);

    let mut outcomes: Vec<DrawOutcome> = Vec::new();
    sync.first_frame();
    for _ in 0..args.ticks {
        outcomes.push(comp.on_draw_frame());
    }
    sync.completion();
    outcomes.push(comp.on_draw_frame());

    let stats = comp.stats();
    let live = comp.gl().live_objects();
    let out = serde_json::json!({
        "outcomes": outcomes.iter().map(|o| format!("{o:?}")).collect::<Vec<_>>(),
        "ticks": stats.ticks,
        "draws": stats.draws,
        "clears_only": stats.clears_only,
        "geometry_uploads": stats.geometry_uploads,
        "gl_errors": comp.diagnostics().total(),
        "live_gl_objects": live.total(),
        "uv_bounds": comp.policy().geometry().uv_bounds(),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
