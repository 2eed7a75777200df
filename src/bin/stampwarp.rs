use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "stampwarp", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a scene to a PNG.
    Render(RenderArgs),
    /// Print a starter scene JSON to stdout.
    Defaults,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input scene JSON. Asset paths resolve relative to its directory.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Output width; overrides the scene's export size. Requires --height.
    #[arg(long, requires = "height")]
    width: Option<u32>,

    /// Output height; overrides the scene's export size. Requires --width.
    #[arg(long, requires = "width")]
    height: Option<u32>,

    /// Blend mode override (e.g. `multiply`, `color-dodge`).
    #[arg(long)]
    blend: Option<stampwarp::BlendMode>,

    /// Shade rows on the calling thread only.
    #[arg(long)]
    serial: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Defaults => cmd_defaults(),
    }
}

fn read_scene(path: &Path) -> anyhow::Result<stampwarp::SceneConfig> {
    let scene = stampwarp::SceneConfig::load(path)
        .with_context(|| format!("load scene '{}'", path.display()))?;
    Ok(scene)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut scene = read_scene(&args.in_path)?;
    if let Some(mode) = args.blend {
        scene.state.blend_mode = mode;
    }
    if args.serial {
        scene.threading.parallel = false;
    }
    if let (Some(width), Some(height)) = (args.width, args.height) {
        scene.export = Some(stampwarp::Canvas::new(width, height)?);
    }
    scene.validate()?;

    let root = args.in_path.parent().unwrap_or_else(|| Path::new("."));
    let session = scene
        .open_session(root)
        .with_context(|| format!("open scene assets under '{}'", root.display()))?;

    let frame = session
        .export_png(&args.out, Some(scene.export_size()))
        .with_context(|| format!("export '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} ({}x{})",
        args.out.display(),
        frame.width,
        frame.height
    );
    Ok(())
}

fn cmd_defaults() -> anyhow::Result<()> {
    let json = stampwarp::SceneConfig::example().to_json_pretty()?;
    println!("{json}");
    Ok(())
}
