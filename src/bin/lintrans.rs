use std::path::PathBuf;

use anyhow::Context as _;
use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "lintrans", version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the full animation as a GIF.
    Render(RenderArgs),
    /// Render a single interpolation step as a PNG.
    Frame(FrameArgs),
    /// Write the reference scene as JSON, as a starting point for `--in`.
    Scene(SceneArgs),
}

#[derive(Args, Debug)]
struct SceneOpts {
    /// Input scene JSON. Defaults to the reference shear of a 9x7 grid.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    /// Number of interpolation steps (frames = steps + 1).
    #[arg(long)]
    steps: Option<u32>,

    /// Pixels per inch.
    #[arg(long)]
    dpi: Option<u32>,

    /// Figure width and height in inches.
    #[arg(long, num_args = 2, value_names = ["W", "H"])]
    figure_size: Option<Vec<f64>>,

    /// Scratch directory for frame images (removed after the run).
    #[arg(long)]
    work_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    scene: SceneOpts,

    /// Output animation path (.gif).
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    scene: SceneOpts,

    /// Step index, 0 = identity.
    #[arg(long)]
    step: u32,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct SceneArgs {
    /// Output JSON path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Scene(args) => cmd_scene(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_scene(opts: SceneOpts) -> anyhow::Result<lintrans::SceneSpec> {
    let mut scene = match &opts.in_path {
        Some(path) => lintrans::SceneSpec::read_json(path)
            .with_context(|| format!("load scene '{}'", path.display()))?,
        None => lintrans::SceneSpec::reference(),
    };
    if let Some(steps) = opts.steps {
        scene.steps = steps;
    }
    if let Some(dpi) = opts.dpi {
        scene.render.dpi = dpi;
    }
    if let Some(size) = opts.figure_size {
        let [w, h] = size.as_slice() else {
            anyhow::bail!("--figure-size takes exactly two values");
        };
        scene.render.figure_size = (*w, *h);
    }
    if let Some(dir) = opts.work_dir {
        scene.render.work_dir = dir;
    }
    Ok(scene)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let scene = load_scene(args.scene)?;
    let viz = lintrans::LinearTransformVisualizer::from_scene(&scene)?;
    let stats = viz
        .visualize_with(&args.out, &scene.render)
        .with_context(|| format!("render animation '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} ({} frames, {}x{})",
        args.out.display(),
        stats.frames_rendered,
        stats.width,
        stats.height
    );
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let scene = load_scene(args.scene)?;
    let viz = lintrans::LinearTransformVisualizer::from_scene(&scene)?;
    let frame = viz.render_frame(args.step, &scene.render)?;

    lintrans::workdir::ensure_parent_dir(&args.out)?;
    frame
        .save_png(&args.out)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_scene(args: SceneArgs) -> anyhow::Result<()> {
    lintrans::SceneSpec::reference()
        .write_json(&args.out)
        .with_context(|| format!("write scene '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}
