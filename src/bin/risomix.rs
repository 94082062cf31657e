use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "risomix", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a scene file as a PNG (combined view).
    Render(RenderArgs),
    /// Paint a decorative effect from the scene's sampled colors.
    Effect(EffectArgs),
    /// List the ink palette.
    Inks,
    /// Print colors sampled from an image.
    Sample(SampleArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input scene JSON.
    #[arg(long)]
    scene: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Override the random seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Misregistration preset applied before rendering.
    #[arg(long)]
    misregister: Option<String>,

    /// Render the side-by-side separated view instead.
    #[arg(long)]
    separated: bool,
}

#[derive(Parser, Debug)]
struct EffectArgs {
    /// One of `dots`, `lines`, `mix`.
    effect: String,

    /// Input scene JSON.
    #[arg(long)]
    scene: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Override the random seed.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Parser, Debug)]
struct SampleArgs {
    /// Image to sample.
    #[arg(long)]
    image: PathBuf,

    /// Override the random seed.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Effect(args) => cmd_effect(args),
        Command::Inks => cmd_inks(),
        Command::Sample(args) => cmd_sample(args),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("RISOMIX_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_session(scene: &Path, seed: Option<u64>) -> anyhow::Result<risomix::Session> {
    let file = risomix::SceneFile::load(scene)?;
    let root = scene.parent().unwrap_or_else(|| Path::new("."));
    let session = file
        .into_session(root, seed, None)
        .with_context(|| format!("build session from '{}'", scene.display()))?;
    Ok(session)
}

fn report(err: risomix::RisoError) -> anyhow::Error {
    match risomix::Session::user_message(&err) {
        Some(msg) => anyhow::anyhow!(msg),
        None => err.into(),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut session = open_session(&args.scene, args.seed)?;

    if let Some(name) = &args.misregister {
        let preset: risomix::MisregistrationPreset = name.parse()?;
        session
            .apply(risomix::Command::Misregistration(preset))
            .map_err(report)?;
    }

    let frame = if args.separated {
        session
            .apply(risomix::Command::ToggleSeparation)
            .map_err(report)?;
        session.render()?
    } else {
        session.render_for_export()?
    };
    risomix::save_png(&frame, &args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_effect(args: EffectArgs) -> anyhow::Result<()> {
    let effect: risomix::GenerativeEffect = args.effect.parse()?;
    let mut session = open_session(&args.scene, args.seed)?;
    let frame = session.draw_effect(effect).map_err(report)?;
    risomix::save_png(&frame, &args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_inks() -> anyhow::Result<()> {
    for ink in risomix::palette() {
        println!("{:<20} {:<20} {}", ink.key, ink.name, ink.rgb.to_hex());
    }
    Ok(())
}

fn cmd_sample(args: SampleArgs) -> anyhow::Result<()> {
    let upload = risomix::Upload::from_path(&args.image)?;
    let image = upload
        .decode()?
        .with_context(|| format!("'{}' is not an image", args.image.display()))?;
    let mut rng = match risomix::resolve_seed(args.seed) {
        Some(seed) => risomix::Rng64::new(seed),
        None => risomix::Rng64::from_clock(),
    };
    for c in risomix::extract_colors(image.rgba(), &mut rng) {
        println!("{}", c.to_hex());
    }
    Ok(())
}
