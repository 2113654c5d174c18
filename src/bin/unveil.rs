use std::{
    io::{BufWriter, Write as _},
    path::PathBuf,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "unveil", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse and validate a page manifest.
    Validate(ValidateArgs),
    /// Install a manifest over a simulated page, replay a scroll script and print the log.
    Simulate(SimulateArgs),
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Manifest JSON.
    #[arg(long)]
    manifest: PathBuf,
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Simulated page JSON.
    #[arg(long)]
    page: PathBuf,

    /// Manifest JSON.
    #[arg(long)]
    manifest: PathBuf,

    /// Scroll offsets visited in order, e.g. `--scroll 0,400,1200`.
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    scroll: Vec<f64>,

    /// Seconds the clock advances after each scroll step.
    #[arg(long, default_value_t = 0.25)]
    step: f64,

    /// Start with the reduced-motion preference set.
    #[arg(long)]
    reduced_motion: bool,

    /// Print log entries as JSON lines instead of text.
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::Simulate(args) => cmd_simulate(args),
    }
}

fn read_manifest(path: &std::path::Path) -> anyhow::Result<unveil::Manifest> {
    let manifest = unveil::Manifest::from_path(path)
        .with_context(|| format!("load manifest '{}'", path.display()))?;
    manifest
        .validate()
        .with_context(|| format!("validate manifest '{}'", path.display()))?;
    Ok(manifest)
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let manifest = read_manifest(&args.manifest)?;
    println!(
        "ok: {} trigger(s){}",
        manifest.trigger_count(),
        manifest
            .page_class()
            .map(|c| format!(", gated on body class '{c}'"))
            .unwrap_or_default()
    );
    Ok(())
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    anyhow::ensure!(
        args.step.is_finite() && args.step >= 0.0,
        "--step must be finite and >= 0"
    );
    let manifest = read_manifest(&args.manifest)?;
    let host = unveil::sim::SimHost::from_path(&args.page)
        .with_context(|| format!("load page '{}'", args.page.display()))?
        .with_reduced_motion(args.reduced_motion);

    let mut page = unveil::Page::new(host, &manifest).context("install manifest")?;
    page.tick(args.step);
    for &offset in &args.scroll {
        page.scroll_to(offset);
        page.tick(args.step);
    }

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    if args.json {
        for entry in page.host().log() {
            serde_json::to_writer(&mut out, entry).context("serialize log entry")?;
            writeln!(out)?;
        }
    } else {
        for line in page.host().render_log() {
            writeln!(out, "{line}")?;
        }
        writeln!(out, "---")?;
        writeln!(out, "active: {}", page.is_active())?;
        writeln!(out, "time: {:.3}s", unveil::Viewport::now(page.host()))?;
        if let Some(header) = page.header() {
            writeln!(out, "header: {:?}", header.state())?;
        }
        if let Some(spy) = page.spy() {
            writeln!(out, "spy: {}", spy.active().unwrap_or("-"))?;
        }
    }
    out.flush()?;

    page.teardown();
    Ok(())
}
