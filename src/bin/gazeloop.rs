use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "gazeloop", version, about = "Render gaze-replay GIFs from an experiment log")]
struct Cli {
    /// Input experiment log CSV.
    #[arg(short, long, default_value = "data/data_full.csv")]
    input: PathBuf,

    /// Process only the first N eligible trials.
    #[arg(short, long)]
    limit: Option<usize>,

    /// Directory for the generated GIFs.
    #[arg(long, default_value = "output_gifs")]
    out_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let cfg = gazeloop::RenderConfig::default();

    let rows = gazeloop::log::read_log(&cli.input)?;
    let painter = gazeloop::text::TextPainter::from_system_fonts();

    let summary = gazeloop::run_batch(&rows, &cfg, &cli.out_dir, cli.limit, &painter)?;

    eprintln!(
        "done: {} succeeded, {} failed, {} total -> {}",
        summary.succeeded,
        summary.failed,
        summary.total(),
        cli.out_dir.display()
    );
    Ok(())
}
