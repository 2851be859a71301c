use std::path::PathBuf;

use clap::Parser;
use formats::config::DashboardConfig;
use formats::dataset::Dataset;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod host;
mod script;

use host::Dashboard;

#[derive(Parser, Debug)]
#[command(author, version, about = "Linked scatterplot and circle-pack dashboard")]
struct Args {
    /// Dataset: JSON array of records, or an object with a `records` array
    #[arg(long)]
    data: PathBuf,

    /// Dashboard config (view sizes, attribute bindings, frame rate)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Gesture script replayed after the first render
    #[arg(long)]
    script: Option<PathBuf>,

    /// Output directory for the SVG snapshots
    #[arg(long, default_value = "out")]
    out: PathBuf,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = real_main(Args::parse()) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main(args: Args) -> Result<(), String> {
    let mut config = match &args.config {
        Some(path) => DashboardConfig::load(path).map_err(|e| e.to_string())?,
        None => DashboardConfig::default(),
    };
    config.apply_env();

    let data = Dataset::load(&args.data).map_err(|e| e.to_string())?;
    info!(
        records = data.len(),
        hash = data.short_hash(),
        path = %args.data.display(),
        "dataset loaded"
    );

    let gestures = match &args.script {
        Some(path) => script::load(path).map_err(|e| e.to_string())?,
        None => Vec::new(),
    };

    let mut dashboard = Dashboard::mount(config, data);
    // Let the enter transitions finish before the first gesture.
    dashboard.run_for(1.0);

    for (step, gesture) in gestures.iter().enumerate() {
        dashboard
            .apply(gesture, Some(args.data.as_path()))
            .map_err(|e| format!("step {step}: {e}"))?;
    }
    dashboard.run_for(1.0);

    for path in dashboard.write_snapshots(&args.out)? {
        info!(path = %path.display(), "snapshot written");
    }
    info!(
        gestures = gestures.len(),
        broadcasts = dashboard.mediator().broadcasts(),
        frames = dashboard.frame().index,
        "replay finished"
    );

    let selected: Vec<String> = dashboard
        .selection()
        .iter()
        .map(|i| i.get().to_string())
        .collect();
    println!("selected: [{}]", selected.join(", "));
    match dashboard.hovered() {
        Some(index) => println!("hovered: {}", index.get()),
        None => println!("hovered: none"),
    }
    Ok(())
}
