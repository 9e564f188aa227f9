use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use sofa_core::{ConfigurationSummary, RenderOptions, SofaConfiguration, SofaSpec};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!(
            "Usage: sofa-blueprint <config.json> <output.(png|svg|json)> [px_per_cm] [font.ttf]"
        );
        std::process::exit(2);
    }
    let input = &args[1];
    let output = Path::new(&args[2]);
    let defaults = RenderOptions::default();
    let options = RenderOptions {
        px_per_cm: args
            .get(3)
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.px_per_cm),
        font_path: args.get(4).map(PathBuf::from),
    };

    let txt = fs::read_to_string(input)?;
    let spec: SofaSpec = serde_json::from_str(&txt)?;
    let config = SofaConfiguration::try_from(spec)?;

    let ext = output
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("json") => {
            let summary = ConfigurationSummary::from(&config);
            fs::write(output, serde_json::to_string_pretty(&summary)?)?;
        }
        Some("svg") => {
            let (svg, width, height) = sofa_core::svg_configuration(&config, &options)?;
            fs::write(output, svg)?;
            info!(width, height, "wrote vector drawing");
        }
        Some("png") => {
            let image = sofa_core::render_configuration(&config, &options)?;
            fs::write(output, &image.png)?;
            info!(width = image.width, height = image.height, "wrote raster");
        }
        _ => {
            eprintln!("unsupported output extension: {}", output.display());
            std::process::exit(2);
        }
    }
    info!(shape = %config.shape(), output = %output.display(), "done");
    Ok(())
}
