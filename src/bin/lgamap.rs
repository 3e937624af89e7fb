use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use lgamap_rs::boundaries::{BoundarySource, load_or_fallback};
use lgamap_rs::catalog::{CsvValues, DemoValues, ValueSource, region_names};
use lgamap_rs::choropleth::{ChoroplethMap, MapStatus, MountOptions};
use lgamap_rs::config::AppConfig;
use lgamap_rs::models::ValueMap;
use lgamap_rs::scale::ColorBand;
use lgamap_rs::viz::scene::SceneWidget;
use lgamap_rs::viz::{RenderOptions, render_map};
use lgamap_rs::{storage, widget::BaseLayer};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "lgamap",
    version,
    about = "Generate deterministic LGA demo values and render choropleth maps"
)]
struct Cli {
    /// TOML configuration file; built-in defaults when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print (or save) the value for every region.
    Values(ValuesArgs),
    /// Render the choropleth to .svg, .png or styled .geojson.
    Render(RenderArgs),
    /// Print the colour bands.
    Legend,
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(Args, Debug, Default)]
struct DataArgs {
    /// Seed for the demo generator.
    #[arg(long)]
    seed: Option<String>,
    /// Region list, one name per line (default: the 21 Anambra LGAs).
    #[arg(long)]
    regions: Option<PathBuf>,
    /// `name,value` CSV to use instead of generated demo values.
    #[arg(long = "values")]
    values_csv: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ValuesArgs {
    #[command(flatten)]
    data: DataArgs,
    /// Save results to file (format inferred by --format or extension).
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    data: DataArgs,
    /// Output path (.svg, .png or .geojson).
    #[arg(long)]
    out: PathBuf,
    /// Boundary GeoJSON path or http(s) URL.
    #[arg(long)]
    boundaries: Option<String>,
    /// Width of the image.
    #[arg(long)]
    width: Option<u32>,
    /// Height of the image.
    #[arg(long)]
    height: Option<u32>,
    /// Title drawn above the map.
    #[arg(long)]
    title: Option<String>,
    /// Write "<name>: <value>" at each region's centre.
    #[arg(long, default_value_t = false)]
    labels: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let cfg = AppConfig::load_or_default(cli.config.as_deref())?;
    match cli.cmd {
        Command::Values(args) => cmd_values(&cfg, args),
        Command::Render(args) => cmd_render(&cfg, args),
        Command::Legend => {
            for band in ColorBand::ALL {
                println!("{:<8} {}", band.label(), band.color());
            }
            Ok(())
        }
    }
}

/// Region names and their values, CLI flags first, then config.
fn resolve_values(cfg: &AppConfig, args: &DataArgs) -> Result<(Vec<String>, ValueMap)> {
    let regions_file = args.regions.as_deref().or(cfg.data.regions_file.as_deref());
    let names = region_names(regions_file)?;
    let values = match args.values_csv.as_ref().or(cfg.data.values_csv.as_ref()) {
        Some(path) => CsvValues { path: path.clone() }.values(&names)?,
        None => DemoValues {
            seed: args.seed.clone().unwrap_or_else(|| cfg.data.seed.clone()),
        }
        .values(&names)?,
    };
    Ok((names, values))
}

fn cmd_values(cfg: &AppConfig, args: ValuesArgs) -> Result<()> {
    let (names, values) = resolve_values(cfg, &args.data)?;

    if let Some(path) = args.out.as_ref() {
        let fmt = match args.format {
            Some(OutFormat::Csv) => "csv",
            Some(OutFormat::Json) => "json",
            None => path.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
        }
        .to_ascii_lowercase();
        match fmt.as_str() {
            "csv" => storage::save_csv(&values, path)?,
            "json" => storage::save_json(&values, path)?,
            other => anyhow::bail!("unsupported format: {}", other),
        }
        eprintln!("Saved {} values to {}", values.len(), path.display());
        return Ok(());
    }

    match args.format {
        Some(OutFormat::Json) => println!("{}", serde_json::to_string_pretty(&values)?),
        _ => {
            println!("name,value");
            for name in &names {
                if let Some(v) = values.get(name) {
                    println!("{name},{v}");
                }
            }
        }
    }
    Ok(())
}

fn cmd_render(cfg: &AppConfig, args: RenderArgs) -> Result<()> {
    let (_, values) = resolve_values(cfg, &args.data)?;
    let source = BoundarySource::parse(args.boundaries.as_deref().unwrap_or(&cfg.map.boundaries));
    let load = load_or_fallback(&source, &cfg.map.name_property, cfg.map.fallback_bounds);

    let mount = MountOptions {
        padding: cfg.map.padding,
        legend_title: cfg.map.legend_title.clone(),
        base: BaseLayer::default(),
    };

    let ext = args
        .out
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    let status = if ext == "geojson" || ext == "json" {
        let map = ChoroplethMap::mount(SceneWidget::new(), &load, &values, &mount)?;
        map.widget().save_geojson(&args.out)?;
        map.status().clone()
    } else {
        let options = RenderOptions {
            width: args.width.unwrap_or(cfg.map.width),
            height: args.height.unwrap_or(cfg.map.height),
            title: args.title.clone().unwrap_or_else(|| cfg.map.title.clone()),
            labels: args.labels,
            mount,
        };
        render_map(&args.out, &load, &values, &options)?
    };

    match status {
        MapStatus::Ready { regions } => {
            eprintln!("Wrote map of {regions} regions to {}", args.out.display())
        }
        MapStatus::Fallback(reason) => eprintln!(
            "Boundaries unavailable ({reason}); wrote legend-only map to {}",
            args.out.display()
        ),
    }
    Ok(())
}
