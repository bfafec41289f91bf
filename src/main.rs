use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use routeplanner::osm::{FileFormat, Options, RouteModel};
use routeplanner::{RoutePlanner, SearchOptions};

#[derive(Debug, thiserror::Error)]
#[error("{0}: {1}")]
struct ModelLoadError(PathBuf, #[source] routeplanner::osm::Error);

#[derive(Debug, thiserror::Error)]
#[error("no route between the given points")]
struct NoRouteError;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Auto,
    Xml,
    XmlGz,
    XmlBz2,
}

impl From<Format> for FileFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Auto => FileFormat::Unknown,
            Format::Xml => FileFormat::Xml,
            Format::XmlGz => FileFormat::XmlGz,
            Format::XmlBz2 => FileFormat::XmlBz2,
        }
    }
}

#[derive(Parser)]
#[command(version, about, allow_negative_numbers = true)]
struct Cli {
    /// The path to the OSM file
    osm_file: PathBuf,

    /// Horizontal position of the start point, in percent of the map size
    start_x: f32,

    /// Vertical position of the start point, in percent of the map size
    start_y: f32,

    /// Horizontal position of the end point, in percent of the map size
    end_x: f32,

    /// Vertical position of the end point, in percent of the map size
    end_y: f32,

    /// Format of the OSM file
    #[arg(long, value_enum, default_value_t = Format::Auto)]
    format: Format,

    /// Maximum number of nodes to expand before giving up
    #[arg(long, default_value_t = routeplanner::DEFAULT_STEP_LIMIT)]
    step_limit: usize,

    /// Re-parent nodes when a cheaper path to them is found
    #[arg(long)]
    relax: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let mut logger = colog::default_builder();
    logger.filter_level(if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    });
    logger.parse_default_env();
    logger.init();

    let model = load_model(&cli.osm_file, cli.format.into())?;

    let route = RoutePlanner::new(&model, cli.start_x, cli.start_y, cli.end_x, cli.end_y)?
        .with_options(SearchOptions {
            step_limit: cli.step_limit,
            relax: cli.relax,
        })
        .run()?;

    if route.is_empty() {
        return Err(NoRouteError.into());
    }

    println!("{{");
    println!("  \"type\": \"FeatureCollection\",");
    println!("  \"features\": [");
    println!("    {{");
    println!("      \"type\": \"Feature\",");
    println!("      \"properties\": {{\"distance\": {}}},", route.distance);

    println!("      \"geometry\": {{");
    println!("        \"type\": \"LineString\",");
    println!("        \"coordinates\": [");

    let mut nodes = route
        .nodes
        .iter()
        .filter_map(|&idx| model.node(idx))
        .peekable();
    while let Some(node) = nodes.next() {
        let suffix = if nodes.peek().is_some() { "," } else { "" };
        println!("          [{}, {}]{}", node.lon, node.lat, suffix);
    }

    println!("        ]");
    println!("      }}");
    println!("    }}");
    println!("  ]");
    println!("}}");

    Ok(())
}

fn load_model<P: AsRef<Path>>(
    path: P,
    file_format: FileFormat,
) -> Result<RouteModel, ModelLoadError> {
    let options = Options { file_format };
    RouteModel::from_file(&options, path.as_ref())
        .map_err(|e| ModelLoadError(PathBuf::from(path.as_ref()), e))
}
