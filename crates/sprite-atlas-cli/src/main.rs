use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgAction, Parser};
use serde::Deserialize;
use sprite_atlas_core::config::{AtlasConfig, MaxRectsHeuristic, MetadataFormat, TransparentPolicy};
use sprite_atlas_core::{build_atlas, load_sources, output_paths, write_outputs};
use tracing::{info, warn};
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(
    name = "sprite-atlas",
    about = "Packs some images to single texture atlas",
    version,
    author
)]
struct Cli {
    /// Source image files (directories are searched for images)
    #[arg(required = true, help_heading = "Input/Output")]
    sources: Vec<PathBuf>,
    /// Creates texture atlas with the specified <name>. Default name is "map"
    #[arg(short = 'O', long = "output", value_name = "name", default_value = "map", help_heading = "Input/Output")]
    output: String,
    /// Directory the atlas files are written to
    #[arg(short = 'd', long, default_value = ".", help_heading = "Input/Output")]
    out_dir: PathBuf,
    /// YAML config file path (overrides packing options)
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,
    /// Metadata format: plist | json
    #[arg(long, default_value = "plist", help_heading = "Input/Output")]
    metadata: String,

    /// Crops empty spaces in textures
    #[arg(short = 'C', long, default_value_t = false, help_heading = "Packing")]
    crop: bool,
    /// Never rotate images by 90°
    #[arg(long, default_value_t = false, help_heading = "Packing")]
    no_rotation: bool,
    /// Give up once the canvas would grow beyond this side length
    #[arg(long, help_heading = "Packing")]
    max_size: Option<u32>,
    /// MaxRects heuristic: baf|bssf|blsf|bl|cp
    #[arg(long, default_value = "baf", help_heading = "Packing")]
    heuristic: String,
    /// Fully transparent images when cropping: skip | one_by_one | keep
    #[arg(long, default_value = "skip", help_heading = "Packing")]
    transparent_policy: String,
    /// Crop images in parallel (requires core feature `parallel`)
    #[arg(long, default_value_t = false, help_heading = "Packing")]
    parallel: bool,

    /// Print the merged configuration (after CLI/YAML) and exit
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config_format: String,
    /// Export packing stats (JSON) to this file
    #[arg(long, help_heading = "Export")]
    export_stats: Option<PathBuf>,

    /// Show progress bars (disable with --progress=false or --quiet)
    #[arg(long, default_value_t = true, action = ArgAction::Set, help_heading = "Logging/UX")]
    progress: bool,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(short, long, default_value_t = false, help_heading = "Logging/UX")]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    run(&cli, cli.progress && !cli.quiet)
}

fn run(cli: &Cli, show_progress: bool) -> anyhow::Result<()> {
    let mut cfg = AtlasConfig {
        output_name: cli.output.clone(),
        crop: cli.crop,
        allow_rotation: !cli.no_rotation,
        max_size: cli.max_size,
        heuristic: parse_heuristic(&cli.heuristic)?,
        transparent_policy: parse_transparent_policy(&cli.transparent_policy)?,
        metadata: parse_metadata(&cli.metadata)?,
        parallel: cli.parallel,
        ..Default::default()
    };
    if let Some(path) = &cli.config {
        let file = fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
        let y: YamlConfig = serde_yaml::from_str(&file)?;
        cfg = y.into_atlas_config(cfg)?;
    }
    cfg.validate()?;

    if cli.print_config {
        match cli.print_config_format.as_str() {
            "yaml" => println!("{}", serde_yaml::to_string(&cfg)?),
            _ => println!("{}", serde_json::to_string_pretty(&cfg)?),
        }
        return Ok(());
    }

    let paths = gather_paths(&cli.sources)?;
    if paths.is_empty() {
        anyhow::bail!("no image files found in the given sources");
    }

    let (png_path, meta_path) = output_paths(&cli.out_dir, &cfg);
    // bare names too: `map.png` given on the command line is the output, not a sprite
    let reserved = vec![
        png_path.clone(),
        meta_path.clone(),
        PathBuf::from(cfg.texture_file_name()),
        PathBuf::from(cfg.metadata_file_name()),
    ];
    let sources = load_with_progress(&paths, &reserved, show_progress)?;
    info!(count = sources.len(), "loaded input images");

    let out = build_atlas(sources, &cfg)?;
    info!("{}", out.stats().summary());

    fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("create out_dir {}", cli.out_dir.display()))?;
    write_outputs(&out, &cli.out_dir, &cfg)?;
    info!(png = ?png_path, metadata = ?meta_path, "Result saved");

    if let Some(stats_path) = &cli.export_stats {
        let json = serde_json::to_string_pretty(&out.stats())?;
        fs::write(stats_path, json).with_context(|| format!("write {}", stats_path.display()))?;
        info!(?stats_path, "stats exported");
    }
    Ok(())
}

fn parse_heuristic(s: &str) -> anyhow::Result<MaxRectsHeuristic> {
    s.parse()
        .map_err(|_| anyhow::anyhow!("unknown heuristic: {} (expected baf|bssf|blsf|bl|cp)", s))
}

fn parse_transparent_policy(s: &str) -> anyhow::Result<TransparentPolicy> {
    s.parse()
        .map_err(|_| anyhow::anyhow!("unknown transparent policy: {} (expected skip|one_by_one|keep)", s))
}

fn parse_metadata(s: &str) -> anyhow::Result<MetadataFormat> {
    s.parse()
        .map_err(|_| anyhow::anyhow!("unknown metadata format: {} (expected plist|json)", s))
}

/// Files are kept in command-line order; directories contribute their images sorted by path.
fn gather_paths(sources: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for src in sources {
        if src.is_dir() {
            let mut found = Vec::new();
            for entry in WalkDir::new(src).follow_links(true) {
                let entry = entry.with_context(|| format!("walk {}", src.display()))?;
                if entry.file_type().is_file() && is_image(entry.path()) {
                    found.push(entry.into_path());
                }
            }
            found.sort();
            if found.is_empty() {
                warn!(dir = ?src, "no images in directory");
            }
            out.extend(found);
        } else {
            out.push(src.clone());
        }
    }
    Ok(out)
}

fn is_image(p: &Path) -> bool {
    matches!(
        p.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref(),
        Some("png" | "jpg" | "jpeg" | "bmp" | "gif" | "tga" | "tiff" | "webp")
    )
}

fn load_with_progress(
    paths: &[PathBuf],
    reserved: &[PathBuf],
    progress: bool,
) -> anyhow::Result<Vec<sprite_atlas_core::SourceImage>> {
    use indicatif::{ProgressBar, ProgressStyle};
    let bar = if progress {
        let b = ProgressBar::new(paths.len() as u64);
        b.set_style(ProgressStyle::with_template(
            "{spinner:.green} loading {pos}/{len} [{elapsed_precise}] {wide_msg}",
        )?);
        Some(b)
    } else {
        None
    };
    let list = load_sources(paths, reserved, |p| {
        if let Some(b) = &bar {
            let msg = p.file_name().and_then(|s| s.to_str()).unwrap_or("");
            b.set_message(msg.to_string());
            b.inc(1);
        }
    });
    if let Some(b) = &bar {
        b.finish_and_clear();
    }
    Ok(list)
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct YamlConfig {
    output_name: Option<String>,
    crop: Option<bool>,
    allow_rotation: Option<bool>,
    initial_size: Option<u32>,
    max_size: Option<u32>,
    heuristic: Option<String>,
    transparent_policy: Option<String>,
    metadata: Option<String>,
    parallel: Option<bool>,
}

impl YamlConfig {
    fn into_atlas_config(self, mut cfg: AtlasConfig) -> anyhow::Result<AtlasConfig> {
        if let Some(v) = self.output_name {
            cfg.output_name = v;
        }
        if let Some(v) = self.crop {
            cfg.crop = v;
        }
        if let Some(v) = self.allow_rotation {
            cfg.allow_rotation = v;
        }
        if let Some(v) = self.initial_size {
            cfg.initial_size = v;
        }
        if let Some(v) = self.max_size {
            cfg.max_size = Some(v);
        }
        if let Some(v) = self.heuristic {
            cfg.heuristic = parse_heuristic(&v)?;
        }
        if let Some(v) = self.transparent_policy {
            cfg.transparent_policy = parse_transparent_policy(&v)?;
        }
        if let Some(v) = self.metadata {
            cfg.metadata = parse_metadata(&v)?;
        }
        if let Some(v) = self.parallel {
            cfg.parallel = v;
        }
        Ok(cfg)
    }
}
