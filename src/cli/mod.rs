//! CLI mode - command-line interface for mirroring the catalog.

mod progress;

use std::path::PathBuf;
use std::sync::Arc;

use crate::url::DEFAULT_BASE_URL;
use crate::{CatalogUrls, HttpClient, Mirror, MirrorConfig, PathConfig, ProgressReporter};

use progress::{CliProgress, make_counter, print_summary};

fn print_usage() {
    eprintln!("Usage: aos [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --no-folders        Write all files flat into the destination root");
    eprintln!("  --no-versions       Do not suffix duplicate map names with _vN");
    eprintln!("  --no-images         Skip preview image downloads");
    eprintln!("  --single-pass       Process one chunk and stop");
    eprintln!("  --start <ID>        First map ID to request (default: 0)");
    eprintln!("  --chunk <N>         IDs per chunk / concurrent downloads (default: 15)");
    eprintln!("  --dest <DIR>        Destination root (default: AOS_Maps, cleared at start)");
    eprintln!("  --base-url <URL>    Catalog base URL");
    eprintln!("  -h, --help          Show this help");
}

/// Everything a run needs, assembled from config file and flags.
#[derive(Debug)]
struct RunPlan {
    config: MirrorConfig,
    dest: PathBuf,
    base_url: String,
}

/// Applies command-line flags on top of file-sourced defaults.
/// Returns `Ok(None)` when help was requested.
fn parse_args(
    args: &[String],
    defaults: MirrorConfig,
    paths: &PathConfig,
) -> Result<Option<RunPlan>, String> {
    let mut config = defaults;
    let mut dest = paths.dest_dir.clone();
    let mut base_url = DEFAULT_BASE_URL.to_string();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--no-folders" => config.organize_into_folders = false,
            "--no-versions" => config.version_duplicate_names = false,
            "--no-images" => config.download_images = false,
            "--single-pass" => config.loop_until_exhausted = false,
            "--start" => {
                let value = take_value(args, &mut i, "--start")?;
                config.starting_id = value
                    .parse()
                    .map_err(|_| format!("invalid value '{value}' for --start"))?;
            }
            "--chunk" => {
                let value = take_value(args, &mut i, "--chunk")?;
                config.chunk_size = value
                    .parse()
                    .map_err(|_| format!("invalid value '{value}' for --chunk"))?;
                if config.chunk_size == 0 {
                    return Err("--chunk must be at least 1".to_string());
                }
            }
            "--dest" => dest = PathBuf::from(take_value(args, &mut i, "--dest")?),
            "--base-url" => base_url = take_value(args, &mut i, "--base-url")?.to_string(),
            "-h" | "--help" => return Ok(None),
            other => return Err(format!("unknown option: {other}")),
        }
        i += 1;
    }

    Ok(Some(RunPlan {
        config,
        dest,
        base_url,
    }))
}

fn take_value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str, String> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| format!("{flag} requires a value"))
}

/// Runs the CLI mirror mode.
///
/// # Errors
///
/// Returns an error on a fatal top-level fault (unusable config file,
/// client construction, destination root reset).
pub async fn run() -> crate::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let paths = PathConfig::default();
    let defaults = MirrorConfig::load_or_default(&paths.config_file())?;

    let plan = match parse_args(&args, defaults, &paths) {
        Ok(Some(plan)) => plan,
        Ok(None) => {
            print_usage();
            return Ok(());
        }
        Err(msg) => {
            eprintln!("Error: {msg}");
            eprintln!();
            print_usage();
            std::process::exit(2);
        }
    };

    let source = Arc::new(HttpClient::new()?);
    let reporter = Arc::new(CliProgress::new(make_counter()));

    log::info!(
        "mirroring {} into {} (chunk size {})",
        plan.base_url,
        plan.dest.display(),
        plan.config.chunk_size
    );

    let mirror = Mirror::new(
        source,
        CatalogUrls::new(plan.base_url),
        plan.config,
        &plan.dest,
        Arc::clone(&reporter) as Arc<dyn ProgressReporter>,
    );

    let stats = mirror.run().await?;
    reporter.finish();
    print_summary(&stats);
    Ok(())
}
