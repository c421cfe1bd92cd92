//! Command-line front end
//!
//! Resolves a device against the build sources and prints the outcome,
//! or searches the device catalog for a manual selection.

use clap::Parser;

use pbrp_resolver::{
    config, log_error, log_info, logging, net, registry, Build, DeviceIdentifier, Resolution,
    ResolutionStatus, Resolver, Stage,
};

#[derive(Parser)]
#[command(name = config::app::NAME, version, about = "Resolve PitchBlack Recovery Project builds for a device")]
struct Args {
    /// Device vendor as reported by the platform (e.g. Xiaomi)
    #[arg(required_unless_present = "search")]
    vendor: Option<String>,

    /// Device codename (e.g. fog)
    #[arg(required_unless_present = "search")]
    codename: Option<String>,

    /// Search the device catalog instead of resolving
    #[arg(long, value_name = "QUERY", conflicts_with_all = ["vendor", "codename"])]
    search: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    logging::init();
    if args.verbose {
        logging::set_level(logging::LogLevel::Debug);
    }

    log_info!(
        "main",
        "=== {} {} ===",
        config::app::NAME,
        env!("CARGO_PKG_VERSION")
    );

    let result = match &args.search {
        Some(query) => run_search(query).await,
        None => run_resolve(&args).await,
    };

    if let Err(err) = result {
        log_error!("main", "{}", err);
        std::process::exit(1);
    }
}

async fn run_search(query: &str) -> Result<(), String> {
    let client = net::client().map_err(|e| e.to_string())?;
    let registry = registry::fetch_registry(&client, config::urls::DEVICE_REGISTRY)
        .await
        .ok_or("device registry is unavailable")?;

    let groups = registry.search(query);
    if groups.is_empty() {
        println!("No matching devices.");
        return Ok(());
    }

    for (vendor, devices) in &groups {
        println!("{}", vendor);
        for device in devices {
            println!("  {:<16} {}", device.codename, device.name);
        }
    }
    Ok(())
}

async fn run_resolve(args: &Args) -> Result<(), String> {
    let (vendor, codename) = match (&args.vendor, &args.codename) {
        (Some(vendor), Some(codename)) => (vendor, codename),
        _ => return Err("expected <VENDOR> <CODENAME>, or --search <QUERY>".into()),
    };

    let device = DeviceIdentifier::new(vendor, codename);
    let resolver = Resolver::new().map_err(|e| e.to_string())?;
    let browse = resolver.browse_url(&device);
    let resolution = resolver.resolve(&device).await;

    print_resolution(&resolution, &browse);
    Ok(())
}

fn print_resolution(resolution: &Resolution, browse_url: &str) {
    println!("Device: {}", resolution.device);

    match &resolution.status {
        ResolutionStatus::Resolved(resolved) => {
            let profile = &resolved.profile;
            if !profile.title.is_empty() {
                println!("Name:   {}", profile.title);
            }
            match &profile.maintainer_handle {
                Some(handle) => println!(
                    "Maintainer: {} (github.com/{})",
                    profile.maintainer, handle
                ),
                None => println!("Maintainer: {}", profile.maintainer),
            }
            println!("Source: {:?}", resolved.source);

            if let Some(latest) = &resolved.builds.latest {
                println!("\nLatest release:");
                print_build(latest);
            }
            if !resolved.builds.older.is_empty() {
                println!("\nOlder releases:");
                for build in &resolved.builds.older {
                    print_build(build);
                }
            }

            if !profile.features.is_empty() {
                println!("\nDevice notes:");
                for feature in &profile.features {
                    println!("  [{:?}] {}", feature.severity, feature.title);
                }
            }

            println!("\nInstall methods:");
            for method in &profile.install_methods {
                println!("  {}", method.title);
                if let Some(note) = &method.note {
                    println!("    Note: {}", note);
                }
                for (i, step) in method.steps.iter().enumerate() {
                    println!("    {}. {}", i + 1, step);
                }
            }
        }
        ResolutionStatus::OfficialIndexMissing { profile } => {
            println!("Status: officially listed, but no build index was found.");
            if !profile.title.is_empty() {
                println!("Name:       {}", profile.title);
            }
            println!("Maintainer: {}", profile.maintainer);
            println!("Browse the mirror directly: {}", browse_url);
        }
        ResolutionStatus::NotSupported => {
            println!("Status: this device is not supported.");
        }
        ResolutionStatus::SourceError { stage } => {
            let stage = match stage {
                Stage::Primary => "official index",
                Stage::Mirror => "mirror",
            };
            println!("Status: the {} could not be reached.", stage);
            println!("Browse the mirror directly: {}", browse_url);
        }
    }
}

fn print_build(build: &Build) {
    println!("  v{} [{}] {}", build.version, build.build_type, build.date);
    println!("    {}", build.download_link);
    println!("    file: {}", build.suggested_file_name());
}
