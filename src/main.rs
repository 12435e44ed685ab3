use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use iconforge::{
    init_logging, Config, Error, IconForge, IconSource, MultiPathRequest, SolidRequest,
    BUILD_DATE, VERSION,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "iconforge", version, about = "Turn SVG icons into multi-path SVGs and STL solids")]
struct Cli {
    /// Configuration file (TOML or JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Split an icon into one closed path per visual shape
    Multipath {
        /// Icon URL (http/https) or local file
        source: String,
        /// Output file, stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Extrude an icon into an STL solid
    Solid(SolidArgs),
    /// Show or create the configuration file
    Config {
        /// Write a default configuration file
        #[arg(long)]
        init: bool,
        /// Target file, the default location when omitted
        path: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct SolidArgs {
    /// Icon URL (http/https) or local file
    source: String,
    /// Output file, stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Target width in model units; 0 keeps the icon size
    #[arg(long, default_value_t = 0.0)]
    size: f64,
    /// Extrusion height of the main shape
    #[arg(long, default_value_t = 1.0)]
    thickness: f64,
    /// Extrude every path instead of only the largest
    #[arg(long)]
    all_paths: bool,
    /// Height of the solid base; 0 disables the base
    #[arg(long, default_value_t = 0.0)]
    base_thickness: f64,
    /// Outward growth of the base outline in SVG units
    #[arg(long, default_value_t = 2.0)]
    base_offset: f64,
    /// Pass-through hole diameter; 0 disables the hole
    #[arg(long, default_value_t = 0.0)]
    hole_diameter: f64,
    /// Flat cut below the top of the hole, for bridging
    #[arg(long, default_value_t = 0.5)]
    flat_top_offset: f64,
    /// Hole axis: horizontal (X) or vertical (Y)
    #[arg(long, default_value = "horizontal")]
    hole_orientation: String,
    /// Write the OpenSCAD script instead of running OpenSCAD
    #[arg(long)]
    emit_scad: bool,
}

impl SolidArgs {
    fn to_request(&self) -> Result<SolidRequest, Error> {
        let mut request = SolidRequest::new(IconSource::parse(&self.source))
            .with_orientation(&self.hole_orientation)?;
        request.options.size = self.size;
        request.options.thickness = self.thickness;
        request.options.only_largest_path = !self.all_paths;
        request.options.base_thickness = self.base_thickness;
        request.options.base_offset = self.base_offset;
        request.options.hole_diameter = self.hole_diameter;
        request.options.flat_top_offset = self.flat_top_offset;
        Ok(request)
    }
}

fn write_output(path: Option<&Path>, bytes: &[u8]) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, bytes)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {} bytes to {}", bytes.len(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn config_command(explicit: Option<&Path>, init: bool, path: Option<PathBuf>) -> anyhow::Result<()> {
    if init {
        let target = path
            .or_else(Config::default_path)
            .context("No configuration directory available")?;
        Config::default().save_to_file(&target)?;
        println!("{}", target.display());
        return Ok(());
    }
    let config = Config::load_or_default(path.as_deref().or(explicit))?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Command::Config { init, path } = cli.command {
        return config_command(cli.config.as_deref(), init, path);
    }

    debug!("IconForge {} (built {})", VERSION, BUILD_DATE);
    let config = Config::load_or_default(cli.config.as_deref())?;
    let forge = IconForge::with_process_runner(&config);

    match cli.command {
        Command::Multipath { source, output } => {
            let request = MultiPathRequest::new(IconSource::parse(&source));
            let merged = forge.multipath(&request).await?;
            write_output(output.as_deref(), merged.to_svg().as_bytes())?;
        }
        Command::Solid(args) => {
            let request = args.to_request()?;
            if args.emit_scad {
                let inputs = forge.solid_inputs(&request).await?;
                write_output(args.output.as_deref(), inputs.script.as_bytes())?;
            } else {
                let solid = forge.solid(&request).await?;
                write_output(args.output.as_deref(), &solid.stl)?;
            }
        }
        Command::Config { .. } => {}
    }
    Ok(())
}

/// Exit code for a failure, from its pipeline error class when it has one
fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<Error>()
        .map(|e| e.class().exit_code() as u8)
        .unwrap_or(1)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = init_logging(cli.log_json) {
        eprintln!("Failed to initialize logging: {:#}", err);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(exit_code(&err))
        }
    }
}
