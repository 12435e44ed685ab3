//! # IconForge
//!
//! Turns an SVG icon into fabrication-ready geometry:
//! - a multi-path SVG where every disjoint visual shape is its own path
//! - an STL solid, optionally standing on a filled base with a
//!   pass-through hole
//!
//! ## Architecture
//!
//! IconForge is organized as a workspace with multiple crates:
//!
//! 1. **iconforge-core** - Error taxonomy and external tool invocation
//! 2. **iconforge-settings** - Configuration files and defaults
//! 3. **iconforge-svg** - SVG document tree, normalization, path data
//! 4. **iconforge-raster** - Rasterize, segment, trace and merge
//! 5. **iconforge-solid** - Polygon geometry, base contours, OpenSCAD
//! 6. **iconforge** - Request surface, fetcher and the command-line binary
//!
//! Rendering, tracing, solid modeling and downloading are delegated to
//! Inkscape, Potrace, OpenSCAD and curl.

pub mod fetch;
pub mod request;
pub mod service;

pub use fetch::{parse_icon, IconFetcher};
pub use request::{validate_options, IconSource, MultiPathRequest, SolidRequest};
pub use service::IconForge;

pub use iconforge_core::{Error, ErrorClass, Result};
pub use iconforge_raster::MergedIconDocument;
pub use iconforge_settings::Config;
pub use iconforge_solid::{scale_factor, HoleOrientation, SolidOptions, SolidOutput};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging
///
/// Sets up structured logging with:
/// - Output on stderr, keeping stdout free for the product
/// - RUST_LOG environment variable support, `info` otherwise
/// - Human-readable or JSON lines
pub fn init_logging(json: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if json {
        let fmt_layer = fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true);
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    } else {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .with_line_number(true);
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    }

    Ok(())
}
