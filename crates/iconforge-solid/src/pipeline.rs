//! Solid pipeline
//!
//! Normalized icon → dominant shape → optional base contour → measurements →
//! OpenSCAD script → STL.

use crate::base::build_base;
use crate::dominant::keep_dominant_path;
use crate::measure::{shape_centroid, shape_width};
use crate::modeler::{ModelInputs, SolidModeler, BASE_FILE, MAIN_FILE};
use crate::scad::{HoleOrientation, HoleSpec, SolidScript};
use iconforge_core::{Result, ToolRunner};
use iconforge_settings::{Config, GeometrySettings};
use iconforge_svg::SvgDocument;
use std::sync::Arc;
use tracing::info;

/// Solid generation options
#[derive(Debug, Clone, PartialEq)]
pub struct SolidOptions {
    /// Target width in model units, 0 keeps the icon's own size
    pub size: f64,
    /// Extrusion height of the main shape
    pub thickness: f64,
    /// Drop every path but the largest
    pub only_largest_path: bool,
    /// Height of the base slab, 0 disables the base
    pub base_thickness: f64,
    /// Outward growth of the base outline in SVG units
    pub base_offset: f64,
    /// Pass-through hole diameter in model units, 0 disables the hole
    pub hole_diameter: f64,
    /// Depth of the flat cut below the top of the hole
    pub flat_top_offset: f64,
    pub hole_orientation: HoleOrientation,
}

impl Default for SolidOptions {
    fn default() -> Self {
        Self {
            size: 0.0,
            thickness: 1.0,
            only_largest_path: true,
            base_thickness: 0.0,
            base_offset: 2.0,
            hole_diameter: 0.0,
            flat_top_offset: 0.5,
            hole_orientation: HoleOrientation::Horizontal,
        }
    }
}

/// XY scale that makes a shape of `width` measure `size`
pub fn scale_factor(size: f64, width: f64) -> f64 {
    if size > 0.0 && width > 0.0 {
        size / width
    } else {
        1.0
    }
}

/// Everything the solid pipeline produced
#[derive(Debug, Clone, PartialEq)]
pub struct SolidOutput {
    pub stl: Vec<u8>,
    /// The OpenSCAD script that produced the STL
    pub script: String,
    pub scale: f64,
}

pub struct SolidPipeline {
    geometry: GeometrySettings,
    modeler: SolidModeler,
}

impl SolidPipeline {
    pub fn new(config: &Config, runner: Arc<dyn ToolRunner>) -> Self {
        Self {
            geometry: config.geometry.clone(),
            modeler: SolidModeler::new(config.modeler.clone(), runner),
        }
    }

    /// Geometry and script for a normalized icon, without running the modeler
    pub fn prepare(&self, icon: &SvgDocument, options: &SolidOptions) -> Result<(ModelInputs, f64)> {
        let main = if options.only_largest_path {
            keep_dominant_path(icon, self.geometry.coarse_samples)
        } else {
            icon.clone()
        };

        let mut base_svg = None;
        let mut hole_center = None;
        let mut width = 1.0;
        if options.base_thickness > 0.0 {
            let base = build_base(&main, options.base_offset, &self.geometry)?;
            info!(
                "Base contour: centroid ({:.3}, {:.3}), width {:.3}",
                base.centroid.x, base.centroid.y, base.width
            );
            hole_center = Some((base.centroid.x, base.centroid.y));
            width = base.width;
            base_svg = Some(base.document.to_markup());
        } else {
            if options.hole_diameter > 0.0 {
                let c = shape_centroid(&main, self.geometry.fine_samples);
                hole_center = Some((c.x, c.y));
            }
            if options.size > 0.0 {
                width = shape_width(&main, self.geometry.fine_samples);
            }
        }

        let scale = scale_factor(options.size, width);
        let mut script = SolidScript::new(MAIN_FILE, options.thickness, scale);
        if base_svg.is_some() {
            script = script.with_base(BASE_FILE, options.base_thickness);
        }
        if let Some(center) = hole_center {
            script = script.with_hole(HoleSpec {
                diameter: options.hole_diameter,
                flat_top_offset: options.flat_top_offset,
                center,
                orientation: options.hole_orientation,
            });
        }
        info!(
            "Solid script: scale {:.4}, total height {}",
            scale,
            script.total_height()
        );

        Ok((
            ModelInputs {
                main_svg: main.to_markup(),
                base_svg,
                script: script.render(),
            },
            scale,
        ))
    }

    /// Produce the STL for a normalized icon
    pub async fn run(&self, icon: &SvgDocument, options: &SolidOptions) -> Result<SolidOutput> {
        let (inputs, scale) = self.prepare(icon, options)?;
        let stl = self.modeler.render(&inputs).await?;
        Ok(SolidOutput {
            stl,
            script: inputs.script,
            scale,
        })
    }
}
