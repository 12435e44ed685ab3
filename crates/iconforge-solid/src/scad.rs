//! OpenSCAD script synthesis
//!
//! The solid is the main shape extruded to `thickness`, optionally standing
//! on a base slab, with an optional pass-through hole whose ceiling is cut
//! flat so it prints as a bridge.

use iconforge_core::ParameterError;
use std::fmt;
use std::str::FromStr;

/// Length of the hole cylinder, far longer than any model
const HOLE_CYLINDER_LENGTH: f64 = 500.0;
/// Edge length of the slab that truncates the hole ceiling
const SLAB_SIZE: f64 = 1000.0;
const SLAB_HEIGHT: f64 = 500.0;
const HOLE_FACETS: u32 = 64;

/// Axis of the pass-through hole
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoleOrientation {
    /// Along the X axis
    #[default]
    Horizontal,
    /// Along the Y axis
    Vertical,
}

impl HoleOrientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            HoleOrientation::Horizontal => "horizontal",
            HoleOrientation::Vertical => "vertical",
        }
    }

    fn rotation(&self) -> &'static str {
        match self {
            HoleOrientation::Horizontal => "rotate([0, 90, 0])",
            HoleOrientation::Vertical => "rotate([90, 0, 0])",
        }
    }
}

impl fmt::Display for HoleOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HoleOrientation {
    type Err = ParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "horizontal" => Ok(HoleOrientation::Horizontal),
            "vertical" => Ok(HoleOrientation::Vertical),
            _ => Err(ParameterError::InvalidValue {
                name: "hole_orientation".to_string(),
                reason: "hole_orientation must be 'horizontal' or 'vertical'".to_string(),
            }),
        }
    }
}

/// Pass-through hole parameters in model units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoleSpec {
    pub diameter: f64,
    /// Distance from the top of the hole down to its flat ceiling
    pub flat_top_offset: f64,
    /// Hole centre in SVG coordinates, before scaling
    pub center: (f64, f64),
    pub orientation: HoleOrientation,
}

/// Everything needed to write `script.scad`
#[derive(Debug, Clone, PartialEq)]
pub struct SolidScript {
    pub main_file: String,
    /// Base outline file and slab height
    pub base: Option<(String, f64)>,
    pub thickness: f64,
    /// Uniform XY scale; Z is never scaled
    pub scale: f64,
    pub hole: Option<HoleSpec>,
}

impl SolidScript {
    pub fn new(main_file: impl Into<String>, thickness: f64, scale: f64) -> Self {
        Self {
            main_file: main_file.into(),
            base: None,
            thickness,
            scale,
            hole: None,
        }
    }

    pub fn with_base(mut self, base_file: impl Into<String>, base_thickness: f64) -> Self {
        if base_thickness > 0.0 {
            self.base = Some((base_file.into(), base_thickness));
        }
        self
    }

    pub fn with_hole(mut self, hole: HoleSpec) -> Self {
        if hole.diameter > 0.0 {
            self.hole = Some(hole);
        }
        self
    }

    fn base_thickness(&self) -> f64 {
        self.base.as_ref().map(|(_, t)| *t).unwrap_or(0.0)
    }

    pub fn total_height(&self) -> f64 {
        self.base_thickness() + self.thickness
    }

    /// The extruded body, without the hole
    fn body(&self) -> String {
        let s = self.scale;
        match &self.base {
            Some((base_file, base_thickness)) => format!(
                "union() {{\n  scale([{s}, {s}, 1]) {{\n    linear_extrude(height={bt}) import(\"{base}\");\n  }}\n  translate([0, 0, {bt}]) {{\n    scale([{s}, {s}, 1]) {{\n      linear_extrude(height={t}) import(\"{main}\");\n    }}\n  }}\n}}",
                s = s,
                bt = base_thickness,
                base = base_file,
                t = self.thickness,
                main = self.main_file,
            ),
            None => format!(
                "scale([{s}, {s}, 1]) {{\n  linear_extrude(height={t}) import(\"{main}\");\n}}",
                s = s,
                t = self.thickness,
                main = self.main_file,
            ),
        }
    }

    /// Render the complete script
    pub fn render(&self) -> String {
        let body = self.body();
        let hole = match self.hole {
            Some(hole) if self.total_height() > 0.0 => hole,
            _ => return format!("// Generated by iconforge\n{}\n", body),
        };

        let radius = hole.diameter / 2.0;
        // The hole sits at mid-height of the base, or of the main shape without one
        let center_z = if self.base_thickness() > 0.0 {
            self.base_thickness() / 2.0
        } else {
            self.thickness / 2.0
        };
        let ceiling_z = center_z + radius - hole.flat_top_offset;
        let (hx, hy) = (self.scale * hole.center.0, self.scale * hole.center.1);

        format!(
            "// Generated by iconforge (pass-through hole, flat top for bridging)\n\
             difference() {{\n  {body}\n  // Flat-topped hole at ({hx}, {hy}); orientation = {orientation}\n  \
             intersection() {{\n    translate([{hx}, {hy}, {cz}]) {rotate}\n      \
             cylinder(h={len}, r={r}, center=true, $fn={fn_});\n    \
             translate([{sx}, {sy}, {sz}]) cube([{size}, {size}, {height}], center=false);\n  }}\n}}\n",
            body = body,
            hx = hx,
            hy = hy,
            orientation = hole.orientation,
            cz = center_z,
            rotate = hole.orientation.rotation(),
            len = HOLE_CYLINDER_LENGTH,
            r = radius,
            fn_ = HOLE_FACETS,
            sx = hx - SLAB_SIZE / 2.0,
            sy = hy - SLAB_SIZE / 2.0,
            sz = ceiling_z - SLAB_HEIGHT,
            size = SLAB_SIZE,
            height = SLAB_HEIGHT,
        )
    }
}
