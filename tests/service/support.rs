use iconforge::{Config, IconForge};
use iconforge_core::{FnRunner, ToolCommand, ToolError, ToolOutput};
use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use std::io::Cursor;
use std::sync::{Arc, Mutex};

pub const CIRCLE_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2"><circle cx="12" cy="12" r="10"/></svg>"#;

pub const RING_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="1em" height="1em" viewBox="0 0 100 100"><path fill="currentColor" d="M50 10 A40 40 0 1 0 50 90 A40 40 0 1 0 50 10 Z M50 30 A20 20 0 1 1 50 70 A20 20 0 1 1 50 30 Z"/></svg>"#;

pub fn test_config() -> Config {
    let mut config = Config::default();
    config.rasterizer.retry_backoff_ms = 1;
    config.rasterizer.min_output_bytes = 0;
    config
}

/// 160x160 white raster with black disks at the given centres
pub fn disks_png(centres: &[(f64, f64)]) -> Vec<u8> {
    let mut image = GrayImage::from_pixel(160, 160, Luma([255]));
    for y in 0..160 {
        for x in 0..160 {
            let inside = centres.iter().any(|(cx, cy)| {
                let dx = x as f64 + 0.5 - cx;
                let dy = y as f64 + 0.5 - cy;
                dx * dx + dy * dy <= 400.0
            });
            if inside {
                image.put_pixel(x, y, Luma([0]));
            }
        }
    }
    let mut buf = Vec::new();
    DynamicImage::ImageLuma8(image)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .expect("encode png");
    buf
}

/// Every command the scripted tools received, in order
#[derive(Default)]
pub struct Calls {
    pub commands: Mutex<Vec<ToolCommand>>,
    pub scad: Mutex<Option<String>>,
}

impl Calls {
    pub fn programs(&self) -> Vec<String> {
        self.commands
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.program.clone())
            .collect()
    }
}

/// A service whose curl, inkscape, potrace and openscad are scripted
pub fn scripted_forge(icon: &'static str, png: Vec<u8>) -> (IconForge, Arc<Calls>) {
    let calls = Arc::new(Calls::default());
    let log = Arc::clone(&calls);
    let runner = FnRunner::new(move |cmd: &ToolCommand| -> Result<ToolOutput, ToolError> {
        log.commands.lock().unwrap().push(cmd.clone());
        match cmd.program.as_str() {
            "curl" => Ok(ToolOutput::success(icon)),
            "inkscape" => Ok(ToolOutput::success(png.clone())),
            "potrace" => {
                let n = log.programs().iter().filter(|p| *p == "potrace").count();
                Ok(ToolOutput::success(format!(
                    "<svg version=\"1.0\" xmlns=\"http://www.w3.org/2000/svg\" width=\"160pt\" height=\"160pt\" viewBox=\"0 0 160 160\">\
                     <g transform=\"translate(0,160) scale(0.1,-0.1)\"><path d=\"M{n} 0 L{n} 10 L0 10 Z\"/></g></svg>"
                )))
            }
            "openscad" => {
                let dir = cmd.working_dir.clone().expect("openscad working dir");
                *log.scad.lock().unwrap() =
                    Some(std::fs::read_to_string(dir.join("script.scad")).unwrap());
                std::fs::write(dir.join("output.stl"), vec![b'x'; 300]).unwrap();
                Ok(ToolOutput::success(Vec::new()))
            }
            other => Err(ToolError::Spawn {
                program: other.to_string(),
                reason: "not scripted".to_string(),
            }),
        }
    });
    (IconForge::new(&test_config(), Arc::new(runner)), calls)
}
