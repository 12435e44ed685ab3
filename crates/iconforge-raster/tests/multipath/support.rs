use iconforge_core::{ToolCommand, ToolError, ToolOutput};
use iconforge_settings::Config;
use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use std::io::Cursor;

pub fn test_config() -> Config {
    let mut config = Config::default();
    config.rasterizer.retry_backoff_ms = 1;
    config.rasterizer.min_output_bytes = 0;
    config
}

pub fn blank(width: u32, height: u32) -> GrayImage {
    GrayImage::from_pixel(width, height, Luma([255]))
}

pub fn fill_circle(image: &mut GrayImage, cx: f64, cy: f64, r: f64) {
    for y in 0..image.height() {
        for x in 0..image.width() {
            let dx = x as f64 + 0.5 - cx;
            let dy = y as f64 + 0.5 - cy;
            if dx * dx + dy * dy <= r * r {
                image.put_pixel(x, y, Luma([0]));
            }
        }
    }
}

pub fn fill_rect(image: &mut GrayImage, x0: u32, y0: u32, w: u32, h: u32) {
    for y in y0..y0 + h {
        for x in x0..x0 + w {
            image.put_pixel(x, y, Luma([0]));
        }
    }
}

pub fn encode_png(image: GrayImage) -> Vec<u8> {
    let mut buf = Vec::new();
    DynamicImage::ImageLuma8(image)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .expect("encode png");
    buf
}

/// Number of black pixels in a PGM passed to the tracer
pub fn black_pixels_in(cmd: &ToolCommand) -> usize {
    let pgm = cmd.stdin.as_deref().expect("tracer stdin");
    assert!(pgm.starts_with(b"P5"), "tracer expects a binary PGM");
    let mask = image::load_from_memory(pgm).expect("decode pgm").to_luma8();
    mask.pixels().filter(|p| p.0[0] == 0).count()
}

pub fn potrace_svg(paths: &[String]) -> String {
    let mut svg = String::from(
        "<?xml version=\"1.0\" standalone=\"no\"?>\n\
         <svg version=\"1.0\" xmlns=\"http://www.w3.org/2000/svg\" \
         width=\"120.000000pt\" height=\"120.000000pt\" viewBox=\"0 0 120.000000 120.000000\">\n\
         <g transform=\"translate(0.000000,120.000000) scale(0.100000,-0.100000)\" fill=\"#000000\">\n",
    );
    for d in paths {
        svg.push_str(&format!("<path d=\"{}\"/>\n", d));
    }
    svg.push_str("</g>\n</svg>\n");
    svg
}

/// A scripted Inkscape + Potrace pair
///
/// Inkscape returns the given PNG. Potrace answers each mask with one path
/// whose data encodes the mask's black pixel count.
pub fn scripted_tools(
    png: Vec<u8>,
) -> impl Fn(&ToolCommand) -> Result<ToolOutput, ToolError> + Send + Sync {
    move |cmd: &ToolCommand| match cmd.program.as_str() {
        "inkscape" => Ok(ToolOutput::success(png.clone())),
        "potrace" => {
            let count = black_pixels_in(cmd);
            Ok(ToolOutput::success(potrace_svg(&[format!("M0 0 L{} 0 Z", count)])))
        }
        other => panic!("unexpected tool {}", other),
    }
}
