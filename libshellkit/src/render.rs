//! Rasterizing icon files and images into pixmaps of a requested size
use std::{fs, path::Path};

use image::{imageops, imageops::FilterType, RgbaImage};
use resvg::{tiny_skia, usvg};
use tracing::debug;

use crate::{ShellKitError, ShellKitResult};

/// Rasterized image together with the device pixel ratio it was rendered for
#[derive(Debug, Clone, PartialEq)]
pub struct Pixmap {
    pub image: RgbaImage,
    pub device_pixel_ratio: f64,
}

impl Pixmap {
    /// Size in logical pixels
    pub fn logical_size(&self) -> (f64, f64) {
        (
            self.image.width() as f64 / self.device_pixel_ratio,
            self.image.height() as f64 / self.device_pixel_ratio,
        )
    }
}

/// Largest pixmap side rendered, larger geometry is clamped to it
pub const MAX_PIXMAP_SIDE: u32 = 8192;

/// Size in device pixels of a logical area, clamped to `MAX_PIXMAP_SIDE`
pub fn device_bounds(width: f64, height: f64, dpr: f64) -> (u32, u32) {
    let side = |v: f64| (v * dpr).round().clamp(0.0, MAX_PIXMAP_SIDE as f64) as u32;
    (side(width), side(height))
}

/// Largest size with the aspect ratio of `src` that fits inside `bounds`
pub fn fit_size(src: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    let (sw, sh) = (src.0.max(1) as f64, src.1.max(1) as f64);
    let (bw, bh) = (bounds.0 as f64, bounds.1 as f64);
    let scale = (bw / sw).min(bh / sh);
    (((sw * scale).round() as u32).max(1), ((sh * scale).round() as u32).max(1))
}

/// Scale the image up or down to fit inside `bounds` keeping its aspect ratio
pub fn scale_to_fit(img: &RgbaImage, bounds: (u32, u32)) -> RgbaImage {
    let (w, h) = fit_size(img.dimensions(), bounds);
    if (w, h) == img.dimensions() {
        return img.clone();
    }
    imageops::resize(img, w, h, FilterType::Triangle)
}

/// Scale the image down to fit inside `bounds`, images that already fit are kept as is
pub fn shrink_to_fit(img: RgbaImage, bounds: (u32, u32)) -> RgbaImage {
    if img.width() <= bounds.0 && img.height() <= bounds.1 {
        return img;
    }
    scale_to_fit(&img, bounds)
}

/// Decode a raster image file
pub fn load_image(path: &Path) -> ShellKitResult<RgbaImage> {
    let img = image::open(path)?.to_rgba8();
    debug!("load_image: {}, {}x{}", path.display(), img.width(), img.height());
    Ok(img)
}

/// Render an svg or svgz document to fit inside `bounds`
pub fn render_svg(data: &[u8], bounds: (u32, u32)) -> ShellKitResult<RgbaImage> {
    let tree = usvg::Tree::from_data(data, &usvg::Options::default())?;
    let size = tree.size();
    let (sw, sh) = (size.width().ceil() as u32, size.height().ceil() as u32);
    let (w, h) = fit_size((sw, sh), bounds);

    let mut pixmap = tiny_skia::Pixmap::new(w, h)
        .ok_or_else(|| ShellKitError::SvgRender(format!("invalid pixmap size {}x{}", w, h)))?;
    let transform = tiny_skia::Transform::from_scale(w as f32 / size.width(), h as f32 / size.height());
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    // tiny-skia stores premultiplied alpha
    let mut img = RgbaImage::new(w, h);
    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = image::Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    debug!("render_svg: {}x{} -> {}x{}", sw, sh, w, h);
    Ok(img)
}

/// Render an icon file for display inside `bounds`. Scalable files are rendered to fit while
/// raster files are only ever scaled down.
pub fn render_icon_file(path: &Path, bounds: (u32, u32)) -> ShellKitResult<RgbaImage> {
    match path.extension().and_then(|x| x.to_str()) {
        Some("svg") | Some("svgz") => render_svg(&fs::read(path)?, bounds),
        _ => Ok(shrink_to_fit(load_image(path)?, bounds)),
    }
}

/// Draw the pixmap stretched over the rectangle at the canvas origin with the given size,
/// blending over what is already there
pub fn draw_pixmap(canvas: &mut RgbaImage, pixmap: &RgbaImage, target: (u32, u32)) {
    if target.0 == 0 || target.1 == 0 {
        return;
    }
    if pixmap.dimensions() == target {
        imageops::overlay(canvas, pixmap, 0, 0);
    } else {
        let scaled = imageops::resize(pixmap, target.0, target.1, FilterType::Triangle);
        imageops::overlay(canvas, &scaled, 0, 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="16" height="8">
        <rect x="0" y="0" width="16" height="8" fill="#ff0000"/>
    </svg>"##;

    #[test]
    fn test_fit_size() {
        assert_eq!(fit_size((64, 32), (16, 16)), (16, 8));
        assert_eq!(fit_size((32, 64), (16, 16)), (8, 16));
        assert_eq!(fit_size((10, 10), (40, 20)), (20, 20));
        assert_eq!(fit_size((1000, 1), (10, 10)), (10, 1));
    }

    #[test]
    fn test_device_bounds_clamped() {
        assert_eq!(device_bounds(24.0, 12.0, 2.0), (48, 24));
        assert_eq!(device_bounds(3.0e9, 3.0e9, 2.0), (MAX_PIXMAP_SIDE, MAX_PIXMAP_SIDE));
        assert_eq!(device_bounds(-5.0, 10.0, 1.0), (0, 10));
    }

    #[test]
    fn test_shrink_never_upscales() {
        let img = RgbaImage::new(8, 8);
        assert_eq!(shrink_to_fit(img.clone(), (32, 32)).dimensions(), (8, 8));
        assert_eq!(shrink_to_fit(RgbaImage::new(64, 64), (32, 32)).dimensions(), (32, 32));
        assert_eq!(scale_to_fit(&img, (32, 32)).dimensions(), (32, 32));
    }

    #[test]
    fn test_render_svg_fits_bounds() {
        let img = render_svg(SQUARE_SVG.as_bytes(), (48, 48)).unwrap();
        assert_eq!(img.dimensions(), (48, 24));
        let px = img.get_pixel(24, 12);
        assert_eq!(px.0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_render_svg_rejects_garbage() {
        let err = render_svg(b"not an svg", (16, 16)).unwrap_err();
        assert!(err.is::<usvg::Error>());
    }

    #[test]
    fn test_draw_pixmap_stretches() {
        let mut canvas = RgbaImage::new(20, 20);
        let pixmap = RgbaImage::from_pixel(4, 4, image::Rgba([0, 0, 255, 255]));
        draw_pixmap(&mut canvas, &pixmap, (10, 10));
        assert_eq!(canvas.get_pixel(5, 5).0, [0, 0, 255, 255]);
        assert_eq!(canvas.get_pixel(15, 15).0, [0, 0, 0, 0]);
    }
}
