//! Mockup compositor
//!
//! Places a customer's logo onto a base product image. Placement boxes are
//! normalized 0-1 fractions of the base image dimensions; the logo is scaled
//! to fit inside the resolved rectangle without cropping and blended with
//! standard source-over alpha. Output keeps the base image's dimensions and
//! is encoded as PNG so logo transparency passes through.

use std::io::Cursor;

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, RgbaImage, imageops};

use crate::catalog::PlacementBox;
use crate::error::AppError;

/// Default placement when a product defines no boxes: centered, 30% of the
/// base image size
const DEFAULT_PLACEMENT_FRACTION: f64 = 0.3;

/// A placement resolved to pixel coordinates on a specific base image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Resolve the target rectangle for a base image of `base_w` x `base_h`.
///
/// Uses the first placement box when the product defines any, else the
/// centered default. Rejects boxes outside the unit square and rectangles
/// that collapse to zero pixels.
pub fn resolve_placement(
    base_w: u32,
    base_h: u32,
    boxes: &[PlacementBox],
) -> Result<PixelRect, AppError> {
    if base_w == 0 || base_h == 0 {
        return Err(AppError::InvalidPlacement("base image has zero size".into()));
    }

    let rect = match boxes.first() {
        Some(b) => {
            if !b.is_valid() {
                return Err(AppError::InvalidPlacement(format!(
                    "box x={} y={} w={} h={} is not normalized to [0,1] with positive area",
                    b.x, b.y, b.width, b.height
                )));
            }
            PixelRect {
                x: (b.x * base_w as f64).round() as u32,
                y: (b.y * base_h as f64).round() as u32,
                width: (b.width * base_w as f64).round() as u32,
                height: (b.height * base_h as f64).round() as u32,
            }
        }
        None => {
            let width = (base_w as f64 * DEFAULT_PLACEMENT_FRACTION).round() as u32;
            let height = (base_h as f64 * DEFAULT_PLACEMENT_FRACTION).round() as u32;
            PixelRect {
                x: (base_w - width) / 2,
                y: (base_h - height) / 2,
                width,
                height,
            }
        }
    };

    if rect.width == 0 || rect.height == 0 {
        return Err(AppError::InvalidPlacement(format!(
            "placement collapses to {}x{} pixels",
            rect.width, rect.height
        )));
    }

    // Clamp the far edge so rounding never pushes past the base image
    let width = rect.width.min(base_w - rect.x.min(base_w));
    let height = rect.height.min(base_h - rect.y.min(base_h));
    if width == 0 || height == 0 {
        return Err(AppError::InvalidPlacement(
            "placement lies outside the base image".into(),
        ));
    }

    Ok(PixelRect {
        x: rect.x,
        y: rect.y,
        width,
        height,
    })
}

/// Composite `logo` onto `base` inside `rect`.
///
/// The logo is scaled to fit entirely inside the rectangle preserving its
/// aspect ratio; the unused remainder of the rectangle stays untouched
/// (transparent letterboxing, never an opaque fill). Blending is source-over
/// at the rectangle's top-left corner.
pub fn compose(base: &DynamicImage, logo: &DynamicImage, rect: PixelRect) -> RgbaImage {
    let mut canvas = base.to_rgba8();
    let scaled = logo.resize(rect.width, rect.height, FilterType::Lanczos3);
    imageops::overlay(&mut canvas, &scaled.to_rgba8(), rect.x as i64, rect.y as i64);
    canvas
}

/// Encode a composited image as PNG
pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>, AppError> {
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .map_err(AppError::internal)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn white_base(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba([255, 255, 255, 255])))
    }

    fn red_logo(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba([200, 0, 0, 255])))
    }

    fn boxes(x: f64, y: f64, w: f64, h: f64) -> Vec<PlacementBox> {
        vec![PlacementBox {
            x,
            y,
            width: w,
            height: h,
        }]
    }

    #[test]
    fn first_box_resolves_to_pixels() {
        let rect = resolve_placement(400, 200, &boxes(0.25, 0.5, 0.5, 0.25)).unwrap();
        assert_eq!(
            rect,
            PixelRect {
                x: 100,
                y: 100,
                width: 200,
                height: 50
            }
        );
    }

    #[test]
    fn no_boxes_defaults_to_centered_region() {
        let rect = resolve_placement(1000, 800, &[]).unwrap();
        assert_eq!(rect.width, 300);
        assert_eq!(rect.height, 240);
        assert_eq!(rect.x, 350);
        assert_eq!(rect.y, 280);
    }

    #[test]
    fn zero_area_box_is_rejected() {
        let err = resolve_placement(400, 200, &boxes(0.1, 0.1, 0.0, 0.5)).unwrap_err();
        assert!(matches!(err, AppError::InvalidPlacement(_)));
    }

    #[test]
    fn pixel_coordinates_are_rejected() {
        // A caller passing absolute pixels lands outside the unit square
        let err = resolve_placement(400, 200, &boxes(120.0, 40.0, 80.0, 60.0)).unwrap_err();
        assert!(matches!(err, AppError::InvalidPlacement(_)));
    }

    #[test]
    fn tiny_box_on_tiny_image_collapses() {
        let err = resolve_placement(3, 3, &boxes(0.0, 0.0, 0.1, 0.1)).unwrap_err();
        assert!(matches!(err, AppError::InvalidPlacement(_)));
    }

    #[test]
    fn output_keeps_base_dimensions() {
        let base = white_base(400, 200);
        let rect = resolve_placement(400, 200, &boxes(0.25, 0.25, 0.5, 0.5)).unwrap();
        let out = compose(&base, &red_logo(50, 50), rect);
        assert_eq!(out.dimensions(), (400, 200));
    }

    #[test]
    fn edge_box_stays_within_bounds() {
        let base = white_base(200, 200);
        let rect = resolve_placement(200, 200, &boxes(0.8, 0.8, 0.2, 0.2)).unwrap();
        assert!(rect.x + rect.width <= 200);
        assert!(rect.y + rect.height <= 200);
        let out = compose(&base, &red_logo(40, 40), rect);
        assert_eq!(out.dimensions(), (200, 200));
    }

    #[test]
    fn logo_lands_inside_the_rect() {
        let base = white_base(400, 200);
        let rect = resolve_placement(400, 200, &boxes(0.5, 0.0, 0.5, 0.5)).unwrap();
        let out = compose(&base, &red_logo(100, 100), rect);

        // Inside the scaled logo: red
        assert_eq!(out.get_pixel(rect.x + 5, rect.y + 5), &Rgba([200, 0, 0, 255]));
        // Left of the rect: untouched base
        assert_eq!(out.get_pixel(rect.x - 5, rect.y + 5), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn letterbox_remainder_keeps_base_pixels() {
        // Wide rect, square logo: the right side of the rect must keep the
        // base color, not an opaque fill
        let base = white_base(400, 100);
        let rect = resolve_placement(400, 100, &boxes(0.0, 0.0, 1.0, 1.0)).unwrap();
        let out = compose(&base, &red_logo(80, 80), rect);
        assert_eq!(out.get_pixel(399, 50), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn transparent_logo_pixels_pass_through() {
        let base = white_base(100, 100);
        let logo = DynamicImage::ImageRgba8(RgbaImage::from_pixel(20, 20, Rgba([0, 0, 0, 0])));
        let rect = resolve_placement(100, 100, &boxes(0.0, 0.0, 0.2, 0.2)).unwrap();
        let out = compose(&base, &logo, rect);
        assert_eq!(out.get_pixel(1, 1), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn png_round_trips_through_decoder() {
        let base = white_base(50, 50);
        let rect = resolve_placement(50, 50, &[]).unwrap();
        let out = compose(&base, &red_logo(10, 10), rect);
        let bytes = encode_png(&out).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.width(), 50);
        assert_eq!(decoded.height(), 50);
    }
}
