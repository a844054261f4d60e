//! Scanline polygon sampling against the shadow buffer.

use tracing::debug;

use crate::buffer::ShadowBuffer;
use crate::error::MaskError;
use crate::mask::VisionMask;

/// Percentage of the masked area that is directly sunlit, in `[0, 100]`.
///
/// Rasterizes the mask polygon at the buffer's resolution with even-odd
/// scanline coverage (pixel centers), then counts lit pixels. Mask points
/// authored at a different viewport size are rescaled proportionally.
/// Idempotent and independent of the polygon's starting vertex.
pub fn percent_in_sun(mask: &VisionMask, buffer: &ShadowBuffer) -> Result<f64, MaskError> {
    let (ref_w, ref_h) = mask.viewport();
    let scale_x = buffer.width() as f64 / ref_w as f64;
    let scale_y = buffer.height() as f64 / ref_h as f64;

    let points: Vec<[f64; 2]> = mask
        .points()
        .iter()
        .map(|p| [p[0] as f64 * scale_x, p[1] as f64 * scale_y])
        .collect();

    let mut covered = 0u64;
    let mut lit = 0u64;
    let mut crossings: Vec<f64> = Vec::with_capacity(points.len());

    for y in 0..buffer.height() {
        let py = y as f64 + 0.5;
        crossings.clear();

        // Edges of the implicitly closed polygon that cross this scanline.
        for i in 0..points.len() {
            let a = points[i];
            let b = points[(i + 1) % points.len()];
            if (a[1] <= py) != (b[1] <= py) {
                let t = (py - a[1]) / (b[1] - a[1]);
                crossings.push(a[0] + t * (b[0] - a[0]));
            }
        }

        crossings.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        // Even-odd fill: pixels whose centers fall between crossing pairs.
        for pair in crossings.chunks_exact(2) {
            let (x_enter, x_exit) = (pair[0], pair[1]);
            let first = (x_enter - 0.5).ceil().max(0.0) as i64;
            let last = (x_exit - 0.5).floor().min(buffer.width() as f64 - 1.0) as i64;
            for x in first..=last {
                // Pixel center at x + 0.5 must be strictly inside the span.
                if (x as f64 + 0.5) < x_enter {
                    continue;
                }
                covered += 1;
                if buffer.is_lit(x as u32, y) {
                    lit += 1;
                }
            }
        }
    }

    if covered == 0 {
        return Err(MaskError::DegeneratePolygon {
            width: buffer.width(),
            height: buffer.height(),
        });
    }

    let percent = 100.0 * lit as f64 / covered as f64;
    debug!(
        area = mask.area_id(),
        covered, lit, percent, "mask sampled"
    );
    Ok(percent)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_mask(x0: f32, y0: f32, x1: f32, y1: f32) -> VisionMask {
        VisionMask::new("test", vec![[x0, y0], [x1, y0], [x1, y1], [x0, y1]]).unwrap()
    }

    /// A square over a fully lit region reads 100%.
    #[test]
    fn test_fully_lit_square_is_100() {
        let buffer = ShadowBuffer::filled(800, 600, true).unwrap();
        let mask = square_mask(100.0, 100.0, 300.0, 300.0);
        let percent = percent_in_sun(&mask, &buffer).unwrap();
        assert!((percent - 100.0).abs() < 1e-9);
    }

    /// The same square over a fully occluded region reads 0%.
    #[test]
    fn test_fully_shadowed_square_is_0() {
        let buffer = ShadowBuffer::filled(800, 600, false).unwrap();
        let mask = square_mask(100.0, 100.0, 300.0, 300.0);
        let percent = percent_in_sun(&mask, &buffer).unwrap();
        assert!(percent.abs() < 1e-9);
    }

    /// A mask split exactly in half between lit and shadowed pixels reads
    /// ~50% within rasterization tolerance.
    #[test]
    fn test_half_lit_square_is_about_50() {
        let mut buffer = ShadowBuffer::filled(800, 600, true).unwrap();
        // Shadow the left half of the mask region.
        buffer.fill_rect(100, 100, 200, 300, false);
        let mask = square_mask(100.0, 100.0, 300.0, 300.0);
        let percent = percent_in_sun(&mask, &buffer).unwrap();
        assert!(
            (percent - 50.0).abs() < 1.0,
            "expected ~50%, got {percent}"
        );
    }

    /// Rotating the starting vertex of a simple polygon must not change the
    /// result.
    #[test]
    fn test_starting_vertex_rotation_invariance() {
        let mut buffer = ShadowBuffer::filled(800, 600, true).unwrap();
        buffer.fill_rect(0, 0, 400, 600, false);

        let points = vec![
            [150.0_f32, 120.0],
            [500.0, 140.0],
            [430.0, 400.0],
            [200.0, 380.0],
            [120.0, 250.0],
        ];

        let reference = percent_in_sun(
            &VisionMask::new("a", points.clone()).unwrap(),
            &buffer,
        )
        .unwrap();

        for shift in 1..points.len() {
            let mut rotated = points.clone();
            rotated.rotate_left(shift);
            let percent =
                percent_in_sun(&VisionMask::new("a", rotated).unwrap(), &buffer).unwrap();
            assert!(
                (percent - reference).abs() < 1e-9,
                "rotation by {shift} changed result: {percent} vs {reference}"
            );
        }
    }

    /// Evaluation does not mutate anything: repeated calls agree exactly.
    #[test]
    fn test_idempotent() {
        let mut buffer = ShadowBuffer::filled(800, 600, true).unwrap();
        buffer.fill_rect(150, 0, 800, 600, false);
        let mask = square_mask(100.0, 100.0, 300.0, 300.0);
        let a = percent_in_sun(&mask, &buffer).unwrap();
        let b = percent_in_sun(&mask, &buffer).unwrap();
        assert_eq!(a, b);
    }

    /// Masks authored at the reference viewport rescale onto a buffer at a
    /// different resolution.
    #[test]
    fn test_rescales_to_buffer_resolution() {
        // Half-lit at full resolution.
        let mut full = ShadowBuffer::filled(800, 600, true).unwrap();
        full.fill_rect(0, 0, 400, 600, false);
        // Same split at half resolution.
        let mut half = ShadowBuffer::filled(400, 300, true).unwrap();
        half.fill_rect(0, 0, 200, 300, false);

        let mask = square_mask(200.0, 150.0, 600.0, 450.0);
        let at_full = percent_in_sun(&mask, &full).unwrap();
        let at_half = percent_in_sun(&mask, &half).unwrap();
        assert!(
            (at_full - at_half).abs() < 1.0,
            "rescaled sampling should agree: {at_full} vs {at_half}"
        );
    }

    /// A concave polygon fills with even-odd coverage: the notch is not
    /// counted.
    #[test]
    fn test_concave_polygon_excludes_notch() {
        let mut buffer = ShadowBuffer::filled(800, 600, true).unwrap();
        // Shadow the notch region; if the notch were (wrongly) covered, the
        // result would dip below 100%.
        buffer.fill_rect(280, 80, 360, 300, false);

        // U-shaped polygon around the notch.
        let mask = VisionMask::new(
            "u",
            vec![
                [200.0, 100.0],
                [280.0, 100.0],
                [280.0, 300.0],
                [360.0, 300.0],
                [360.0, 100.0],
                [440.0, 100.0],
                [440.0, 400.0],
                [200.0, 400.0],
            ],
        )
        .unwrap();

        let percent = percent_in_sun(&mask, &buffer).unwrap();
        assert!(
            (percent - 100.0).abs() < 1.0,
            "notch pixels must not be covered, got {percent}"
        );
    }

    /// A polygon entirely outside the buffer is degenerate input.
    #[test]
    fn test_offscreen_polygon_is_degenerate() {
        let buffer = ShadowBuffer::filled(800, 600, true).unwrap();
        let mask = square_mask(-500.0, -500.0, -100.0, -100.0);
        assert!(matches!(
            percent_in_sun(&mask, &buffer),
            Err(MaskError::DegeneratePolygon { .. })
        ));
    }
}
