//! Integration tests for hdr-rs crates.
//!
//! End-to-end scenarios that cross crate boundaries: buffers through the
//! codec and the filesystem, filters feeding tone mapping, and operators
//! loaded from configuration.

#[cfg(test)]
mod tests {
    use hdr_core::prelude::*;
    use hdr_filter::RangeFilter;
    use hdr_io::raw;
    use hdr_tmo::{perform, HableParams, ToneMap, ToneMapper};
    use serde::Deserialize;
    use tempfile::tempdir;

    /// Horizontal HDR ramp from 0 to `peak`.
    fn ramp(width: i32, height: i32, peak: f64) -> Rgb64 {
        let mut img = Rgb64::new(Rect::from_size(width, height));
        for (x, y) in img.bounds().iter_coords() {
            let v = peak * x as f64 / (width - 1) as f64;
            img.set(x, y, Rgb::new(v, v * 0.8, v * 0.6));
        }
        img
    }

    #[test]
    fn test_hable_2x2_scenario() {
        let mut img = Rgb64::new(Rect::from_size(2, 2));
        img.set(0, 0, Rgb::new(1.0, 1.0, 1.0));

        let out = ToneMapper::default_hable(&img).perform();

        assert_eq!(out.bounds(), Rect::from_size(2, 2));
        assert_eq!(out.get(0, 0), Rgba16::new(65535, 65535, 65535, 65535));
        assert_eq!(out.get(1, 0), Rgba16::new(0, 0, 0, 65535));
        assert_eq!(out.get(0, 1), Rgba16::new(0, 0, 0, 65535));
        assert_eq!(out.get(1, 1), Rgba16::new(0, 0, 0, 65535));

        img.set(0, 1, Rgb::new(0.05, 0.02, 0.1));
        let out = ToneMapper::default_hable(&img).perform();
        assert_eq!(out.get(0, 1), Rgba16::new(44507, 32411, 53564, 65535));
        assert_eq!(out.get(0, 0), Rgba16::new(65535, 65535, 65535, 65535));
    }

    #[test]
    fn test_raw_file_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ramp.raw");

        let img = ramp(16, 8, 12.0);
        std::fs::write(&path, raw::write_buffer(&img)).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(raw::triple_count(&bytes), 16 * 8);
        let loaded: Rgb64 = raw::read_buffer(&bytes, img.bounds()).unwrap();

        for (x, y) in img.bounds().iter_coords() {
            let (a, b) = (img.get(x, y), loaded.get(x, y));
            assert_eq!(b.r, a.r as f32 as f64);
            assert_eq!(b.g, a.g as f32 as f64);
            assert_eq!(b.b, a.b as f32 as f64);
        }

        // Truncated file
        let err = raw::read_buffer::<Rgb, f64>(&bytes[..bytes.len() - 1], img.bounds()).unwrap_err();
        assert!(err.is_range_error());
    }

    #[test]
    fn test_tone_map_after_roundtrip_matches() {
        let img = ramp(32, 4, 8.0);
        let narrowed: Rgb32 = raw::read_buffer(&raw::write_buffer(&img), img.bounds()).unwrap();
        let op = ToneMap::Aces(Default::default());
        let a = perform(&op, &img);
        let b = perform(&op, &narrowed);
        // f32 narrowing may move a channel by one code value at most
        for ((_, _, pa), (_, _, pb)) in a.pixels().zip(b.pixels()) {
            assert!(pa.r.abs_diff(pb.r) <= 1 && pa.g.abs_diff(pb.g) <= 1 && pa.b.abs_diff(pb.b) <= 1);
        }
    }

    #[test]
    fn test_subregion_tone_map_matches_parent() {
        let img = ramp(20, 10, 4.0);
        let view = img.subregion(Rect::new(5, 2, 15, 8));
        let full = ToneMapper::default_aces(&img).perform();
        let part = ToneMapper::default_aces(&view).perform();
        assert_eq!(part.bounds(), Rect::new(5, 2, 15, 8));
        for (x, y, px) in part.pixels() {
            assert_eq!(px, full.get(x, y));
        }
    }

    #[test]
    fn test_filter_then_tone_map() {
        let mut img = Rgb64::new(Rect::from_size(24, 12));
        for (x, y) in img.bounds().iter_coords() {
            // Dark noisy half next to a bright flat half
            let v = if x < 12 { 0.05 + 0.01 * ((x + y) % 3) as f64 } else { 6.0 };
            img.set(x, y, Rgb::splat(v));
        }

        let smoothed = RangeFilter::new(0.05, 2.0, 2.0, 0.0).unwrap().apply(&img).unwrap();
        assert_eq!(smoothed.bounds(), img.bounds());

        // Bright side untouched by the edge
        approx::assert_relative_eq!(smoothed.get(12, 6).r, 6.0, max_relative = 1e-3);
        // Noise on the dark side is reduced
        let spread = |b: &Rgb64| {
            let vals: Vec<f64> = (2..10).map(|x| b.get(x, 6).r).collect();
            let max = vals.iter().cloned().fold(f64::MIN, f64::max);
            let min = vals.iter().cloned().fold(f64::MAX, f64::min);
            max - min
        };
        assert!(spread(&smoothed) < spread(&img));

        let out = ToneMapper::default_hable(&smoothed).perform();
        assert_eq!(out.get(20, 6), Rgba16::opaque(65535, 65535, 65535));
        assert!(out.get(4, 6).r > 0 && out.get(4, 6).r < 65535);
    }

    #[test]
    fn test_set_color_from_decoder_channels() {
        let mut img = Xyz64::new(Rect::from_size(3, 1));
        img.set_color(0, 0, &Color::Channels(vec![0.2, 0.4, 0.6])).unwrap();
        img.set_color(1, 0, &Color::Display(Rgba16::opaque(65535, 0, 65535))).unwrap();
        img.set_color(2, 0, &Color::Rgb(Rgb::new(3.0, 2.0, 1.0))).unwrap();
        assert_eq!(img.get(0, 0), Xyz::new(0.2, 0.4, 0.6));
        assert_eq!(img.get(1, 0), Xyz::new(1.0, 0.0, 1.0));
        assert_eq!(img.get(2, 0), Xyz::new(3.0, 2.0, 1.0));

        let err = img.set_color(0, 0, &Color::Channels(vec![1.0; 5])).unwrap_err();
        assert!(err.is_color_error());
    }

    #[derive(Debug, Deserialize)]
    struct PipelineConfig {
        crop: Rect,
        tonemap: ToneMap,
    }

    #[test]
    fn test_pipeline_from_json() {
        let cfg: PipelineConfig = serde_json::from_str(
            r#"{
                "crop": { "min_x": 0, "min_y": 0, "max_x": 1, "max_y": 1 },
                "tonemap": { "operator": "hable", "exposure_bias": 2.0 }
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.tonemap, ToneMap::Hable(HableParams::default()));

        let img = ramp(4, 4, 0.05 * 3.0);
        let view = img.subregion(cfg.crop);
        let out = cfg.tonemap.perform(&view);
        assert_eq!(out.bounds(), Rect::from_size(1, 1));
        assert_eq!(out.get(0, 0), Rgba16::opaque(0, 0, 0));
    }

    #[test]
    fn test_aces_output_is_srgb_encoded_fit() {
        use hdr_math::{transfer::srgb_oetf, Vec3};
        use hdr_tmo::aces::aces_fitted;

        let img = ramp(9, 1, 2.0);
        let out = ToneMapper::aces(&img, 1.0).perform();
        for (x, y, px) in out.pixels() {
            let c = img.get(x, y);
            let fit = aces_fitted(Vec3::new(c.r, c.g, c.b));
            assert_eq!(px.r, (srgb_oetf(fit.x) * 65535.0) as u16);
            assert_eq!(px.b, (srgb_oetf(fit.z) * 65535.0) as u16);
        }
    }

    #[test]
    fn test_display_bytes_for_png_writer() {
        let mut img = Rgb64::new(Rect::from_size(1, 1));
        img.set(0, 0, Rgb::splat(100.0));
        let bytes = ToneMapper::default_hable(&img).perform().to_be_bytes();
        assert_eq!(bytes, vec![0xff; 8]);
    }
}
