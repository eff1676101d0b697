//! Rasterization of SVG scenes and PNG encoding.

use log::{debug, warn};
use tiny_skia::{Pixmap, Transform};
use usvg::fontdb::{self, Family, Query};

use pgmfig_core::color::Color;

use crate::error::PgmError;

const INCHES_PER_METER: f64 = 1.0 / 0.0254;

/// Rasterizes `svg` into a `width` x `height` pixmap at `dpi`.
///
/// The scene is measured in points, so it is scaled by `dpi / 72`.
pub fn rasterize(
    svg: &str,
    (width, height): (u32, u32),
    dpi: u32,
    background: Color,
    font_family: &str,
) -> Result<Pixmap, PgmError> {
    let mut options = usvg::Options::default();
    let db = options.fontdb_mut();
    db.load_system_fonts();
    resolve_font_family(db, font_family);
    options.font_family = font_family.to_string();

    let tree = usvg::Tree::from_str(svg, &options)
        .map_err(|err| PgmError::Render(format!("failed to parse SVG scene: {err}")))?;

    let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
        PgmError::Render(format!("failed to allocate a {width}x{height} pixmap"))
    })?;

    let [r, g, b, a] = background.to_rgba8();
    pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, a));

    let scale = dpi as f32 / 72.0;
    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

    debug!(width, height, dpi; "Scene rasterized");
    Ok(pixmap)
}

/// Makes sure `family` resolves to an installed face.
///
/// usvg drops text whose family has no face. A generic family whose default
/// name is not installed is pointed at the closest installed face.
fn resolve_font_family(db: &mut fontdb::Database, family: &str) {
    let (query_family, set_generic): (Family<'_>, Option<fn(&mut fontdb::Database, String)>) =
        match family {
            "serif" => (Family::Serif, Some(fontdb::Database::set_serif_family::<String>)),
            "sans-serif" => (
                Family::SansSerif,
                Some(fontdb::Database::set_sans_serif_family::<String>),
            ),
            "monospace" => (
                Family::Monospace,
                Some(fontdb::Database::set_monospace_family::<String>),
            ),
            name => (Family::Name(name), None),
        };

    let query = Query {
        families: &[query_family],
        ..Query::default()
    };
    if db.query(&query).is_some() {
        return;
    }

    let Some(set_generic) = set_generic else {
        warn!(family; "Font family is not installed, labels will not be drawn");
        return;
    };
    match fallback_face(db, family) {
        Some(fallback) => {
            debug!(family, fallback = fallback.as_str(); "Generic font family resolved to installed face");
            set_generic(db, fallback);
        }
        None => warn!(family; "No fonts installed, labels will not be drawn"),
    }
}

/// Picks an installed family name matching the generic `family`, or any
/// installed family if none matches.
fn fallback_face(db: &fontdb::Database, family: &str) -> Option<String> {
    let names = || {
        db.faces()
            .filter_map(|face| face.families.first().map(|(name, _)| name.as_str()))
    };
    names()
        .find(|name| match family {
            "serif" => name.contains("Serif") && !name.contains("Sans"),
            "sans-serif" => name.contains("Sans"),
            _ => name.contains("Mono"),
        })
        .or_else(|| names().next())
        .map(str::to_string)
}

/// Encodes a pixmap as an RGBA PNG whose `pHYs` chunk records `dpi`.
pub fn encode_png(pixmap: &Pixmap, dpi: u32) -> Result<Vec<u8>, PgmError> {
    let mut data = Vec::with_capacity(pixmap.data().len());
    for pixel in pixmap.pixels() {
        let color = pixel.demultiply();
        data.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
    }

    let pixels_per_meter = (f64::from(dpi) * INCHES_PER_METER).round() as u32;

    let mut bytes = Vec::new();
    let mut encoder = png::Encoder::new(&mut bytes, pixmap.width(), pixmap.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_pixel_dims(Some(png::PixelDimensions {
        xppu: pixels_per_meter,
        yppu: pixels_per_meter,
        unit: png::Unit::Meter,
    }));

    let mut writer = encoder.write_header()?;
    writer.write_image_data(&data)?;
    writer.finish()?;

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="72" height="36" viewBox="0 0 72 36"><rect width="36" height="36" fill="black"/></svg>"#;

    fn white() -> Color {
        Color::new("white").unwrap()
    }

    #[test]
    fn test_rasterize_scales_points_to_pixels() {
        let pixmap = rasterize(SQUARE, (144, 72), 144, white(), "serif").unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (144, 72));

        let inside = pixmap.pixel(10, 10).unwrap().demultiply();
        assert_eq!((inside.red(), inside.alpha()), (0, 255));

        let outside = pixmap.pixel(120, 10).unwrap().demultiply();
        assert_eq!((outside.red(), outside.alpha()), (255, 255));
    }

    #[test]
    fn test_rasterize_rejects_bad_svg() {
        let err = rasterize("<not svg", (10, 10), 72, white(), "serif").unwrap_err();
        assert!(matches!(err, PgmError::Render(_)));
    }

    #[test]
    fn test_rasterize_rejects_empty_pixmap() {
        let err = rasterize(SQUARE, (0, 10), 72, white(), "serif").unwrap_err();
        assert!(matches!(err, PgmError::Render(_)));
    }

    fn text_scene(text: &str) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="72" height="36" viewBox="0 0 72 36"><text x="10" y="28" font-family="serif" font-size="24">{text}</text></svg>"#
        )
    }

    #[test]
    fn test_generic_serif_draws_text() {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        if db.is_empty() {
            return;
        }

        let blank = rasterize(&text_scene(""), (72, 36), 72, white(), "serif").unwrap();
        let lettered = rasterize(&text_scene("F"), (72, 36), 72, white(), "serif").unwrap();
        assert_ne!(blank.data(), lettered.data());
    }

    #[test]
    fn test_missing_generic_family_falls_back() {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        if db.is_empty() {
            return;
        }
        db.set_serif_family("No Such Family");

        resolve_font_family(&mut db, "serif");
        let query = Query {
            families: &[Family::Serif],
            ..Query::default()
        };
        assert!(db.query(&query).is_some());
    }

    #[test]
    fn test_encode_png_records_dpi() {
        let pixmap = rasterize(SQUARE, (72, 36), 72, white(), "serif").unwrap();
        let bytes = encode_png(&pixmap, 200).unwrap();
        assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"));

        let decoder = png::Decoder::new(bytes.as_slice());
        let reader = decoder.read_info().unwrap();
        let info = reader.info();
        assert_eq!((info.width, info.height), (72, 36));
        let dims = info.pixel_dims.unwrap();
        assert_eq!(dims.unit, png::Unit::Meter);
        assert_eq!(dims.xppu, 7874);
        assert_eq!(dims.yppu, 7874);
    }
}
