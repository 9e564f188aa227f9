//! SVG to PNG through usvg, resvg and tiny-skia.

use std::path::PathBuf;
use std::sync::Arc;

use png::{BitDepth, ColorType, Compression, Encoder, FilterType};
use tracing::debug;

use crate::error::RenderError;
use crate::scene::Scene;
use crate::svg::scene_to_svg;

#[derive(Clone, Debug, PartialEq)]
pub struct RenderOptions {
    pub px_per_cm: f64,
    /// Font for every label. The system fonts are used when unset.
    pub font_path: Option<PathBuf>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            px_per_cm: 4.0,
            font_path: None,
        }
    }
}

/// A finished drawing: the SVG source and its raster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    pub svg: String,
    pub png: Vec<u8>,
}

fn font_database(options: &RenderOptions) -> Result<usvg::fontdb::Database, RenderError> {
    let mut fontdb = usvg::fontdb::Database::new();
    match &options.font_path {
        Some(path) => {
            let bytes = std::fs::read(path).map_err(|source| RenderError::Font {
                path: path.display().to_string(),
                source,
            })?;
            fontdb.load_font_data(bytes);
        }
        None => fontdb.load_system_fonts(),
    }
    // Map generic 'sans-serif' to the first loaded family
    let family_name = fontdb
        .faces()
        .next()
        .and_then(|face| face.families.first().map(|(n, _)| n.clone()));
    if let Some(name) = family_name {
        fontdb.set_sans_serif_family(name);
    }
    Ok(fontdb)
}

/// Rejects scales that would produce an empty or unbounded surface.
pub fn check_scale(px_per_cm: f64) -> Result<(), RenderError> {
    if !px_per_cm.is_finite() || px_per_cm <= 0.0 {
        return Err(RenderError::InvalidScale(px_per_cm));
    }
    Ok(())
}

/// Renders `scene` with `title`. Nothing is returned unless every stage
/// succeeds; the surface lives only for this call.
pub fn render(scene: &Scene, title: &str, options: &RenderOptions) -> Result<Image, RenderError> {
    let k = options.px_per_cm;
    check_scale(k)?;
    let (svg, width, height) = scene_to_svg(scene, title, k);
    let opt = usvg::Options {
        fontdb: Arc::new(font_database(options)?),
        ..usvg::Options::default()
    };
    let tree = usvg::Tree::from_str(&svg, &opt).map_err(|e| RenderError::Svg(format!("{e:?}")))?;
    let mut pixmap =
        tiny_skia::Pixmap::new(width, height).ok_or(RenderError::Surface { width, height })?;
    let mut pm = pixmap.as_mut();
    resvg::render(&tree, tiny_skia::Transform::identity(), &mut pm);
    let png = encode_png(&pixmap)?;
    debug!(width, height, bytes = png.len(), "rendered scene");
    Ok(Image {
        width,
        height,
        svg,
        png,
    })
}

/// PNG bytes with fixed encoder settings, identical for identical pixels.
pub fn encode_png(pixmap: &tiny_skia::Pixmap) -> Result<Vec<u8>, RenderError> {
    let mut buf = Vec::new();
    {
        let mut enc = Encoder::new(&mut buf, pixmap.width(), pixmap.height());
        enc.set_color(ColorType::Rgba);
        enc.set_depth(BitDepth::Eight);
        enc.set_filter(FilterType::NoFilter);
        enc.set_compression(Compression::Default);
        let mut writer = enc.write_header()?;
        writer.write_image_data(pixmap.data())?;
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_scene() -> Scene {
        Scene {
            parts: Vec::new(),
            dimensions: Vec::new(),
            width: 10.0,
            height: 5.0,
        }
    }

    #[test]
    fn rejects_bad_scale() {
        let options = RenderOptions {
            px_per_cm: 0.0,
            ..RenderOptions::default()
        };
        assert!(matches!(
            render(&tiny_scene(), "", &options),
            Err(RenderError::InvalidScale(_))
        ));
    }

    #[test]
    fn missing_font_file_is_a_render_error() {
        let options = RenderOptions {
            font_path: Some(PathBuf::from("/nonexistent/font.ttf")),
            ..RenderOptions::default()
        };
        assert!(matches!(
            render(&tiny_scene(), "", &options),
            Err(RenderError::Font { .. })
        ));
    }

    #[test]
    fn png_has_signature_and_is_stable() {
        let options = RenderOptions::default();
        let a = render(&tiny_scene(), "", &options).unwrap();
        let b = render(&tiny_scene(), "", &options).unwrap();
        assert_eq!((a.width, a.height), (40, 20));
        assert_eq!(&a.png[..8], b"\x89PNG\r\n\x1a\n");
        assert_eq!(a, b);
    }
}
