use crate::geometry::{Point, centroid};
use crate::scene::{Dimension, Scene};

const STROKE: &str = "#333";

// Sizes in centimeters, scaled to pixels on output.
const TEXT_CM: f64 = 4.5;
const TITLE_CM: f64 = 7.0;
const LINE_CM: f64 = 0.35;
const TICK_CM: f64 = 2.5;

pub fn svg_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Writes `scene` as an SVG document, `px_per_cm` pixels per centimeter.
///
/// Returns the document and its pixel size.
pub fn scene_to_svg(scene: &Scene, title: &str, px_per_cm: f64) -> (String, u32, u32) {
    let w_px = (scene.width * px_per_cm).ceil() as u32;
    let h_px = (scene.height * px_per_cm).ceil() as u32;
    let cm2px = |v: f64| v * px_per_cm;
    let to_px = |p: Point| (cm2px(p.x), cm2px(scene.height - p.y));
    let mut s = String::new();
    s.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    s.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\" stroke=\"{}\" stroke-width=\"{:.2}\" stroke-linejoin=\"round\" font-family=\"sans-serif\" font-size=\"{:.2}\">\n",
        w_px,
        h_px,
        w_px,
        h_px,
        STROKE,
        cm2px(LINE_CM),
        cm2px(TEXT_CM)
    ));
    s.push_str("<rect x=\"0\" y=\"0\" width=\"100%\" height=\"100%\" fill=\"#ffffff\" stroke=\"none\"/>\n");

    for part in &scene.parts {
        s.push_str(&path_from_points(&part.points, &part.fill, &to_px));
    }
    for part in &scene.parts {
        if let Some(caption) = &part.caption {
            let (x, y) = to_px(centroid(&part.points));
            s.push_str(&format!(
                "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" dominant-baseline=\"middle\" fill=\"{}\" stroke=\"none\">{}</text>\n",
                x,
                y,
                STROKE,
                svg_escape(caption)
            ));
        }
    }
    for dim in &scene.dimensions {
        s.push_str(&dimension(dim, &cm2px, &to_px));
    }

    let (tx, ty) = to_px(scene.title_anchor());
    s.push_str(&format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" dominant-baseline=\"middle\" fill=\"{}\" stroke=\"none\" font-size=\"{:.2}\">{}</text>\n",
        tx,
        ty,
        STROKE,
        cm2px(TITLE_CM),
        svg_escape(title)
    ));
    s.push_str("</svg>\n");
    (s, w_px, h_px)
}

fn path_from_points<F>(pts: &[Point], fill: &str, to_px: &F) -> String
where
    F: Fn(Point) -> (f64, f64),
{
    if pts.is_empty() {
        return String::new();
    }
    let (x0, y0) = to_px(pts[0]);
    let mut out = format!("<path d=\"M {:.2} {:.2}", x0, y0);
    for p in &pts[1..] {
        let (x, y) = to_px(*p);
        out.push_str(&format!(" L {:.2} {:.2}", x, y));
    }
    out.push_str(&format!(" Z\" fill=\"{}\"/>\n", svg_escape(fill)));
    out
}

fn line<F>(a: Point, b: Point, to_px: &F) -> String
where
    F: Fn(Point) -> (f64, f64),
{
    let (x0, y0) = to_px(a);
    let (x1, y1) = to_px(b);
    format!(
        "<path d=\"M {:.2} {:.2} L {:.2} {:.2}\" fill=\"none\"/>\n",
        x0, y0, x1, y1
    )
}

fn dimension<C, F>(dim: &Dimension, cm2px: &C, to_px: &F) -> String
where
    C: Fn(f64) -> f64,
    F: Fn(Point) -> (f64, f64),
{
    let mut out = line(dim.start, dim.end, to_px);
    let h = TICK_CM / 2.0;
    for p in [dim.start, dim.end] {
        let (a, b) = if dim.vertical {
            (Point::new(p.x - h, p.y), Point::new(p.x + h, p.y))
        } else {
            (Point::new(p.x, p.y - h), Point::new(p.x, p.y + h))
        };
        out.push_str(&line(a, b, to_px));
    }
    let (x, y) = to_px(dim.label_at);
    let rotate = if dim.vertical {
        format!(" transform=\"rotate(-90 {:.2} {:.2})\"", x, y)
    } else {
        String::new()
    };
    out.push_str(&format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" dominant-baseline=\"middle\" fill=\"{}\" stroke=\"none\" font-size=\"{:.2}\"{}>{}</text>\n",
        x,
        y,
        STROKE,
        cm2px(TEXT_CM * 0.8),
        rotate,
        svg_escape(&dim.label)
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Lengths, ShapeKind, SofaConfiguration};
    use crate::layout::plan;
    use crate::scene::compose;

    fn simple_scene() -> Scene {
        let config =
            SofaConfiguration::new(ShapeKind::Simple, Lengths::straight(280.0), 70.0).unwrap();
        compose(&plan(&config).unwrap(), config.palette())
    }

    #[test]
    fn size_scales_with_resolution() {
        let scene = simple_scene();
        let (_, w1, h1) = scene_to_svg(&scene, "t", 2.0);
        let (_, w2, h2) = scene_to_svg(&scene, "t", 4.0);
        assert!(w2 >= 2 * w1 - 1 && h2 >= 2 * h1 - 1);
    }

    #[test]
    fn one_path_per_part_and_escaped_title() {
        let scene = simple_scene();
        let (svg, _, _) = scene_to_svg(&scene, "Sofa <A&B>", 4.0);
        let filled = svg.matches("Z\" fill=").count();
        assert_eq!(filled, scene.parts.len());
        assert!(svg.contains("Sofa &lt;A&amp;B&gt;"));
        assert!(svg.contains("280 cm"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }
}
