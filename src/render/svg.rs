//! SVG backend: serializes a scene to standalone SVG markup.
//!
//! The markup is what the browser viewer mounts into the page and what an
//! export hands to the host for rasterization.

use std::fmt::Write as _;

use crate::error::{HotmapError, Result};

use super::backend::{DrawCommand, RenderBackend, Scene, TextAnchor};

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
/// Id of the root element, used by hosts to find the map.
pub const SVG_ID: &str = "hot-map-svg";

/// Filter definitions referenced by cell backgrounds.
const FILTER_DEFS: &str = concat!(
    r#"<defs>"#,
    r#"<filter id="lighten"><feComponentTransfer>"#,
    r#"<feFuncR type="linear" slope="0.85" intercept="0.15"/>"#,
    r#"<feFuncG type="linear" slope="0.85" intercept="0.15"/>"#,
    r#"<feFuncB type="linear" slope="0.85" intercept="0.15"/>"#,
    r#"</feComponentTransfer></filter>"#,
    r#"<filter id="inset-shadow">"#,
    r#"<feOffset dx="0" dy="0"/>"#,
    r#"<feGaussianBlur stdDeviation="4" result="offset-blur"/>"#,
    r#"<feComposite operator="out" in="SourceGraphic" in2="offset-blur" result="inverse"/>"#,
    r#"<feFlood flood-color="black" flood-opacity="0.6" result="color"/>"#,
    r#"<feComposite operator="in" in="color" in2="inverse" result="shadow"/>"#,
    r#"<feComposite operator="over" in="shadow" in2="SourceGraphic"/>"#,
    r#"</filter>"#,
    r#"</defs>"#
);

/// Renders scenes into an in-memory SVG document.
#[derive(Debug, Default)]
pub struct SvgRenderer {
    markup: String,
}

impl SvgRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Markup of the last rendered scene (empty before the first render).
    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn into_markup(self) -> String {
        self.markup
    }

    /// One-shot helper.
    pub fn to_markup(scene: &Scene) -> Result<String> {
        let mut renderer = Self::new();
        renderer.render(scene)?;
        Ok(renderer.into_markup())
    }

    fn write_scene(out: &mut String, scene: &Scene) -> std::fmt::Result {
        write!(
            out,
            r#"<svg xmlns="{SVG_NS}" xmlns:xlink="{XLINK_NS}" id="{SVG_ID}" width="{}" height="{}">"#,
            num(scene.width),
            num(scene.height)
        )?;
        out.push_str(FILTER_DEFS);
        let mut depth = 0usize;
        for command in &scene.commands {
            match command {
                DrawCommand::BeginGroup { id } => {
                    depth += 1;
                    write!(out, r#"<g id="{}">"#, escape(id))?;
                }
                DrawCommand::EndGroup => {
                    if depth > 0 {
                        depth -= 1;
                        out.push_str("</g>");
                    }
                }
                DrawCommand::Rect {
                    x,
                    y,
                    width,
                    height,
                    fill,
                    class,
                    filter,
                    stroke,
                } => {
                    write!(
                        out,
                        r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}""#,
                        num(*x),
                        num(*y),
                        num(*width),
                        num(*height),
                        escape(fill)
                    )?;
                    if let Some(class) = class {
                        write!(out, r#" class="{}""#, escape(class))?;
                    }
                    if let Some(filter) = filter {
                        write!(out, r#" filter="url(#{})""#, filter.id())?;
                    }
                    if let Some(stroke) = stroke {
                        write!(out, r#" stroke="{}" stroke-width="2""#, escape(stroke))?;
                    }
                    out.push_str("/>");
                }
                DrawCommand::Text {
                    x,
                    y,
                    text,
                    font_size,
                    anchor,
                    fill,
                } => {
                    let anchor = match anchor {
                        TextAnchor::Start => "start",
                        TextAnchor::Middle => "middle",
                    };
                    write!(
                        out,
                        r#"<text x="{}" y="{}" text-anchor="{anchor}" fill="{}" style="font-size: {}px;">{}</text>"#,
                        num(*x),
                        num(*y),
                        escape(fill),
                        num(*font_size),
                        escape(text)
                    )?;
                }
                DrawCommand::Image {
                    x,
                    y,
                    width,
                    height,
                    href,
                    class,
                } => {
                    write!(
                        out,
                        r#"<image x="{}" y="{}" width="{}" height="{}" xlink:href="{}" class="{}"/>"#,
                        num(*x),
                        num(*y),
                        num(*width),
                        num(*height),
                        escape(href),
                        escape(class)
                    )?;
                }
            }
        }
        for _ in 0..depth {
            out.push_str("</g>");
        }
        out.push_str("</svg>");
        Ok(())
    }
}

impl RenderBackend for SvgRenderer {
    fn render(&mut self, scene: &Scene) -> Result<()> {
        let mut out = String::with_capacity(256 + scene.commands.len() * 96);
        Self::write_scene(&mut out, scene)
            .map_err(|e| HotmapError::Render(format!("SVG serialization: {e}")))?;
        self.markup = out;
        Ok(())
    }

    fn clear(&mut self) {
        self.markup.clear();
    }
}

/// Format a coordinate without a trailing ".0" for whole numbers.
fn num(value: f64) -> String {
    if value.fract().abs() < f64::EPSILON && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        let formatted = format!("{value:.2}");
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}

/// Escape text for use in XML attributes and character data.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_num_formatting() {
        assert_eq!(num(10.0), "10");
        assert_eq!(num(68.5), "68.5");
        assert_eq!(num(1.0 / 3.0), "0.33");
        assert_eq!(num(-25.0), "-25");
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("R&D <core>"), "R&amp;D &lt;core&gt;");
    }

    #[test]
    fn test_unbalanced_groups_are_closed() {
        let mut scene = Scene::new(100.0, 50.0);
        scene.push(DrawCommand::BeginGroup { id: "a".into() });
        let svg = SvgRenderer::to_markup(&scene).unwrap();
        assert!(svg.ends_with("</g></svg>"));
        assert!(svg.contains(r#"id="hot-map-svg""#));
        assert!(svg.contains(r#"<filter id="inset-shadow">"#));
    }

    #[test]
    fn test_clear() {
        let mut renderer = SvgRenderer::new();
        renderer.render(&Scene::new(1.0, 1.0)).unwrap();
        assert!(!renderer.markup().is_empty());
        renderer.clear();
        assert!(renderer.markup().is_empty());
    }
}
