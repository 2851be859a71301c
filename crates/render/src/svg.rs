//! SVG serialization of a [`RenderFrame`].

use std::fmt::Write;

use crate::frame::{Paint, RenderCommand, RenderFrame, TextAnchor};

/// Renders `frame` as a standalone SVG document.
pub fn to_svg(frame: &RenderFrame) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        num(frame.width),
        num(frame.height),
        num(frame.width),
        num(frame.height)
    );
    for command in &frame.commands {
        let _ = match command {
            RenderCommand::Circle { center, r, paint } => writeln!(
                out,
                r#"  <circle cx="{}" cy="{}" r="{}"{}/>"#,
                num(center.x),
                num(center.y),
                num(*r),
                paint_attrs(paint)
            ),
            RenderCommand::Line {
                from,
                to,
                color,
                width,
            } => writeln!(
                out,
                r#"  <line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}"/>"#,
                num(from.x),
                num(from.y),
                num(to.x),
                num(to.y),
                color,
                num(*width)
            ),
            RenderCommand::Rect { rect, paint } => writeln!(
                out,
                r#"  <rect x="{}" y="{}" width="{}" height="{}"{}/>"#,
                num(rect.min.x),
                num(rect.min.y),
                num(rect.width()),
                num(rect.height()),
                paint_attrs(paint)
            ),
            RenderCommand::Text {
                at,
                text,
                anchor,
                size,
            } => writeln!(
                out,
                r#"  <text x="{}" y="{}" text-anchor="{}" font-size="{}">{}</text>"#,
                num(at.x),
                num(at.y),
                anchor_name(*anchor),
                num(*size),
                escape(text)
            ),
        };
    }
    out.push_str("</svg>\n");
    out
}

fn paint_attrs(paint: &Paint) -> String {
    let mut attrs = String::new();
    match paint.fill {
        Some(fill) => {
            let _ = write!(attrs, r#" fill="{fill}""#);
        }
        None => attrs.push_str(r#" fill="none""#),
    }
    if let Some(stroke) = paint.stroke {
        let _ = write!(
            attrs,
            r#" stroke="{stroke}" stroke-width="{}""#,
            num(paint.stroke_width)
        );
    }
    if paint.opacity < 1.0 {
        let _ = write!(attrs, r#" opacity="{}""#, num(paint.opacity));
    }
    attrs
}

fn anchor_name(anchor: TextAnchor) -> &'static str {
    match anchor {
        TextAnchor::Start => "start",
        TextAnchor::Middle => "middle",
        TextAnchor::End => "end",
    }
}

/// Two decimals, trailing zeros trimmed.
fn num(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
