//! SVG serialization of a display list

use super::layout::LayoutConfig;
use super::paint::{Anchor, PaintCommand};
use std::fmt::Write as _;

const SHADOW_FILTER_ID: &str = "shadow";

/// Escape text for use in XML content and attribute values.
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            // not representable in XML 1.0
            c if (c as u32) < 0x20 && !matches!(c, '\t' | '\n' | '\r') => {}
            c => out.push(c),
        }
    }
    out
}

/// Compact, stable number formatting: integers without a fraction, others to two decimals.
pub fn num(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        let s = format!("{:.2}", v);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Serialize `cmds` into a standalone SVG document of the given size.
pub fn to_svg(width: f64, height: f64, cmds: &[PaintCommand], cfg: &LayoutConfig) -> String {
    let mut out = String::new();
    let (w, h) = (num(width), num(height));
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    );

    write_defs(&mut out, cmds, cfg);

    for cmd in cmds {
        match cmd {
            PaintCommand::RoundedRect {
                x,
                y,
                width,
                height,
                radius,
                fill,
                stroke,
                stroke_width,
            } => {
                let _ = writeln!(
                    out,
                    r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{r}" ry="{r}" fill="{}" stroke="{}" stroke-width="{}"/>"#,
                    num(*x),
                    num(*y),
                    num(*width),
                    num(*height),
                    escape_xml(fill),
                    escape_xml(stroke),
                    num(*stroke_width),
                    r = num(*radius),
                );
            }
            PaintCommand::Image {
                x,
                y,
                width,
                height,
                href,
            } => {
                let _ = writeln!(
                    out,
                    r#"<image href="{}" x="{}" y="{}" width="{}" height="{}"/>"#,
                    escape_xml(href),
                    num(*x),
                    num(*y),
                    num(*width),
                    num(*height),
                );
            }
            PaintCommand::Text {
                x,
                y,
                text,
                font_size,
                bold,
                anchor,
                fill,
            } => {
                let weight = if *bold { r#" font-weight="bold""# } else { "" };
                let anchor = match anchor {
                    Anchor::Start => "",
                    Anchor::Middle => r#" text-anchor="middle""#,
                };
                let _ = writeln!(
                    out,
                    r#"<text x="{}" y="{}" font-family="{}" font-size="{}"{weight}{anchor} fill="{}">{}</text>"#,
                    num(*x),
                    num(*y),
                    escape_xml(&cfg.font_family),
                    num(*font_size),
                    escape_xml(fill),
                    escape_xml(text),
                );
            }
            PaintCommand::Hexagon {
                points,
                gradient,
                stroke,
                stroke_width,
                shadow,
            } => {
                let pts = points
                    .iter()
                    .map(|p| format!("{},{}", num(p.x), num(p.y)))
                    .collect::<Vec<_>>()
                    .join(" ");
                let filter = if *shadow {
                    format!(r#" filter="url(#{})""#, SHADOW_FILTER_ID)
                } else {
                    String::new()
                };
                let _ = writeln!(
                    out,
                    r#"<polygon points="{}" fill="url(#{})" stroke="{}" stroke-width="{}"{}/>"#,
                    pts,
                    escape_xml(&gradient.id),
                    escape_xml(stroke),
                    num(*stroke_width),
                    filter,
                );
            }
        }
    }

    out.push_str("</svg>\n");
    out
}

fn write_defs(out: &mut String, cmds: &[PaintCommand], cfg: &LayoutConfig) {
    let mut defs = String::new();
    let mut needs_shadow = false;
    for cmd in cmds {
        if let PaintCommand::Hexagon { gradient, shadow, .. } = cmd {
            needs_shadow |= *shadow;
            let _ = writeln!(
                defs,
                r#"<linearGradient id="{}" x1="0%" y1="0%" x2="0%" y2="100%"><stop offset="0%" stop-color="{}" stop-opacity="1"/><stop offset="100%" stop-color="{}" stop-opacity="1"/></linearGradient>"#,
                escape_xml(&gradient.id),
                escape_xml(&gradient.from),
                escape_xml(&gradient.to),
            );
        }
    }
    if needs_shadow {
        let _ = writeln!(
            defs,
            r#"<filter id="{}" x="-50%" y="-50%" width="200%" height="200%"><feDropShadow dx="2" dy="2" stdDeviation="3" flood-color="{}"/></filter>"#,
            SHADOW_FILTER_ID,
            escape_xml(&cfg.colors.shadow),
        );
    }
    if !defs.is_empty() {
        out.push_str("<defs>\n");
        out.push_str(&defs);
        out.push_str("</defs>\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::paint::Gradient;
    use crate::rendering::layout::{hexagon_points, Point};

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_xml(r#"<a & "b">'"#), "&lt;a &amp; &quot;b&quot;&gt;&apos;");
        assert_eq!(escape_xml("bell\u{7}"), "bell");
        assert_eq!(escape_xml("★ C++"), "★ C++");
    }

    #[test]
    fn numbers_are_compact() {
        assert_eq!(num(600.0), "600");
        assert_eq!(num(-5.0), "-5");
        assert_eq!(num(103.5), "103.5");
        assert_eq!(num(38.971143170299740), "38.97");
        assert_eq!(num(0.001), "0");
    }

    #[test]
    fn empty_list_has_no_defs() {
        let svg = to_svg(600.0, 350.0, &[], &LayoutConfig::default());
        assert!(svg.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" width="600" height="350" viewBox="0 0 600 350">"#));
        assert!(!svg.contains("<defs>"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn hexagon_declares_gradient_and_single_shadow() {
        let cfg = LayoutConfig::default();
        let hex = |id: &str| PaintCommand::Hexagon {
            points: hexagon_points(Point { x: 65.0, y: 265.0 }, 45.0),
            gradient: Gradient {
                id: id.into(),
                from: "#FFD700".into(),
                to: "#FFFFFF".into(),
            },
            stroke: "#333".into(),
            stroke_width: 2.0,
            shadow: true,
        };
        let svg = to_svg(600.0, 350.0, &[hex("grad0"), hex("grad1")], &cfg);
        assert_eq!(svg.matches("<linearGradient").count(), 2);
        assert_eq!(svg.matches("<filter id=\"shadow\"").count(), 1);
        assert!(svg.contains(r#"fill="url(#grad1)""#));
        assert!(svg.contains(r##"stop-color="#FFD700""##));
        assert!(svg.contains("65,220 "));
    }

    #[test]
    fn text_is_escaped() {
        let cfg = LayoutConfig::default();
        let cmd = PaintCommand::Text {
            x: 20.0,
            y: 130.0,
            text: "HackerRank User: <script>".into(),
            font_size: 26.0,
            bold: true,
            anchor: Anchor::Start,
            fill: "#333".into(),
        };
        let svg = to_svg(600.0, 350.0, &[cmd], &cfg);
        assert!(svg.contains(r#"font-weight="bold""#));
        assert!(svg.contains("HackerRank User: &lt;script&gt;</text>"));
        assert!(!svg.contains("text-anchor"));
    }
}
