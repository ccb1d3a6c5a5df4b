//! Display list for a card: layout turned into drawing primitives

use super::image::{load_icon, ImageRef};
use super::layout::{hexagon_points, wrap_text, Layout, LayoutConfig, Point};
use crate::profile::{or_not_available, Badge, ProfileData};

const FILLED_STAR: char = '★';
const EMPTY_STAR: char = '☆';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
}

/// Two-stop vertical gradient
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    pub id: String,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    RoundedRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        radius: f64,
        fill: String,
        stroke: String,
        stroke_width: f64,
    },
    Image {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        href: String,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        font_size: f64,
        bold: bool,
        anchor: Anchor,
        fill: String,
    },
    Hexagon {
        points: [Point; 6],
        gradient: Gradient,
        stroke: String,
        stroke_width: f64,
        shadow: bool,
    },
}

/// Everything drawn for one card, back to front.
pub fn display_list(
    data: &ProfileData,
    logo: Option<&ImageRef>,
    cfg: &LayoutConfig,
    layout: &Layout,
) -> Vec<PaintCommand> {
    let mut cmds = vec![PaintCommand::RoundedRect {
        x: 0.0,
        y: 0.0,
        width: layout.card_width,
        height: layout.card_height,
        radius: cfg.corner_radius,
        fill: cfg.colors.background.clone(),
        stroke: cfg.colors.accent.clone(),
        stroke_width: cfg.border_width,
    }];

    match logo.map(ImageRef::href) {
        Some(Some(href)) => cmds.push(PaintCommand::Image {
            x: cfg.logo_x,
            y: cfg.logo_y,
            width: cfg.logo_width,
            height: cfg.logo_height,
            href,
        }),
        Some(None) => log::warn!("logo is not a recognized image, skipping"),
        None => {}
    }

    cmds.push(PaintCommand::Text {
        x: cfg.margin_x,
        y: cfg.header_y,
        text: format!("{}: {}", cfg.username_label, or_not_available(&data.username)),
        font_size: cfg.fonts.username,
        bold: true,
        anchor: Anchor::Start,
        fill: cfg.colors.text.clone(),
    });
    cmds.push(PaintCommand::Text {
        x: cfg.margin_x,
        y: cfg.header_y + cfg.header_line_gap,
        text: format!("{}: {}", cfg.name_label, or_not_available(&data.full_name)),
        font_size: cfg.fonts.name,
        bold: false,
        anchor: Anchor::Start,
        fill: cfg.colors.text.clone(),
    });

    for (i, (badge, origin)) in data.badges.iter().zip(&layout.offsets).enumerate() {
        paint_badge(&mut cmds, i, badge, *origin, cfg);
    }
    cmds
}

fn paint_badge(cmds: &mut Vec<PaintCommand>, index: usize, badge: &Badge, origin: Point, cfg: &LayoutConfig) {
    let size = cfg.badge_size;
    let center = Point {
        x: origin.x + size / 2.0,
        y: origin.y + size / 2.0,
    };

    cmds.push(PaintCommand::Hexagon {
        points: hexagon_points(center, size / 2.0),
        gradient: Gradient {
            id: format!("grad{}", index),
            from: cfg.tier_color(badge.stars).to_string(),
            to: cfg.colors.gradient_end.clone(),
        },
        stroke: cfg.colors.hexagon_stroke.clone(),
        stroke_width: 2.0,
        shadow: cfg.drop_shadow,
    });

    match load_icon(badge) {
        Ok(href) => {
            let icon = size * cfg.icon_scale;
            cmds.push(PaintCommand::Image {
                x: origin.x + (size - icon) / 2.0,
                y: origin.y + (size - icon) / 2.0 - 5.0,
                width: icon,
                height: icon,
                href,
            });
        }
        Err(e) => log::debug!("drawing badge without icon: {}", e),
    }

    let title_size = cfg.fonts.badge_title;
    let line_height = title_size + 1.0;
    let lines = wrap_text(or_not_available(&badge.title), title_size, size * 0.85, cfg.max_title_lines);
    let extra_lines = lines.len().saturating_sub(1) as f64;
    for (n, line) in lines.into_iter().enumerate() {
        cmds.push(PaintCommand::Text {
            x: center.x,
            y: center.y + 15.0 + n as f64 * line_height,
            text: line,
            font_size: title_size,
            bold: true,
            anchor: Anchor::Middle,
            fill: cfg.colors.text.clone(),
        });
    }

    let stars = star_line(badge.stars, cfg);
    if !stars.is_empty() {
        cmds.push(PaintCommand::Text {
            x: center.x,
            y: center.y + 25.0 + extra_lines * line_height,
            text: stars,
            font_size: cfg.fonts.stars,
            bold: false,
            anchor: Anchor::Middle,
            fill: cfg.colors.stars.clone(),
        });
    }
}

/// Filled stars for the rating, optionally padded with empty ones.
pub fn star_line(stars: u32, cfg: &LayoutConfig) -> String {
    let mut line: String = std::iter::repeat(FILLED_STAR).take(stars as usize).collect();
    if cfg.pad_stars {
        line.extend(std::iter::repeat(EMPTY_STAR).take(cfg.max_stars.saturating_sub(stars) as usize));
    }
    line
}
