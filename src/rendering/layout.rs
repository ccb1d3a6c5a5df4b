//! Card geometry: fixed canvas width, dynamic height, badge grid placement.

/// Visual parameters of the card. [`LayoutConfig::default`] is the house style.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    pub card_width: f64,
    /// Height of a card whose badges fit in one row
    pub base_height: f64,
    /// Height added for each badge row after the first
    pub row_height_increment: f64,
    pub corner_radius: f64,
    pub border_width: f64,

    pub logo_x: f64,
    pub logo_y: f64,
    pub logo_width: f64,
    pub logo_height: f64,

    pub margin_x: f64,
    /// Baseline of the username line
    pub header_y: f64,
    /// Distance between the username and name baselines
    pub header_line_gap: f64,
    /// Top edge of the first badge row
    pub grid_top: f64,

    pub badges_per_row: usize,
    pub badge_size: f64,
    pub badge_gap: f64,
    /// Icon edge length as a fraction of `badge_size`
    pub icon_scale: f64,
    pub max_title_lines: usize,
    /// Pad the star line with empty stars up to `max_stars`
    pub pad_stars: bool,
    pub max_stars: u32,
    pub drop_shadow: bool,

    pub fonts: FontSizes,
    pub colors: Colors,
    pub font_family: String,
    pub username_label: String,
    pub name_label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FontSizes {
    pub username: f64,
    pub name: f64,
    pub badge_title: f64,
    pub stars: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Colors {
    pub background: String,
    pub accent: String,
    pub text: String,
    pub hexagon_stroke: String,
    pub gold: String,
    pub silver: String,
    pub bronze: String,
    pub gradient_end: String,
    pub stars: String,
    pub shadow: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            card_width: 600.0,
            base_height: 350.0,
            row_height_increment: 100.0,
            corner_radius: 20.0,
            border_width: 4.0,
            logo_x: 20.0,
            logo_y: 0.0,
            logo_width: 200.0,
            logo_height: 120.0,
            margin_x: 20.0,
            header_y: 130.0,
            header_line_gap: 40.0,
            grid_top: 220.0,
            badges_per_row: 5,
            badge_size: 90.0,
            badge_gap: 10.0,
            icon_scale: 0.30,
            max_title_lines: 2,
            pad_stars: false,
            max_stars: 5,
            drop_shadow: true,
            fonts: FontSizes {
                username: 26.0,
                name: 20.0,
                badge_title: 9.0,
                stars: 10.0,
            },
            colors: Colors {
                background: "#ffffff".into(),
                accent: "#00ab41".into(),
                text: "#333".into(),
                hexagon_stroke: "#333".into(),
                gold: "#FFD700".into(),
                silver: "#C0C0C0".into(),
                bronze: "#E57373".into(),
                gradient_end: "#FFFFFF".into(),
                stars: "#000000".into(),
                shadow: "#333".into(),
            },
            font_family: "Arial, sans-serif".into(),
            username_label: "HackerRank User".into(),
            name_label: "Name".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Grid coordinates of a badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

/// Geometry of one card, computed per render.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub card_width: f64,
    pub card_height: f64,
    pub badges_per_row: usize,
    pub badge_size: f64,
    /// Top-left corner of each badge cell, in badge order
    pub offsets: Vec<Point>,
}

impl LayoutConfig {
    fn per_row(&self) -> usize {
        self.badges_per_row.max(1)
    }

    /// Number of badge rows needed for `count` badges.
    pub fn rows_for(&self, count: usize) -> usize {
        count.div_ceil(self.per_row())
    }

    /// Card height for `count` badges: the base height covers the first row.
    pub fn card_height(&self, count: usize) -> f64 {
        let extra_rows = self.rows_for(count).saturating_sub(1);
        self.base_height + extra_rows as f64 * self.row_height_increment
    }

    pub fn cell(&self, index: usize) -> Cell {
        Cell {
            row: index / self.per_row(),
            col: index % self.per_row(),
        }
    }

    /// Top-left corner of the cell holding badge `index`.
    pub fn cell_origin(&self, index: usize) -> Point {
        let cell = self.cell(index);
        let pitch = self.badge_size + self.badge_gap;
        Point {
            x: self.margin_x + cell.col as f64 * pitch,
            y: self.grid_top + cell.row as f64 * pitch,
        }
    }

    pub fn layout(&self, count: usize) -> Layout {
        Layout {
            card_width: self.card_width,
            card_height: self.card_height(count),
            badges_per_row: self.per_row(),
            badge_size: self.badge_size,
            offsets: (0..count).map(|i| self.cell_origin(i)).collect(),
        }
    }

    /// Gradient start colour for a badge with `stars` stars.
    pub fn tier_color(&self, stars: u32) -> &str {
        match crate::Tier::from_stars(stars) {
            crate::Tier::Gold => &self.colors.gold,
            crate::Tier::Silver => &self.colors.silver,
            _ => &self.colors.bronze,
        }
    }
}

/// Vertices of a pointy-top regular hexagon, clockwise from the top.
pub fn hexagon_points(center: Point, radius: f64) -> [Point; 6] {
    let dx = radius * (std::f64::consts::PI / 3.0).sin();
    let half = radius / 2.0;
    let Point { x, y } = center;
    [
        Point { x, y: y - radius },
        Point { x: x + dx, y: y - half },
        Point { x: x + dx, y: y + half },
        Point { x, y: y + radius },
        Point { x: x - dx, y: y + half },
        Point { x: x - dx, y: y - half },
    ]
}

/// Estimated advance width of `text` at `font_size`.
///
/// Uses a fixed average glyph width so wrapping never depends on which fonts
/// happen to be installed.
pub fn text_width(text: &str, font_size: f64) -> f64 {
    const AVG_GLYPH_EM: f64 = 0.55;
    text.chars().count() as f64 * font_size * AVG_GLYPH_EM
}

/// Greedy word wrap against `max_width`, at most `max_lines` lines.
///
/// Words that do not fit on the last allowed line are appended to it.
/// A single word wider than `max_width` gets a line of its own.
pub fn wrap_text(text: &str, font_size: f64, max_width: f64, max_lines: usize) -> Vec<String> {
    let max_lines = max_lines.max(1);
    let mut lines: Vec<String> = Vec::new();
    let mut cur = String::new();
    for word in text.split_whitespace() {
        if cur.is_empty() {
            cur.push_str(word);
            continue;
        }
        let candidate = format!("{} {}", cur, word);
        if text_width(&candidate, font_size) > max_width && lines.len() + 1 < max_lines {
            lines.push(std::mem::replace(&mut cur, word.to_string()));
        } else {
            cur = candidate;
        }
    }
    if !cur.is_empty() || lines.is_empty() {
        lines.push(cur);
    }
    lines
}
