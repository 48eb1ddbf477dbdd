use serde::{Deserialize, Serialize};

/// Millimetres per inch, used for display labels only.
pub const MM_PER_INCH: f64 = 25.4;

const ARROW_SIZE: f64 = 5.0;
const DIMENSION_OFFSET: f64 = 20.0;

/// Unit that dimension labels are written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisplayUnit {
    Millimetre,
    Inch,
}

impl DisplayUnit {
    pub fn suffix(self) -> &'static str {
        match self {
            DisplayUnit::Millimetre => "mm",
            DisplayUnit::Inch => "in",
        }
    }
}

/// Format a length held in millimetres for display in `unit`.
///
/// Values are rounded to four decimals and trailing zeros are trimmed, so
/// `20.6375` mm shown in inches reads `0.8125 in`.
pub fn format_length(millimetres: f64, unit: DisplayUnit) -> String {
    let value = match unit {
        DisplayUnit::Millimetre => millimetres,
        DisplayUnit::Inch => millimetres / MM_PER_INCH,
    };
    let mut text = format!("{value:.4}");
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    format!("{text} {}", unit.suffix())
}

/// A dimension line with arrowheads at both ends and a text label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionLine {
    pub from: (f64, f64),
    pub to: (f64, f64),
    pub label: String,
    pub label_at: (f64, f64),
}

/// A slotted hole drawn with its width and length dimensioned.
///
/// Geometry is always in millimetres; only the labels follow
/// [`SlotDiagram::unit`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotDiagram {
    pub canvas: (f64, f64),
    pub origin: (f64, f64),
    pub width_mm: f64,
    pub length_mm: f64,
    pub unit: DisplayUnit,
    pub length_dimension: DimensionLine,
    pub width_dimension: DimensionLine,
}

impl SlotDiagram {
    pub const DEFAULT_CANVAS: (f64, f64) = (300.0, 400.0);
    pub const DEFAULT_ORIGIN: (f64, f64) = (100.0, 50.0);

    pub fn new(width_mm: f64, length_mm: f64, unit: DisplayUnit) -> Self {
        Self::with_layout(
            width_mm,
            length_mm,
            unit,
            Self::DEFAULT_ORIGIN,
            Self::DEFAULT_CANVAS,
        )
    }

    pub fn with_layout(
        width_mm: f64,
        length_mm: f64,
        unit: DisplayUnit,
        origin: (f64, f64),
        canvas: (f64, f64),
    ) -> Self {
        let (x, y) = origin;
        let length_dimension = DimensionLine {
            from: (x, y - DIMENSION_OFFSET),
            to: (x + length_mm, y - DIMENSION_OFFSET),
            label: format_length(length_mm, unit),
            label_at: (x + length_mm / 2.0, y - DIMENSION_OFFSET - 10.0),
        };
        let width_dimension = DimensionLine {
            from: (x - DIMENSION_OFFSET, y),
            to: (x - DIMENSION_OFFSET, y + width_mm),
            label: format_length(width_mm, unit),
            label_at: (x - DIMENSION_OFFSET - 10.0, y + width_mm / 2.0),
        };
        Self {
            canvas,
            origin,
            width_mm,
            length_mm,
            unit,
            length_dimension,
            width_dimension,
        }
    }

    pub fn to_svg(&self) -> String {
        let (width, height) = self.canvas;
        let (x, y) = self.origin;
        let radius = self.width_mm / 2.0;
        let length = &self.length_dimension;
        let across = &self.width_dimension;

        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
        );
        svg.push_str(&format!(
            r#"<rect x="{x}" y="{y}" width="{}" height="{}" rx="{radius}" ry="{radius}" fill="lightgray" stroke="black" stroke-width="1"/>"#,
            self.length_mm, self.width_mm
        ));
        svg.push_str(&line(length));
        svg.push_str(&arrow(length.from, (ARROW_SIZE, 0.0)));
        svg.push_str(&arrow(length.to, (-ARROW_SIZE, 0.0)));
        svg.push_str(&format!(
            r#"<text x="{}" y="{}" font-size="14" text-anchor="middle" fill="black">{}</text>"#,
            length.label_at.0, length.label_at.1, length.label
        ));
        svg.push_str(&line(across));
        svg.push_str(&arrow(across.from, (0.0, ARROW_SIZE)));
        svg.push_str(&arrow(across.to, (0.0, -ARROW_SIZE)));
        svg.push_str(&format!(
            r#"<text x="{}" y="{}" font-size="14" text-anchor="end" fill="black" dominant-baseline="middle">{}</text>"#,
            across.label_at.0, across.label_at.1, across.label
        ));
        svg.push_str("</svg>");
        svg
    }
}

fn line(dimension: &DimensionLine) -> String {
    format!(
        r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="black" stroke-width="1"/>"#,
        dimension.from.0, dimension.from.1, dimension.to.0, dimension.to.1
    )
}

/// Arrowhead with its tip at `tip`, opening along `direction`.
fn arrow(tip: (f64, f64), direction: (f64, f64)) -> String {
    let (tx, ty) = tip;
    let (dx, dy) = direction;
    let (bx, by) = (tx + dx, ty + dy);
    let (px, py) = (dy.abs(), dx.abs());
    format!(
        r#"<polygon points="{tx},{ty} {},{} {},{}" fill="black"/>"#,
        bx - px,
        by - py,
        bx + px,
        by + py
    )
}
