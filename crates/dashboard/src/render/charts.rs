//! Inline SVG charts for the metrics view

use agro_lib::dataset::CorrelationMatrix;
use agro_lib::TrainedModel;

/// Viridis colour map sampled at five evenly spaced stops
const VIRIDIS: [(f64, [u8; 3]); 5] = [
    (0.00, [68, 1, 84]),
    (0.25, [59, 82, 139]),
    (0.50, [33, 145, 140]),
    (0.75, [94, 201, 98]),
    (1.00, [253, 231, 37]),
];

const NAN_FILL: &str = "#cccccc";

const CELL: f64 = 72.0;
const HEATMAP_LEFT: f64 = 140.0;
const HEATMAP_TOP: f64 = 16.0;
const HEATMAP_BOTTOM: f64 = 120.0;
const BAR_GAP: f64 = 24.0;
const BAR_WIDTH: f64 = 16.0;

const SCATTER_WIDTH: f64 = 520.0;
const SCATTER_HEIGHT: f64 = 400.0;
const MARGIN_LEFT: f64 = 64.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 20.0;
const MARGIN_BOTTOM: f64 = 52.0;
const TICKS: usize = 5;

/// Colour for `t` in [0, 1]; values outside are clamped
pub fn viridis(t: f64) -> String {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let upper = VIRIDIS
        .iter()
        .position(|(stop, _)| *stop >= t)
        .unwrap_or(VIRIDIS.len() - 1)
        .max(1);
    let (s0, c0) = VIRIDIS[upper - 1];
    let (s1, c1) = VIRIDIS[upper];
    let f = (t - s0) / (s1 - s0);

    let channel = |i: usize| (c0[i] as f64 + (c1[i] as f64 - c0[i] as f64) * f).round() as u8;
    format!("#{:02x}{:02x}{:02x}", channel(0), channel(1), channel(2))
}

/// Linear mapping from a data domain to pixel coordinates
#[derive(Debug, Clone, Copy)]
struct Scale {
    d0: f64,
    d1: f64,
    r0: f64,
    r1: f64,
}

impl Scale {
    fn new((d0, d1): (f64, f64), (r0, r1): (f64, f64)) -> Self {
        Self { d0, d1, r0, r1 }
    }

    fn map(&self, v: f64) -> f64 {
        if self.d1 == self.d0 {
            return (self.r0 + self.r1) / 2.0;
        }
        self.r0 + (v - self.d0) / (self.d1 - self.d0) * (self.r1 - self.r0)
    }

    fn ticks(&self) -> impl Iterator<Item = f64> + '_ {
        (0..TICKS).map(move |i| self.d0 + (self.d1 - self.d0) * i as f64 / (TICKS - 1) as f64)
    }
}

/// Correlation heatmap with annotated cells and a colour bar
///
/// Colours span the finite coefficient range of the matrix; undefined
/// coefficients are drawn grey.
pub fn correlation_heatmap(matrix: &CorrelationMatrix) -> String {
    let n = matrix.columns.len();
    let grid = CELL * n as f64;
    let (lo, hi) = matrix.range().unwrap_or((-1.0, 1.0));
    let norm = |v: f64| if hi > lo { (v - lo) / (hi - lo) } else { 0.5 };

    let bar_x = HEATMAP_LEFT + grid + BAR_GAP;
    let width = bar_x + BAR_WIDTH + 56.0;
    let height = HEATMAP_TOP + grid + HEATMAP_BOTTOM;

    let mut svg = format!(
        r#"<svg class="heatmap" xmlns="http://www.w3.org/2000/svg" width="{width:.0}" height="{height:.0}" viewBox="0 0 {width:.0} {height:.0}" font-family="sans-serif" font-size="12">"#
    );

    for (i, row) in matrix.columns.iter().enumerate() {
        let y = HEATMAP_TOP + CELL * i as f64;
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" text-anchor="end" dominant-baseline="middle">{}</text>"#,
            HEATMAP_LEFT - 8.0,
            y + CELL / 2.0,
            html_escape::encode_text(row.label())
        ));

        for (j, value) in matrix.values[i].iter().enumerate() {
            let x = HEATMAP_LEFT + CELL * j as f64;
            let (fill, ink, text) = if value.is_finite() {
                let t = norm(*value);
                let ink = if t < 0.5 { "#ffffff" } else { "#000000" };
                (viridis(t), ink, format!("{:.2}", value))
            } else {
                (NAN_FILL.to_string(), "#000000", "nan".to_string())
            };
            svg.push_str(&format!(
                r##"<rect x="{x:.1}" y="{y:.1}" width="{CELL:.1}" height="{CELL:.1}" fill="{fill}" stroke="#ffffff"/>"##
            ));
            svg.push_str(&format!(
                r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" dominant-baseline="middle" fill="{ink}">{text}</text>"#,
                x + CELL / 2.0,
                y + CELL / 2.0
            ));
        }
    }

    let label_y = HEATMAP_TOP + grid + 10.0;
    for (j, column) in matrix.columns.iter().enumerate() {
        let x = HEATMAP_LEFT + CELL * j as f64 + CELL / 2.0;
        svg.push_str(&format!(
            r#"<text x="{x:.1}" y="{label_y:.1}" text-anchor="end" transform="rotate(-40 {x:.1} {label_y:.1})">{}</text>"#,
            html_escape::encode_text(column.label())
        ));
    }

    // Colour bar, high values on top
    svg.push_str(r#"<defs><linearGradient id="corr-scale" x1="0" y1="1" x2="0" y2="0">"#);
    for (stop, _) in VIRIDIS {
        svg.push_str(&format!(
            r#"<stop offset="{:.0}%" stop-color="{}"/>"#,
            stop * 100.0,
            viridis(stop)
        ));
    }
    svg.push_str("</linearGradient></defs>");
    svg.push_str(&format!(
        r#"<rect x="{bar_x:.1}" y="{HEATMAP_TOP:.1}" width="{BAR_WIDTH:.1}" height="{grid:.1}" fill="url(#corr-scale)"/>"#
    ));
    let bar_scale = Scale::new((lo, hi), (HEATMAP_TOP + grid, HEATMAP_TOP));
    for tick in bar_scale.ticks() {
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" dominant-baseline="middle">{:.2}</text>"#,
            bar_x + BAR_WIDTH + 6.0,
            bar_scale.map(tick),
            tick
        ));
    }

    svg.push_str("</svg>");
    svg
}

/// Scatter of held-out actual vs predicted yields
///
/// The dashed red reference line y = x spans the range of the actual
/// yields.
pub fn actual_vs_predicted(trained: &TrainedModel) -> String {
    let Some((lo, hi)) = trained.actual_range() else {
        return r#"<p class="empty">No held-out rows to plot.</p>"#.to_string();
    };

    let domain = trained
        .test_predictions
        .iter()
        .fold((lo, hi), |(a, b), &v| (a.min(v), b.max(v)));
    let pad = ((domain.1 - domain.0) * 0.05).max(0.5);
    let domain = (domain.0 - pad, domain.1 + pad);

    let x = Scale::new(domain, (MARGIN_LEFT, SCATTER_WIDTH - MARGIN_RIGHT));
    let y = Scale::new(domain, (SCATTER_HEIGHT - MARGIN_BOTTOM, MARGIN_TOP));
    let bottom = SCATTER_HEIGHT - MARGIN_BOTTOM;
    let right = SCATTER_WIDTH - MARGIN_RIGHT;

    let mut svg = format!(
        r#"<svg class="scatter" xmlns="http://www.w3.org/2000/svg" width="{SCATTER_WIDTH:.0}" height="{SCATTER_HEIGHT:.0}" viewBox="0 0 {SCATTER_WIDTH:.0} {SCATTER_HEIGHT:.0}" font-family="sans-serif" font-size="12">"#
    );

    // Axes
    svg.push_str(&format!(
        r##"<line x1="{MARGIN_LEFT:.1}" y1="{bottom:.1}" x2="{right:.1}" y2="{bottom:.1}" stroke="#333333"/><line x1="{MARGIN_LEFT:.1}" y1="{MARGIN_TOP:.1}" x2="{MARGIN_LEFT:.1}" y2="{bottom:.1}" stroke="#333333"/>"##
    ));
    for tick in x.ticks() {
        let px = x.map(tick);
        svg.push_str(&format!(
            r#"<text x="{px:.1}" y="{:.1}" text-anchor="middle">{tick:.1}</text>"#,
            bottom + 16.0
        ));
    }
    for tick in y.ticks() {
        let py = y.map(tick);
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{py:.1}" text-anchor="end" dominant-baseline="middle">{tick:.1}</text>"#,
            MARGIN_LEFT - 6.0
        ));
    }
    svg.push_str(&format!(
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle">Actual yield</text>"#,
        (MARGIN_LEFT + right) / 2.0,
        SCATTER_HEIGHT - 8.0
    ));
    svg.push_str(&format!(
        r#"<text x="16" y="{0:.1}" text-anchor="middle" transform="rotate(-90 16 {0:.1})">Predicted yield</text>"#,
        (MARGIN_TOP + bottom) / 2.0
    ));

    for (actual, predicted) in trained.test_actuals.iter().zip(&trained.test_predictions) {
        svg.push_str(&format!(
            r#"<circle class="point" cx="{:.1}" cy="{:.1}" r="3" fill="steelblue" fill-opacity="0.7"/>"#,
            x.map(*actual),
            y.map(*predicted)
        ));
    }

    svg.push_str(&format!(
        r#"<line class="identity" x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="red" stroke-dasharray="6 4"/>"#,
        x.map(lo),
        y.map(lo),
        x.map(hi),
        y.map(hi)
    ));

    svg.push_str("</svg>");
    svg
}
