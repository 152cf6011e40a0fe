//! # Force Diagrams
//!
//! Turns one column of a [`Dataset`] into a colour-graded Shear Force (SFD)
//! or Bending Moment (BMD) diagram, emitted as a Typst figure.
//!
//! ## Pipeline
//!
//! 1. **Resample** the column onto [`RESAMPLE_POINTS`] evenly spaced
//!    positions (linear for shear, quadratic spline for moment).
//! 2. **Normalize** every resampled value against the column's minimum and
//!    maximum; a flat column normalizes to 0.5 everywhere.
//! 3. **Colour** each point from the diagram's gradient.
//! 4. **Draw** one filled strip per interval between neighbouring points,
//!    the resampled curve, the input samples as markers and a dashed zero
//!    line inside an axis frame.
//!
//! ## Example
//!
//! ```rust
//! use beam_core::dataset::{Dataset, Sample};
//! use beam_core::diagrams::{synthesize, DiagramKind, RESAMPLE_POINTS};
//!
//! let dataset = Dataset::new(vec![
//!     Sample::new(0.0, 10.0, 0.0),
//!     Sample::new(2.0, 0.0, 10.0),
//!     Sample::new(4.0, -10.0, 0.0),
//! ])?;
//!
//! let sfd = synthesize(&dataset, DiagramKind::Shear)?;
//! assert_eq!(sfd.spec.points.len(), RESAMPLE_POINTS);
//! assert!(sfd.markup.contains("<fig:sfd>"));
//! # Ok::<(), beam_core::errors::ReportError>(())
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dataset::{Dataset, Field};
use crate::errors::{ReportError, ReportResult};
use crate::gradient::{Fill, Gradient, MOMENT_GRADIENT, SHEAR_GRADIENT};
use crate::interpolation::{resample, InterpolationKind};
use crate::units::{KiloNewtonMeters, KiloNewtons};

/// Number of points every diagram is resampled onto
pub const RESAMPLE_POINTS: usize = 200;

/// Largest magnitude accepted for any plotted value. Axis headroom and
/// ranges stay finite below it.
pub const MAX_PLOT_MAGNITUDE: f64 = 1e300;

/// Which force diagram to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagramKind {
    Shear,
    Moment,
}

impl DiagramKind {
    pub const ALL: [DiagramKind; 2] = [DiagramKind::Shear, DiagramKind::Moment];

    /// Dataset column plotted on the vertical axis
    pub fn field(&self) -> Field {
        match self {
            DiagramKind::Shear => Field::ShearForce,
            DiagramKind::Moment => Field::BendingMoment,
        }
    }

    pub fn interpolation(&self) -> InterpolationKind {
        match self {
            DiagramKind::Shear => InterpolationKind::Linear,
            DiagramKind::Moment => InterpolationKind::Quadratic,
        }
    }

    pub fn gradient(&self) -> Gradient {
        match self {
            DiagramKind::Shear => SHEAR_GRADIENT,
            DiagramKind::Moment => MOMENT_GRADIENT,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            DiagramKind::Shear => "Shear Force Diagram",
            DiagramKind::Moment => "Bending Moment Diagram",
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            DiagramKind::Shear => "SFD",
            DiagramKind::Moment => "BMD",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            DiagramKind::Shear => KiloNewtons::SYMBOL,
            DiagramKind::Moment => KiloNewtonMeters::SYMBOL,
        }
    }

    pub fn axis_label(&self) -> String {
        match self {
            DiagramKind::Shear => format!("Shear Force ({})", self.unit()),
            DiagramKind::Moment => format!("Bending Moment ({})", self.unit()),
        }
    }

    /// Typst label used to cross-reference the figure
    pub fn label(&self) -> &'static str {
        match self {
            DiagramKind::Shear => "fig:sfd",
            DiagramKind::Moment => "fig:bmd",
        }
    }

    /// Vertical axis half-range used when a curve never leaves one side of zero
    fn default_limit(&self) -> f64 {
        match self {
            DiagramKind::Shear => 5.0,
            DiagramKind::Moment => 10.0,
        }
    }
}

/// One resampled point with its colour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiagramPoint {
    pub position: f64,
    pub value: f64,
    pub norm: f64,
    pub fill: Fill,
}

/// Resampled, normalized and coloured curve of one diagram
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramSpec {
    pub kind: DiagramKind,
    pub points: Vec<DiagramPoint>,
    /// Smallest input value of the plotted column
    pub value_min: f64,
    /// Largest input value of the plotted column
    pub value_max: f64,
}

/// Extremes of a diagram, for the report summary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiagramSummary {
    pub max: f64,
    pub max_position: f64,
    pub min: f64,
    pub min_position: f64,
}

impl DiagramSummary {
    /// Largest magnitude and where it occurs
    pub fn peak_abs(&self) -> (f64, f64) {
        if self.max.abs() >= self.min.abs() {
            (self.max.abs(), self.max_position)
        } else {
            (self.min.abs(), self.min_position)
        }
    }
}

/// A finished diagram: data, summary and Typst figure markup
#[derive(Debug, Clone)]
pub struct Diagram {
    pub kind: DiagramKind,
    pub spec: DiagramSpec,
    pub summary: DiagramSummary,
    pub markup: String,
}

/// Map `value` into `[0, 1]` relative to `[lo, hi]`.
///
/// A degenerate range (`hi == lo`) maps everything to 0.5.
pub fn normalize(value: f64, lo: f64, hi: f64) -> f64 {
    if hi == lo {
        return 0.5;
    }
    ((value - lo) / (hi - lo)).clamp(0.0, 1.0)
}

/// Resample, normalize and colour one column of the dataset.
pub fn build_spec(dataset: &Dataset, kind: DiagramKind) -> ReportResult<DiagramSpec> {
    let xs = dataset.positions();
    let ys = dataset.column(kind.field());
    check_plottable(&xs, Field::Position)?;
    check_plottable(&ys, kind.field())?;
    let (positions, values) = resample(&xs, &ys, kind.interpolation(), RESAMPLE_POINTS)?;

    let (value_min, value_max) = dataset.range(kind.field());
    let gradient = kind.gradient();

    let points = positions
        .into_iter()
        .zip(values)
        .map(|(position, value)| {
            let norm = normalize(value, value_min, value_max);
            DiagramPoint {
                position,
                value,
                norm,
                fill: gradient.color_at(norm),
            }
        })
        .collect();

    Ok(DiagramSpec {
        kind,
        points,
        value_min,
        value_max,
    })
}

/// Reject magnitudes too large to scale onto the canvas.
fn check_plottable(values: &[f64], field: Field) -> ReportResult<()> {
    match values.iter().position(|v| v.abs() > MAX_PLOT_MAGNITUDE) {
        Some(i) => Err(ReportError::interpolation(
            i,
            format!(
                "{} {} is too large to plot (limit {:e})",
                field.name(),
                values[i],
                MAX_PLOT_MAGNITUDE
            ),
        )),
        None => Ok(()),
    }
}

/// Extremes over both the input samples and the resampled curve, so neither
/// a sample between grid points nor a spline overshoot is missed.
pub fn summarize(dataset: &Dataset, spec: &DiagramSpec) -> DiagramSummary {
    let field = spec.kind.field();
    let candidates = dataset
        .samples()
        .iter()
        .map(|s| (s.position.0, s.get(field)))
        .chain(spec.points.iter().map(|p| (p.position, p.value)));

    let mut summary = DiagramSummary {
        max: f64::NEG_INFINITY,
        max_position: 0.0,
        min: f64::INFINITY,
        min_position: 0.0,
    };
    for (position, value) in candidates {
        if value > summary.max {
            summary.max = value;
            summary.max_position = position;
        }
        if value < summary.min {
            summary.min = value;
            summary.min_position = position;
        }
    }
    summary
}

/// Build the full diagram for one kind.
pub fn synthesize(dataset: &Dataset, kind: DiagramKind) -> ReportResult<Diagram> {
    let spec = build_spec(dataset, kind)?;
    let summary = summarize(dataset, &spec);
    let markup = render_figure(dataset, &spec);
    debug!(
        diagram = kind.abbreviation(),
        max = summary.max,
        min = summary.min,
        bytes = markup.len(),
        "synthesized diagram"
    );

    Ok(Diagram {
        kind,
        spec,
        summary,
        markup,
    })
}

// ============================================================================
// Figure Rendering
// ============================================================================

// Canvas geometry in points
const CANVAS_WIDTH: f64 = 460.0;
const CANVAS_HEIGHT: f64 = 214.0;
const MARGIN_LEFT: f64 = 58.0;
const MARGIN_RIGHT: f64 = 8.0;
const MARGIN_TOP: f64 = 8.0;
const MARGIN_BOTTOM: f64 = 40.0;
const PLOT_WIDTH: f64 = CANVAS_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
const PLOT_HEIGHT: f64 = CANVAS_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;

const TARGET_TICKS: usize = 6;
const MAX_TICKS: usize = 24;

/// Maps data coordinates to canvas points
struct PlotFrame {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl PlotFrame {
    /// Vertical limits give 20% headroom past the input extremes, or a fixed
    /// half-range on a side the curve never reaches.
    fn new(x_min: f64, x_max: f64, spec: &DiagramSpec) -> Self {
        let limit = spec.kind.default_limit();
        PlotFrame {
            x_min,
            x_max,
            y_min: if spec.value_min < 0.0 { spec.value_min * 1.2 } else { -limit },
            y_max: if spec.value_max > 0.0 { spec.value_max * 1.2 } else { limit },
        }
    }

    fn x(&self, position: f64) -> f64 {
        MARGIN_LEFT + (position - self.x_min) / (self.x_max - self.x_min) * PLOT_WIDTH
    }

    fn y(&self, value: f64) -> f64 {
        let clamped = value.clamp(self.y_min, self.y_max);
        MARGIN_TOP + (self.y_max - clamped) / (self.y_max - self.y_min) * PLOT_HEIGHT
    }
}

fn render_figure(dataset: &Dataset, spec: &DiagramSpec) -> String {
    let kind = spec.kind;
    let (x_min, x_max) = dataset.range(Field::Position);
    let frame = PlotFrame::new(x_min, x_max, spec);

    let mut body = String::new();
    push_grid(&mut body, &frame, kind);
    push_strips(&mut body, &frame, spec);
    push_baseline(&mut body, &frame);
    push_curve(&mut body, &frame, spec);
    push_markers(&mut body, &frame, dataset, kind.field());
    body.push_str(&format!(
        "    place(dx: {:.3}pt, dy: {:.3}pt, rect(width: {:.3}pt, height: {:.3}pt, stroke: 0.6pt + black))\n",
        MARGIN_LEFT, MARGIN_TOP, PLOT_WIDTH, PLOT_HEIGHT
    ));

    format!(
        r##"
#figure(
  box(width: {w:.3}pt, height: {h:.3}pt, {{
{body}  }}),
  caption: [{title} ({abbr}) - Contour Visualization],
) <{label}>
"##,
        w = CANVAS_WIDTH,
        h = CANVAS_HEIGHT,
        body = body,
        title = kind.title(),
        abbr = kind.abbreviation(),
        label = kind.label(),
    )
}

/// Grid lines, tick labels and axis titles
fn push_grid(out: &mut String, frame: &PlotFrame, kind: DiagramKind) {
    let grid_stroke = "0.3pt + luma(200)";
    let bottom = MARGIN_TOP + PLOT_HEIGHT;

    for tick in nice_ticks(frame.x_min, frame.x_max, TARGET_TICKS) {
        let x = frame.x(tick.value);
        out.push_str(&format!(
            "    place(line(start: ({x:.3}pt, {top:.3}pt), end: ({x:.3}pt, {bottom:.3}pt), stroke: {grid_stroke}))\n",
            top = MARGIN_TOP,
        ));
        out.push_str(&format!(
            "    place(dx: {:.3}pt, dy: {:.3}pt, box(width: 40pt, align(center, text(size: 8pt)[{}])))\n",
            x - 20.0,
            bottom + 4.0,
            tick.label
        ));
    }

    for tick in nice_ticks(frame.y_min, frame.y_max, TARGET_TICKS) {
        let y = frame.y(tick.value);
        out.push_str(&format!(
            "    place(line(start: ({left:.3}pt, {y:.3}pt), end: ({right:.3}pt, {y:.3}pt), stroke: {grid_stroke}))\n",
            left = MARGIN_LEFT,
            right = MARGIN_LEFT + PLOT_WIDTH,
        ));
        out.push_str(&format!(
            "    place(dx: 12pt, dy: {:.3}pt, box(width: {:.3}pt, align(right, text(size: 8pt)[{}])))\n",
            y - 5.0,
            MARGIN_LEFT - 16.0,
            tick.label
        ));
    }

    out.push_str(&format!(
        "    place(dx: {:.3}pt, dy: {:.3}pt, box(width: {:.3}pt, align(center, text(size: 9pt)[Beam Length (m)])))\n",
        MARGIN_LEFT,
        bottom + 20.0,
        PLOT_WIDTH
    ));
    out.push_str(&format!(
        "    place(dx: 0pt, dy: {:.3}pt, box(height: {:.3}pt, align(horizon, rotate(-90deg, reflow: true, text(size: 9pt)[{}]))))\n",
        MARGIN_TOP,
        PLOT_HEIGHT,
        kind.axis_label()
    ));
}

/// One filled strip per interval, from zero to the right-hand point's value
fn push_strips(out: &mut String, frame: &PlotFrame, spec: &DiagramSpec) {
    let zero = frame.y(0.0);
    for pair in spec.points.windows(2) {
        let (prev, cur) = (&pair[0], &pair[1]);
        let x0 = frame.x(prev.position);
        let x1 = frame.x(cur.position);
        let y = frame.y(cur.value);
        let (top, bottom) = if y < zero { (y, zero) } else { (zero, y) };
        // Slight overlap hides anti-aliasing seams between strips
        out.push_str(&format!(
            "    place(dx: {:.3}pt, dy: {:.3}pt, rect(width: {:.3}pt, height: {:.3}pt, fill: {}, stroke: none))\n",
            x0,
            top,
            x1 - x0 + 0.05,
            bottom - top,
            cur.fill.to_typst()
        ));
    }
}

fn push_baseline(out: &mut String, frame: &PlotFrame) {
    let y = frame.y(0.0);
    out.push_str(&format!(
        "    place(line(start: ({:.3}pt, {y:.3}pt), end: ({:.3}pt, {y:.3}pt), stroke: (paint: black, thickness: 0.4pt, dash: \"dashed\")))\n",
        MARGIN_LEFT,
        MARGIN_LEFT + PLOT_WIDTH,
    ));
}

/// Polyline through every resampled point
fn push_curve(out: &mut String, frame: &PlotFrame, spec: &DiagramSpec) {
    let mut segments = Vec::with_capacity(spec.points.len());
    for (i, p) in spec.points.iter().enumerate() {
        let verb = if i == 0 { "move" } else { "line" };
        segments.push(format!(
            "curve.{verb}(({:.3}pt, {:.3}pt))",
            frame.x(p.position),
            frame.y(p.value)
        ));
    }
    out.push_str(&format!(
        "    place(curve(stroke: 1.2pt + black, {}))\n",
        segments.join(", ")
    ));
}

/// Dots at the input samples
fn push_markers(out: &mut String, frame: &PlotFrame, dataset: &Dataset, field: Field) {
    const RADIUS: f64 = 1.5;
    for sample in dataset.samples() {
        out.push_str(&format!(
            "    place(dx: {:.3}pt, dy: {:.3}pt, circle(radius: {RADIUS}pt, fill: black))\n",
            frame.x(sample.position.0) - RADIUS,
            frame.y(sample.get(field)) - RADIUS,
        ));
    }
}

struct Tick {
    value: f64,
    label: String,
}

/// Round-numbered ticks covering `[lo, hi]`, roughly `target` of them.
///
/// Ticks are generated by index, so a step below the float spacing of the
/// range yields a few repeated values instead of an endless loop.
fn nice_ticks(lo: f64, hi: f64, target: usize) -> Vec<Tick> {
    if !lo.is_finite() || !hi.is_finite() || hi <= lo || target == 0 {
        return Vec::new();
    }
    let raw = (hi - lo) / target as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let step = [1.0, 2.0, 2.5, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|s| *s >= raw)
        .unwrap_or(10.0 * magnitude);
    if !step.is_finite() || step <= 0.0 {
        return Vec::new();
    }

    let mut decimals = (-step.log10().floor()).max(0.0) as usize;
    if (step / 10f64.powi(-(decimals as i32)) - 2.5).abs() < 1e-9 {
        decimals += 1;
    }

    let first = (lo / step).ceil() * step;
    let last_index = ((hi - first) / step + 1e-9).floor();
    if !last_index.is_finite() || last_index < 0.0 {
        return Vec::new();
    }
    let last_index = (last_index as usize).min(MAX_TICKS - 1);

    let mut ticks: Vec<Tick> = Vec::with_capacity(last_index + 1);
    for k in 0..=last_index {
        let value = first + k as f64 * step;
        if ticks.last().is_some_and(|t| t.value == value) {
            continue;
        }
        let label = format!("{:.*}", decimals, if value.abs() < step * 1e-9 { 0.0 } else { value });
        ticks.push(Tick {
            value,
            label: label.replace('-', "−"),
        });
    }
    ticks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::documentation_example;
    use crate::dataset::Sample;
    use crate::errors::ReportError;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_resampled_grid_spans_positions() {
        let ds = documentation_example();
        for kind in DiagramKind::ALL {
            let spec = build_spec(&ds, kind).unwrap();
            assert_eq!(spec.points.len(), RESAMPLE_POINTS);
            assert_eq!(spec.points[0].position, 0.0);
            assert_eq!(spec.points[RESAMPLE_POINTS - 1].position, 15.0);
        }
    }

    #[test]
    fn test_extremes_normalize_to_unit_range() {
        let ds = documentation_example();
        let spec = build_spec(&ds, DiagramKind::Shear).unwrap();
        assert_eq!(spec.points[0].norm, 1.0);
        assert_eq!(spec.points[RESAMPLE_POINTS - 1].norm, 0.0);
        assert!(spec.points.iter().all(|p| (0.0..=1.0).contains(&p.norm)));
    }

    #[test]
    fn test_flat_curve_normalizes_to_half() {
        let ds = Dataset::new(vec![
            Sample::new(0.0, 12.0, 3.0),
            Sample::new(1.0, 12.0, 3.0),
            Sample::new(2.0, 12.0, 3.0),
            Sample::new(3.0, 12.0, 3.0),
        ])
        .unwrap();
        for kind in DiagramKind::ALL {
            let diagram = synthesize(&ds, kind).unwrap();
            assert!(diagram.spec.points.iter().all(|p| p.norm == 0.5));
            assert!(diagram.spec.points.iter().all(|p| p.value.is_finite()));
        }
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(45.0, -45.0, 45.0), 1.0);
        assert_eq!(normalize(-45.0, -45.0, 45.0), 0.0);
        assert_eq!(normalize(0.0, -45.0, 45.0), 0.5);
        assert_eq!(normalize(60.0, -45.0, 45.0), 1.0);
        assert_eq!(normalize(7.0, 7.0, 7.0), 0.5);
    }

    #[test]
    fn test_documentation_example_shear_summary() {
        let ds = documentation_example();
        let sfd = synthesize(&ds, DiagramKind::Shear).unwrap();
        assert_eq!(sfd.summary.max, 45.0);
        assert_eq!(sfd.summary.max_position, 0.0);
        assert_eq!(sfd.summary.min, -45.0);
        assert_eq!(sfd.summary.min_position, 15.0);
        assert_eq!(sfd.summary.peak_abs(), (45.0, 0.0));
    }

    #[test]
    fn test_documentation_example_moment_peak_at_midspan() {
        let ds = documentation_example();
        let bmd = synthesize(&ds, DiagramKind::Moment).unwrap();
        assert_abs_diff_eq!(bmd.summary.max, 168.75, epsilon = 1e-6);
        assert_abs_diff_eq!(bmd.summary.max_position, 7.5, epsilon = 0.1);

        let peak = bmd
            .spec
            .points
            .iter()
            .max_by(|a, b| a.value.total_cmp(&b.value))
            .unwrap();
        assert_abs_diff_eq!(peak.position, 7.5, epsilon = 0.1);
        assert_abs_diff_eq!(peak.value, 168.75, epsilon = 0.01);
    }

    #[test]
    fn test_swapped_rows_rejected() {
        let mut samples = documentation_example().samples().to_vec();
        samples.swap(3, 4);
        let ds = Dataset::new(samples).unwrap();
        for kind in DiagramKind::ALL {
            assert!(matches!(
                synthesize(&ds, kind),
                Err(ReportError::Interpolation { index: 4, .. })
            ));
        }
    }

    #[test]
    fn test_markup_primitives() {
        let ds = documentation_example();
        let sfd = synthesize(&ds, DiagramKind::Shear).unwrap();

        let strips = sfd.markup.matches("stroke: none))").count();
        assert_eq!(strips, RESAMPLE_POINTS - 1);
        assert_eq!(sfd.markup.matches("place(curve(").count(), 1);
        assert_eq!(sfd.markup.matches("curve.line(").count(), RESAMPLE_POINTS - 1);
        assert_eq!(sfd.markup.matches("dash: \"dashed\"").count(), 1);
        assert_eq!(sfd.markup.matches("circle(radius").count(), ds.len());
        assert!(sfd.markup.contains("Shear Force Diagram (SFD) - Contour Visualization"));
    }

    #[test]
    fn test_axis_limits_follow_extremes() {
        let ds = documentation_example();
        let bmd = synthesize(&ds, DiagramKind::Moment).unwrap();
        let frame = PlotFrame::new(0.0, 15.0, &bmd.spec);
        assert_eq!(frame.y_min, -10.0);
        assert_abs_diff_eq!(frame.y_max, 168.75 * 1.2, epsilon = 1e-6);
    }

    #[test]
    fn test_nice_ticks() {
        let ticks = nice_ticks(0.0, 15.0, 6);
        let labels: Vec<&str> = ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["0.0", "2.5", "5.0", "7.5", "10.0", "12.5", "15.0"]);

        let ticks = nice_ticks(-54.0, 54.0, 6);
        assert_eq!(ticks.first().map(|t| t.label.as_str()), Some("−40"));
        assert!(ticks.iter().any(|t| t.label == "0"));
        assert!(nice_ticks(1.0, 1.0, 6).is_empty());
    }

    #[test]
    fn test_nice_ticks_terminate_past_float_resolution() {
        // Step of 1.0 is below the float spacing (2.0) at 1e16
        let ticks = nice_ticks(1e16, 1e16 + 4.0, 6);
        assert!(!ticks.is_empty());
        assert!(ticks.len() <= MAX_TICKS);
        assert!(ticks.windows(2).all(|w| w[0].value < w[1].value));

        assert!(nice_ticks(0.0, f64::INFINITY, 6).is_empty());
    }

    #[test]
    fn test_far_offset_positions_render() {
        let samples = vec![
            Sample::new(1e16, 1.0, 0.0),
            Sample::new(1e16 + 2.0, 0.0, 1.0),
            Sample::new(1e16 + 4.0, -1.0, 0.0),
        ];
        let ds = Dataset::new(samples).unwrap();
        let diagram = synthesize(&ds, DiagramKind::Shear).unwrap();
        assert_eq!(diagram.spec.points.len(), RESAMPLE_POINTS);
        assert!(!diagram.markup.contains("NaN"));
    }

    #[test]
    fn test_unplottable_magnitude_rejected() {
        let samples = vec![
            Sample::new(0.0, 1.0, 0.0),
            Sample::new(1.0, 1.6e308, 1.0),
            Sample::new(2.0, -1.0, 0.0),
        ];
        let ds = Dataset::new(samples).unwrap();
        match synthesize(&ds, DiagramKind::Shear) {
            Err(ReportError::Interpolation { index, reason }) => {
                assert_eq!(index, 1);
                assert!(reason.contains("too large"));
            }
            other => panic!("expected Interpolation, got {:?}", other.map(|d| d.summary)),
        }
        // The moment column is ordinary, so its diagram still renders
        assert!(synthesize(&ds, DiagramKind::Moment).is_ok());
    }
}
