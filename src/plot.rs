//! Lento plot: one diverging bar per split, support up and conflict down.

use crate::error::LentoError;
use crate::lento::Analysis;
use crate::split::Split;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::{register_font, FontStyle, FontTransform};
use std::path::Path;
use std::sync::OnceLock;

pub const SUPPORT_COLOUR: RGBColor = RGBColor(31, 119, 180);
pub const CONFLICT_COLOUR: RGBColor = RGBColor(214, 39, 40);

/// DejaVu Sans, served as the `sans-serif` family for every backend.
static SANS_SERIF: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

fn register_fonts() -> Result<(), LentoError> {
    static REGISTERED: OnceLock<bool> = OnceLock::new();
    let ok = *REGISTERED
        .get_or_init(|| register_font("sans-serif", FontStyle::Normal, SANS_SERIF).is_ok());
    if ok {
        Ok(())
    } else {
        Err(LentoError::Plot("bundled sans-serif font could not be loaded".into()))
    }
}

/// Rendering switches for [`plot_lento`].
#[derive(Clone, Debug)]
pub struct PlotOptions {
    /// Label bars with the split label instead of the rank
    pub labels: bool,
    /// Keep singleton splits
    pub singles: bool,
    /// Image size in pixels
    pub size: (u32, u32),
}

impl Default for PlotOptions {
    fn default() -> Self {
        PlotOptions { labels: false, singles: true, size: (1024, 768) }
    }
}

/// The ranked splits that end up as bars.
pub fn plotted_splits<'a>(analysis: &'a Analysis, options: &PlotOptions) -> Vec<&'a Split> {
    analysis
        .iter_splits()
        .filter(|s| options.singles || s.ntaxa() > 1)
        .collect()
}

/// Tick labels in bar order: split labels, or 1-based positions.
pub fn tick_labels(splits: &[&Split], options: &PlotOptions) -> Vec<String> {
    splits
        .iter()
        .enumerate()
        .map(|(i, s)| if options.labels { s.label() } else { (i + 1).to_string() })
        .collect()
}

/// Render the Lento plot to `path`.
///
/// `.svg` paths use the SVG backend; anything else is written as a bitmap
/// whose format follows the extension.
pub fn plot_lento<P: AsRef<Path>>(
    analysis: &Analysis,
    options: &PlotOptions,
    path: P,
) -> Result<(), LentoError> {
    let path = path.as_ref();
    register_fonts()?;
    let splits = plotted_splits(analysis, options);
    let labels = tick_labels(&splits, options);

    let is_svg = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));
    if is_svg {
        let root = SVGBackend::new(path, options.size).into_drawing_area();
        draw(&root, &splits, &labels)
    } else {
        let root = BitMapBackend::new(path, options.size).into_drawing_area();
        draw(&root, &splits, &labels)
    }
}

fn plot_err<E: std::fmt::Display>(e: E) -> LentoError {
    LentoError::Plot(e.to_string())
}

fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    splits: &[&Split],
    labels: &[String],
) -> Result<(), LentoError> {
    root.fill(&WHITE).map_err(plot_err)?;

    let n = splits.len().max(1);
    let support_max = splits.iter().map(|s| s.support()).max().unwrap_or(0).max(1) as f64;
    let conflict_max = splits.iter().map(|s| s.conflict()).max().unwrap_or(0) as f64;
    let longest = labels.iter().map(String::len).max().unwrap_or(1) as u32;

    let mut chart = ChartBuilder::on(root)
        .margin(20)
        .x_label_area_size(30 + 7 * longest)
        .y_label_area_size(50)
        .build_cartesian_2d((0..n).into_segmented(), (-conflict_max * 1.05)..(support_max * 1.05))
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc("Split")
        .y_desc("Strength")
        .x_labels(n)
        .x_label_style(("sans-serif", 10).into_font().transform(FontTransform::Rotate90))
        .x_label_formatter(&|x| match x {
            SegmentValue::CenterOf(i) => labels.get(*i).cloned().unwrap_or_default(),
            _ => String::new(),
        })
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(splits.iter().enumerate().map(|(i, s)| {
            Rectangle::new(
                [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), s.support() as f64)],
                SUPPORT_COLOUR.filled(),
            )
        }))
        .map_err(plot_err)?;
    chart
        .draw_series(splits.iter().enumerate().map(|(i, s)| {
            Rectangle::new(
                [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), -(s.conflict() as f64))],
                CONFLICT_COLOUR.filled(),
            )
        }))
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    Ok(())
}
