//! Validates a render request, evaluates the density field and composes the
//! annotated heatmap PNG.

use crate::colormap::{Colormap, DEFAULT_COLORMAP};
use crate::error::{DensityError, Result};
use crate::fonts::ensure_font;
use crate::physics::{validate_scale, QuantumNumbers};
use crate::style::{Style, StyleColors, Theme};
use crate::wavefunction::{compute_wavefunction, probability_density};
use image::RgbImage;
use log::{debug, info, warn};
use ndarray::{Array2, Axis};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontTransform;
use std::path::{Path, PathBuf};

pub const TITLE: &str = "Hydrogen Atom - Wavefunction Electron Density";
pub const FORMULA: &str = "|ψₙₗₘ(r, θ, φ)|² = |Rₙₗ(r) Yₗᵐ(θ, φ)|²";
pub const DISTRIBUTION_LABEL: &str = "Electron probability distribution";

/// Grid samples between tick marks
const TICK_STEP: usize = 100;

/// Raw parameters as they arrive from the command line or a prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    pub n: i64,
    pub l: i64,
    pub m: i64,
    pub a0_scale_factor: f64,
    pub dark_theme: bool,
    pub colormap: String,
}

impl RenderRequest {
    pub fn new(n: i64, l: i64, m: i64, a0_scale_factor: f64) -> Self {
        RenderRequest {
            n,
            l,
            m,
            a0_scale_factor,
            dark_theme: false,
            colormap: DEFAULT_COLORMAP.to_string(),
        }
    }

    /// Checks every parameter; nothing is computed before this succeeds.
    pub fn validate(&self) -> Result<ValidatedRequest> {
        let quantum = QuantumNumbers::new(self.n, self.l, self.m)?;
        let a0_scale_factor = validate_scale(self.a0_scale_factor)?;
        let colormap = Colormap::from_name(&self.colormap)?;
        Ok(ValidatedRequest {
            quantum,
            a0_scale_factor,
            theme: Theme::from_flag(self.dark_theme),
            colormap,
        })
    }
}

#[derive(Clone)]
pub struct ValidatedRequest {
    pub quantum: QuantumNumbers,
    pub a0_scale_factor: f64,
    pub theme: Theme,
    pub colormap: Colormap,
}

impl ValidatedRequest {
    pub fn default_style(&self) -> Style {
        Style::for_theme(self.theme, &self.colormap)
    }

    pub fn file_name(&self) -> String {
        output_file_name(self.quantum, self.theme)
    }
}

/// `(n,l,m)[dt].png` or `(n,l,m)[lt].png`
pub fn output_file_name(qn: QuantumNumbers, theme: Theme) -> String {
    format!("({},{},{})[{}].png", qn.n, qn.l, qn.m_l, theme.suffix())
}

/// sqrt(density) arranged for display: x left to right, z bottom to top.
pub fn display_field(density: &Array2<f64>) -> Array2<f64> {
    let mut shown = density.mapv(f64::sqrt).reversed_axes();
    shown.invert_axis(Axis(0));
    shown.as_standard_layout().to_owned()
}

fn finite_range(field: &Array2<f64>) -> (f64, f64) {
    field
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}

fn rgb(c: colorous::Color) -> RGBColor {
    RGBColor(c.r, c.g, c.b)
}

/// Grid sample indices that carry a tick
fn tick_positions(samples: usize) -> Vec<f64> {
    (0..samples).step_by(TICK_STEP).map(|k| k as f64).collect()
}

/// `WithKeyPoints` does not forward the f64 value formatter that
/// `configure_mesh` requires; this wrapper delegates everything and adds it.
struct KeyPointAxis(plotters::coord::combinators::WithKeyPoints<plotters::coord::types::RangedCoordf64>);

impl Ranged for KeyPointAxis {
    type ValueType = f64;
    type FormatOption = plotters::coord::ranged1d::NoDefaultFormatting;

    fn range(&self) -> std::ops::Range<f64> {
        self.0.range()
    }

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        self.0.map(value, limit)
    }

    fn key_points<Hint: plotters::coord::ranged1d::KeyPointHint>(&self, hint: Hint) -> Vec<f64> {
        self.0.key_points(hint)
    }

    fn axis_pixel_range(&self, limit: (i32, i32)) -> std::ops::Range<i32> {
        self.0.axis_pixel_range(limit)
    }
}

impl plotters::coord::ranged1d::ValueFormatter<f64> for KeyPointAxis {
    fn format(value: &f64) -> String {
        <plotters::coord::types::RangedCoordf64 as plotters::coord::ranged1d::ValueFormatter<f64>>::format(value)
    }
}

/// Pixel placement of the plot elements, proportional to the canvas.
#[derive(Debug, Clone, Copy)]
struct Layout {
    heat_left: i32,
    heat_top: i32,
    heat_size: i32,
    label_area: i32,
    bar_left: i32,
    bar_width: i32,
}

impl Layout {
    fn new(width: u32, height: u32) -> Self {
        let (w, h) = (width as f64, height as f64);
        let heat_size = (0.69 * w).min(0.667 * h).max(1.0);
        let heat_left = 0.09 * w;
        let bar_left = heat_left + heat_size + 0.03 * w;
        Layout {
            heat_left: heat_left as i32,
            heat_top: (0.18 * h) as i32,
            heat_size: heat_size as i32,
            label_area: (0.07 * w) as i32,
            bar_left: bar_left as i32,
            bar_width: (0.03 * w).max(1.0) as i32,
        }
    }

    fn heat_bottom(&self) -> i32 {
        self.heat_top + self.heat_size
    }

    fn bar_right(&self) -> i32 {
        self.bar_left + self.bar_width
    }
}

fn drawing_error<E: std::fmt::Display>(e: E) -> DensityError {
    DensityError::Drawing(e.to_string())
}

fn outline<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, style: ShapeStyle) -> Result<()> {
    let (w, h) = area.dim_in_pixel();
    area.draw(&Rectangle::new([(0, 0), (w as i32 - 1, h as i32 - 1)], style))
        .map_err(drawing_error)
}

/// One pixel per plotting-area pixel, nearest grid sample.
fn paint_field<DB: DrawingBackend>(
    plot: &DrawingArea<DB, Shift>,
    shown: &Array2<f64>,
    colormap: &Colormap,
) -> Result<()> {
    let (rows, cols) = shown.dim();
    if rows == 0 || cols == 0 {
        return Ok(());
    }
    let (lo, hi) = finite_range(shown);
    let span = if hi > lo { hi - lo } else { 1.0 };
    debug!("display range [{lo:e}, {hi:e}]");

    let (width, height) = plot.dim_in_pixel();
    let (width, height) = (width as usize, height as usize);
    for py in 0..height {
        let row = (py * rows / height).min(rows - 1);
        for px in 0..width {
            let col = (px * cols / width).min(cols - 1);
            let value = shown[[row, col]];
            let t = if value.is_finite() { (value - lo) / span } else { 0.0 };
            plot.draw_pixel((px as i32, py as i32), &rgb(colormap.eval(t)))
                .map_err(drawing_error)?;
        }
    }
    Ok(())
}

/// Heatmap with sample-index axes: spines on all four sides, outward ticks
/// every `TICK_STEP` samples, labels only when a font is available.
fn draw_heatmap<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    shown: &Array2<f64>,
    colormap: &Colormap,
    style: &Style,
    colors: &StyleColors,
    layout: &Layout,
    with_labels: bool,
) -> Result<()> {
    let (rows, cols) = shown.dim();
    let label_area = layout.label_area.min(layout.heat_left);
    let area = root.clone().shrink(
        (layout.heat_left - label_area, layout.heat_top),
        (layout.heat_size + label_area, layout.heat_size + label_area),
    );

    // samples sit on integer coordinates, row 0 at the bottom
    let x_range = KeyPointAxis((-0.5..cols as f64 - 0.5).with_key_points(tick_positions(cols)));
    let y_range = KeyPointAxis((-0.5..rows as f64 - 0.5).with_key_points(tick_positions(rows)));
    let mut chart = ChartBuilder::on(&area)
        .x_label_area_size(label_area)
        .y_label_area_size(label_area)
        .build_cartesian_2d(x_range, y_range)
        .map_err(drawing_error)?;

    let plot = chart.plotting_area().strip_coord_spec();
    paint_field(&plot, shown, colormap)?;

    if with_labels {
        let sample_index = |v: &f64| format!("{v:.0}");
        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .x_labels(tick_positions(cols).len())
            .y_labels(tick_positions(rows).len())
            .set_all_tick_mark_size(style.tick_size)
            .axis_style(rgb(colors.tick).stroke_width(style.tick_width))
            .x_label_formatter(&sample_index)
            .y_label_formatter(&sample_index)
            .label_style(
                (style.font_family.as_str(), style.tick_label_size)
                    .into_font()
                    .color(&rgb(colors.tick)),
            )
            .draw()
            .map_err(drawing_error)?;
    }

    outline(&plot, rgb(colors.spine).stroke_width(style.axes_linewidth))
}

/// Vertical colour bar, high values on top, no ticks.
fn draw_colorbar<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    colormap: &Colormap,
    style: &Style,
    colors: &StyleColors,
    layout: &Layout,
) -> Result<()> {
    let area = root.clone().shrink(
        (layout.bar_left, layout.heat_top),
        (layout.bar_width, layout.heat_size),
    );
    let chart = ChartBuilder::on(&area)
        .build_cartesian_2d(0.0..1.0, 0.0..1.0)
        .map_err(drawing_error)?;
    let plot = chart.plotting_area();

    let bands = plot.dim_in_pixel().1.max(2);
    let step = 1.0 / bands as f64;
    for i in 0..bands {
        let low = i as f64 * step;
        let color = rgb(colormap.eval(low + step / 2.0));
        plot.draw(&Rectangle::new([(0.0, low), (1.0, low + step)], color.filled()))
            .map_err(drawing_error)?;
    }

    if style.colorbar_outline {
        outline(
            &plot.strip_coord_spec(),
            rgb(colors.spine).stroke_width(style.axes_linewidth),
        )?;
    }
    Ok(())
}

struct Annotator<'a, DB: DrawingBackend> {
    root: &'a DrawingArea<DB, Shift>,
    family: &'a str,
    failed: bool,
}

impl<'a, DB: DrawingBackend> Annotator<'a, DB> {
    fn text(&mut self, text: &str, size: f64, color: colorous::Color, pos: (i32, i32), anchor: Pos) {
        let style = (self.family, size).into_font().color(&rgb(color)).pos(anchor);
        self.styled(text, style, pos);
    }

    fn vertical(&mut self, text: &str, size: f64, color: colorous::Color, pos: (i32, i32)) {
        let style = (self.family, size)
            .into_font()
            .color(&rgb(color))
            .transform(FontTransform::Rotate270)
            .pos(Pos::new(HPos::Center, VPos::Center));
        self.styled(text, style, pos);
    }

    fn styled(&mut self, text: &str, style: TextStyle<'_>, pos: (i32, i32)) {
        if self.failed {
            return;
        }
        if let Err(e) = self.root.draw_text(text, &style, pos) {
            warn!("could not draw annotation {text:?}: {e}");
            self.failed = true;
        }
    }
}

fn annotate<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    style: &Style,
    colors: &StyleColors,
    layout: &Layout,
    qn: QuantumNumbers,
) {
    let (w, h) = (style.width as i32, style.height as i32);
    let top_left = Pos::new(HPos::Left, VPos::Top);
    let mut ann = Annotator {
        root,
        family: &style.font_family,
        failed: false,
    };

    ann.text(TITLE, style.title_size, colors.text, (w / 40, h / 28), top_left);
    ann.text(
        FORMULA,
        style.formula_size,
        colors.text,
        (layout.heat_left, layout.heat_top - h / 12),
        top_left,
    );
    ann.text(
        &format!("({}, {}, {})", qn.n, qn.l, qn.m_l),
        style.state_size,
        colors.state,
        (layout.heat_left + w / 50, layout.heat_top + h / 60),
        top_left,
    );

    let side = layout.bar_right() + w / 40;
    let caption_line = (style.caption_size * 1.2) as i32;
    let bottom_left = Pos::new(HPos::Left, VPos::Bottom);
    ann.text(
        "Higher",
        style.caption_size,
        colors.text,
        (layout.bar_left, layout.heat_top - 12 - caption_line),
        bottom_left,
    );
    ann.text(
        "probability",
        style.caption_size,
        colors.text,
        (layout.bar_left, layout.heat_top - 12),
        bottom_left,
    );
    ann.text(
        "Lower",
        style.caption_size,
        colors.text,
        (layout.bar_left, layout.heat_bottom() + 12),
        top_left,
    );
    ann.text(
        "probability",
        style.caption_size,
        colors.text,
        (layout.bar_left, layout.heat_bottom() + 12 + caption_line),
        top_left,
    );

    ann.text(
        "+",
        style.glyph_size,
        colors.text,
        (side, layout.heat_top + layout.heat_size / 10),
        Pos::new(HPos::Center, VPos::Center),
    );
    ann.vertical(
        DISTRIBUTION_LABEL,
        style.label_size,
        colors.text,
        (side, layout.heat_top + layout.heat_size / 2),
    );
    ann.vertical(
        "−",
        style.glyph_size,
        colors.text,
        (side, layout.heat_bottom() - layout.heat_size / 10),
    );
}

/// Compose the full figure for an already evaluated density field.
pub fn compose_image(
    density: &Array2<f64>,
    qn: QuantumNumbers,
    colormap: &Colormap,
    style: &Style,
) -> Result<RgbImage> {
    let colors = style.colors()?;
    let layout = Layout::new(style.width, style.height);
    let shown = display_field(density);
    let can_write = ensure_font(&style.font_family, style.font_path.as_deref());

    let mut img = RgbImage::new(style.width, style.height);
    {
        let root = BitMapBackend::with_buffer(&mut img, (style.width, style.height))
            .into_drawing_area();
        root.fill(&rgb(colors.background)).map_err(drawing_error)?;
        draw_heatmap(&root, &shown, colormap, style, &colors, &layout, can_write)?;
        draw_colorbar(&root, colormap, style, &colors, &layout)?;
        if can_write {
            annotate(&root, style, &colors, &layout, qn);
        }
        root.present().map_err(drawing_error)?;
    }
    Ok(img)
}

/// Evaluate Ψ for the request and compose its figure.
pub fn render(request: &ValidatedRequest, style: &Style) -> Result<RgbImage> {
    let qn = request.quantum;
    let psi = compute_wavefunction(qn, request.a0_scale_factor);
    let density = probability_density(&psi);
    compose_image(&density, qn, &request.colormap, style)
}

/// Render into `dir` under the standard file name and return the written path.
pub fn render_to_dir(request: &ValidatedRequest, style: &Style, dir: &Path) -> Result<PathBuf> {
    let img = render(request, style)?;
    let path = dir.join(request.file_name());
    img.save(&path)?;
    info!("wrote {}", path.display());
    Ok(path)
}

/// Validate, render with the theme's default style and write into the
/// current working directory.
pub fn plot_wf_probability_density(
    n: i64,
    l: i64,
    m: i64,
    a0_scale_factor: f64,
    dark_theme: bool,
    colormap: &str,
) -> Result<PathBuf> {
    let request = RenderRequest {
        n,
        l,
        m,
        a0_scale_factor,
        dark_theme,
        colormap: colormap.to_string(),
    }
    .validate()?;
    let style = request.default_style();
    render_to_dir(&request, &style, Path::new("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_output_file_name() {
        let qn = QuantumNumbers::new(3, 2, -1).unwrap();
        assert_eq!(output_file_name(qn, Theme::Light), "(3,2,-1)[lt].png");
        assert_eq!(output_file_name(qn, Theme::Dark), "(3,2,-1)[dt].png");
    }

    #[test]
    fn test_validate_reports_each_failure() {
        let mut request = RenderRequest::new(0, 0, 0, 1.0);
        assert!(matches!(request.validate(), Err(DensityError::InvalidPrincipal { .. })));

        request.n = 2;
        request.l = 2;
        assert!(matches!(request.validate(), Err(DensityError::InvalidAzimuthal { .. })));

        request.l = 1;
        request.m = -2;
        assert!(matches!(request.validate(), Err(DensityError::InvalidMagnetic { .. })));

        request.m = 1;
        request.a0_scale_factor = 0.0;
        assert!(matches!(request.validate(), Err(DensityError::InvalidScale(_))));

        request.a0_scale_factor = 0.5;
        request.colormap = "not_a_real_colormap".to_string();
        assert!(matches!(request.validate(), Err(DensityError::UnknownColormap(_))));

        request.colormap = "mako".to_string();
        request.dark_theme = true;
        let valid = request.validate().unwrap();
        assert_eq!(valid.theme, Theme::Dark);
        assert_eq!(valid.file_name(), "(2,1,1)[dt].png");
    }

    #[test]
    fn test_display_field_orientation() {
        // density[[i, j]] = (x_i, z_j)
        let density = Array2::from_shape_vec((2, 3), vec![1.0, 4.0, 9.0, 16.0, 25.0, 36.0]).unwrap();
        let shown = display_field(&density);
        assert_eq!(shown.dim(), (3, 2));
        // top row is the largest z, columns walk along x
        assert_eq!(shown.row(0).to_vec(), vec![3.0, 6.0]);
        assert_eq!(shown.row(2).to_vec(), vec![1.0, 4.0]);
    }

    #[test]
    fn test_compose_small_canvas() {
        let qn = QuantumNumbers::new(2, 1, 0).unwrap();
        let colormap = Colormap::from_name("viridis").unwrap();
        let style = Style {
            width: 200,
            height: 210,
            ..Style::default()
        };
        let density = Array2::from_shape_fn((40, 40), |(i, j)| (i * j) as f64);
        let img = compose_image(&density, qn, &colormap, &style).unwrap();
        assert_eq!(img.dimensions(), (200, 210));
        assert_eq!(img.get_pixel(0, 209), &Rgb([255, 255, 255]));
    }

    #[test]
    fn test_ticks_every_hundred_samples() {
        assert_eq!(
            tick_positions(680),
            vec![0.0, 100.0, 200.0, 300.0, 400.0, 500.0, 600.0]
        );
        assert_eq!(tick_positions(100), vec![0.0]);
        assert!(tick_positions(0).is_empty());
    }

    #[test]
    fn test_heatmap_and_colorbar_fill_their_areas() {
        let qn = QuantumNumbers::new(1, 0, 0).unwrap();
        let colormap = Colormap::from_name("viridis").unwrap();
        let style = Style {
            width: 400,
            height: 420,
            ..Style::default()
        };
        let layout = Layout::new(style.width, style.height);
        // a constant field maps every sample to the bottom of the colormap
        let density = Array2::from_elem((30, 30), 2.0);
        let img = compose_image(&density, qn, &colormap, &style).unwrap();

        let low = colormap.eval(0.0);
        let center = layout.heat_top + layout.heat_size / 2;
        let heat_x = (layout.heat_left + layout.heat_size / 2) as u32;
        let heat_center = img.get_pixel(heat_x, center as u32);
        assert_eq!(heat_center, &Rgb([low.r, low.g, low.b]));

        let bar_x = (layout.bar_left + layout.bar_width / 2) as u32;
        let near_top = img.get_pixel(bar_x, (layout.heat_top + 10) as u32);
        let near_bottom = img.get_pixel(bar_x, (layout.heat_bottom() - 10) as u32);
        assert_ne!(near_top, near_bottom);
        assert_ne!(near_top, &Rgb([255, 255, 255]));
    }
}
