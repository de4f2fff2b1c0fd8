//! Module for rendering alert charts.

use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

use crate::errors::{Error, Result};
use crate::generator::Variant;
use crate::series::{AlertSeries, ThresholdSpec};

use chrono::Local;
use plotters::backend::{BitMapBackend, DrawingBackend, SVGBackend};
use plotters::coord::Shift;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::{RangedCoordf64, RangedCoordi32};
use plotters::prelude::*;
use tracing::{debug, info};

/// Default image size, in pixels.
const SIZE: (u32, u32) = (1000, 600);
/// Number of time labels on the X axis.
const X_LABELS: usize = 10;
/// Size of the axis labels.
const LABEL_SIZE: i32 = 12;
/// Radius of the anomaly marker.
const MARKER_SIZE: i32 = 6;

/// Chart coordinates: sample index on X, metric value on Y.
type AlertCoord = Cartesian2d<RangedCoordi32, RangedCoordf64>;

/// Image format of the generated chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawOutput {
    /// PNG bitmap.
    Png,
    /// SVG document.
    Svg,
}

impl DrawOutput {
    /// Picks the format from the file extension: `.svg` gives SVG, anything else PNG.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("svg") => Self::Svg,
            _ => Self::Png,
        }
    }
}

/// Configuration options for chart generation.
#[derive(Debug, Clone)]
pub struct DrawOptions {
    /// Chart title, derived from the labels when unset.
    title: Option<String>,
    /// Output format, derived from the path when unset.
    output: Option<DrawOutput>,
    /// Image size in pixels.
    size: (u32, u32),
    /// Scenario the chart depicts.
    variant: Variant,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            title: None,
            output: None,
            size: SIZE,
            variant: Variant::default(),
        }
    }
}

impl DrawOptions {
    /// Sets the chart title.
    pub fn title(mut self, title: impl ToString) -> Self {
        self.title = Some(title.to_string());
        self
    }

    /// Forces the output format.
    pub fn draw_output(mut self, output: DrawOutput) -> Self {
        self.output = Some(output);
        self
    }

    /// Sets the image size in pixels.
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    /// Sets the scenario; a resolved alert gets a " - Resolved" title suffix.
    pub fn variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }
}

/// Chart drawing utility for alert series.
///
/// ```rust
/// use alert_charts::prelude::*;
///
/// let alert = SeriesBuilder::new(Some(80.0)).unwrap().generate(Variant::Resolution);
/// let threshold = ThresholdSpec::new(80.0, "%", "CPU usage", "web-01");
/// let draw = Draw::new(&alert, &threshold).with_options(DrawOptions::default().variant(Variant::Resolution));
/// assert_eq!(draw.title(), "CPU usage: web-01 - Resolved");
/// ```
pub struct Draw<'d> {
    alert: &'d AlertSeries,
    threshold: &'d ThresholdSpec,
    options: DrawOptions,
}

impl<'d> Draw<'d> {
    /// Creates a new `Draw` for `alert`, with `threshold` as the horizontal line and labels.
    pub fn new(alert: &'d AlertSeries, threshold: &'d ThresholdSpec) -> Self {
        Self {
            alert,
            threshold,
            options: DrawOptions::default(),
        }
    }

    /// Sets the drawing options.
    pub fn with_options(mut self, options: DrawOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the title printed above the chart.
    pub fn title(&self) -> String {
        if let Some(title) = &self.options.title {
            return title.clone();
        }
        let ThresholdSpec { alert_name, host, .. } = self.threshold;
        match self.options.variant {
            Variant::Ongoing => format!("{alert_name}: {host}"),
            Variant::Resolution => format!("{alert_name}: {host} - Resolved"),
        }
    }

    /// Renders the chart to `path` and returns it.
    ///
    /// The image is drawn into a hidden sibling file first, then renamed onto `path`:
    /// an existing file is replaced, and a failure leaves nothing behind.
    pub fn plot(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = path.as_ref();
        let output = self.options.output.unwrap_or_else(|| DrawOutput::from_path(path));
        let partial = partial_path(path, output)?;
        debug!(path = %partial.display(), ?output, "rendering chart");

        let rendered = match output {
            DrawOutput::Svg => self.plot_svg(&partial),
            DrawOutput::Png => self.plot_png(&partial),
        };
        if let Err(err) = rendered.and_then(|_| fs::rename(&partial, path).map_err(Error::from)) {
            let _ = fs::remove_file(&partial);
            return Err(err);
        }

        info!(path = %path.display(), "chart written");
        Ok(path.to_path_buf())
    }

    /// Saves the chart as an SVG file.
    fn plot_svg(&self, path: &Path) -> Result<()> {
        let root = SVGBackend::new(path, self.options.size).into_drawing_area();
        self.draw_chart(&root)
    }

    /// Saves the chart as a PNG file.
    fn plot_png(&self, path: &Path) -> Result<()> {
        let root = BitMapBackend::new(path, self.options.size).into_drawing_area();
        self.draw_chart(&root)
    }

    /// Axis ranges: sample indices on X, values and threshold with 10% padding on Y.
    fn ranges(&self) -> (Range<i32>, Range<f64>) {
        let threshold = self.threshold.value;
        let (min, max) = self.alert.series().bounds().unwrap_or((threshold, threshold));
        let low = min.min(threshold);
        let high = max.max(threshold);
        let padding = ((high - low) * 0.1).max(1.0);
        (0..self.last_x(), low - padding..high + padding)
    }

    fn last_x(&self) -> i32 {
        (self.alert.series().values().len() as i32 - 1).max(1)
    }

    /// Draws the title, mesh, marks and legend.
    fn draw_chart<DB: DrawingBackend>(&self, drawing_area: &DrawingArea<DB, Shift>) -> Result<()> {
        let ThresholdSpec { unit, alert_name, .. } = self.threshold;
        let (x_range, y_range) = self.ranges();

        let times = self
            .alert
            .series()
            .timestamps()
            .iter()
            .map(|t| t.with_timezone(&Local).format("%H:%M").to_string())
            .collect::<Vec<_>>();

        drawing_area.fill(&BLACK).map_err(|e| Error::Plotters(e.to_string()))?;

        let mut chart = ChartBuilder::on(drawing_area)
            .margin(20)
            .caption(self.title(), ("sans-serif", 24).into_font().color(&WHITE))
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range, y_range)
            .map_err(|e| Error::Plotters(e.to_string()))?;

        let format_time = |x: &i32| times.get(*x as usize).cloned().unwrap_or_default();
        chart
            .configure_mesh()
            .x_desc("Time")
            .y_desc(format!("{alert_name} ({unit})"))
            .x_labels(X_LABELS)
            .x_label_formatter(&format_time)
            .label_style(("sans-serif", LABEL_SIZE).into_font().color(&WHITE))
            .axis_desc_style(("sans-serif", LABEL_SIZE + 3).into_font().color(&WHITE))
            .axis_style(&WHITE.mix(0.8))
            .bold_line_style(&WHITE.mix(0.3))
            .light_line_style(&TRANSPARENT)
            .draw()
            .map_err(|e| Error::Plotters(e.to_string()))?;

        self.draw_marks(&mut chart)?;

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(&BLACK.mix(0.8))
            .border_style(&WHITE.mix(0.5))
            .label_font(("sans-serif", LABEL_SIZE + 2).into_font().color(&WHITE))
            .draw()
            .map_err(|e| Error::Plotters(e.to_string()))?;

        drawing_area.present().map_err(|e| Error::Plotters(e.to_string()))
    }

    /// Draws the series line, the dashed threshold line and the anomaly marker.
    ///
    /// Only registers the legend entries; no text is drawn here.
    fn draw_marks<DB: DrawingBackend>(&self, chart: &mut ChartContext<'_, DB, AlertCoord>) -> Result<()> {
        let values = self.alert.series().values();
        let threshold = self.threshold.value;
        let ThresholdSpec { unit, alert_name, host, .. } = self.threshold;

        let line_style = GREEN.stroke_width(2);
        chart
            .draw_series(LineSeries::new(
                values.iter().enumerate().map(|(i, v)| (i as i32, *v)),
                line_style,
            ))
            .map_err(|e| Error::Plotters(e.to_string()))?
            .label(format!("{host}: {alert_name}"))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));

        let threshold_style = RED.mix(0.7).stroke_width(2);
        chart
            .draw_series(DashedLineSeries::new(
                [(0, threshold), (self.last_x(), threshold)],
                10,
                6,
                threshold_style,
            ))
            .map_err(|e| Error::Plotters(e.to_string()))?
            .label(format!("Threshold: {threshold} {unit}"))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], threshold_style));

        let anomaly = self.alert.anomaly().index();
        chart
            .draw_series([Circle::new(
                (anomaly as i32, self.alert.anomaly_value()),
                MARKER_SIZE,
                RED.filled(),
            )])
            .map_err(|e| Error::Plotters(e.to_string()))?;

        Ok(())
    }
}

/// Hidden sibling of `path` the chart is drawn into before the rename.
///
/// The bitmap encoder picks the format from the extension, so it is kept.
fn partial_path(path: &Path, output: DrawOutput) -> Result<PathBuf> {
    let name = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("invalid image path: {}", path.display())))?;
    let ext = match output {
        DrawOutput::Svg => "svg",
        DrawOutput::Png => path.extension().and_then(|ext| ext.to_str()).unwrap_or("png"),
    };
    Ok(path.with_file_name(format!(".{name}.partial.{ext}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::generator::SeriesBuilder;

    use chrono::DateTime;
    use rand::{SeedableRng, rngs::StdRng};

    fn fixture(variant: Variant) -> (AlertSeries, ThresholdSpec) {
        let clock = FixedClock::new(DateTime::from_timestamp(1_760_000_000, 0).unwrap());
        let mut rng = StdRng::seed_from_u64(1);
        let alert = SeriesBuilder::new(Some(80.0))
            .unwrap()
            .generate_with(variant, &mut rng, &clock);
        (alert, ThresholdSpec::new(80.0, "%", "CPU usage", "web-01"))
    }

    #[test]
    fn output_from_extension() {
        assert_eq!(DrawOutput::from_path(Path::new("a/b.svg")), DrawOutput::Svg);
        assert_eq!(DrawOutput::from_path(Path::new("a/b.SVG")), DrawOutput::Svg);
        assert_eq!(DrawOutput::from_path(Path::new("a/b.png")), DrawOutput::Png);
        assert_eq!(DrawOutput::from_path(Path::new("a/b")), DrawOutput::Png);
    }

    #[test]
    fn partial_path_is_hidden_sibling() {
        let partial = partial_path(Path::new("graphs/alert_1.png"), DrawOutput::Png).unwrap();
        assert_eq!(partial, Path::new("graphs/.alert_1.partial.png"));
        let partial = partial_path(Path::new("graphs/alert_1"), DrawOutput::Png).unwrap();
        assert_eq!(partial, Path::new("graphs/.alert_1.partial.png"));
        let partial = partial_path(Path::new("x.img"), DrawOutput::Svg).unwrap();
        assert_eq!(partial, Path::new(".x.partial.svg"));
    }

    #[test]
    fn titles() {
        let (alert, threshold) = fixture(Variant::Ongoing);
        let draw = Draw::new(&alert, &threshold);
        assert_eq!(draw.title(), "CPU usage: web-01");

        let draw = Draw::new(&alert, &threshold).with_options(DrawOptions::default().variant(Variant::Resolution));
        assert_eq!(draw.title(), "CPU usage: web-01 - Resolved");

        let draw = Draw::new(&alert, &threshold).with_options(DrawOptions::default().title("custom"));
        assert_eq!(draw.title(), "custom");
    }

    #[test]
    fn marks_in_svg() {
        let (alert, threshold) = fixture(Variant::Resolution);
        let draw = Draw::new(&alert, &threshold);
        let anomaly = (alert.anomaly().index() as i32, alert.anomaly_value());

        let mut svg = String::new();
        let (cx, cy) = {
            let root = SVGBackend::with_string(&mut svg, SIZE).into_drawing_area();
            let (x_range, y_range) = draw.ranges();
            let mut chart = ChartBuilder::on(&root).build_cartesian_2d(x_range, y_range).unwrap();
            draw.draw_marks(&mut chart).unwrap();
            let center = chart.backend_coord(&anomaly);
            root.present().unwrap();
            center
        };

        assert_eq!(svg.matches("<circle").count(), 1, "{svg}");
        assert!(svg.contains(&format!(r#"cx="{cx}""#)), "{svg}");
        assert!(svg.contains(&format!(r#"cy="{cy}""#)), "{svg}");
        assert!(svg.contains(r##"fill="#FF0000""##), "{svg}");
        assert!(svg.contains(r##"stroke="#00FF00""##), "{svg}");
        // one stroke per dash
        assert!(svg.matches(r##"stroke="#FF0000""##).count() > 2, "{svg}");
    }

    #[test]
    fn ranges_cover_threshold() {
        let (alert, _) = fixture(Variant::Ongoing);
        let high = ThresholdSpec::new(1_000.0, "%", "CPU usage", "web-01");
        let draw = Draw::new(&alert, &high);
        let (x_range, y_range) = draw.ranges();
        assert_eq!(x_range, 0..alert.series().values().len() as i32 - 1);
        assert!(y_range.end > 1_000.0);
        let (min, _) = alert.series().bounds().unwrap();
        assert!(y_range.start < min);
    }

    #[test]
    fn invalid_path_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let (alert, threshold) = fixture(Variant::Ongoing);
        let result = Draw::new(&alert, &threshold).plot(dir.path().join(".."));
        assert!(matches!(result, Err(Error::IoError(_))));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    // Text rendering needs a system font; without one the backend errors out,
    // in which case nothing may be left on disk.
    fn assert_written_or_clean(result: Result<PathBuf>, path: &Path) {
        let dir = path.parent().unwrap();
        let leftovers = fs::read_dir(dir)
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().contains(".partial."))
            .count();
        assert_eq!(leftovers, 0);
        match result {
            Ok(written) => {
                assert_eq!(written, path);
                assert!(fs::metadata(path).unwrap().len() > 0);
            }
            Err(err) => {
                assert!(matches!(err, Error::Plotters(_)), "{err}");
                assert!(!path.exists());
            }
        }
    }

    #[test]
    fn plot_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alert.png");
        let (alert, threshold) = fixture(Variant::Ongoing);
        let result = Draw::new(&alert, &threshold).plot(&path);
        assert_written_or_clean(result, &path);
    }

    #[test]
    fn plot_svg_resolution() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resolved.svg");
        let (alert, threshold) = fixture(Variant::Resolution);
        let result = Draw::new(&alert, &threshold)
            .with_options(DrawOptions::default().variant(Variant::Resolution))
            .plot(&path);
        assert_written_or_clean(result, &path);
    }

    #[test]
    fn plot_into_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("alert.png");
        let (alert, threshold) = fixture(Variant::Ongoing);
        assert!(Draw::new(&alert, &threshold).plot(&path).is_err());
        assert!(!path.exists());
    }
}
