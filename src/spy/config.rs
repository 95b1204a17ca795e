//! Figure configuration for spy plots

use plotters::style::RGBColor;

use crate::error::{Result, SpyError};

/// Points per inch; marker sizes are given in points
pub const POINTS_PER_INCH: f64 = 72.0;

/// Default marker colour (the usual first-cycle blue)
pub const DEFAULT_MARKER_COLOR: RGBColor = RGBColor(31, 119, 180);

/// Physical parameters of the figure canvas
#[derive(Debug, Clone, PartialEq)]
pub struct FigureParameters {
    /// Canvas width in inches
    pub width_in: f64,
    /// Canvas height in inches
    pub height_in: f64,
    /// Dots per inch
    pub dpi: u32,
    /// Background fill
    pub face_color: RGBColor,
    /// One-pixel frame drawn around the canvas
    pub edge_color: RGBColor,
}

impl Default for FigureParameters {
    fn default() -> Self {
        Self {
            width_in: 20.0,
            height_in: 25.0,
            dpi: 100,
            face_color: RGBColor(255, 255, 255),
            edge_color: RGBColor(0, 0, 0),
        }
    }
}

impl FigureParameters {
    /// Raster size in pixels
    pub fn pixel_size(&self) -> (u32, u32) {
        let dpi = self.dpi as f64;
        (
            (self.width_in * dpi).round() as u32,
            (self.height_in * dpi).round() as u32,
        )
    }
}

/// Configuration for building and rendering a spy plot
#[derive(Debug, Clone, PartialEq)]
pub struct SpyConfig {
    /// Canvas parameters
    pub figure: FigureParameters,

    /// Title drawn above the plotting region
    pub title: String,

    /// Entries with magnitude at or below this are not plotted
    pub precision: f64,

    /// Marker size in points
    pub marker_size: f64,

    /// Marker colour
    pub marker_color: RGBColor,

    /// Number of intervals between x-axis ticks (ticks = intervals + 1)
    pub tick_intervals: usize,

    /// Draw vertical grid lines at the x ticks
    pub x_grid: bool,
}

impl Default for SpyConfig {
    fn default() -> Self {
        Self {
            figure: FigureParameters::default(),
            title: "STIFFNESS".to_string(),
            precision: 1e-7,
            marker_size: 0.1,
            marker_color: DEFAULT_MARKER_COLOR,
            tick_intervals: 10,
            x_grid: true,
        }
    }
}

impl SpyConfig {
    /// Marker radius in pixels at the configured resolution
    pub fn marker_radius_px(&self) -> f64 {
        self.marker_size * self.figure.dpi as f64 / POINTS_PER_INCH / 2.0
    }

    /// Checks that the parameters describe a drawable figure
    pub fn validate(&self) -> Result<()> {
        let figure = &self.figure;
        if !(figure.width_in > 0.0 && figure.height_in > 0.0) {
            return Err(SpyError::Config(format!(
                "figure size must be positive, got {} x {}",
                figure.width_in, figure.height_in
            )));
        }
        if figure.dpi == 0 {
            return Err(SpyError::Config("dpi must be positive".to_string()));
        }
        let (w, h) = figure.pixel_size();
        if w == 0 || h == 0 {
            return Err(SpyError::Config(format!("figure rasterises to {} x {} pixels", w, h)));
        }
        if !(self.precision >= 0.0) {
            return Err(SpyError::Config(format!(
                "precision must be non-negative, got {}",
                self.precision
            )));
        }
        if !(self.marker_size > 0.0) {
            return Err(SpyError::Config(format!(
                "marker size must be positive, got {}",
                self.marker_size
            )));
        }
        if self.tick_intervals == 0 {
            return Err(SpyError::Config("tick intervals must be positive".to_string()));
        }
        Ok(())
    }
}
