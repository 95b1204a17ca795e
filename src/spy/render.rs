//! Rasterisation of a spy plot with plotters

use std::error::Error;
use std::ops::Range;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::debug;

use crate::error::{Result, SpyError};
use crate::spy::config::{SpyConfig, POINTS_PER_INCH};
use crate::spy::layout::SpyPlot;

/// Grid line colour
pub const GRID_COLOR: RGBColor = RGBColor(176, 176, 176);

/// Title and tick label sizes in points
const TITLE_POINTS: f64 = 16.0;
const LABEL_POINTS: f64 = 10.0;

/// An RGB image, row-major, 3 bytes per pixel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Raster {
    /// Colour of the pixel at (x, y), `None` outside the image or buffer
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 3;
        match self.data.get(offset..offset + 3)? {
            &[r, g, b] => Some([r, g, b]),
            _ => None,
        }
    }

    /// Packs the image as `0RGB` words, the layout window buffers expect
    pub fn to_0rgb(&self) -> Vec<u32> {
        self.data
            .chunks_exact(3)
            .map(|p| (u32::from(p[0]) << 16) | (u32::from(p[1]) << 8) | u32::from(p[2]))
            .collect()
    }
}

/// Where things landed on the canvas, in backend pixels
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// Pixel extent of the plotting area
    pub area: (Range<i32>, Range<i32>),
    /// Pixel column of each x tick
    pub tick_columns: Vec<i32>,
    /// Pixel position of each marker
    pub markers: Vec<(i32, i32)>,
}

/// Renders the spy plot into an RGB raster of the configured figure size
pub fn render_rgb(plot: &SpyPlot, config: &SpyConfig) -> Result<Raster> {
    render_with_placement(plot, config).map(|(raster, _)| raster)
}

/// Like [`render_rgb`], also reporting where ticks and markers were drawn
pub fn render_with_placement(
    plot: &SpyPlot,
    config: &SpyConfig,
) -> Result<(Raster, Placement)> {
    config.validate()?;
    let (width, height) = config.figure.pixel_size();
    let mut data = vec![0u8; width as usize * height as usize * 3];

    let placement = {
        let root = BitMapBackend::with_buffer(&mut data, (width, height)).into_drawing_area();
        let placement = draw(&root, plot, config).map_err(|e| SpyError::Render(e.to_string()))?;
        root.present()
            .map_err(|e| SpyError::Render(e.to_string()))?;
        placement
    };

    debug!(width, height, markers = plot.markers.len(), "rendered spy plot");

    Ok((
        Raster {
            width,
            height,
            data,
        },
        placement,
    ))
}

fn format_tick(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{}", (value * 100.0).round() / 100.0)
    }
}

fn draw(
    root: &DrawingArea<BitMapBackend<'_>, Shift>,
    plot: &SpyPlot,
    config: &SpyConfig,
) -> std::result::Result<Placement, Box<dyn Error>> {
    let figure = &config.figure;
    let dpi = figure.dpi as f64;
    let title_size = (TITLE_POINTS * dpi / POINTS_PER_INCH).max(8.0);
    let label_size = (LABEL_POINTS * dpi / POINTS_PER_INCH).max(6.0);

    root.fill(&figure.face_color)?;

    let (x_start, x_end) = plot.x_range();
    let (row_start, row_end) = plot.row_range();
    let (y_bottom, y_top) = (-row_end, -row_start);

    // Rows grow downward: row r is drawn at y = -r
    let mut chart = ChartBuilder::on(root)
        .caption(&plot.title, ("sans-serif", title_size))
        .margin((dpi / 4.0) as u32)
        .top_x_label_area_size((label_size * 2.5) as u32)
        .y_label_area_size((label_size * 5.0) as u32)
        .build_cartesian_2d(x_start..x_end, y_bottom..y_top)?;

    let y_formatter = |y: &f64| format_tick(-*y);

    // x ticks sit at fixed positions, so the mesh only provides the y axis
    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_labels(0)
        .y_label_formatter(&y_formatter)
        .label_style(("sans-serif", label_size))
        .draw()?;

    if config.x_grid {
        for &x in &plot.x_ticks {
            chart.draw_series(LineSeries::new(vec![(x, y_bottom), (x, y_top)], GRID_COLOR))?;
        }
    }

    let area = chart.plotting_area().get_pixel_range();
    let tick_style = ("sans-serif", label_size)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Bottom));
    let mut tick_columns = Vec::with_capacity(plot.x_ticks.len());
    for &x in &plot.x_ticks {
        let (column, _) = chart.backend_coord(&(x, y_top));
        root.draw(&Text::new(
            format_tick(x),
            (column, area.1.start - 4),
            tick_style.clone(),
        ))?;
        tick_columns.push(column);
    }

    let color = config.marker_color;
    let radius = config.marker_radius_px();
    let position = |col: usize, row: usize| (col as f64, -(row as f64));

    if radius < 0.5 {
        chart.draw_series(
            plot.markers
                .iter()
                .map(|m| Pixel::new(position(m.col, m.row), color)),
        )?;
    } else {
        let radius = radius.round() as i32;
        chart.draw_series(
            plot.markers
                .iter()
                .map(|m| Circle::new(position(m.col, m.row), radius, color.filled())),
        )?;
    }

    let markers = plot
        .markers
        .iter()
        .map(|m| chart.backend_coord(&position(m.col, m.row)))
        .collect();

    let (width, height) = figure.pixel_size();
    root.draw(&Rectangle::new(
        [(0, 0), (width as i32 - 1, height as i32 - 1)],
        figure.edge_color.stroke_width(1),
    ))?;

    Ok(Placement {
        area,
        tick_columns,
        markers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::SparseMatrixCSR;
    use crate::spy::config::FigureParameters;

    fn small_config() -> SpyConfig {
        SpyConfig {
            figure: FigureParameters {
                width_in: 4.0,
                height_in: 5.0,
                dpi: 50,
                ..FigureParameters::default()
            },
            ..SpyConfig::default()
        }
    }

    fn is_grid(pixel: Option<[u8; 3]>) -> bool {
        pixel == Some([GRID_COLOR.0, GRID_COLOR.1, GRID_COLOR.2])
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(0.0), "0");
        assert_eq!(format_tick(5.0), "5");
        assert_eq!(format_tick(0.5), "0.5");
        assert_eq!(format_tick(1.1 * 3.0), "3.3");
    }

    #[test]
    fn test_to_0rgb() {
        let raster = Raster {
            width: 2,
            height: 1,
            data: vec![255, 0, 0, 1, 2, 3],
        };
        assert_eq!(raster.to_0rgb(), vec![0x00ff_0000, 0x0001_0203]);
        assert_eq!(raster.pixel(1, 0), Some([1, 2, 3]));
        assert_eq!(raster.pixel(2, 0), None);
    }

    #[test]
    fn test_pixel_with_short_buffer() {
        let raster = Raster {
            width: 2,
            height: 2,
            data: vec![9, 9, 9, 1],
        };
        assert_eq!(raster.pixel(0, 0), Some([9, 9, 9]));
        assert_eq!(raster.pixel(1, 0), None);
        assert_eq!(raster.pixel(1, 1), None);
    }

    #[test]
    fn test_render_has_figure_size_and_frame() {
        let config = small_config();
        let matrix = SparseMatrixCSR::new(2, 2, vec![0, 1, 2], vec![0, 1], vec![1.0, 2.0]);
        let plot = SpyPlot::from_csr(&matrix, &config).unwrap();

        let raster = render_rgb(&plot, &config).unwrap();

        assert_eq!((raster.width, raster.height), (200, 250));
        assert_eq!(raster.data.len(), 200 * 250 * 3);
        // Edge
        assert_eq!(raster.pixel(0, 0), Some([0, 0, 0]));
        assert_eq!(raster.pixel(199, 249), Some([0, 0, 0]));
        // Face, just inside the frame
        assert_eq!(raster.pixel(2, 2), Some([255, 255, 255]));
    }

    #[test]
    fn test_vertical_grid_at_ticks_only() {
        let config = small_config();
        // 19 x 19 diagonal: ticks every 2 columns
        let n = 19;
        let matrix = SparseMatrixCSR::new(n, n, (0..=n).collect(), (0..n).collect(), vec![1.0; n]);
        let plot = SpyPlot::from_csr(&matrix, &config).unwrap();

        let (raster, placement) = render_with_placement(&plot, &config).unwrap();
        let (xs, ys) = placement.area.clone();
        let interior_rows = (ys.start + 1)..(ys.end - 1);

        assert_eq!(placement.tick_columns.len(), 11);
        let inside: Vec<i32> = placement
            .tick_columns
            .iter()
            .copied()
            .filter(|&c| c > xs.start && c < xs.end - 1)
            .collect();
        assert!(inside.len() >= 9, "ticks inside area: {:?}", inside);

        for &column in &inside {
            let grid = interior_rows
                .clone()
                .filter(|&y| is_grid(raster.pixel(column as u32, y as u32)))
                .count();
            assert!(
                grid * 2 > interior_rows.len(),
                "column {} has {} grid pixels",
                column,
                grid
            );
        }

        // No horizontal line spans the interior
        for y in interior_rows {
            let full_row = ((xs.start + 1)..(xs.end - 1))
                .all(|x| is_grid(raster.pixel(x as u32, y as u32)));
            assert!(!full_row, "horizontal grid line at y = {}", y);
        }
    }

    #[test]
    fn test_default_markers_are_single_pixels() {
        let config = small_config();
        assert!(config.marker_radius_px() < 0.5);
        // [0 0 3]
        // [1 0 0]
        let matrix = SparseMatrixCSR::new(2, 3, vec![0, 1, 2], vec![2, 0], vec![3.0, 1.0]);
        let plot = SpyPlot::from_csr(&matrix, &config).unwrap();

        let (raster, placement) = render_with_placement(&plot, &config).unwrap();
        let color = config.marker_color;

        assert_eq!(placement.markers.len(), 2);
        let (top, bottom) = (placement.markers[0], placement.markers[1]);
        // (col 2, row 0) is right of and above (col 0, row 1)
        assert!(top.0 > bottom.0 && top.1 < bottom.1);
        for &(x, y) in &placement.markers {
            assert_eq!(
                raster.pixel(x as u32, y as u32),
                Some([color.0, color.1, color.2])
            );
        }
    }

    #[test]
    fn test_large_markers_are_drawn() {
        let config = SpyConfig {
            marker_size: 20.0,
            marker_color: RGBColor(255, 0, 0),
            ..small_config()
        };
        let matrix = SparseMatrixCSR::new(1, 1, vec![0, 1], vec![0], vec![1.0]);
        let plot = SpyPlot::from_csr(&matrix, &config).unwrap();

        let raster = render_rgb(&plot, &config).unwrap();

        let red = raster
            .data
            .chunks_exact(3)
            .filter(|p| p[0] == 255 && p[1] == 0 && p[2] == 0)
            .count();
        assert!(red > 0);
    }
}
