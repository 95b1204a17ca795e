//! Interactive display of a rendered figure

use crate::error::{Result, SpyError};
use crate::spy::render::Raster;

/// Opens a window showing `raster` and blocks until it is closed
///
/// Escape also closes the window. Large figures are scaled down to fit,
/// keeping their aspect ratio.
#[cfg(feature = "window")]
pub fn show(raster: &Raster, title: &str) -> Result<()> {
    use minifb::{Key, ScaleMode, Window, WindowOptions};
    use tracing::info;

    let width = raster.width as usize;
    let height = raster.height as usize;
    let buffer = raster.to_0rgb();

    let options = WindowOptions {
        resize: true,
        scale_mode: ScaleMode::AspectRatioStretch,
        ..WindowOptions::default()
    };
    let mut window = Window::new(title, width, height, options)
        .map_err(|e| SpyError::Display(e.to_string()))?;
    window.set_target_fps(30);

    info!(width, height, "displaying figure; close the window to exit");

    while window.is_open() && !window.is_key_down(Key::Escape) {
        window
            .update_with_buffer(&buffer, width, height)
            .map_err(|e| SpyError::Display(e.to_string()))?;
    }

    Ok(())
}

#[cfg(not(feature = "window"))]
pub fn show(_raster: &Raster, _title: &str) -> Result<()> {
    Err(SpyError::Display(
        "built without the `window` feature".to_string(),
    ))
}

#[cfg(all(test, not(feature = "window")))]
mod tests {
    use super::*;

    #[test]
    fn test_show_without_window_support() {
        let raster = Raster {
            width: 1,
            height: 1,
            data: vec![0, 0, 0],
        };
        assert!(matches!(show(&raster, "t"), Err(SpyError::Display(_))));
    }
}
