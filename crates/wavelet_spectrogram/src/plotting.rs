use crate::spectrogram::Spectrogram;
use log::info;
use plotters::{coord::ReverseCoordTranslate, prelude::*};
use std::path::Path;

/// Plot a rendered spectrogram with labelled time and frequency axes.
pub fn plot_spectrogram(spectrogram: &Spectrogram, file_out: &Path, title: &str) -> anyhow::Result<()> {
    let duration = spectrogram.sound().duration();
    let scale = spectrogram.scale();
    let (low_freq, high_freq) = (scale.min_frequency(), scale.max_frequency());
    info!("Plotting {low_freq:.1}-{high_freq:.1}Hz over {duration:.2}s");

    // setup graph
    let root = BitMapBackend::new(file_out, (1280, 720)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 50).into_font())
        .margin(5)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..duration, low_freq..high_freq)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Time (s)")
        .y_desc("Frequency (Hz)")
        .draw()?;

    // Color every pixel of the plotting area from the cell under it.
    let image = spectrogram.image();
    let (x_pixels, y_pixels) = chart.plotting_area().get_pixel_range();
    let last_column = spectrogram.columns().saturating_sub(1) as f64;
    let last_row = spectrogram.rows().saturating_sub(1) as f64;
    for x in x_pixels {
        for y in y_pixels.clone() {
            let Some((time, frequency)) = chart.as_coord_spec().reverse_translate((x, y)) else {
                continue;
            };
            let column = spectrogram.time_to_column(time).round().clamp(0.0, last_column) as u32;
            let row = scale.freq_to_position(frequency).round().clamp(0.0, last_row) as u32;
            let [r, g, b] = image.get_pixel(column, row).0;
            root.draw_pixel((x, y), &RGBColor(r, g, b))?;
        }
    }

    root.present()?;
    info!("Successfully saved spectrogram plot to {}", file_out.display());
    Ok(())
}
