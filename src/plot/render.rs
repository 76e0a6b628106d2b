use std::path::Path;

use plotters::coord::ranged1d::{Ranged, ValueFormatter};
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;

use super::{AxisScale, PlotError, PlotSpec, StagedImage};

const FONT: &str = "sans-serif";

pub(super) fn render_png(spec: &PlotSpec) -> Result<StagedImage, PlotError> {
    let path = spec.output.as_path();
    let (Some(x_range), Some(y_range)) = (spec.x_range(), spec.y_range()) else {
        return Err(PlotError::NoData {
            path: path.to_path_buf(),
        });
    };

    let (width, height) = spec.resolution.pixel_size();
    let scale = spec.resolution.scale();
    let mut buffer = vec![0u8; width as usize * height as usize * 3];

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        // Every plot starts from a blank surface.
        root.fill(&WHITE).map_err(|e| PlotError::render(path, e))?;

        let mut builder = ChartBuilder::on(&root);
        builder
            .margin(px(10.0, scale))
            .caption(&spec.title, (FONT, 20.0 * scale))
            .x_label_area_size(px(40.0, scale))
            .y_label_area_size(px(70.0, scale));

        match spec.y_scale {
            AxisScale::Linear => {
                let chart = builder
                    .build_cartesian_2d(x_range, y_range)
                    .map_err(|e| PlotError::render(path, e))?;
                draw_curves(chart, spec, scale)?;
            }
            AxisScale::Log => {
                let chart = builder
                    .build_cartesian_2d(x_range, y_range.log_scale())
                    .map_err(|e| PlotError::render(path, e))?;
                draw_curves(chart, spec, scale)?;
            }
        }

        root.present().map_err(|e| PlotError::render(path, e))?;
    }

    encode_png(path, width, height, buffer)
}

fn draw_curves<'a, 'b: 'a, Y>(
    mut chart: ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, Y>>,
    spec: &PlotSpec,
    scale: f64,
) -> Result<(), PlotError>
where
    Y: Ranged<ValueType = f64> + ValueFormatter<f64>,
{
    let path = spec.output.as_path();
    let label_font = (FONT, 12.0 * scale);

    {
        let mut mesh = chart.configure_mesh();
        mesh.x_desc(spec.x_desc.as_str())
            .y_desc(spec.y_desc.as_str())
            .label_style(label_font)
            .axis_desc_style((FONT, 14.0 * scale));
        if !spec.grid {
            mesh.disable_mesh();
        }
        mesh.draw().map_err(|e| PlotError::render(path, e))?;
    }

    let stroke = px(1.5, scale);
    for curve in &spec.curves {
        let color = curve.color;
        chart
            .draw_series(LineSeries::new(
                curve.drawable_points(spec.y_scale),
                color.stroke_width(stroke),
            ))
            .map_err(|e| PlotError::render(path, e))?
            .label(curve.label.as_str())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(stroke))
            });
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(label_font)
        .draw()
        .map_err(|e| PlotError::render(path, e))?;

    Ok(())
}

fn encode_png(
    path: &Path,
    width: u32,
    height: u32,
    buffer: Vec<u8>,
) -> Result<StagedImage, PlotError> {
    let image = image::RgbImage::from_raw(width, height, buffer)
        .ok_or_else(|| PlotError::render(path, "pixel buffer does not match image size"))?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::Builder::new()
        .prefix(".gaugeplot-")
        .suffix(".png")
        .tempfile_in(dir)
        .map_err(|source| PlotError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

    image
        .write_to(&mut tmp, image::ImageFormat::Png)
        .map_err(|source| PlotError::Encode {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(StagedImage {
        file: tmp,
        destination: path.to_path_buf(),
        size: (width, height),
    })
}

fn px(base: f64, scale: f64) -> u32 {
    (base * scale).round().max(1.0) as u32
}
