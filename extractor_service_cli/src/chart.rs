use image::{ImageFormat, RgbImage};
use plotters::prelude::*;
use plotters::style::{register_font, FontStyle};
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::OnceLock;
use thiserror::Error;

pub const WIDTH: u32 = 1000;
pub const HEIGHT: u32 = 600;

const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);
const FONT_FAMILY: &str = "sans-serif";
const FONT_BYTES: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

static FONT: OnceLock<Result<(), String>> = OnceLock::new();

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("no values to plot")]
    NoData,
    #[error("could not load chart font: {0}")]
    Font(String),
    #[error("could not draw chart: {0}")]
    Draw(String),
    #[error("could not encode chart: {0}")]
    Encode(#[from] image::ImageError),
}

/// Frequency of each distinct value, most frequent first. Ties keep first-seen order.
pub fn value_counts<I>(values: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = String>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();

    for value in values {
        match index.get(&value) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(value.clone(), counts.len());
                counts.push((value, 1));
            }
        }
    }

    // stable sort keeps first-seen order among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

fn ensure_font() -> Result<(), ChartError> {
    FONT.get_or_init(|| {
        register_font(FONT_FAMILY, FontStyle::Normal, FONT_BYTES).map_err(|_| "InvalidFont".to_string())
    })
    .clone()
    .map_err(ChartError::Font)
}

/// Bar chart of `counts` titled after `column`, encoded as PNG.
pub fn render_bar_chart(column: &str, counts: &[(String, usize)]) -> Result<Vec<u8>, ChartError> {
    let max = counts.iter().map(|(_, n)| *n).max().unwrap_or(0);
    if max == 0 {
        return Err(ChartError::NoData);
    }
    ensure_font()?;

    let mut pixels = vec![0u8; (WIDTH * HEIGHT * 3) as usize];
    draw(&mut pixels, column, counts, max).map_err(|e| ChartError::Draw(e.to_string()))?;

    let img = RgbImage::from_raw(WIDTH, HEIGHT, pixels)
        .ok_or_else(|| ChartError::Draw("pixel buffer has the wrong size".into()))?;
    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(png)
}

fn draw(
    pixels: &mut [u8],
    column: &str,
    counts: &[(String, usize)],
    max: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::with_buffer(pixels, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Bar Chart of {}", column), (FONT_FAMILY, 28))
        .margin(20)
        .x_label_area_size(70)
        .y_label_area_size(60)
        .build_cartesian_2d((0..counts.len()).into_segmented(), 0..max + max / 20 + 1)?;

    let label = |x: &SegmentValue<usize>| match x {
        SegmentValue::CenterOf(i) => counts.get(*i).map(|(v, _)| v.clone()).unwrap_or_default(),
        _ => String::new(),
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(counts.len())
        .x_label_formatter(&label)
        .x_desc("Categories")
        .y_desc("Frequency")
        .label_style((FONT_FAMILY, 14))
        .axis_desc_style((FONT_FAMILY, 16))
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(SKY_BLUE.filled())
            .margin(10)
            .data(counts.iter().enumerate().map(|(i, (_, n))| (i, *n))),
    )?;

    root.present()?;
    Ok(())
}
