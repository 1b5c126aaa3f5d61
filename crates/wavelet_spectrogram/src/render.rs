use clap::ValueEnum;
use cwt::Matrix;
use image::{Rgb, RgbImage};

/// Entries in a baked colormap.
pub const LUT_SIZE: usize = 256;

/// Maps `t` in `[0, 1]` to a color whose perceived intensity grows with `t`.
pub trait ColorMap {
    fn color(&self, t: f64) -> [u8; 3];
}

/// Built in colormaps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Colormap {
    /// Black to white.
    Grey,
    /// Black through red and yellow to white.
    Hot,
    #[default]
    Viridis,
}

const GREY: &[[u8; 3]] = &[[0, 0, 0], [255, 255, 255]];
const HOT: &[[u8; 3]] = &[[0, 0, 0], [230, 0, 0], [255, 210, 0], [255, 255, 255]];
const VIRIDIS: &[[u8; 3]] = &[
    [68, 1, 84],
    [59, 82, 139],
    [33, 145, 140],
    [94, 201, 98],
    [253, 231, 37],
];

impl Colormap {
    /// Evenly spaced colors the map interpolates between.
    #[must_use]
    pub fn stops(&self) -> &'static [[u8; 3]] {
        match self {
            Colormap::Grey => GREY,
            Colormap::Hot => HOT,
            Colormap::Viridis => VIRIDIS,
        }
    }

    /// The map baked into a lookup table.
    #[must_use]
    pub fn lut(&self) -> ColorLut {
        ColorLut::new(self)
    }
}

impl ColorMap for Colormap {
    fn color(&self, t: f64) -> [u8; 3] {
        let stops = self.stops();
        let position = t.clamp(0.0, 1.0) * (stops.len() - 1) as f64;
        let lower = (position.floor() as usize).min(stops.len() - 2);
        let fraction = position - lower as f64;
        let (from, to) = (stops[lower], stops[lower + 1]);
        let mut out = [0; 3];
        for ((channel, from), to) in out.iter_mut().zip(from).zip(to) {
            *channel = (f64::from(from) + (f64::from(to) - f64::from(from)) * fraction).round() as u8;
        }
        out
    }
}

/// Precomputed colors of a [`ColorMap`].
#[derive(Debug, Clone)]
pub struct ColorLut {
    table: Vec<[u8; 3]>,
}

impl ColorLut {
    pub fn new(map: &impl ColorMap) -> Self {
        ColorLut {
            table: (0..LUT_SIZE)
                .map(|i| map.color(i as f64 / (LUT_SIZE - 1) as f64))
                .collect(),
        }
    }
}

impl ColorMap for ColorLut {
    fn color(&self, t: f64) -> [u8; 3] {
        let index = (t.clamp(0.0, 1.0) * (LUT_SIZE - 1) as f64).round() as usize;
        self.table[index]
    }
}

/// Perceived luminance (Rec. 601 weights).
#[must_use]
pub fn luminance([r, g, b]: [u8; 3]) -> f64 {
    0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b)
}

/// One pixel per cell. Values are scaled so the smallest is 0 and the largest 1 before coloring.
/// A flat matrix is drawn at 0. Row 0 becomes the top of the image.
#[must_use]
pub fn render(magnitude: &Matrix<f64>, map: &impl ColorMap) -> RgbImage {
    let (min, max) = magnitude
        .data()
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &x| {
            (min.min(x), max.max(x))
        });
    let range = max - min;
    let (width, height) = (magnitude.cols() as u32, magnitude.rows() as u32);
    RgbImage::from_fn(width, height, |x, y| {
        let value = magnitude[(y as usize, x as usize)];
        let t = if range > 0.0 { (value - min) / range } else { 0.0 };
        Rgb(map.color(t))
    })
}
