//! Modified median cut quantization (MMCQ)
//!
//! Pixels are reduced to 5 bits per channel and counted in a 32x32x32
//! histogram. Boxes over that histogram are split at the median of their
//! longest axis, first by pixel count and then by count x volume, until the
//! requested number of colors exists. Each box's color is the
//! population-weighted average of its cells.
//!
//! The dominant color is the first palette entry, boxes being ordered by
//! count x volume descending.

use image::DynamicImage;
use tracing::debug;

use crate::color::RgbColor;
use crate::config::ExtractionConfig;
use crate::constants::quantize::{
    AXIS_CELLS, DEFAULT_COLOR_COUNT, DEFAULT_QUALITY, FRACT_BY_POPULATION, MAX_COLOR_COUNT,
    MAX_ITERATIONS, MIN_ALPHA, MIN_COLOR_COUNT, RSHIFT, SIGBITS, WHITE_THRESHOLD,
};
use crate::extraction::DominantColorExtractor;
use crate::{AnalysisError, Result};

const HISTOGRAM_SIZE: usize = 1 << (3 * SIGBITS);

/// One quantized color and the number of sampled pixels it stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteEntry {
    pub color: RgbColor,
    pub population: u64,
}

/// MMCQ-based extractor
#[derive(Debug, Clone)]
pub struct MedianCutExtractor {
    quality: u32,
    color_count: usize,
    ignore_white: bool,
}

impl Default for MedianCutExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl MedianCutExtractor {
    /// Create an extractor with default parameters
    pub fn new() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            color_count: DEFAULT_COLOR_COUNT,
            ignore_white: true,
        }
    }

    /// Create an extractor with custom parameters
    ///
    /// `quality` below 1 is treated as 1; `color_count` is clamped to 2..=20.
    pub fn with_params(quality: u32, color_count: usize, ignore_white: bool) -> Self {
        Self {
            quality: quality.max(1),
            color_count: color_count.clamp(MIN_COLOR_COUNT, MAX_COLOR_COUNT),
            ignore_white,
        }
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::with_params(config.quality, config.color_count, config.ignore_white)
    }

    /// Quantized palette of the image, most representative first
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError` if no pixel survives sampling
    pub fn palette(&self, image: &DynamicImage) -> Result<Vec<PaletteEntry>> {
        let pixels = self.sample_pixels(image);
        if pixels.is_empty() {
            return Err(AnalysisError::ExtractionError {
                reason: "image has no opaque, non-white pixels".into(),
            });
        }

        let palette = quantize(&pixels, self.color_count);
        debug!(
            sampled = pixels.len(),
            colors = palette.len(),
            width = image.width(),
            height = image.height(),
            "quantized image palette"
        );
        Ok(palette)
    }

    /// Every `quality`-th pixel, skipping transparent and (optionally) white ones
    fn sample_pixels(&self, image: &DynamicImage) -> Vec<[u8; 3]> {
        let rgba = image.to_rgba8();
        rgba.pixels()
            .step_by(self.quality as usize)
            .filter_map(|pixel| {
                let [r, g, b, a] = pixel.0;
                let is_white =
                    r > WHITE_THRESHOLD && g > WHITE_THRESHOLD && b > WHITE_THRESHOLD;
                (a >= MIN_ALPHA && !(self.ignore_white && is_white)).then_some([r, g, b])
            })
            .collect()
    }
}

impl DominantColorExtractor for MedianCutExtractor {
    fn extract_dominant_color(&self, image: &DynamicImage) -> Result<RgbColor> {
        self.palette(image)?
            .first()
            .map(|entry| entry.color)
            .ok_or_else(|| AnalysisError::ExtractionError {
                reason: "quantization produced no colors".into(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Red,
    Green,
    Blue,
}

fn histogram_index(r: usize, g: usize, b: usize) -> usize {
    (r << (2 * SIGBITS)) + (g << SIGBITS) + b
}

/// Axis-aligned box over the quantized histogram, bounds inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct VBox {
    r: (usize, usize),
    g: (usize, usize),
    b: (usize, usize),
    count: u64,
}

impl VBox {
    fn new(r: (usize, usize), g: (usize, usize), b: (usize, usize), histogram: &[u64]) -> Self {
        let mut vbox = Self { r, g, b, count: 0 };
        vbox.count = vbox.cells().map(|(r, g, b)| histogram[histogram_index(r, g, b)]).sum();
        vbox
    }

    fn cells(&self) -> impl Iterator<Item = (usize, usize, usize)> {
        let (r, g, b) = (self.r, self.g, self.b);
        (r.0..=r.1).flat_map(move |ri| {
            (g.0..=g.1).flat_map(move |gi| (b.0..=b.1).map(move |bi| (ri, gi, bi)))
        })
    }

    fn range(&self, axis: Axis) -> (usize, usize) {
        match axis {
            Axis::Red => self.r,
            Axis::Green => self.g,
            Axis::Blue => self.b,
        }
    }

    fn width(&self, axis: Axis) -> usize {
        let (lo, hi) = self.range(axis);
        hi - lo + 1
    }

    fn volume(&self) -> u64 {
        (self.width(Axis::Red) * self.width(Axis::Green) * self.width(Axis::Blue)) as u64
    }

    /// Copy with one axis narrowed, count recomputed
    fn narrowed(&self, axis: Axis, range: (usize, usize), histogram: &[u64]) -> Self {
        let (mut r, mut g, mut b) = (self.r, self.g, self.b);
        match axis {
            Axis::Red => r = range,
            Axis::Green => g = range,
            Axis::Blue => b = range,
        }
        Self::new(r, g, b, histogram)
    }

    /// Longest axis, preferring red then green on ties
    fn longest_axis(&self) -> Axis {
        let (rw, gw, bw) = (self.width(Axis::Red), self.width(Axis::Green), self.width(Axis::Blue));
        if rw >= gw && rw >= bw {
            Axis::Red
        } else if gw >= bw {
            Axis::Green
        } else {
            Axis::Blue
        }
    }

    /// Population of the slab at `index` along `axis`
    fn slab_count(&self, axis: Axis, index: usize, histogram: &[u64]) -> u64 {
        self.narrowed(axis, (index, index), histogram).count
    }

    fn average(&self, histogram: &[u64]) -> RgbColor {
        let mult = f64::from(1u32 << RSHIFT);
        let (mut total, mut r_sum, mut g_sum, mut b_sum) = (0u64, 0.0, 0.0, 0.0);

        for (r, g, b) in self.cells() {
            let hits = histogram[histogram_index(r, g, b)];
            if hits == 0 {
                continue;
            }
            let weight = hits as f64;
            total += hits;
            r_sum += weight * (r as f64 + 0.5) * mult;
            g_sum += weight * (g as f64 + 0.5) * mult;
            b_sum += weight * (b as f64 + 0.5) * mult;
        }

        let channel = |value: f64| value.clamp(0.0, 255.0) as u8;
        if total > 0 {
            let n = total as f64;
            RgbColor::new(channel(r_sum / n), channel(g_sum / n), channel(b_sum / n))
        } else {
            let center = |(lo, hi): (usize, usize)| channel(mult * (lo + hi + 1) as f64 / 2.0);
            RgbColor::new(center(self.r), center(self.g), center(self.b))
        }
    }
}

/// Split a box at the median of its longest axis
///
/// Returns `None` for single-cell or empty boxes. Either half may come back
/// empty when the population sits at one end of the axis.
fn median_cut(vbox: &VBox, histogram: &[u64]) -> Option<(VBox, VBox)> {
    if vbox.count == 0 || vbox.volume() == 1 {
        return None;
    }

    let axis = vbox.longest_axis();
    let (lo, hi) = vbox.range(axis);

    let mut partial = [0u64; AXIS_CELLS];
    let mut total = 0;
    for i in lo..=hi {
        total += vbox.slab_count(axis, i, histogram);
        partial[i] = total;
    }

    let median = (lo..=hi).find(|&i| partial[i] * 2 > total)?;
    let left = median - lo;
    let right = hi - median;

    // cut towards the longer side, keeping both halves within bounds
    let mut cut = if left <= right {
        (median + right / 2).min(hi - 1)
    } else {
        median.saturating_sub(1 + left / 2).max(lo)
    };
    while cut < hi - 1 && partial[cut] == 0 {
        cut += 1;
    }
    while cut > lo && partial[cut] == total && partial[cut - 1] > 0 {
        cut -= 1;
    }

    Some((
        vbox.narrowed(axis, (lo, cut), histogram),
        vbox.narrowed(axis, (cut + 1, hi), histogram),
    ))
}

/// Split boxes by descending `priority` until `target` boxes exist
fn split_until(boxes: &mut Vec<VBox>, histogram: &[u64], target: usize, priority: fn(&VBox) -> u64) {
    let mut settled = Vec::new();
    let mut iterations = 0;

    while boxes.len() + settled.len() < target && iterations < MAX_ITERATIONS {
        iterations += 1;

        let Some(index) = boxes
            .iter()
            .enumerate()
            .max_by_key(|(_, vbox)| priority(vbox))
            .map(|(i, _)| i)
        else {
            break;
        };
        let vbox = boxes.swap_remove(index);

        match median_cut(&vbox, histogram) {
            Some((first, second)) => {
                boxes.extend([first, second].into_iter().filter(|half| half.count > 0));
            }
            None => settled.push(vbox),
        }
    }

    boxes.append(&mut settled);
}

/// Quantize pixels into at most `max_colors` colors, most representative first
fn quantize(pixels: &[[u8; 3]], max_colors: usize) -> Vec<PaletteEntry> {
    if pixels.is_empty() || max_colors == 0 {
        return Vec::new();
    }

    let mut histogram = vec![0u64; HISTOGRAM_SIZE];
    let (mut min, mut max) = ([usize::MAX; 3], [0usize; 3]);
    for pixel in pixels {
        let q = pixel.map(|c| usize::from(c >> RSHIFT));
        histogram[histogram_index(q[0], q[1], q[2])] += 1;
        for channel in 0..3 {
            min[channel] = min[channel].min(q[channel]);
            max[channel] = max[channel].max(q[channel]);
        }
    }

    let initial = VBox::new((min[0], max[0]), (min[1], max[1]), (min[2], max[2]), &histogram);
    let mut boxes = vec![initial];

    let population_target = (FRACT_BY_POPULATION * max_colors as f64).ceil() as usize;
    split_until(&mut boxes, &histogram, population_target, |vbox| vbox.count);
    split_until(&mut boxes, &histogram, max_colors, |vbox| vbox.count * vbox.volume());

    boxes.sort_by(|a, b| {
        (b.count * b.volume())
            .cmp(&(a.count * a.volume()))
            .then(b.count.cmp(&a.count))
    });

    boxes
        .iter()
        .map(|vbox| PaletteEntry {
            color: vbox.average(&histogram),
            population: vbox.count,
        })
        .collect()
}
