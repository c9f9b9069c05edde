use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{DynamicImage, Rgb, RgbImage};
use tone_palette::{ColorDeriver, DominantColorExtractor, MedianCutExtractor, RgbColor};

fn gradient_image(size: u32) -> DynamicImage {
    let mut img = RgbImage::new(size, size);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let r = (x * 255 / size) as u8;
        let g = (y * 255 / size) as u8;
        let b = ((x + y) * 127 / size) as u8;
        *pixel = Rgb([r, g, b]);
    }
    DynamicImage::ImageRgb8(img)
}

fn benchmark_derivation(c: &mut Criterion) {
    let deriver = ColorDeriver::new();
    c.bench_function("derive_palette", |b| {
        b.iter(|| deriver.derive(black_box(RgbColor::new(100, 150, 200))))
    });
}

fn benchmark_extraction(c: &mut Criterion) {
    let image = gradient_image(512);
    let default = MedianCutExtractor::new();
    let full = MedianCutExtractor::with_params(1, 5, true);

    c.bench_function("extract_dominant_512_quality_10", |b| {
        b.iter(|| default.extract_dominant_color(black_box(&image)))
    });
    c.bench_function("extract_dominant_512_quality_1", |b| {
        b.iter(|| full.extract_dominant_color(black_box(&image)))
    });
}

criterion_group!(benches, benchmark_derivation, benchmark_extraction);
criterion_main!(benches);
