use criterion::{Criterion, black_box, criterion_group, criterion_main};
use sa_core::frame::{AsciiCell, AsciiGrid};
use sa_export::rasterizer::{GlyphAtlas, Rasterizer};

fn bench_rasterizer(c: &mut Criterion) {
    let ramp = " .:-=+*#%@";
    let masks = ramp.chars().enumerate().map(|(i, ch)| {
        let mask = (0..7 * 12).map(|p| ((p * 37 + i * 29) % 256) as u8).collect();
        (ch, mask)
    });
    let Ok(atlas) = GlyphAtlas::from_masks(7, 12, masks) else {
        return;
    };
    let rasterizer = Rasterizer::new(atlas);

    // 1280x720 source, blocs de 3 px
    let mut grid = AsciiGrid::new(427, 240);
    let glyphs: Vec<char> = ramp.chars().collect();
    for (i, cell) in grid.cells.iter_mut().enumerate() {
        *cell = AsciiCell {
            ch: glyphs[i % glyphs.len()],
            fg: ((i % 256) as u8, 128, 64),
        };
    }

    c.bench_function("rasterizer_427x240", |b| {
        b.iter(|| rasterizer.render(black_box(&grid), (0, 0, 0)));
    });
}

criterion_group!(benches, bench_rasterizer);
criterion_main!(benches);
