use criterion::{Criterion, black_box, criterion_group, criterion_main};
use sa_ascii::compositor::Compositor;
use sa_ascii::style::catalog;
use sa_core::frame::FrameBuffer;

fn gradient_frame(width: u32, height: u32) -> FrameBuffer {
    let mut frame = FrameBuffer::new(width, height);
    for (i, px) in frame.data.chunks_exact_mut(4).enumerate() {
        let x = (i as u32 % width) * 255 / width.max(1);
        let y = (i as u32 / width) * 255 / height.max(1);
        px.copy_from_slice(&[x as u8, y as u8, 128, 255]);
    }
    frame
}

fn bench_compositor(c: &mut Criterion) {
    let frame = gradient_frame(1280, 720);
    for name in ["colored", "grayscale", "sketch"] {
        let Ok(style) = catalog().get(name) else {
            continue;
        };
        let Ok(compositor) = Compositor::new(style, 3) else {
            continue;
        };
        c.bench_function(&format!("compositor_720p_{name}"), |b| {
            b.iter(|| compositor.process(black_box(&frame)));
        });
    }
}

criterion_group!(benches, bench_compositor);
criterion_main!(benches);
