use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use bigtiff_memprobe::image_pipeline::{
    ConversionConfig, DEFAULT_RESCALE_DIVISOR, MemoryLog, MemoryProbe, NoProgress, Page,
    PageReader, PageWriter, Result, StreamingConverter, gradient_pattern, rescale_page,
};

struct RepeatReader {
    page: Page<u16>,
    count: usize,
}

impl PageReader for RepeatReader {
    fn page_count(&self) -> usize {
        self.count
    }

    fn read_page(&mut self, _index: usize) -> Result<Page<u16>> {
        Ok(self.page.clone())
    }
}

struct DiscardWriter;

impl PageWriter for DiscardWriter {
    fn write_page_u16(&mut self, page: &Page<u16>) -> Result<()> {
        black_box(page);
        Ok(())
    }

    fn write_page_u8(&mut self, page: &Page<u8>) -> Result<()> {
        black_box(page);
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

struct ZeroProbe;

impl MemoryProbe for ZeroProbe {
    fn resident_bytes(&mut self) -> Option<u64> {
        Some(0)
    }
}

fn benchmark_rescale_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("rescale_by_size");

    let sizes = vec![
        (256, 256, "256x256"),
        (1024, 1024, "1024x1024"),
        (2048, 2048, "2048x2048"),
    ];

    for (height, width, label) in sizes {
        let page = gradient_pattern(height, width).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(label), &page, |b, page| {
            b.iter(|| rescale_page(black_box(page), DEFAULT_RESCALE_DIVISOR).unwrap());
        });
    }

    group.finish();
}

fn benchmark_gradient_pattern(c: &mut Criterion) {
    c.bench_function("gradient_pattern_2048x2048", |b| {
        b.iter(|| gradient_pattern(black_box(2048), black_box(2048)).unwrap());
    });
}

fn benchmark_streaming_loop(c: &mut Criterion) {
    let mut group = c.benchmark_group("streaming_loop");
    let page = gradient_pattern(512, 512).unwrap();

    for interval in [1usize, 10, 100] {
        group.bench_with_input(
            BenchmarkId::new("sample_interval", interval),
            &interval,
            |b, &interval| {
                let config = ConversionConfig::builder().sample_interval(interval).build();
                let mut converter = StreamingConverter::with_probe(config, ZeroProbe).unwrap();

                b.iter(|| {
                    let mut reader = RepeatReader {
                        page: page.clone(),
                        count: 100,
                    };
                    let log: MemoryLog = converter
                        .convert(&mut reader, &mut DiscardWriter, &mut NoProgress)
                        .unwrap();
                    black_box(log)
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_rescale_sizes,
    benchmark_gradient_pattern,
    benchmark_streaming_loop
);
criterion_main!(benches);
