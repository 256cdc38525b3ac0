use anyhow::Context;
use bigtiff_memprobe::image_pipeline::{
    ConsoleProgress, ConversionConfig, GeneratorConfig, ProgressSink, StreamingConverter,
    SyntheticGenerator, TracingProgress,
};
use bigtiff_memprobe::logger;

use tracing::{Level, info};

const GENERATED_PATH: &str = "test_16gb.tif";
const CONVERTED_PATH: &str = "output_8bit.tif";
const TARGET_SIZE_GB: f64 = 16.0;
const CHUNK_SHAPE: (usize, usize) = (2048, 2048);

/// Structured progress records under debug logging, a single console line otherwise.
fn progress_sink(console: fn() -> ConsoleProgress, unit: &'static str) -> Box<dyn ProgressSink> {
    if tracing::enabled!(Level::DEBUG) {
        Box::new(TracingProgress::new(unit))
    } else {
        Box::new(console())
    }
}

fn main() -> anyhow::Result<()> {
    logger::init();

    info!("Starting bigtiff_memprobe...");

    let generator_config = GeneratorConfig::builder()
        .target_size_gb(TARGET_SIZE_GB)
        .chunk_shape(CHUNK_SHAPE.0, CHUNK_SHAPE.1)
        .build();
    info!(
        pages = generator_config.page_count(),
        chunk_bytes = generator_config.chunk_bytes(),
        "Generator configured"
    );

    let generated = SyntheticGenerator::new(generator_config)?
        .generate(GENERATED_PATH, progress_sink(ConsoleProgress::chunks, "chunks").as_mut())
        .with_context(|| format!("generating {}", GENERATED_PATH))?;
    println!("Created test TIFF: {:.2} GB", generated.output_gb());

    let converted = StreamingConverter::new(ConversionConfig::default())?
        .convert_file(
            GENERATED_PATH,
            CONVERTED_PATH,
            progress_sink(ConsoleProgress::pages, "pages").as_mut(),
        )
        .with_context(|| format!("converting {} to {}", GENERATED_PATH, CONVERTED_PATH))?;
    println!("Created output TIFF: {:.2} GB", converted.output_gb());

    println!("{}", converted.memory_log);
    converted.memory_log.print_summary();

    Ok(())
}
