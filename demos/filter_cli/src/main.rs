use argh::FromArgs;
use std::path::PathBuf;

use pixconv::{
    image::Rgb8Image,
    imgproc::{
        filter::{self, FilterConfig, FilterKind},
        parallel,
    },
};

#[derive(FromArgs)]
/// Apply a convolution filter to an image
struct Args {
    /// path to the input image
    #[argh(positional)]
    input: Option<PathBuf>,

    /// path to write the filtered image to
    #[argh(positional)]
    output: Option<PathBuf>,

    /// the filter to apply: gaussian, edge or sharpen
    #[argh(option, short = 'f')]
    filter: Option<FilterKind>,

    /// the kernel size for the gaussian blur, even values are rounded up
    #[argh(option, short = 'k')]
    kernel_size: Option<usize>,

    /// the number of worker threads
    #[argh(option, short = 't')]
    threads: Option<usize>,

    /// a JSON file with the filter configuration, overridden by the options above
    #[argh(option)]
    config: Option<PathBuf>,

    /// list the available filters and thread counts and exit
    #[argh(switch)]
    list: bool,
}

fn load_config(args: &Args) -> Result<FilterConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => {
            let contents = std::fs::read_to_string(path)?;
            serde_json::from_str::<FilterConfig>(&contents)?.normalized()
        }
        None => FilterConfig::default(),
    };

    if let Some(kind) = args.filter {
        config = config.with_kind(kind);
    }
    if let Some(kernel_size) = args.kernel_size {
        config = config.with_kernel_size(kernel_size);
    }
    if let Some(threads) = args.threads {
        config = config.with_num_threads(threads);
    }

    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    if args.list {
        for kind in FilterKind::ALL {
            println!("filter: {kind}");
        }
        println!("threads: {:?}", parallel::thread_count_options());
        return Ok(());
    }

    let (Some(input), Some(output)) = (&args.input, &args.output) else {
        return Err("expected an input and an output path".into());
    };

    let config = load_config(&args)?;

    // decode the input as RGB8, dropping any alpha channel
    let rgb = image::open(input)?.into_rgb8();
    let (width, height) = rgb.dimensions();
    let src = Rgb8Image::new([width as usize, height as usize].into(), rgb.into_raw())?;

    log::info!(
        "Loaded image: {} ({})",
        input.display(),
        src.size()
    );

    let (dst, report) = filter::apply_filter_with_report(&src, &config)?;
    println!("{report}");

    let out = image::RgbImage::from_raw(width, height, dst.into_vec())
        .ok_or("filtered buffer does not match the image size")?;
    out.save(output)?;

    log::info!("Image saved: {}", output.display());

    Ok(())
}
