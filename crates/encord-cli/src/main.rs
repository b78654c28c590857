// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

use clap::{Parser, Subcommand, ValueEnum};
use encord_client::{
    BackendChoice, ChainApproximation, CodecSettings, Error,
    bitmask::{BitmaskCodec, EncodedBitmask, rle_area, rle_len, string_to_rle},
    coco::{CocoRle, ContourTracer, rle_to_polygons_coordinates_with},
};
use log::{debug, info};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Codec settings file (TOML, JSON or YAML)
    #[clap(long, env = "ENCORD_CODEC_CONFIG")]
    config: Option<PathBuf>,

    /// Override the configured codec backend
    #[clap(long, value_enum)]
    backend: Option<BackendArg>,

    /// Mask Command
    #[command(subcommand)]
    cmd: Command,
}

#[derive(ValueEnum, PartialEq, Eq, Clone, Copy, Debug)]
enum BackendArg {
    Auto,
    Scalar,
    Parallel,
}

impl From<BackendArg> for BackendChoice {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Auto => BackendChoice::Auto,
            BackendArg::Scalar => BackendChoice::Scalar,
            BackendArg::Parallel => BackendChoice::Parallel,
        }
    }
}

#[derive(ValueEnum, PartialEq, Eq, Clone, Copy, Debug)]
enum ApproximationArg {
    Simple,
    None,
}

impl From<ApproximationArg> for ChainApproximation {
    fn from(arg: ApproximationArg) -> Self {
        match arg {
            ApproximationArg::Simple => ChainApproximation::Simple,
            ApproximationArg::None => ChainApproximation::None,
        }
    }
}

#[derive(Subcommand, PartialEq, Clone, Debug)]
enum Command {
    /// Encode a mask into a COCO RLE string.  PNG inputs are detected by
    /// extension and any non-zero pixel is foreground; other files are read
    /// as raw row-major bytes.  The result is printed as an Encord bitmask
    /// JSON object.
    Encode {
        /// Mask file
        input: PathBuf,

        /// Mask height for raw inputs, defaults to 1
        #[clap(long)]
        height: Option<u32>,

        /// Mask width for raw inputs, defaults to the file length
        #[clap(long)]
        width: Option<u32>,

        /// Print a column-major COCO RLE object instead
        #[clap(long)]
        coco: bool,
    },
    /// Decode a COCO RLE string into a mask file.  Writes a PNG with
    /// foreground set to 255 when the output ends in `.png`, otherwise raw
    /// 0/1 bytes.
    Decode {
        /// COCO RLE string
        rle: String,

        /// Mask height
        #[clap(long)]
        height: u32,

        /// Mask width
        #[clap(long)]
        width: u32,

        /// Output file
        #[clap(long, short)]
        output: PathBuf,
    },
    /// Trace a COCO RLE mask into polygons normalised to [0, 1].
    Polygons {
        /// COCO RLE string
        rle: String,

        /// Mask height
        #[clap(long)]
        height: u32,

        /// Mask width
        #[clap(long)]
        width: u32,

        /// Override the configured chain approximation
        #[clap(long, value_enum)]
        approximation: Option<ApproximationArg>,
    },
    /// Convert a COCO RLE object (JSON file with `size` and `counts`) into an
    /// Encord bitmask.
    FromCoco {
        /// COCO RLE JSON file
        input: PathBuf,
    },
    /// Transpose a raw `rows x cols` byte buffer.
    Transpose {
        /// Input file
        input: PathBuf,

        /// Output file
        #[clap(long, short)]
        output: PathBuf,

        /// Rows of the input buffer
        #[clap(long)]
        rows: usize,

        /// Columns of the input buffer
        #[clap(long)]
        cols: usize,
    },
    /// Show the run lengths and area of a COCO RLE string.
    Info {
        /// COCO RLE string
        rle: String,
    },
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn read_png(path: &Path) -> Result<(Vec<u8>, u32, u32), Error> {
    let image = image::open(path)
        .map_err(|e| Error::InvalidMask(format!("cannot read {}: {}", path.display(), e)))?
        .into_luma8();
    let (width, height) = image.dimensions();
    let mask = image.into_raw().into_iter().map(|v| (v != 0) as u8).collect();
    Ok((mask, height, width))
}

fn is_png(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("png"))
}

fn mask_len(height: u32, width: u32) -> Result<usize, Error> {
    (height as usize)
        .checked_mul(width as usize)
        .ok_or_else(|| Error::InvalidParameters(format!("{}x{} mask is too large", height, width)))
}

fn handle_encode(
    codec: &BitmaskCodec,
    input: PathBuf,
    height: Option<u32>,
    width: Option<u32>,
    coco: bool,
) -> Result<(), Error> {
    let (mask, height, width) = if is_png(&input) {
        read_png(&input)?
    } else {
        let mask = std::fs::read(&input)?;
        let len = u32::try_from(mask.len()).map_err(|_| {
            Error::InvalidParameters(format!("{} is too large", input.display()))
        })?;
        let height = height.unwrap_or(1);
        let width = width.unwrap_or(len / height.max(1));
        (mask, height, width)
    };

    let expected = mask_len(height, width)?;
    if mask.len() != expected {
        return Err(Error::ShapeMismatch {
            expected,
            actual: mask.len(),
        });
    }
    debug!("Encoding {}x{} mask from {:?}", height, width, input);

    let bitmask = EncodedBitmask {
        top: 0,
        left: 0,
        height,
        width,
        rle_string: codec.serialise(&mask),
    };
    if coco {
        print_json(&CocoRle::from_encord_with(&bitmask, codec)?)
    } else {
        print_json(&bitmask)
    }
}

fn handle_decode(
    codec: &BitmaskCodec,
    rle: String,
    height: u32,
    width: u32,
    output: PathBuf,
) -> Result<(), Error> {
    let mask = codec.deserialise(&rle, mask_len(height, width)?)?;
    if is_png(&output) {
        let pixels = mask.iter().map(|&v| v * 255).collect();
        let image = image::GrayImage::from_raw(width, height, pixels)
            .ok_or_else(|| Error::InvalidMask(format!("cannot build {}x{} image", width, height)))?;
        image
            .save(&output)
            .map_err(|e| Error::InvalidMask(format!("cannot write {}: {}", output.display(), e)))?;
    } else {
        std::fs::write(&output, &mask)?;
    }
    info!("Wrote {}x{} mask to {:?}", height, width, output);
    Ok(())
}

fn handle_polygons(
    codec: &BitmaskCodec,
    tracer: ContourTracer,
    rle: String,
    height: u32,
    width: u32,
    approximation: Option<ApproximationArg>,
) -> Result<(), Error> {
    let tracer = match approximation {
        Some(approximation) => tracer.with_approximation(approximation.into()),
        None => tracer,
    };
    let coords = rle_to_polygons_coordinates_with(&rle, height, width, codec, &tracer)?;
    print_json(&coords)
}

fn handle_from_coco(codec: &BitmaskCodec, input: PathBuf) -> Result<(), Error> {
    let value: serde_json::Value = serde_json::from_slice(&std::fs::read(&input)?)?;
    let coco = CocoRle::from_json(&value)?;
    print_json(&coco.to_encord_with(codec)?)
}

fn handle_transpose(
    codec: &BitmaskCodec,
    input: PathBuf,
    output: PathBuf,
    rows: usize,
    cols: usize,
) -> Result<(), Error> {
    let data = std::fs::read(&input)?;
    let transposed = codec.transpose(&data, (rows, cols))?;
    std::fs::write(&output, transposed)?;
    info!("Transposed {}x{} buffer into {:?}", rows, cols, output);
    Ok(())
}

fn handle_info(rle: String) -> Result<(), Error> {
    let counts = string_to_rle(&rle)?;
    let pixels = rle_len(&counts)
        .ok_or_else(|| Error::MalformedRle("run lengths overflow u64".to_owned()))?;
    print_json(&serde_json::json!({
        "runs": counts.len(),
        "pixels": pixels,
        "area": rle_area(&counts),
        "counts": counts,
    }))
}

fn main() -> Result<(), Error> {
    // The tracing subscriber forwards `log` records itself.
    #[cfg(feature = "profiling")]
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    #[cfg(not(feature = "profiling"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut settings = CodecSettings::load(args.config.as_deref())?;
    if let Some(backend) = args.backend {
        settings.backend = backend.into();
    }

    let codec = BitmaskCodec::from_settings(&settings)?;
    let tracer = ContourTracer::from_settings(&settings);

    #[cfg(feature = "profiling")]
    let _span = tracing::info_span!("command", backend = %codec.backend()).entered();

    match args.cmd {
        Command::Encode {
            input,
            height,
            width,
            coco,
        } => handle_encode(&codec, input, height, width, coco),
        Command::Decode {
            rle,
            height,
            width,
            output,
        } => handle_decode(&codec, rle, height, width, output),
        Command::Polygons {
            rle,
            height,
            width,
            approximation,
        } => handle_polygons(&codec, tracer, rle, height, width, approximation),
        Command::FromCoco { input } => handle_from_coco(&codec, input),
        Command::Transpose {
            input,
            output,
            rows,
            cols,
        } => handle_transpose(&codec, input, output, rows, cols),
        Command::Info { rle } => handle_info(rle),
    }
}
