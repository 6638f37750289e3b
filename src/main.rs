use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::error;

use curate_iss_dataset::config::CurationConfig;
use curate_iss_dataset::core::{classify_tree, pipeline, remove_small_classes, split_partition};
use curate_iss_dataset::dataset::DatasetPartition;
use curate_iss_dataset::error::{CurationError, CurationResult};
use curate_iss_dataset::logging::setup_logging;
use curate_iss_dataset::preprocess::{
    convert_partition, resize_partition, Augmenter, ColorMode,
};

#[derive(Parser, Debug)]
#[command(
    name = "curate-iss-dataset",
    about = "Curate an ISS city-imagery dataset: classify, filter, convert and split"
)]
struct Cli {
    /// Optional JSON configuration overriding the built-in defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Delete daytime exposures from the training partition
    Classify {
        /// Dataset root containing the train/ partition
        root: PathBuf,
    },
    /// Remove training classes below the minimum population
    FilterClasses {
        /// Dataset root containing the train/ partition
        root: PathBuf,
    },
    /// Move a seeded random sample of each class into one target partition
    Split {
        /// Dataset root containing the train/ partition
        root: PathBuf,
        /// Target partition: validation or test
        target: String,
    },
    /// Resize the training partition into a mirrored output tree
    Resize {
        /// Dataset root containing the train/ partition
        root: PathBuf,
        /// Root of the resized output tree
        output: PathBuf,
    },
    /// Convert the training partition into another colour space
    Convert {
        /// Dataset root containing the train/ partition
        root: PathBuf,
        /// Root of the converted output tree
        output: PathBuf,
        /// Target colour space: hsv, lab, yuv or hls
        #[arg(long)]
        mode: String,
    },
    /// Write augmented variants of one image for visual inspection
    Augment {
        /// Source image
        image: PathBuf,
        /// Directory receiving the variants
        output: PathBuf,
        /// Number of variants to produce
        #[arg(long, default_value_t = 5)]
        count: usize,
        /// Optional RNG seed for reproducible variants
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Run the full curation sequence: classify, filter, split twice
    Curate {
        /// Dataset root containing the train/ partition
        root: PathBuf,
    },
}

fn run_command(command: Command, config: &CurationConfig) -> CurationResult<()> {
    match command {
        Command::Classify { root } => {
            let train_root = root.join(DatasetPartition::Train.as_str());
            let stats = classify_tree(&train_root, config.day_threshold)?;
            println!(
                "Classified {} images: {} deleted as daytime, {} retained, {} failed",
                stats.scanned, stats.deleted, stats.retained, stats.failed
            );
        }
        Command::FilterClasses { root } => {
            let train_root = root.join(DatasetPartition::Train.as_str());
            let stats = remove_small_classes(&train_root, config.min_class_population)?;
            println!(
                "Inspected {} classes: {} removed below {} images, {} failed",
                stats.inspected, stats.removed, config.min_class_population, stats.failed
            );
        }
        Command::Split { root, target } => {
            let target: DatasetPartition = target.parse()?;
            let stats =
                split_partition(&root, target, config.split_fraction, config.split_seed)?;
            println!(
                "Split {} classes into {}: {} images moved, {} failed",
                stats.classes,
                target.as_str(),
                stats.moved,
                stats.failed
            );
        }
        Command::Resize { root, output } => {
            let stats = resize_partition(
                &root,
                DatasetPartition::Train,
                &output,
                config.target_dimensions,
            )?;
            println!(
                "Resized {} images to {}x{}, {} failed",
                stats.resized, config.target_dimensions.0, config.target_dimensions.1, stats.failed
            );
        }
        Command::Convert { root, output, mode } => {
            let mode: ColorMode = mode.parse()?;
            let stats = convert_partition(&root, DatasetPartition::Train, &output, mode)?;
            println!(
                "Converted {} images to {}, {} failed",
                stats.converted,
                mode.as_str(),
                stats.failed
            );
        }
        Command::Augment {
            image,
            output,
            count,
            seed,
        } => {
            let img = image::open(&image)
                .map_err(|e| CurationError::Decode(image.clone(), e.to_string()))?
                .to_rgb8();
            std::fs::create_dir_all(&output)?;

            let stem = image
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("sample");
            let mut augmenter = match seed {
                Some(seed) => Augmenter::from_seed(seed),
                None => Augmenter::new(),
            };
            for i in 0..count {
                let variant = augmenter.apply(&img);
                let dest = output.join(format!("{}_aug_{:02}.png", stem, i));
                variant
                    .save(&dest)
                    .map_err(|e| CurationError::Io(std::io::Error::other(e.to_string())))?;
            }
            println!("Wrote {} augmented variants to {:?}", count, output);
        }
        Command::Curate { root } => {
            let summary = pipeline::run(&root, config)?;
            println!(
                "Curation finished: {} daytime images deleted, {} classes removed, \
                 {} images to validation, {} images to test",
                summary.classification.deleted,
                summary.filtering.removed,
                summary.validation_split.moved,
                summary.test_split.moved
            );
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    setup_logging();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => match CurationConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load config {:?}: {}", path, e);
                eprintln!("Failed to load config {:?}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => CurationConfig::default(),
    };

    match run_command(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Stage failed: {}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
