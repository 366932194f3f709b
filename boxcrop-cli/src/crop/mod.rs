// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::path::PathBuf;

use clap::Args;

use boxcrop_core::constant;

mod config;
mod pipeline;
mod summary;

pub use config::CropConfig;
pub use pipeline::{crop_image, run};
pub use summary::RunSummary;

#[derive(Debug, Args)]
#[command(about = "Crop every image in a folder tree to its annotated bounding box.")]
pub struct CropArgs {
    #[arg(
        short = 'i',
        long,
        help = "Image directory with one subfolder of images per class."
    )]
    pub images: PathBuf,

    #[arg(
        short = 'a',
        long,
        help = "Annotation directory mirroring the image subfolders."
    )]
    pub annotations: PathBuf,

    #[arg(
        short = 'o',
        long,
        help = "Output directory.",
        default_value = constant::DEFAULT_OUTPUT_DIR
    )]
    pub output: PathBuf,
}

pub fn crop(args: &CropArgs) {
    let config = CropConfig::from(args);

    if let Err(err) = run(&config) {
        eprintln!("[boxcrop::crop] ERROR: {}", err);
        std::process::exit(1);
    }
}
