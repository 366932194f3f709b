// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::path::PathBuf;

use boxcrop_core::constant::DEFAULT_OUTPUT_DIR;

use super::CropArgs;

/// Paths and switches for a single cropping run
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use boxcrop_cli::crop::CropConfig;
///
/// let config = CropConfig::new("images", "annotations");
/// assert_eq!(config.output_dir, PathBuf::from("cropped"));
///
/// let config = config.with_output("out").quiet();
/// assert_eq!(config.output_dir, PathBuf::from("out"));
/// assert!(!config.verbose);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CropConfig {
    pub images_dir: PathBuf,
    pub annotations_dir: PathBuf,
    pub output_dir: PathBuf,
    pub verbose: bool,
}

impl CropConfig {
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(images_dir: P, annotations_dir: Q) -> Self {
        Self {
            images_dir: images_dir.into(),
            annotations_dir: annotations_dir.into(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            verbose: true,
        }
    }

    pub fn with_output<P: Into<PathBuf>>(mut self, output_dir: P) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Disable per-file console output
    pub fn quiet(mut self) -> Self {
        self.verbose = false;
        self
    }
}

impl From<&CropArgs> for CropConfig {
    fn from(args: &CropArgs) -> Self {
        CropConfig::new(&args.images, &args.annotations).with_output(&args.output)
    }
}
