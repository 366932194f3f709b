// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::path::{Path, PathBuf};

use boxcrop_core::error::BoxcropError;
use boxcrop_core::im::{BoundingBox, CropImage};
use boxcrop_core::ut;

use super::{CropConfig, RunSummary};

/// Crop a single image to the bounding box of its annotation
///
/// Steps run in a fixed order and the first failing step decides the
/// error: decode, annotation lookup, annotation parsing, bounding box
/// validation, then encoding to `output_dir/<image file name>`.
///
/// # Arguments
///
/// * `image_path` - Source image
/// * `annotation_dir` - Annotation subfolder mirroring the image's subfolder
/// * `output_dir` - Output subfolder, which must already exist
pub fn crop_image(
    image_path: &Path,
    annotation_dir: &Path,
    output_dir: &Path,
) -> Result<PathBuf, BoxcropError> {
    let (image, format) = CropImage::open_with_format(image_path)?;

    let file_name = image_path.file_name().ok_or_else(|| {
        BoxcropError::ImageDecodeError(image_path.into(), "Path has no file name".to_string())
    })?;

    let annotation_path = ut::path::find_annotation(annotation_dir, file_name).ok_or_else(|| {
        BoxcropError::AnnotationMissing(annotation_dir.join(ut::path::base_name(file_name)))
    })?;

    let bounding_box = BoundingBox::open(&annotation_path)?;

    let width = image.width();
    let height = image.height();

    if !bounding_box.is_within(width, height) {
        return Err(BoxcropError::BoundingBoxInvalid(
            image_path.into(),
            bounding_box.as_xyxy(),
        ));
    }

    let (x, y, w, h) = bounding_box.region(width, height);

    let output_path = output_dir.join(file_name);

    image
        .crop(x, y, w, h)
        .map_err(|err| BoxcropError::ImageWriteError(output_path.clone(), err.to_string()))?
        .save(&output_path, format)?;

    Ok(output_path)
}

/// Crop every image of every subfolder shared by the image and annotation trees
///
/// Per-image failures and subfolder mismatches are logged and collected in
/// the returned summary. Failing to read a root or image subfolder, or to
/// create an output directory, aborts the run.
///
/// # Arguments
///
/// * `config` - Image, annotation and output roots
pub fn run(config: &CropConfig) -> Result<RunSummary, BoxcropError> {
    let output = ut::path::create_directory(&config.output_dir)?;

    let subfolders = ut::path::match_subfolders(&config.images_dir, &config.annotations_dir)?;

    let mut summary = RunSummary::default();

    for name in subfolders
        .images_only
        .iter()
        .chain(subfolders.annotations_only.iter())
    {
        let err = BoxcropError::StructureMismatch(name.to_string_lossy().into_owned());
        ut::track::progress_log(&err.to_string(), config.verbose);
        summary.mismatched.push(err);
    }

    for name in subfolders.matched.iter() {
        let image_dir = config.images_dir.join(name);
        let annotation_dir = config.annotations_dir.join(name);
        let output_dir = ut::path::create_directory(output.join(name))?;

        for image_path in ut::path::collect_entries(&image_dir)? {
            match crop_image(&image_path, &annotation_dir, &output_dir) {
                Ok(output_path) => {
                    ut::track::progress_log(
                        &format!("Cropped image saved to: {}", output_path.display()),
                        config.verbose,
                    );
                    summary.saved.push(output_path);
                }
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    ut::track::progress_log(&err.to_string(), config.verbose);
                    summary.skipped.push((image_path, err));
                }
            }
        }
    }

    ut::track::progress_log(&summary.report(), config.verbose);

    Ok(summary)
}
