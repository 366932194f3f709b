// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub enum BoxcropError {
    StructureMismatch(String),
    AnnotationMissing(PathBuf),
    AnnotationMalformed(PathBuf, String),
    BoundingBoxInvalid(PathBuf, [i64; 4]),
    ImageDecodeError(PathBuf, String),
    ImageWriteError(PathBuf, String),
    BufferError(String),
    DirError(String),
}

impl BoxcropError {
    /// Errors that must abort a run rather than skip a single item
    pub fn is_fatal(&self) -> bool {
        matches!(self, BoxcropError::DirError(_))
    }
}

impl fmt::Display for BoxcropError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BoxcropError::StructureMismatch(subfolder) => {
                write!(
                    f,
                    "[boxcrop::StructureMismatch] Skipping {}: subfolder missing in images or annotations.",
                    subfolder
                )
            }
            BoxcropError::AnnotationMissing(path) => {
                write!(
                    f,
                    "[boxcrop::AnnotationMissing] Annotation file {} not found. Skipping.",
                    path.display()
                )
            }
            BoxcropError::AnnotationMalformed(path, message) => {
                write!(
                    f,
                    "[boxcrop::AnnotationMalformed] Annotation file {} could not be parsed. {}. Skipping.",
                    path.display(),
                    message
                )
            }
            BoxcropError::BoundingBoxInvalid(path, [xmin, ymin, xmax, ymax]) => {
                write!(
                    f,
                    "[boxcrop::BoundingBoxInvalid] Invalid bounding box for {}: ({}, {}, {}, {}). Skipping.",
                    path.display(),
                    xmin,
                    ymin,
                    xmax,
                    ymax
                )
            }
            BoxcropError::ImageDecodeError(path, message) => {
                write!(
                    f,
                    "[boxcrop::ImageDecodeError] Image {} could not be loaded. {}. Skipping.",
                    path.display(),
                    message
                )
            }
            BoxcropError::ImageWriteError(path, message) => {
                write!(
                    f,
                    "[boxcrop::ImageWriteError] Failed to write image {}. {}.",
                    path.display(),
                    message
                )
            }
            BoxcropError::BufferError(message) => {
                write!(f, "[boxcrop::BufferError] {}.", message)
            }
            BoxcropError::DirError(message) => {
                write!(
                    f,
                    "[boxcrop::DirError] Directory could not be read or created. {}.",
                    message
                )
            }
        }
    }
}

impl std::error::Error for BoxcropError {}
