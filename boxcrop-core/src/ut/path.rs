// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::collections::BTreeSet;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::constant::ANNOTATION_EXTENSIONS;
use crate::error::BoxcropError;

/// Subfolder names of an image tree split by whether the annotation tree mirrors them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubfolderMatch {
    /// Directories present in both roots
    pub matched: Vec<OsString>,
    /// Entries of the image root with no annotation directory (or that are not directories)
    pub images_only: Vec<OsString>,
    /// Directories of the annotation root with no image directory
    pub annotations_only: Vec<OsString>,
}

/// Ensures a directory and all of its parents exist.
///
/// Existing directories are reused as-is so that reruns overwrite their
/// previous output.
///
/// # Arguments
///
/// * `directory` - Path to the directory
///
/// # Examples
///
/// ```
/// use boxcrop_core::ut::path::create_directory;
///
/// let root = tempfile::tempdir().unwrap();
/// let nested = root.path().join("cropped").join("dogs");
///
/// create_directory(&nested).unwrap();
/// create_directory(&nested).unwrap();
///
/// assert!(nested.is_dir());
/// ```
pub fn create_directory<P: AsRef<Path>>(directory: P) -> Result<PathBuf, BoxcropError> {
    let directory = directory.as_ref();

    std::fs::create_dir_all(directory).map_err(|err| {
        BoxcropError::DirError(format!("{}: {}", directory.display(), err))
    })?;

    Ok(directory.to_path_buf())
}

/// Collect every entry of a directory, sorted by name
///
/// # Arguments
///
/// * `directory` - Path to directory
pub fn collect_entries<P: AsRef<Path>>(directory: P) -> Result<Vec<PathBuf>, BoxcropError> {
    let directory = directory.as_ref();

    let read_dir = std::fs::read_dir(directory)
        .map_err(|err| BoxcropError::DirError(format!("{}: {}", directory.display(), err)))?;

    let mut entries = Vec::new();
    for entry in read_dir {
        let entry = entry
            .map_err(|err| BoxcropError::DirError(format!("{}: {}", directory.display(), err)))?;
        entries.push(entry.path());
    }

    entries.sort_unstable();

    Ok(entries)
}

/// Split the subfolders of an image root by whether an annotation root mirrors them
///
/// Every entry of the image root is considered. Anything that is not a
/// directory, or has no directory of the same name in the annotation root,
/// is a mismatch. Directories only found in the annotation root are also
/// mismatches. Plain files in the annotation root are ignored.
///
/// # Arguments
///
/// * `images` - Root of the image tree
/// * `annotations` - Root of the annotation tree
pub fn match_subfolders<P, Q>(images: P, annotations: Q) -> Result<SubfolderMatch, BoxcropError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let image_entries = collect_entries(&images)?;

    let annotation_dirs: BTreeSet<OsString> = collect_entries(&annotations)?
        .into_iter()
        .filter(|path| path.is_dir())
        .filter_map(|path| path.file_name().map(OsStr::to_os_string))
        .collect();

    let mut subfolders = SubfolderMatch::default();
    let mut image_dirs: BTreeSet<OsString> = BTreeSet::new();

    for entry in image_entries {
        let Some(name) = entry.file_name().map(OsStr::to_os_string) else {
            continue;
        };

        if entry.is_dir() {
            image_dirs.insert(name.clone());
        }

        if entry.is_dir() && annotation_dirs.contains(&name) {
            subfolders.matched.push(name);
        } else {
            subfolders.images_only.push(name);
        }
    }

    subfolders.annotations_only = annotation_dirs
        .into_iter()
        .filter(|name| !image_dirs.contains(name))
        .collect();

    Ok(subfolders)
}

/// Strip the final extension from a file name
///
/// Names without an extension, or whose only dot is leading, are returned
/// unchanged.
///
/// # Examples
///
/// ```
/// use std::ffi::OsStr;
/// use boxcrop_core::ut::path::base_name;
///
/// assert_eq!(base_name(OsStr::new("a.jpg")), OsStr::new("a"));
/// assert_eq!(base_name(OsStr::new("n02085620_7.tar.png")), OsStr::new("n02085620_7.tar"));
/// assert_eq!(base_name(OsStr::new("README")), OsStr::new("README"));
/// ```
pub fn base_name(file_name: &OsStr) -> &OsStr {
    Path::new(file_name).file_stem().unwrap_or(file_name)
}

/// Find the annotation file matching an image file name
///
/// The extension-less base name is tried first, followed by the base name
/// with each of the known annotation extensions. Only regular files match.
///
/// # Arguments
///
/// * `annotation_dir` - Annotation subfolder mirroring the image subfolder
/// * `image_file_name` - File name of the image, including its extension
pub fn find_annotation<P: AsRef<Path>>(
    annotation_dir: P,
    image_file_name: &OsStr,
) -> Option<PathBuf> {
    let annotation_dir = annotation_dir.as_ref();
    let base = base_name(image_file_name);

    let exact = annotation_dir.join(base);
    if exact.is_file() {
        return Some(exact);
    }

    ANNOTATION_EXTENSIONS.iter().find_map(|ext| {
        let mut name = base.to_os_string();
        name.push(".");
        name.push(ext);

        let candidate = annotation_dir.join(name);
        candidate.is_file().then_some(candidate)
    })
}
