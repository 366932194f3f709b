// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::path::PathBuf;

use boxcrop_core::error::BoxcropError;
use boxcrop_core::ut;

/// Per-file outcomes of a cropping run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Output paths of every cropped image
    pub saved: Vec<PathBuf>,
    /// Source images that were skipped, with the reason
    pub skipped: Vec<(PathBuf, BoxcropError)>,
    /// Subfolders that exist in only one of the two trees
    pub mismatched: Vec<BoxcropError>,
}

impl RunSummary {
    /// Number of cropped images written
    pub fn n_saved(&self) -> usize {
        self.saved.len()
    }

    /// Number of images skipped for any reason
    pub fn n_skipped(&self) -> usize {
        self.skipped.len()
    }

    /// Skipped images whose reason satisfies a predicate
    pub fn skipped_where<F>(&self, predicate: F) -> Vec<&PathBuf>
    where
        F: Fn(&BoxcropError) -> bool,
    {
        self.skipped
            .iter()
            .filter(|(_, err)| predicate(err))
            .map(|(path, _)| path)
            .collect()
    }

    /// One line describing the whole run
    pub fn report(&self) -> String {
        format!(
            "Complete. {} images cropped, {} images skipped, {} subfolders mismatched.",
            ut::track::thousands_format(self.n_saved()),
            ut::track::thousands_format(self.n_skipped()),
            ut::track::thousands_format(self.mismatched.len())
        )
    }
}
