// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

// Output root used when none is provided
pub const DEFAULT_OUTPUT_DIR: &str = "cropped";

// The element/key names read from an annotation record, in xyxy order
pub const BOUNDING_BOX_FIELDS: [&str; 4] = ["xmin", "ymin", "xmax", "ymax"];

// Extensions tried, in order, when no extension-less annotation file exists
pub const ANNOTATION_EXTENSIONS: [&str; 2] = ["xml", "json"];
