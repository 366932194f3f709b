mod boxes;
mod buffer;
mod image;

pub use buffer::PixelBuffer;
pub use image::CropImage;

pub use boxes::BoundingBox;
pub use boxes::{read_fields_json, read_fields_xml};
