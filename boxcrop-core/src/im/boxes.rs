// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::path::Path;

use roxmltree::{Document, ParsingOptions};
use serde_json::Value;

use crate::constant::BOUNDING_BOX_FIELDS;
use crate::error::BoxcropError;

/// A single bounding box read from an annotation record
///
/// Coordinates are signed pixel positions of the top-left `(xmin, ymin)`
/// and bottom-right `(xmax, ymax)` corners. No ordering between the
/// corners is enforced.
///
/// # Examples
///
/// ```
/// use boxcrop_core::im::BoundingBox;
///
/// let bounding_box = BoundingBox::new(10, 10, 60, 60);
/// assert!(bounding_box.is_within(100, 100));
///
/// let bounding_box = BoundingBox::new(10, 10, 150, 60);
/// assert!(!bounding_box.is_within(100, 100));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub xmin: i64,
    pub ymin: i64,
    pub xmax: i64,
    pub ymax: i64,
}

impl BoundingBox {
    /// Initialize a new bounding box from its corners
    pub fn new(xmin: i64, ymin: i64, xmax: i64, ymax: i64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    /// Return the box as `[xmin, ymin, xmax, ymax]`
    pub fn as_xyxy(&self) -> [i64; 4] {
        [self.xmin, self.ymin, self.xmax, self.ymax]
    }
}

// >>> I/O METHODS

impl BoundingBox {
    /// Open a bounding box from an annotation file
    ///
    /// JSON documents are detected by a leading `{` or `[`, everything else
    /// is read as XML.
    ///
    /// # Arguments
    ///
    /// * `path` - A path to an annotation record
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use boxcrop_core::im::BoundingBox;
    /// let bounding_box = BoundingBox::open("annotations/dogs/a");
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<BoundingBox, BoxcropError> {
        let path = path.as_ref();

        let contents = std::fs::read_to_string(path)
            .map_err(|err| BoxcropError::AnnotationMalformed(path.into(), err.to_string()))?;

        Self::parse(&contents, path)
    }

    /// Parse a bounding box from the contents of an annotation record
    ///
    /// # Arguments
    ///
    /// * `contents` - An XML or JSON document
    /// * `path` - The annotation path, used in error messages
    pub fn parse<P: AsRef<Path>>(contents: &str, path: P) -> Result<BoundingBox, BoxcropError> {
        let is_json = contents
            .trim_start()
            .starts_with(|c: char| c == '{' || c == '[');

        let fields = if is_json {
            read_fields_json(contents)
        } else {
            read_fields_xml(contents)
        };

        let [xmin, ymin, xmax, ymax] = fields
            .map_err(|message| BoxcropError::AnnotationMalformed(path.as_ref().into(), message))?;

        Ok(BoundingBox::new(xmin, ymin, xmax, ymax))
    }
}

// <<< I/O METHODS

// >>> VALIDATION METHODS

impl BoundingBox {
    /// Check the box lies within an image of the given dimensions
    ///
    /// Only `xmin >= 0`, `ymin >= 0`, `xmax <= width` and `ymax <= height`
    /// are checked. Inverted or empty boxes pass.
    pub fn is_within(&self, width: u32, height: u32) -> bool {
        !(self.xmin < 0
            || self.ymin < 0
            || self.xmax > width as i64
            || self.ymax > height as i64)
    }

    /// Convert the box into a `(x, y, w, h)` region clamped to the image
    ///
    /// Follows half-open slice semantics: each bound is clamped to the image
    /// and an inverted range becomes zero-sized.
    ///
    /// # Examples
    ///
    /// ```
    /// use boxcrop_core::im::BoundingBox;
    ///
    /// assert_eq!(BoundingBox::new(10, 20, 60, 50).region(100, 100), (10, 20, 50, 30));
    /// assert_eq!(BoundingBox::new(60, 20, 10, 50).region(100, 100), (60, 20, 0, 30));
    /// ```
    pub fn region(&self, width: u32, height: u32) -> (u32, u32, u32, u32) {
        let clamp = |value: i64, bound: u32| value.clamp(0, bound as i64) as u32;

        let x0 = clamp(self.xmin, width);
        let x1 = clamp(self.xmax, width);
        let y0 = clamp(self.ymin, height);
        let y1 = clamp(self.ymax, height);

        (x0, y0, x1.saturating_sub(x0), y1.saturating_sub(y0))
    }
}

// <<< VALIDATION METHODS

/// Parse an integer field value, allowing surrounding whitespace and a sign
fn parse_integer(field: &str, text: &str) -> Result<i64, String> {
    text.trim()
        .parse::<i64>()
        .map_err(|_| format!("Field {} is not an integer: {:?}", field, text.trim()))
}

/// Read the bounding box fields from an XML document
///
/// The first element of each field name is used; its first child must be
/// the text holding the value.
pub fn read_fields_xml(contents: &str) -> Result<[i64; 4], String> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };

    let document = Document::parse_with_options(contents, options)
        .map_err(|err| format!("Invalid XML: {}", err))?;

    let mut values = [0i64; 4];

    for (value, field) in values.iter_mut().zip(BOUNDING_BOX_FIELDS) {
        let node = document
            .descendants()
            .find(|node| node.is_element() && node.tag_name().name() == field)
            .ok_or_else(|| format!("Missing field {}", field))?;

        let text = node
            .first_child()
            .filter(|child| child.is_text())
            .and_then(|child| child.text())
            .ok_or_else(|| format!("Field {} has no value", field))?;

        *value = parse_integer(field, text)?;
    }

    Ok(values)
}

/// Read the bounding box fields from a JSON document
///
/// The first key of each field name, searched depth first in document
/// order, is used. Values must be integers or strings holding an integer.
pub fn read_fields_json(contents: &str) -> Result<[i64; 4], String> {
    let document: Value =
        serde_json::from_str(contents).map_err(|err| format!("Invalid JSON: {}", err))?;

    fn find_key<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
        match value {
            Value::Object(map) => map.iter().find_map(|(k, v)| {
                if k == key {
                    Some(v)
                } else {
                    find_key(v, key)
                }
            }),
            Value::Array(items) => items.iter().find_map(|item| find_key(item, key)),
            _ => None,
        }
    }

    let mut values = [0i64; 4];

    for (value, field) in values.iter_mut().zip(BOUNDING_BOX_FIELDS) {
        let found = find_key(&document, field).ok_or_else(|| format!("Missing field {}", field))?;

        *value = match found {
            Value::Number(number) => number
                .as_i64()
                .ok_or_else(|| format!("Field {} is not an integer: {}", field, number))?,
            Value::String(text) => parse_integer(field, text)?,
            other => return Err(format!("Field {} is not an integer: {}", field, other)),
        };
    }

    Ok(values)
}

#[cfg(test)]
mod test {

    use super::*;

    const VOC_XML: &str = r#"<annotation>
	<folder>02085620</folder>
	<filename>n02085620_7</filename>
	<size>
		<width>250</width>
		<height>188</height>
		<depth>3</depth>
	</size>
	<object>
		<name>Chihuahua</name>
		<bndbox>
			<xmin>71</xmin>
			<ymin>1</ymin>
			<xmax>192</xmax>
			<ymax>180</ymax>
		</bndbox>
	</object>
</annotation>"#;

    #[test]
    fn test_parse_voc_xml() {
        let bounding_box = BoundingBox::parse(VOC_XML, "a").unwrap();
        assert_eq!(bounding_box.as_xyxy(), [71, 1, 192, 180]);
    }

    #[test]
    fn test_parse_xml_first_occurrence() {
        let xml = "<a><o><xmin>1</xmin><ymin>2</ymin><xmax>3</xmax><ymax>4</ymax></o>\
                   <o><xmin>5</xmin><ymin>6</ymin><xmax>7</xmax><ymax>8</ymax></o></a>";

        let bounding_box = BoundingBox::parse(xml, "a").unwrap();
        assert_eq!(bounding_box.as_xyxy(), [1, 2, 3, 4]);
    }

    #[test]
    fn test_parse_xml_whitespace_and_sign() {
        let xml = "<a><xmin> -5 </xmin><ymin>\n+2\n</ymin><xmax>3</xmax><ymax>4</ymax></a>";

        let bounding_box = BoundingBox::parse(xml, "a").unwrap();
        assert_eq!(bounding_box.as_xyxy(), [-5, 2, 3, 4]);
    }

    #[test]
    fn test_parse_xml_malformed() {
        let cases = [
            "<a><xmin>1</xmin><ymin>2</ymin><xmax>3</xmax></a>",
            "<a><xmin>1</xmin><ymin>2</ymin><xmax>3.5</xmax><ymax>4</ymax></a>",
            "<a><xmin>1</xmin><ymin>2</ymin><xmax>abc</xmax><ymax>4</ymax></a>",
            "<a><xmin/><ymin>2</ymin><xmax>3</xmax><ymax>4</ymax></a>",
            "<a><xmin>1</xmin><ymin>2</ymin><xmax>3</xmax><ymax>4</ymax>",
            "",
        ];

        for case in cases {
            let result = BoundingBox::parse(case, "dogs/a");
            assert!(
                matches!(result, Err(BoxcropError::AnnotationMalformed(_, _))),
                "{}",
                case
            );
        }
    }

    #[test]
    fn test_parse_json_nested() {
        let json = r#"{"filename": "a.jpg", "object": {"bndbox": {"xmin": 10, "ymin": "20", "xmax": 60, "ymax": 70}}}"#;

        let bounding_box = BoundingBox::parse(json, "a").unwrap();
        assert_eq!(bounding_box.as_xyxy(), [10, 20, 60, 70]);
    }

    #[test]
    fn test_parse_json_first_occurrence() {
        let json = r#"[{"xmin": 1, "ymin": 2, "xmax": 3, "ymax": 4}, {"xmin": 5, "ymin": 6, "xmax": 7, "ymax": 8}]"#;

        let bounding_box = BoundingBox::parse(json, "a").unwrap();
        assert_eq!(bounding_box.as_xyxy(), [1, 2, 3, 4]);
    }

    #[test]
    fn test_parse_json_malformed() {
        let cases = [
            r#"{"xmin": 1, "ymin": 2, "xmax": 3}"#,
            r#"{"xmin": 1, "ymin": 2, "xmax": 3.5, "ymax": 4}"#,
            r#"{"xmin": 1, "ymin": 2, "xmax": null, "ymax": 4}"#,
            r#"{"xmin": 1, "#,
        ];

        for case in cases {
            let result = BoundingBox::parse(case, "dogs/a");
            assert!(
                matches!(result, Err(BoxcropError::AnnotationMalformed(_, _))),
                "{}",
                case
            );
        }
    }

    #[test]
    fn test_open_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("n02085620_7");
        std::fs::write(&path, VOC_XML).unwrap();

        let bounding_box = BoundingBox::open(&path).unwrap();
        assert_eq!(bounding_box, BoundingBox::new(71, 1, 192, 180));
    }

    #[test]
    fn test_open_failure() {
        let result = BoundingBox::open("does_not_exist/");
        assert!(matches!(result, Err(BoxcropError::AnnotationMalformed(_, _))));
    }

    #[test]
    fn test_is_within_bounds() {
        assert!(BoundingBox::new(0, 0, 100, 100).is_within(100, 100));
        assert!(!BoundingBox::new(-1, 0, 50, 50).is_within(100, 100));
        assert!(!BoundingBox::new(0, -1, 50, 50).is_within(100, 100));
        assert!(!BoundingBox::new(0, 0, 101, 50).is_within(100, 100));
        assert!(!BoundingBox::new(0, 0, 50, 101).is_within(100, 100));
    }

    #[test]
    fn test_is_within_is_permissive() {
        // Inverted and empty boxes are only range checked
        assert!(BoundingBox::new(60, 60, 10, 10).is_within(100, 100));
        assert!(BoundingBox::new(20, 20, 20, 20).is_within(100, 100));
        assert!(BoundingBox::new(150, 0, 50, 50).is_within(100, 100));
    }

    #[test]
    fn test_region() {
        assert_eq!(BoundingBox::new(10, 10, 60, 60).region(100, 100), (10, 10, 50, 50));
        assert_eq!(BoundingBox::new(0, 0, 100, 80).region(100, 80), (0, 0, 100, 80));
        assert_eq!(BoundingBox::new(150, 0, 50, 50).region(100, 100), (100, 0, 0, 50));
        assert_eq!(BoundingBox::new(20, 30, 20, 10).region(100, 100), (20, 30, 0, 0));
    }
}
