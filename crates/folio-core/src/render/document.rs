//! PDF assembly: one page per image, each image embedded as a DCT stream.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use super::encode::EncodedJpeg;
use super::geometry::{PageSize, Placement};
use crate::error::RenderError;

fn name(value: &str) -> Object {
    Object::Name(value.as_bytes().to_vec())
}

fn real_array(values: &[f32]) -> Object {
    Object::Array(values.iter().map(|v| Object::Real(*v)).collect())
}

/// Builds a PDF page by page.
pub struct PdfBuilder {
    doc: Document,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
}

impl PdfBuilder {
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            page_ids: Vec::new(),
        }
    }

    /// Append a page of `page` size showing `jpeg` at `placement`.
    pub fn add_image_page(
        &mut self,
        page: &PageSize,
        placement: &Placement,
        jpeg: &EncodedJpeg,
    ) -> Result<(), RenderError> {
        let image_dict = Dictionary::from_iter([
            ("Type", name("XObject")),
            ("Subtype", name("Image")),
            ("Width", Object::Integer(i64::from(jpeg.width))),
            ("Height", Object::Integer(i64::from(jpeg.height))),
            ("ColorSpace", name("DeviceRGB")),
            ("BitsPerComponent", Object::Integer(8)),
            ("Filter", name("DCTDecode")),
        ]);
        let image_id = self
            .doc
            .add_object(Stream::new(image_dict, jpeg.data.clone()).with_compression(false));

        let [a, b, c, d, e, f] = placement.transform_pt(page);
        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        Object::Real(a),
                        Object::Real(b),
                        Object::Real(c),
                        Object::Real(d),
                        Object::Real(e),
                        Object::Real(f),
                    ],
                ),
                Operation::new("Do", vec![name("Im0")]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_bytes = content
            .encode()
            .map_err(|e| RenderError::Pdf(format!("content stream: {e}")))?;
        let content_id = self
            .doc
            .add_object(Stream::new(Dictionary::new(), content_bytes));

        let resources = Dictionary::from_iter([(
            "XObject",
            Object::Dictionary(Dictionary::from_iter([("Im0", Object::Reference(image_id))])),
        )]);

        let page_id = self.doc.add_object(Dictionary::from_iter([
            ("Type", name("Page")),
            ("Parent", Object::Reference(self.pages_id)),
            ("MediaBox", real_array(&page.media_box_pt())),
            ("Contents", Object::Reference(content_id)),
            ("Resources", Object::Dictionary(resources)),
        ]));
        self.page_ids.push(page_id);
        Ok(())
    }

    /// Pages added so far.
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Write the page tree and catalog and serialize the document.
    pub fn finish(mut self) -> Result<Vec<u8>, RenderError> {
        let kids: Vec<Object> = self
            .page_ids
            .iter()
            .map(|id| Object::Reference(*id))
            .collect();
        let pages = Dictionary::from_iter([
            ("Type", name("Pages")),
            ("Kids", Object::Array(kids)),
            ("Count", Object::Integer(self.page_ids.len() as i64)),
        ]);
        self.doc
            .objects
            .insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.doc.add_object(Dictionary::from_iter([
            ("Type", name("Catalog")),
            ("Pages", Object::Reference(self.pages_id)),
        ]));
        self.doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut output = Vec::new();
        self.doc
            .save_to(&mut output)
            .map_err(|e| RenderError::Pdf(format!("failed to save document: {e}")))?;
        Ok(output)
    }
}

impl Default for PdfBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::encode::resample_and_encode;
    use crate::types::{Orientation, PageFormat, Quality};
    use image::{Rgb, RgbImage};

    fn sample_jpeg() -> EncodedJpeg {
        let src = RgbImage::from_pixel(8, 4, Rgb([0, 128, 255]));
        resample_and_encode(&src, 8, 4, Quality::Standard).unwrap()
    }

    #[test]
    fn test_empty_document_has_zero_pages() {
        let bytes = PdfBuilder::new().finish().unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 0);
    }

    #[test]
    fn test_pages_have_requested_media_box() {
        let page = PageSize::new(PageFormat::Letter, Orientation::Landscape);
        let placement = page.fit(8, 4);
        let jpeg = sample_jpeg();

        let mut builder = PdfBuilder::new();
        builder.add_image_page(&page, &placement, &jpeg).unwrap();
        builder.add_image_page(&page, &placement, &jpeg).unwrap();
        assert_eq!(builder.page_count(), 2);
        let bytes = builder.finish().unwrap();

        let doc = Document::load_mem(&bytes).unwrap();
        let pages = doc.get_pages();
        assert_eq!(pages.len(), 2);

        let first = pages.values().next().copied().unwrap();
        let media_box = doc
            .get_object(first)
            .unwrap()
            .as_dict()
            .unwrap()
            .get(b"MediaBox")
            .unwrap()
            .as_array()
            .unwrap()
            .clone();
        let width = media_box[2].as_float().unwrap();
        let height = media_box[3].as_float().unwrap();
        assert!((width - 279.0 * 72.0 / 25.4).abs() < 0.01);
        assert!((height - 216.0 * 72.0 / 25.4).abs() < 0.01);
    }

    #[test]
    fn test_image_stream_is_embedded_verbatim() {
        let page = PageSize::new(PageFormat::A4, Orientation::Portrait);
        let jpeg = sample_jpeg();
        let mut builder = PdfBuilder::new();
        builder
            .add_image_page(&page, &page.fit(8, 4), &jpeg)
            .unwrap();
        let bytes = builder.finish().unwrap();

        let found = bytes
            .windows(jpeg.data.len())
            .any(|window| window == jpeg.data.as_slice());
        assert!(found, "JPEG bytes should appear unmodified in the PDF");
    }
}
