//! PDF assembly
//!
//! Each composed page becomes one PDF page holding a single full-page
//! image XObject. Page order in the document is the order of the input.

use crate::constants::px_to_pt;
use crate::options::{GridOptions, PageEncoding};
use crate::types::*;
use image::ExtendedColorType;
use image::codecs::jpeg::JpegEncoder;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::io::Write;
use std::path::Path;

/// Name under which each page references its image
const PAGE_IMAGE_NAME: &str = "Im0";

// =============================================================================
// Assembly
// =============================================================================

/// Build a multi-page PDF from composed pages.
///
/// Page sizes are the canvas pixel sizes converted to points at the
/// configured DPI. Pages are consumed; each raster is dropped once encoded.
pub fn assemble(pages: Vec<Page>, options: &GridOptions) -> Result<Document> {
    if pages.is_empty() {
        return Err(PhotoGridError::NoPages);
    }

    let mut doc = Document::with_version("1.5");
    let pages_tree_id = doc.new_object_id();
    let mut page_refs = Vec::with_capacity(pages.len());

    for page in pages {
        let page_id = add_page(&mut doc, pages_tree_id, page, options)?;
        page_refs.push(Object::Reference(page_id));
    }

    let count = page_refs.len() as i64;
    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(page_refs)),
        ("Count", Object::Integer(count)),
    ]);
    doc.objects.insert(pages_tree_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_tree_id)),
    ]));
    doc.trailer.set("Root", catalog_id);

    // Content streams and Flate page images; JPEG streams already carry a filter
    doc.compress();

    Ok(doc)
}

fn add_page(
    doc: &mut Document,
    parent_id: ObjectId,
    page: Page,
    options: &GridOptions,
) -> Result<ObjectId> {
    let (width_px, height_px) = page.canvas.dimensions();
    let width_pt = px_to_pt(width_px, options.dpi);
    let height_pt = px_to_pt(height_px, options.dpi);

    let image_id = doc.add_object(encode_page_image(page, options.page_encoding)?);

    // Scale the unit image square up to the full page
    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    Object::Real(width_pt),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(height_pt),
                    Object::Integer(0),
                    Object::Integer(0),
                ],
            ),
            Operation::new("Do", vec![Object::Name(PAGE_IMAGE_NAME.as_bytes().to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode()?));

    let mut xobjects = Dictionary::new();
    xobjects.set(PAGE_IMAGE_NAME, Object::Reference(image_id));
    let mut resources = Dictionary::new();
    resources.set("XObject", Object::Dictionary(xobjects));

    let mut page_dict = Dictionary::new();
    page_dict.set("Type", Object::Name(b"Page".to_vec()));
    page_dict.set("Parent", Object::Reference(parent_id));
    page_dict.set(
        "MediaBox",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(width_pt),
            Object::Real(height_pt),
        ]),
    );
    page_dict.set("Resources", Object::Dictionary(resources));
    page_dict.set("Contents", Object::Reference(content_id));

    Ok(doc.add_object(page_dict))
}

/// Encode a page raster as an image XObject stream
fn encode_page_image(page: Page, encoding: PageEncoding) -> Result<Stream> {
    let (width, height) = page.canvas.dimensions();

    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"XObject".to_vec()));
    dict.set("Subtype", Object::Name(b"Image".to_vec()));
    dict.set("Width", Object::Integer(width as i64));
    dict.set("Height", Object::Integer(height as i64));
    dict.set("ColorSpace", Object::Name(b"DeviceRGB".to_vec()));
    dict.set("BitsPerComponent", Object::Integer(8));

    match encoding {
        PageEncoding::Jpeg { quality } => {
            let mut data = Vec::new();
            JpegEncoder::new_with_quality(&mut data, quality).encode(
                page.canvas.as_raw(),
                width,
                height,
                ExtendedColorType::Rgb8,
            )?;
            dict.set("Filter", Object::Name(b"DCTDecode".to_vec()));
            Ok(Stream::new(dict, data).with_compression(false))
        }
        PageEncoding::Flate => Ok(Stream::new(dict, page.canvas.into_raw())),
    }
}

// =============================================================================
// Output
// =============================================================================

/// Serialize a document to bytes
pub fn to_bytes(mut doc: Document) -> Result<Vec<u8>> {
    let mut writer = Vec::new();
    doc.save_to(&mut writer)?;
    Ok(writer)
}

/// Write `bytes` to `path` atomically.
///
/// The data goes to a temporary file in the destination directory which is
/// then renamed over `path`, so a failed write never leaves a truncated file.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = tempfile::NamedTempFile::new_in(dir)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;

    // Temporary files are created owner-only
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        temp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o644))?;
    }

    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Assemble pages into a PDF and save it atomically to `path`
pub async fn save_pdf(
    pages: Vec<Page>,
    options: &GridOptions,
    path: impl AsRef<Path>,
) -> Result<()> {
    let path = path.as_ref().to_owned();
    let options = options.clone();

    tokio::task::spawn_blocking(move || {
        let doc = assemble(pages, &options)?;
        let bytes = to_bytes(doc)?;
        write_atomic(&path, &bytes)
    })
    .await?
}
