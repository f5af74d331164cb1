//! Thin layer over lopdf: load/save, page access, page import, drawing and
//! document metadata.

pub mod draw;
pub mod import;
pub mod io;
pub mod metadata;
pub mod page;

pub use draw::{
    DrawResources, EmbeddedImage, TextStyle, draw_image, draw_text, embed_image, jpeg_component_count,
    text_width,
};
pub use import::PageImporter;
pub use io::{SaveOptions, load_document, load_pdf, save_document, save_pdf};
pub use metadata::{DocumentMetadata, read_metadata};
pub use page::{DocumentBuilder, page_box, page_count, page_id, page_ids, rotation, set_rotation};
