/// Dataset ingestion: text decoding, CSV parsing and upload persistence
///
/// Uploaded inventories arrive as raw bytes in whatever encoding the exporting
/// tool used. `EncodingCandidates` tries an ordered list of encodings and keeps
/// the first strict decode; `DatasetReader` turns the decoded text into
/// `AssetRecord`s after checking the header; `UploadStore` keeps a copy of each
/// accepted upload on disk under a sanitized name.

pub mod decode;
pub mod reader;
pub mod upload;

pub use decode::{DecodedText, EncodingCandidates};
pub use reader::DatasetReader;
pub use upload::{secure_filename, UploadStore};
