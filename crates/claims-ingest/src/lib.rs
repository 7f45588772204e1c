//! Claims file ingestion.
//!
//! Sequences the pipeline for one uploaded file:
//!
//! 1. **Parse**: read the CSV into raw rows ([`read_csv_bytes`], [`CsvRowReader`])
//! 2. **Detect**: rank carrier formats and suggest a mapping
//! 3. **Map**: settle on a complete field mapping ([`resolve_mapping`])
//! 4. **Validate / normalize**: check rows and build claim records
//! 5. **Store**: hand the records to a [`ClaimSink`]
//!
//! Three entry points cover the upload flow: [`preview_upload`] (steps 1-3
//! on a sample), [`process_file`] (batch) and [`process_stream`] (chunked,
//! with [`ProgressEvent`]s). Each tracks the file through [`FileState`].

pub mod config;
pub mod detect;
pub mod error;
pub mod mapping;
pub mod process;
pub mod reader;
pub mod sink;
pub mod state;
pub mod stream;
pub mod upload;

pub use config::{
    DEFAULT_CHUNK_SIZE, DEFAULT_ERROR_LIMIT, IngestConfig, PreviewOptions, StreamingOptions,
};
pub use detect::detect_format_from_file;
pub use error::{IngestError, Result};
pub use mapping::{MappingSource, ResolvedMapping, resolve_mapping};
pub use process::{ProcessRequest, ProcessResponse, process_file};
pub use reader::{CsvRowReader, CsvTable, read_csv_bytes, read_csv_file, read_file};
pub use sink::{ClaimSink, JsonLinesSink, MemorySink};
pub use state::{FileState, FileTracker};
pub use stream::{ProgressEvent, ProgressKind, StreamRequest, StreamSummary, process_stream};
pub use upload::{FILE_ID_LEN, Upload, UploadResponse, describe_issue, file_id, preview_upload};
