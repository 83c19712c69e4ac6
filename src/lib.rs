pub mod config;
pub mod document;
pub mod fetch;
pub mod output;
pub mod process;

pub use config::{AppConfig, FetchConfig, PipelineConfig};
pub use document::{FetchedDocument, SectionMarker};
pub use process::raw_table::{Cell, Column, RawTable, TitledTable};
