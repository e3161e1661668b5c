//! Service Colors Common Library
//!
//! CLIとWeb(WASM)で共有される分類・同期ロジック

pub mod category;
pub mod mapping;
pub mod config;
pub mod error;
pub mod dom;
pub mod memory;
pub mod sync;
pub mod create;
pub mod observer;

pub use category::Category;
pub use mapping::{MappingTable, MatchStrategy, PatternEntry, get_service_class};
pub use config::ColorConfig;
pub use error::{Error, Result};
pub use dom::{ServiceDocument, ServiceElement};
pub use memory::{MemoryDocument, MemoryElement};
pub use sync::{SyncReport, apply_selection_change, apply_service_colors, selection_widgets};
pub use create::{ElementOptions, create_service_button, create_service_label};
pub use observer::{Debouncer, Lifecycle, MutationKind, MutationSummary, Scheduler, batch_requires_resync};
