// webpbatch/src/processors/mod.rs
mod classifier;
mod codec;
mod loader;
mod planner;
mod scanner;

pub use classifier::{FileClassifier, SCAN_EXTENSIONS, UPLOAD_EXTENSIONS};
pub use codec::{LibwebpCodec, WebpCodec};
pub use loader::{Loader, WEBP_MAX_DIMENSION};
pub use planner::{ensure_dir, Destination, DestinationPlanner, Layout, HOLDING_PREFIX};
pub use scanner::DirectoryScanner;
