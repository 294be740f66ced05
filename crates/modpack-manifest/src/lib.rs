pub mod diff;
pub mod error;
pub mod scan;
pub mod types;
pub mod verify;
pub mod write;

pub use diff::ManifestDiff;
pub use error::{ManifestError, Result};
pub use scan::{hash_file, scan_dir, ScanOptions};
pub use types::{Manifest, ModEntry, Modpack, MANIFEST_FILE_NAME};
pub use verify::{verify_folder, VerifyReport};
pub use write::{write_if_changed, WriteOutcome};
