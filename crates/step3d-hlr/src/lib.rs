//! High-Level Representation (HLR) of STEP AP242 files.
//!
//! The HLR is what a model browser needs from a product structure file:
//! - file header metadata ([`HeaderInfo`])
//! - one [`Part`] per product definition, with its local [`Placement`]
//! - one [`Relation`] per assembly usage occurrence between two parts
//!
//! Extraction is three fixed passes over an [`InstancePool`]:
//! header, content (parts, relations and a definition → representation
//! index), then geometry. [`Step3dFile`] wraps the load/parse lifecycle
//! with a sticky error [`Status`].
//!
//! ```no_run
//! use step3d_hlr::Step3dFile;
//!
//! let mut file = Step3dFile::new();
//! if file.load("MyParts.step") && file.parse_hlr_information() {
//!     for part in file.parts() {
//!         println!("{}#{} {}", part.type_label, part.id, part.name);
//!     }
//! } else {
//!     eprintln!("{}", file.error_message());
//! }
//! ```

pub mod entity;
pub mod error;
pub mod extract;
pub mod geometry;
pub mod header;
pub mod index;
pub mod model;
pub mod options;
pub mod select;
pub mod session;
pub mod structure;
pub mod text;
pub mod tree;

pub use entity::{classify, EntityKind};
pub use error::{ErrorKind, HlrError, Status};
pub use extract::extract_hlr;
pub use index::RepresentationIndex;
pub use model::{HeaderInfo, HlrResult, Part, Placement, Relation, PART_TYPE_LABEL, RELATION_TYPE_LABEL};
pub use options::{ExtractOptions, MissingRepresentationPolicy};
pub use session::{SessionState, Step3dFile, EXTRACTION_FAILED_MESSAGE, NOT_LOADED_MESSAGE};
pub use text::{to_cleaned, to_raw, TextStyle};
pub use tree::{build_tree, TreeRow};

pub use step3d_express::{engine_version, InstanceId, InstancePool, LoadOptions, Severity};
