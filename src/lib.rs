//! Collage Builder
//!
//! Composites exactly ten 362x544 images into a 5x2 grid with 10px
//! gutters and writes the result in the format named by the output
//! extension.
//!
//! Source images are matched by content, never by extension, and placed in
//! natural order of their paths. Any deviation (wrong count, wrong size,
//! undecodable data, unsupported output format) fails the whole build.

pub mod assets;
pub mod capability;
pub mod compositor;
pub mod encode;
pub mod error;
pub mod format;
pub mod hashing;
pub mod layout;
pub mod natural;
pub mod pipeline;
pub mod sniff;
pub mod target;
pub mod wbmp;

pub use assets::AssetEntry;
pub use capability::Capabilities;
pub use compositor::{Canvas, Placement};
pub use encode::{BufferedResponse, CgiResponse, Invocation, ResponseSink};
pub use error::{CollageError, CollageResult};
pub use format::ImageKind;
pub use layout::GridLayout;
pub use pipeline::{BuildReport, CollageBuilder, CollageConfig};
pub use target::OutputTarget;

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
