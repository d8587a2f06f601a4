//! Pipeline module - the training stages and their orchestration

pub mod cleaning;
pub mod error;
pub mod evaluation;
pub mod features;
pub mod loader;
pub mod model;
pub mod persist;
pub mod run;
pub mod schema;
pub mod session;
pub mod split;
pub mod tuning;

pub use cleaning::*;
pub use error::{PipelineError, Result};
pub use evaluation::*;
pub use features::*;
pub use loader::*;
pub use model::*;
pub use persist::*;
pub use run::*;
pub use schema::*;
pub use session::Session;
pub use split::*;
pub use tuning::*;
