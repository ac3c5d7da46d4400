//! Parsing of PGN study files into navigable move trees.
//!
//! The pipeline runs sanitize → split → per-fragment {headers, tokenize,
//! tree build, flat recovery on failure} → [`Collection`], with complexity
//! metrics attached along the way and a deterministic serializer as the
//! inverse. Everything here is purely syntactic: move legality, board
//! positions and rendering belong to the caller's rules engine and UI.
//! Every entry point is a pure function over its input text, so parses may
//! run concurrently without coordination.

mod collection;
mod complexity;
mod error;
mod fallback;
mod game;
mod header;
mod node;
mod parse;
mod render;
mod sanitize;
mod split;
mod tokenize;
mod validate;

pub use collection::*;
pub use complexity::*;
pub use error::*;
pub use fallback::*;
pub use game::*;
pub use header::parse_fragment;
pub use node::*;
pub use render::*;
pub use sanitize::*;
pub use split::*;
pub use tokenize::*;
pub use validate::*;
