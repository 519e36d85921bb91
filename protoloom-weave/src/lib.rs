//! # Protoloom Weave
//!
//! The weave tree is Protoloom's component model: the typed node tree a
//! sandboxed generated component builds at runtime, plus everything needed
//! to turn that tree into a safe preview document.
//!
//! ## Features
//! - Typed node model (containers, text, buttons, inputs, icons, ...)
//! - Structural validation (nesting depth, unique ids)
//! - Tailwind-compatible utility class engine generating only the CSS the
//!   tree actually uses
//! - Safe-HTML document renderer with diagnostic and pane-error views
//!
//! ## Example
//! ```
//! use protoloom_weave::{html, Node, node::{Container, Text}};
//!
//! let tree = Node::Container(Container {
//!     id: None,
//!     class: Some("flex p-4".into()),
//!     children: vec![Node::Text(Text {
//!         id: None,
//!         class: None,
//!         text: "Hello".into(),
//!     })],
//! });
//! let doc = html::render_preview_document(&tree, None, "");
//! assert!(doc.contains("Hello"));
//! ```

pub mod error;
pub mod html;
pub mod node;
pub mod tailwind;
pub mod validate;

pub use error::{WeaveError, WeaveResult};
pub use node::Node;
pub use validate::{validate_tree, MAX_NESTING_DEPTH};
