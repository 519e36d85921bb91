//! The preview sandbox: an isolated Luau context per render attempt.
//!
//! `loader` normalizes extracted source, `vm` builds the isolated state,
//! `bridge` injects the symbol table generated code expects, `tree`
//! converts the returned Lua value into a weave tree, and `supervisor`
//! drives execution and absorbs every failure.

pub mod bridge;
pub mod loader;
pub mod supervisor;
pub mod tree;
pub mod vm;
