//! Line-oriented translator from cpl to C.
//!
//! Each source line goes through the [`lexer`], the block-[`comment`]
//! tracker and the [`rewrite`] table, in that order, and becomes exactly one
//! line of the translation unit. The [`driver`] streams a whole file through
//! that pipeline; the [`toolchain`] module hands the result to a C compiler.

pub mod comment;
pub mod driver;
pub mod error;
pub mod lexer;
pub mod rewrite;
pub mod toolchain;

pub use comment::{CommentState, LineScope};
pub use driver::{Translation, TranslationUnit, Translator, translate_line};
pub use error::{ErrorClass, RewriteWarning, TranspileError, TranspileResult};
pub use toolchain::{BuildOptions, BuildOutcome};
