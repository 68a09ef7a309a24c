//! Construction-time contract violations.
//!
//! Semantic errors (unsatisfiable relations, placeholders left unresolved at
//! the end of checking) belong to the external solver; the only failures
//! this layer can produce are structural ones caught inside a constructor.

use thiserror::Error;

/// The public result type for fallible constructors.
pub type Result<T> = std::result::Result<T, TypeError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error(
        "relation `{name}` declares {num_inputs} inputs but has only {num_args} arguments"
    )]
    RelationArity {
        name: Box<str>,
        num_inputs: usize,
        num_args: usize,
    },
}
