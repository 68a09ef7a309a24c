//! Type representation and constraint layer for a tensor-program IR.
//!
//! This crate is the data model a type checker works over: tensor types
//! with symbolic shapes, polymorphic type variables, function signatures,
//! and deferred [type relations] that carry operator-specific shape rules
//! as data. It deliberately contains no inference algorithm; the solver
//! that unifies, schedules relation callbacks, and resolves placeholders
//! is an external consumer of these values.
//!
//! # Layering
//! - [`ty`] defines the eight-variant [`Type`] sum and its validating
//!   constructors.
//! - [`relation`] defines [`TypeRelation`] and the callback/registry
//!   contract that keeps relation logic out of the core.
//! - [`print`] is the double-dispatch diagnostic renderer.
//! - [`subst`] expresses resolution as rebuilding, never mutation, so
//!   shared trees stay valid for concurrent readers.
//! - [`dim`], [`dtype`], and [`unique`] are the leaves: dimension
//!   expressions, element types, and identity tokens.
//!
//! [type relations]: relation::TypeRelation
//! [`Type`]: ty::Type
//! [`TypeRelation`]: relation::TypeRelation

pub mod dim;
pub mod dtype;
pub mod error;
pub mod print;
pub mod relation;
pub mod subst;
pub mod ty;
pub mod unique;

pub use dim::Dim;
pub use dtype::{DataType, TypeCode};
pub use error::{Result, TypeError};
pub use print::{DiagPrinter, Render, render};
pub use relation::{
    AttrValue, Attrs, RelationFn, RelationOutcome, RelationRegistry,
    Reporter, TypeRelation,
};
pub use subst::{Substitution, substitute};
pub use ty::{
    FuncType, GlobalTypeVar, IncompleteType, Kind, RefType, TensorType,
    TupleType, Type, TypeCall, TypeRef, TypeVar,
};
pub use unique::Uid;
