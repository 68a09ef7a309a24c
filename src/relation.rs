//! Deferred, pluggable constraints over types.
//!
//! A [`TypeRelation`] says "these types must satisfy property P" where P is
//! defined entirely outside this crate. The relation holds the tuple
//! `(func, args, num_inputs, attrs)` faithfully and never evaluates
//! anything: [`RelationFn`] is a capability handle, a name resolved through
//! a [`RelationRegistry`] to an externally registered callback. This is the
//! extensibility seam of the whole layer; new operators introduce new shape
//! rules by registering callbacks, not by touching the type model.
//!
//! The leading `num_inputs` arguments are treated as already-known inputs,
//! and the remainder are outputs for the solver to infer or check. Both
//! extremes are ordinary: `num_inputs == args.len()` is a pure validation
//! relation, and `num_inputs == 0` derives every argument from `attrs`
//! alone.
//!
//! When and how often a callback is re-invoked as placeholders resolve is
//! the solver's scheduling decision, not this crate's.

use std::{collections::BTreeMap, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, TypeError},
    ty::TypeRef,
    unique::Uid,
};

/// A named handle for an externally defined relation.
///
/// Two handles are the same relation exactly when their names are equal; the
/// implementation behind the name lives in a [`RelationRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelationFn {
    name: Arc<str>,
}

impl RelationFn {
    pub fn named(name: impl Into<Arc<str>>) -> Self {
        RelationFn { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A deferred constraint over a fixed list of type arguments.
///
/// Relations are compared and hashed by identity, not by field contents: a
/// rebuild during substitution keeps the original's [`Uid`], so the solver
/// can track a relation across resolution steps.
#[derive(Debug, Clone)]
pub struct TypeRelation {
    uid: Uid,
    pub func: RelationFn,
    pub args: Box<[TypeRef]>,
    pub num_inputs: usize,
    pub attrs: Attrs,
}

impl TypeRelation {
    /// Builds a relation, rejecting `num_inputs` beyond the argument count.
    pub fn new(
        func: RelationFn,
        args: impl Into<Box<[TypeRef]>>,
        num_inputs: usize,
        attrs: Attrs,
    ) -> Result<Self> {
        let args = args.into();

        if num_inputs > args.len() {
            return Err(TypeError::RelationArity {
                name: func.name().into(),
                num_inputs,
                num_args: args.len(),
            });
        }

        Ok(TypeRelation {
            uid: Uid::fresh(),
            func,
            args,
            num_inputs,
            attrs,
        })
    }

    pub fn uid(&self) -> Uid {
        self.uid
    }

    /// The leading already-known arguments.
    pub fn inputs(&self) -> &[TypeRef] {
        &self.args[..self.num_inputs]
    }

    /// The trailing arguments to be inferred or checked.
    pub fn outputs(&self) -> &[TypeRef] {
        &self.args[self.num_inputs..]
    }

    /// Rebuilds this relation with new arguments but the same identity.
    /// Substitution uses this so a relation's [`Uid`] survives resolution.
    pub(crate) fn with_args(&self, args: Box<[TypeRef]>) -> Self {
        TypeRelation {
            uid: self.uid,
            func: self.func.clone(),
            args,
            num_inputs: self.num_inputs,
            attrs: self.attrs.clone(),
        }
    }
}

impl PartialEq for TypeRelation {
    fn eq(&self, other: &Self) -> bool {
        self.uid == other.uid
    }
}

impl Eq for TypeRelation {}

/// What a relation callback decided on one invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum RelationOutcome {
    /// The relation holds; nothing further to do.
    Satisfied,
    /// The relation holds after resolving the listed output slots, given as
    /// `(index into args, resolved type)` pairs.
    Resolved(Vec<(usize, TypeRef)>),
    /// Not yet decidable; re-invoke once more arguments have resolved.
    Deferred,
    /// The arguments cannot satisfy the relation.
    Violated,
}

/// A diagnostic sink handed to relation callbacks.
pub trait Reporter {
    fn report(&mut self, diagnostic: &str);
}

/// A [`Reporter`] that accumulates diagnostics in memory.
#[derive(Debug, Default)]
pub struct BufferedReporter {
    pub diagnostics: Vec<Box<str>>,
}

impl Reporter for BufferedReporter {
    fn report(&mut self, diagnostic: &str) {
        self.diagnostics.push(diagnostic.into());
    }
}

/// The callback signature behind a [`RelationFn`].
pub type RelationImpl = dyn Fn(&[TypeRef], usize, &Attrs, &mut dyn Reporter) -> RelationOutcome
    + Send
    + Sync;

/// The mapping from relation names to their implementations.
///
/// The registry lives with the solver; this crate only defines the lookup
/// contract so relations can name implementations without depending on
/// them.
#[derive(Default)]
pub struct RelationRegistry {
    fns: BTreeMap<Arc<str>, Arc<RelationImpl>>,
}

impl RelationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `f` under `name`, returning the handle relations should
    /// carry. Re-registering a name replaces the previous implementation.
    pub fn register<F>(&mut self, name: impl Into<Arc<str>>, f: F) -> RelationFn
    where
        F: Fn(&[TypeRef], usize, &Attrs, &mut dyn Reporter) -> RelationOutcome
            + Send
            + Sync
            + 'static,
    {
        let name = name.into();
        self.fns.insert(name.clone(), Arc::new(f));
        RelationFn { name }
    }

    pub fn lookup(&self, func: &RelationFn) -> Option<Arc<RelationImpl>> {
        self.fns.get(&func.name).cloned()
    }
}

impl std::fmt::Debug for RelationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.fns.keys()).finish()
    }
}

/// An opaque attribute bag passed through to relation callbacks.
///
/// Keys are ordered so iteration and printing are deterministic. The core
/// never validates payloads; each relation interprets its own attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attrs(BTreeMap<Box<str>, AttrValue>);

impl Attrs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<Box<str>>, value: AttrValue) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.0.iter().map(|(key, value)| (key.as_ref(), value))
    }
}

/// A single attribute payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttrValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(Box<str>),
    Ints(Box<[i64]>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dim::Dim,
        dtype::DataType,
        ty::{Kind, Type},
    };

    fn sample_args() -> Vec<TypeRef> {
        vec![
            Type::tensor([Dim::Const(1), Dim::Const(4)], DataType::float32()),
            Type::tensor([Dim::Const(3), Dim::Const(1)], DataType::float32()),
            Type::incomplete(Kind::Type),
        ]
    }

    #[test]
    fn num_inputs_bounds_are_inclusive() {
        let args = sample_args();

        for num_inputs in 0..=args.len() {
            let rel = TypeRelation::new(
                RelationFn::named("broadcast"),
                args.clone(),
                num_inputs,
                Attrs::new(),
            );
            assert!(rel.is_ok(), "num_inputs = {num_inputs} must be legal");
        }
    }

    #[test]
    fn num_inputs_beyond_arity_is_rejected() {
        let args = sample_args();

        let err = TypeRelation::new(
            RelationFn::named("broadcast"),
            args,
            4,
            Attrs::new(),
        )
        .unwrap_err();

        assert_eq!(
            err,
            TypeError::RelationArity {
                name: "broadcast".into(),
                num_inputs: 4,
                num_args: 3,
            }
        );
    }

    #[test]
    fn stored_tuple_reads_back_unchanged() {
        let args = sample_args();
        let attrs = Attrs::new().with("axis", AttrValue::Int(1));

        let rel = TypeRelation::new(
            RelationFn::named("broadcast"),
            args.clone(),
            2,
            attrs.clone(),
        )
        .unwrap();

        assert_eq!(rel.func.name(), "broadcast");
        assert_eq!(&*rel.args, &args[..]);
        assert_eq!(rel.num_inputs, 2);
        assert_eq!(rel.attrs, attrs);
        assert_eq!(rel.inputs(), &args[..2]);
        assert_eq!(rel.outputs(), &args[2..]);
    }

    #[test]
    fn relation_equality_is_by_identity() {
        let args = sample_args();
        let a = TypeRelation::new(
            RelationFn::named("broadcast"),
            args.clone(),
            2,
            Attrs::new(),
        )
        .unwrap();
        let b = TypeRelation::new(
            RelationFn::named("broadcast"),
            args,
            2,
            Attrs::new(),
        )
        .unwrap();

        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn registry_round_trip_and_invocation() {
        let mut registry = RelationRegistry::new();

        let handle = registry.register(
            "identity",
            |args: &[TypeRef],
             num_inputs: usize,
             _: &Attrs,
             _: &mut dyn Reporter| {
                let input = args[..num_inputs][0].clone();
                RelationOutcome::Resolved(vec![(num_inputs, input)])
            },
        );

        let args = vec![
            Type::scalar(DataType::int32()),
            Type::incomplete(Kind::Type),
        ];
        let rel =
            TypeRelation::new(handle, args, 1, Attrs::new()).unwrap();

        let callback = registry.lookup(&rel.func).expect("registered above");
        let mut reporter = BufferedReporter::default();
        let outcome =
            callback(&rel.args, rel.num_inputs, &rel.attrs, &mut reporter);

        assert_eq!(
            outcome,
            RelationOutcome::Resolved(vec![(1, rel.args[0].clone())])
        );
        assert!(reporter.diagnostics.is_empty());
    }

    #[test]
    fn unregistered_name_resolves_to_nothing() {
        let registry = RelationRegistry::new();
        assert!(registry.lookup(&RelationFn::named("missing")).is_none());
    }
}
