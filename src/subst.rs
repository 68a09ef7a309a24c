//! Substitution over type trees.
//!
//! The solver resolves an [`IncompleteType`] by mapping its [`Uid`] to a
//! resolved type and rebuilding every tree that mentions it. Rebuilding
//! never mutates a node: untouched subtrees are reused by reference, and
//! readers still holding the old tree observe nothing. Relations rebuilt
//! along the way keep their [`Uid`], so the solver can follow a constraint
//! across resolution steps.
//!
//! [`TypeVar`] occurrences are substitutable by the same mechanism, which is
//! how a polymorphic [`FuncType`] gets instantiated. A variable bound in a
//! signature's `type_params` is scoped to that signature, so an outer
//! substitution for the same [`Uid`] does not reach inside it.
//!
//! [`IncompleteType`]: crate::ty::IncompleteType
//! [`TypeVar`]: crate::ty::TypeVar

use std::{collections::HashMap, sync::Arc};

use crate::{
    relation::TypeRelation,
    ty::{FuncType, RefType, TupleType, Type, TypeCall, TypeRef},
    unique::Uid,
};

/// A mapping from placeholder or variable identity to its replacement.
pub type Substitution = HashMap<Uid, TypeRef>;

/// Rewrites `ty` under `subst`, returning a new tree.
///
/// Subtrees containing no mapped [`Uid`] are returned as clones of the
/// original [`Arc`], so the output shares structure with the input wherever
/// nothing changed; in particular an unaffected root is returned
/// pointer-equal.
pub fn substitute(ty: &TypeRef, subst: &Substitution) -> TypeRef {
    if subst.is_empty() {
        return ty.clone();
    }

    match &**ty {
        Type::Var(var) => match subst.get(&var.uid()) {
            Some(replacement) => replacement.clone(),
            None => ty.clone(),
        },
        Type::Incomplete(hole) => match subst.get(&hole.uid()) {
            Some(replacement) => replacement.clone(),
            None => ty.clone(),
        },
        Type::Tensor(_) | Type::GlobalVar(_) => ty.clone(),
        Type::Tuple(tuple) => {
            let (fields, changed) = substitute_all(&tuple.fields, subst);

            if changed {
                Arc::new(Type::Tuple(TupleType::new(fields)))
            } else {
                ty.clone()
            }
        }
        Type::Call(call) => {
            let func = substitute(&call.func, subst);
            let (args, args_changed) = substitute_all(&call.args, subst);

            if args_changed || !Arc::ptr_eq(&func, &call.func) {
                Arc::new(Type::Call(TypeCall::new(func, args)))
            } else {
                ty.clone()
            }
        }
        Type::Ref(reference) => {
            let value = substitute(&reference.value, subst);

            if Arc::ptr_eq(&value, &reference.value) {
                ty.clone()
            } else {
                Arc::new(Type::Ref(RefType::new(value)))
            }
        }
        Type::Func(func) => substitute_func(ty, func, subst),
    }
}

/// Substitutes through a signature, respecting its binders: mappings for
/// uids bound in `type_params` are masked inside the signature.
fn substitute_func(
    ty: &TypeRef,
    func: &FuncType,
    subst: &Substitution,
) -> TypeRef {
    let scoped: Substitution;
    let subst = if func
        .type_params
        .iter()
        .any(|param| subst.contains_key(&param.uid()))
    {
        scoped = subst
            .iter()
            .filter(|(uid, _)| {
                !func.type_params.iter().any(|param| param.uid() == **uid)
            })
            .map(|(uid, replacement)| (*uid, replacement.clone()))
            .collect();
        &scoped
    } else {
        subst
    };

    if subst.is_empty() {
        return ty.clone();
    }

    let (arg_types, args_changed) = substitute_all(&func.arg_types, subst);
    let ret_type = substitute(&func.ret_type, subst);

    let mut constraints_changed = false;
    let type_constraints: Vec<TypeRelation> = func
        .type_constraints
        .iter()
        .map(|constraint| {
            let (args, changed) = substitute_all(&constraint.args, subst);

            if changed {
                constraints_changed = true;
                constraint.with_args(args)
            } else {
                constraint.clone()
            }
        })
        .collect();

    let ret_changed = !Arc::ptr_eq(&ret_type, &func.ret_type);

    if args_changed || ret_changed || constraints_changed {
        Arc::new(Type::Func(FuncType::new(
            arg_types,
            ret_type,
            func.type_params.clone(),
            type_constraints,
        )))
    } else {
        ty.clone()
    }
}

fn substitute_all(
    types: &[TypeRef],
    subst: &Substitution,
) -> (Box<[TypeRef]>, bool) {
    let mut changed = false;

    let rewritten = types
        .iter()
        .map(|ty| {
            let rewritten = substitute(ty, subst);
            changed |= !Arc::ptr_eq(&rewritten, ty);
            rewritten
        })
        .collect();

    (rewritten, changed)
}
