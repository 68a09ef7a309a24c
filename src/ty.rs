//! The type nodes of the IR.
//!
//! # Structure
//! [`Type`] is a closed sum over eight variants, shared behind [`Arc`] as
//! [`TypeRef`] so that trees can alias common substructure cheaply. Every
//! node is immutable once constructed: resolution of an [`IncompleteType`]
//! during inference is expressed by building a new tree through
//! [`crate::subst::substitute`], never by mutating a node in place, so trees
//! already handed to other readers stay valid without synchronization.
//!
//! Since every constructor only accepts already-built values as children,
//! the model is a strict DAG; nothing in this API can make a type contain
//! itself.
//!
//! # Equality
//! Equality is structural except for [`TypeVar`], [`GlobalTypeVar`], and
//! [`IncompleteType`], which compare by their [`Uid`]: two independently
//! constructed variables with the same name and kind are distinct, and a
//! variable is only equal to copies of itself. Names on variables are
//! diagnostic, never an identity key.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    dim::Dim, dtype::DataType, relation::TypeRelation, unique::Uid,
};

/// A shared reference to an immutable [`Type`] node.
pub type TypeRef = Arc<Type>;

/// What sort of entity a type variable ranges over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    Type,
    ShapeVar,
    BaseType,
    Shape,
    Constraint,
    AdtHandle,
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Kind::Type => "Type",
            Kind::ShapeVar => "ShapeVar",
            Kind::BaseType => "BaseType",
            Kind::Shape => "Shape",
            Kind::Constraint => "Constraint",
            Kind::AdtHandle => "AdtHandle",
        };

        f.write_str(name)
    }
}

/// A type in the IR.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    /// A concrete tensor shape and element type.
    Tensor(TensorType),
    /// A local, lexically-scoped polymorphic type variable.
    Var(TypeVar),
    /// A type-level name resolvable at program scope.
    GlobalVar(GlobalTypeVar),
    /// A fixed-arity heterogeneous aggregate.
    Tuple(TupleType),
    /// A function signature, possibly polymorphic.
    Func(FuncType),
    /// Application of a type-level constructor to type arguments.
    Call(TypeCall),
    /// A yet-unresolved placeholder produced during inference.
    Incomplete(IncompleteType),
    /// The type of a mutable cell.
    Ref(RefType),
}

impl Type {
    pub fn tensor(shape: impl Into<Box<[Dim]>>, dtype: DataType) -> TypeRef {
        Arc::new(Type::Tensor(TensorType::new(shape, dtype)))
    }

    pub fn scalar(dtype: DataType) -> TypeRef {
        Arc::new(Type::Tensor(TensorType::scalar(dtype)))
    }

    pub fn tuple(fields: impl Into<Box<[TypeRef]>>) -> TypeRef {
        Arc::new(Type::Tuple(TupleType::new(fields)))
    }

    /// The empty tuple.
    pub fn unit() -> TypeRef {
        Arc::new(Type::Tuple(TupleType::unit()))
    }

    pub fn func(
        arg_types: impl Into<Box<[TypeRef]>>,
        ret_type: TypeRef,
        type_params: impl Into<Box<[TypeVar]>>,
        type_constraints: impl Into<Box<[TypeRelation]>>,
    ) -> TypeRef {
        Arc::new(Type::Func(FuncType::new(
            arg_types,
            ret_type,
            type_params,
            type_constraints,
        )))
    }

    pub fn call(func: TypeRef, args: impl Into<Box<[TypeRef]>>) -> TypeRef {
        Arc::new(Type::Call(TypeCall::new(func, args)))
    }

    pub fn incomplete(kind: Kind) -> TypeRef {
        Arc::new(Type::Incomplete(IncompleteType::fresh(kind)))
    }

    pub fn reference(value: TypeRef) -> TypeRef {
        Arc::new(Type::Ref(RefType::new(value)))
    }

    /// Returns `true` if the type is [`Incomplete`].
    ///
    /// [`Incomplete`]: Type::Incomplete
    #[must_use]
    pub fn is_incomplete(&self) -> bool {
        matches!(self, Type::Incomplete(..))
    }

    pub fn as_tensor(&self) -> Option<&TensorType> {
        match self {
            Type::Tensor(tensor) => Some(tensor),
            _ => None,
        }
    }

    pub fn as_func(&self) -> Option<&FuncType> {
        match self {
            Type::Func(func) => Some(func),
            _ => None,
        }
    }

    /// Returns `true` if and only if no [`IncompleteType`] is reachable from
    /// `self`. A fully checked program contains only complete types.
    pub fn is_complete(&self) -> bool {
        match self {
            Type::Tensor(_) | Type::Var(_) | Type::GlobalVar(_) => true,
            Type::Incomplete(_) => false,
            Type::Tuple(tuple) => {
                tuple.fields.iter().all(|field| field.is_complete())
            }
            Type::Call(call) => {
                call.func.is_complete()
                    && call.args.iter().all(|arg| arg.is_complete())
            }
            Type::Func(func) => {
                func.arg_types.iter().all(|arg| arg.is_complete())
                    && func.ret_type.is_complete()
                    && func
                        .type_constraints
                        .iter()
                        .flat_map(|constraint| constraint.args.iter())
                        .all(|arg| arg.is_complete())
            }
            Type::Ref(reference) => reference.value.is_complete(),
        }
    }
}

impl From<TypeVar> for Type {
    fn from(var: TypeVar) -> Self {
        Type::Var(var)
    }
}

impl From<GlobalTypeVar> for Type {
    fn from(var: GlobalTypeVar) -> Self {
        Type::GlobalVar(var)
    }
}

/// A concrete tensor type: an ordered shape and an element type.
#[derive(Debug, Clone, PartialEq)]
pub struct TensorType {
    pub shape: Box<[Dim]>,
    pub dtype: DataType,
}

impl TensorType {
    pub fn new(shape: impl Into<Box<[Dim]>>, dtype: DataType) -> Self {
        TensorType {
            shape: shape.into(),
            dtype,
        }
    }

    /// A rank-0 tensor; sugar for [`TensorType::new`] with an empty shape.
    pub fn scalar(dtype: DataType) -> Self {
        Self::new([] as [Dim; 0], dtype)
    }

    /// The number of elements, as a dimension expression.
    ///
    /// An empty shape has size `1`. Otherwise the shape is folded
    /// left-to-right with [`Dim::mul`]; the folding order is part of the
    /// contract, since symbolic dimension products are not reorderable.
    pub fn size(&self) -> Dim {
        let mut dims = self.shape.iter();

        let Some(head) = dims.next() else {
            return Dim::Const(1);
        };

        dims.fold(head.clone(), |acc, dim| acc.mul(dim.clone()))
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }
}

/// A local polymorphic type variable; see the module docs for the identity
/// rule.
#[derive(Debug, Clone)]
pub struct TypeVar {
    uid: Uid,
    pub name: Box<str>,
    pub kind: Kind,
}

impl TypeVar {
    pub fn fresh(name: impl Into<Box<str>>, kind: Kind) -> Self {
        TypeVar {
            uid: Uid::fresh(),
            name: name.into(),
            kind,
        }
    }

    pub fn uid(&self) -> Uid {
        self.uid
    }

    /// Wraps a copy of this variable as a [`Type`] node. The copy shares the
    /// original's identity.
    pub fn to_type(&self) -> TypeRef {
        Arc::new(Type::Var(self.clone()))
    }
}

impl PartialEq for TypeVar {
    fn eq(&self, other: &Self) -> bool {
        self.uid == other.uid
    }
}

impl Eq for TypeVar {}

/// A type-level name scoped to the whole program rather than one signature.
#[derive(Debug, Clone)]
pub struct GlobalTypeVar {
    uid: Uid,
    pub name: Box<str>,
    pub kind: Kind,
}

impl GlobalTypeVar {
    pub fn fresh(name: impl Into<Box<str>>, kind: Kind) -> Self {
        GlobalTypeVar {
            uid: Uid::fresh(),
            name: name.into(),
            kind,
        }
    }

    pub fn uid(&self) -> Uid {
        self.uid
    }

    pub fn to_type(&self) -> TypeRef {
        Arc::new(Type::GlobalVar(self.clone()))
    }
}

impl PartialEq for GlobalTypeVar {
    fn eq(&self, other: &Self) -> bool {
        self.uid == other.uid
    }
}

impl Eq for GlobalTypeVar {}

/// Application of a type-level constructor to arguments.
///
/// Whether `args` matches the arity `func` expects is a semantic question
/// for the solver; nothing is enforced structurally here.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeCall {
    pub func: TypeRef,
    pub args: Box<[TypeRef]>,
}

impl TypeCall {
    pub fn new(func: TypeRef, args: impl Into<Box<[TypeRef]>>) -> Self {
        TypeCall {
            func,
            args: args.into(),
        }
    }
}

/// A placeholder for a type the checker has not determined yet.
///
/// Identity is the whole point: the solver keys its substitution map on
/// [`IncompleteType::uid`], so a placeholder must never be conjured with an
/// existing id.
#[derive(Debug, Clone)]
pub struct IncompleteType {
    uid: Uid,
    pub kind: Kind,
}

impl IncompleteType {
    pub fn fresh(kind: Kind) -> Self {
        IncompleteType {
            uid: Uid::fresh(),
            kind,
        }
    }

    pub fn uid(&self) -> Uid {
        self.uid
    }
}

impl PartialEq for IncompleteType {
    fn eq(&self, other: &Self) -> bool {
        self.uid == other.uid
    }
}

impl Eq for IncompleteType {}

/// A function signature.
///
/// `type_params` scope over this signature only; `type_constraints` are the
/// relations that must hold for any valid instantiation, carried here as
/// data and discharged by the solver.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncType {
    pub arg_types: Box<[TypeRef]>,
    pub ret_type: TypeRef,
    pub type_params: Box<[TypeVar]>,
    pub type_constraints: Box<[TypeRelation]>,
}

impl FuncType {
    pub fn new(
        arg_types: impl Into<Box<[TypeRef]>>,
        ret_type: TypeRef,
        type_params: impl Into<Box<[TypeVar]>>,
        type_constraints: impl Into<Box<[TypeRelation]>>,
    ) -> Self {
        FuncType {
            arg_types: arg_types.into(),
            ret_type,
            type_params: type_params.into(),
            type_constraints: type_constraints.into(),
        }
    }

    pub fn arity(&self) -> usize {
        self.arg_types.len()
    }
}

/// A fixed-arity heterogeneous aggregate. The empty tuple is the unit type.
#[derive(Debug, Clone, PartialEq)]
pub struct TupleType {
    pub fields: Box<[TypeRef]>,
}

impl TupleType {
    pub fn new(fields: impl Into<Box<[TypeRef]>>) -> Self {
        TupleType {
            fields: fields.into(),
        }
    }

    pub fn unit() -> Self {
        Self::new([] as [TypeRef; 0])
    }

    pub fn arity(&self) -> usize {
        self.fields.len()
    }
}

/// The type of a mutable cell holding a `value`-typed item.
///
/// No mutability semantics live at this layer; this only declares the type
/// of the cell's contents.
#[derive(Debug, Clone, PartialEq)]
pub struct RefType {
    pub value: TypeRef,
}

impl RefType {
    pub fn new(value: TypeRef) -> Self {
        RefType { value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_shape_has_unit_size() {
        let scalar = TensorType::scalar(DataType::float32());
        assert_eq!(scalar.size(), Dim::Const(1));
    }

    #[test]
    fn constant_size_folds_to_product() {
        let tensor =
            TensorType::new([Dim::Const(2), Dim::Const(3)], DataType::int32());
        assert_eq!(tensor.size(), Dim::Const(6));
    }

    #[test]
    fn symbolic_size_folds_left_to_right() {
        let tensor = TensorType::new(
            [Dim::var("n"), Dim::Const(3), Dim::var("m")],
            DataType::float32(),
        );

        let expected = Dim::var("n").mul(Dim::Const(3)).mul(Dim::var("m"));
        assert_eq!(tensor.size(), expected);
        assert_eq!(tensor.size().to_string(), "((n*3)*m)");
    }

    #[test]
    fn scalar_is_the_empty_shape_constructor() {
        let sugar = TensorType::scalar(DataType::float32());
        let general = TensorType::new([] as [Dim; 0], DataType::float32());
        assert_eq!(sugar, general);
    }

    #[test]
    fn type_var_identity_is_not_field_equality() {
        let a = TypeVar::fresh("a", Kind::Type);
        let b = TypeVar::fresh("a", Kind::Type);
        assert_ne!(a, b);
        assert_eq!(a, a.clone());

        let g = GlobalTypeVar::fresh("g", Kind::AdtHandle);
        let h = GlobalTypeVar::fresh("g", Kind::AdtHandle);
        assert_ne!(g, h);
    }

    #[test]
    fn incomplete_identity_survives_cloning() {
        let hole = IncompleteType::fresh(Kind::Type);
        assert_eq!(hole, hole.clone());
        assert_ne!(hole, IncompleteType::fresh(Kind::Type));
    }

    #[test]
    fn func_type_round_trips_its_fields() {
        let n = TypeVar::fresh("n", Kind::ShapeVar);
        let arg = Type::tensor([Dim::var("n")], DataType::float32());
        let ret = Type::tensor([Dim::var("n")], DataType::float32());

        let func =
            FuncType::new([arg.clone()], ret.clone(), [n.clone()], []);

        assert_eq!(&*func.arg_types, &[arg][..]);
        assert_eq!(func.ret_type, ret);
        assert_eq!(&*func.type_params, &[n][..]);
        assert!(func.type_constraints.is_empty());
    }

    #[test]
    fn completeness_query() {
        let solid = Type::tensor([Dim::Const(2)], DataType::float32());
        assert!(solid.is_complete());

        let holey = Type::tuple([solid, Type::incomplete(Kind::Type)]);
        assert!(!holey.is_complete());
    }

    #[test]
    fn unit_is_the_empty_tuple() {
        assert_eq!(*Type::unit(), Type::Tuple(TupleType::new([])));
    }
}
