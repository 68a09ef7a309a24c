//! Diagnostic rendering of types.
//!
//! Rendering is double dispatch: [`render`] matches on the variant tag and
//! hands the node to the corresponding method of a [`Render`]
//! implementation, which recurses through [`render`] again for children.
//! The match is exhaustive, so adding a ninth [`Type`] variant fails to
//! compile until every renderer handles it.
//!
//! Output is deterministic for a given tree. The only node that renders an
//! identity token is [`IncompleteType`], which has nothing else to show.
//! Relations render by name and argument list; their callbacks are never
//! invoked here.

use pretty::RcDoc;

use crate::{
    relation::TypeRelation,
    ty::{
        FuncType, GlobalTypeVar, IncompleteType, RefType, TensorType,
        TupleType, Type, TypeCall, TypeVar,
    },
};

/// Render width for [`Display`] impls.
///
/// [`Display`]: std::fmt::Display
const WIDTH: usize = 80;

/// One rendering method per [`Type`] variant, plus one for relations.
pub trait Render {
    fn tensor(&self, ty: &TensorType) -> RcDoc<'static>;
    fn type_var(&self, var: &TypeVar) -> RcDoc<'static>;
    fn global_type_var(&self, var: &GlobalTypeVar) -> RcDoc<'static>;
    fn tuple(&self, ty: &TupleType) -> RcDoc<'static>;
    fn func(&self, ty: &FuncType) -> RcDoc<'static>;
    fn call(&self, ty: &TypeCall) -> RcDoc<'static>;
    fn incomplete(&self, ty: &IncompleteType) -> RcDoc<'static>;
    fn reference(&self, ty: &RefType) -> RcDoc<'static>;
    fn relation(&self, rel: &TypeRelation) -> RcDoc<'static>;
}

/// Dispatches `ty` to the matching method of `renderer`.
pub fn render(ty: &Type, renderer: &dyn Render) -> RcDoc<'static> {
    match ty {
        Type::Tensor(tensor) => renderer.tensor(tensor),
        Type::Var(var) => renderer.type_var(var),
        Type::GlobalVar(var) => renderer.global_type_var(var),
        Type::Tuple(tuple) => renderer.tuple(tuple),
        Type::Func(func) => renderer.func(func),
        Type::Call(call) => renderer.call(call),
        Type::Incomplete(hole) => renderer.incomplete(hole),
        Type::Ref(reference) => renderer.reference(reference),
    }
}

/// The default renderer: `Variant(field, field, ..)` forms mirroring the
/// node structure.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiagPrinter;

fn node(
    name: &'static str,
    parts: impl IntoIterator<Item = RcDoc<'static>>,
) -> RcDoc<'static> {
    RcDoc::text(name)
        .append(RcDoc::text("("))
        .append(RcDoc::intersperse(
            parts,
            RcDoc::text(",").append(RcDoc::space()),
        ))
        .append(RcDoc::text(")"))
}

fn bracketed(
    parts: impl IntoIterator<Item = RcDoc<'static>>,
) -> RcDoc<'static> {
    RcDoc::text("[")
        .append(RcDoc::intersperse(
            parts,
            RcDoc::text(",").append(RcDoc::space()),
        ))
        .append(RcDoc::text("]"))
}

impl Render for DiagPrinter {
    fn tensor(&self, ty: &TensorType) -> RcDoc<'static> {
        let shape =
            bracketed(ty.shape.iter().map(|dim| RcDoc::text(dim.to_string())));

        node("TensorType", [shape, RcDoc::as_string(ty.dtype)])
    }

    fn type_var(&self, var: &TypeVar) -> RcDoc<'static> {
        node(
            "TypeVar",
            [
                RcDoc::text(var.name.to_string()),
                RcDoc::as_string(var.kind),
            ],
        )
    }

    fn global_type_var(&self, var: &GlobalTypeVar) -> RcDoc<'static> {
        node(
            "GlobalTypeVar",
            [
                RcDoc::text(var.name.to_string()),
                RcDoc::as_string(var.kind),
            ],
        )
    }

    fn tuple(&self, ty: &TupleType) -> RcDoc<'static> {
        let fields =
            bracketed(ty.fields.iter().map(|field| render(field, self)));

        node("TupleType", [fields])
    }

    fn func(&self, ty: &FuncType) -> RcDoc<'static> {
        let params =
            bracketed(ty.type_params.iter().map(|param| self.type_var(param)));
        let args =
            bracketed(ty.arg_types.iter().map(|arg| render(arg, self)));
        let ret = render(&ty.ret_type, self);
        let constraints = bracketed(
            ty.type_constraints
                .iter()
                .map(|constraint| self.relation(constraint)),
        );

        node("FuncType", [params, args, ret, constraints])
    }

    fn call(&self, ty: &TypeCall) -> RcDoc<'static> {
        let func = render(&ty.func, self);
        let args = bracketed(ty.args.iter().map(|arg| render(arg, self)));

        node("TypeCall", [func, args])
    }

    fn incomplete(&self, ty: &IncompleteType) -> RcDoc<'static> {
        node(
            "IncompleteType",
            [RcDoc::as_string(ty.kind), RcDoc::as_string(ty.uid())],
        )
    }

    fn reference(&self, ty: &RefType) -> RcDoc<'static> {
        node("RefType", [render(&ty.value, self)])
    }

    fn relation(&self, rel: &TypeRelation) -> RcDoc<'static> {
        let args = bracketed(rel.args.iter().map(|arg| render(arg, self)));

        node(
            "TypeRelation",
            [RcDoc::text(rel.func.name().to_string()), args],
        )
    }
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", render(self, &DiagPrinter).pretty(WIDTH))
    }
}

impl std::fmt::Display for TypeRelation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", DiagPrinter.relation(self).pretty(WIDTH))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dim::Dim,
        dtype::DataType,
        relation::{Attrs, RelationFn},
        ty::Kind,
    };

    #[test]
    fn tensor_form() {
        let ty = Type::tensor(
            [Dim::Const(2), Dim::Const(3)],
            DataType::float32(),
        );
        assert_eq!(ty.to_string(), "TensorType([2, 3], float32)");
    }

    #[test]
    fn scalar_prints_like_the_general_form() {
        let sugar = Type::scalar(DataType::int64());
        let general = Type::tensor([] as [Dim; 0], DataType::int64());
        assert_eq!(sugar.to_string(), general.to_string());
        assert_eq!(sugar.to_string(), "TensorType([], int64)");
    }

    #[test]
    fn tuple_renders_fields_recursively_in_order() {
        let a = TypeVar::fresh("a", Kind::Type);
        let tuple = Type::tuple([
            Type::tensor([Dim::Const(2), Dim::Const(3)], DataType::int32()),
            a.to_type(),
        ]);

        assert_eq!(
            tuple.to_string(),
            "TupleType([TensorType([2, 3], int32), TypeVar(a, Type)])"
        );
    }

    #[test]
    fn printing_is_deterministic() {
        let tree = Type::tuple([
            Type::tensor([Dim::var("n")], DataType::float32()),
            Type::reference(Type::unit()),
        ]);

        assert_eq!(tree.to_string(), tree.to_string());
    }

    #[test]
    fn func_renders_params_args_ret_constraints_in_order() {
        let n = TypeVar::fresh("n", Kind::ShapeVar);
        let vec = Type::tensor([Dim::var("n")], DataType::float32());

        let func = Type::func([vec.clone()], vec, [n], []);

        assert_eq!(
            func.to_string(),
            "FuncType([TypeVar(n, ShapeVar)], \
             [TensorType([n], float32)], TensorType([n], float32), [])"
        );
    }

    #[test]
    fn incomplete_renders_its_identity_token() {
        let hole = Type::incomplete(Kind::Type);

        let Type::Incomplete(node) = &*hole else {
            unreachable!()
        };

        assert_eq!(
            hole.to_string(),
            format!("IncompleteType(Type, {})", node.uid())
        );
    }

    #[test]
    fn relation_renders_by_name_and_args_only() {
        let rel = TypeRelation::new(
            RelationFn::named("broadcast"),
            [
                Type::tensor([Dim::Const(1), Dim::Const(4)], DataType::float32()),
                Type::tensor([Dim::Const(3), Dim::Const(1)], DataType::float32()),
            ],
            2,
            Attrs::new(),
        )
        .unwrap();

        assert_eq!(
            rel.to_string(),
            "TypeRelation(broadcast, [TensorType([1, 4], float32), \
             TensorType([3, 1], float32)])"
        );
    }

    #[test]
    fn call_and_ref_forms() {
        let list = GlobalTypeVar::fresh("list", Kind::AdtHandle);
        let call =
            Type::call(list.to_type(), [Type::scalar(DataType::int32())]);

        assert_eq!(
            call.to_string(),
            "TypeCall(GlobalTypeVar(list, AdtHandle), \
             [TensorType([], int32)])"
        );

        let cell = Type::reference(Type::scalar(DataType::bool_()));
        assert_eq!(cell.to_string(), "RefType(TensorType([], uint1))");
    }
}
