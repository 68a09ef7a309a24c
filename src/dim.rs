//! Symbolic-or-constant tensor dimension expressions.
//!
//! Tensor shapes are sequences of [`Dim`] values. A dimension is either a
//! known constant, a named symbolic extent, the unbound [`Dim::Any`], or a
//! product of two dimensions. Products only arise from [`Dim::mul`], which
//! is also the folding step of [`TensorType::size`]; the fold is strictly
//! left-to-right, so `size([n, 3, m])` is `(n * 3) * m` and not some
//! reassociation of it. This matters because dimension arithmetic is not
//! assumed to be safe to reorder when extents are symbolic.
//!
//! [`TensorType::size`]: crate::ty::TensorType::size

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A single dimension of a tensor shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dim {
    /// A compile-time-known extent.
    Const(i64),
    /// A named symbolic extent.
    Var(Box<str>),
    /// An unbound extent, compatible with anything; resolved downstream.
    Any,
    /// A product of two dimensions, produced by [`Dim::mul`].
    Mul(Arc<Dim>, Arc<Dim>),
}

impl Dim {
    pub fn var(name: impl Into<Box<str>>) -> Self {
        Dim::Var(name.into())
    }

    /// Multiplies two dimensions, folding constants eagerly.
    ///
    /// A `Const * Const` product that would overflow `i64` is left as a
    /// symbolic [`Dim::Mul`] node rather than wrapping.
    pub fn mul(self, rhs: Dim) -> Dim {
        if let (Dim::Const(a), Dim::Const(b)) = (&self, &rhs) {
            if let Some(product) = a.checked_mul(*b) {
                return Dim::Const(product);
            }
        }

        Dim::Mul(Arc::new(self), Arc::new(rhs))
    }

    /// Returns `true` if the dim is [`Any`].
    ///
    /// [`Any`]: Dim::Any
    #[must_use]
    pub fn is_any(&self) -> bool {
        matches!(self, Dim::Any)
    }

    pub fn as_const(&self) -> Option<i64> {
        match self {
            Dim::Const(extent) => Some(*extent),
            _ => None,
        }
    }
}

impl From<i64> for Dim {
    fn from(extent: i64) -> Self {
        Dim::Const(extent)
    }
}

impl std::fmt::Display for Dim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dim::Const(extent) => write!(f, "{extent}"),
            Dim::Var(name) => write!(f, "{name}"),
            Dim::Any => write!(f, "?"),
            Dim::Mul(lhs, rhs) => write!(f, "({lhs}*{rhs})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Dim;

    #[test]
    fn constant_folding() {
        assert_eq!(Dim::Const(2).mul(Dim::Const(3)), Dim::Const(6));
    }

    #[test]
    fn overflow_stays_symbolic() {
        let product = Dim::Const(i64::MAX).mul(Dim::Const(2));
        assert!(matches!(product, Dim::Mul(..)));
    }

    #[test]
    fn symbolic_product_keeps_operand_order() {
        let product = Dim::var("n").mul(Dim::Const(3));
        assert_eq!(product.to_string(), "(n*3)");

        let flipped = Dim::Const(3).mul(Dim::var("n"));
        assert_ne!(product, flipped);
    }

    #[test]
    fn display_forms() {
        assert_eq!(Dim::Const(4).to_string(), "4");
        assert_eq!(Dim::var("n").to_string(), "n");
        assert_eq!(Dim::Any.to_string(), "?");
    }
}
