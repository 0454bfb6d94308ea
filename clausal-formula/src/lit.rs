//! Variables and literals.
use std::{fmt, ops};

/// Integer type backing variable indices and literal codes.
pub type LitIdx = u32;

/// A propositional variable.
///
/// Variables are stored as 0-based indices. Their external id is 1-based, so that a literal can be
/// written as a signed integer with the sign giving its sense. The id `0` is never a variable.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Var {
    index: LitIdx,
}

impl Var {
    /// Largest supported index, leaving room for the sense bit of a literal.
    pub const MAX_INDEX: usize = (LitIdx::max_value() >> 2) as usize;

    /// The variable with the given 0-based index.
    #[inline]
    pub fn from_index(index: usize) -> Var {
        debug_assert!(index <= Var::MAX_INDEX);
        Var {
            index: index as LitIdx,
        }
    }

    /// The variable with the given 1-based id.
    #[inline]
    pub fn from_id(id: isize) -> Var {
        debug_assert!(id > 0);
        Var::from_index((id - 1) as usize)
    }

    /// 0-based index of this variable.
    #[inline]
    pub const fn index(self) -> usize {
        self.index as usize
    }

    /// 1-based id of this variable.
    #[inline]
    pub fn id(self) -> isize {
        self.index as isize + 1
    }

    /// The literal of this variable with the given sense.
    #[inline]
    pub fn lit(self, sense: bool) -> Lit {
        Lit::new(self, sense)
    }

    #[inline]
    pub fn positive(self) -> Lit {
        self.lit(true)
    }

    #[inline]
    pub fn negative(self) -> Lit {
        self.lit(false)
    }
}

impl fmt::Debug for Var {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A literal, i.e. a variable together with the sense it is required to have.
///
/// The literal is encoded as `2 * index` for the true sense and `2 * index + 1` for the false
/// sense. This `code` is used to index per-literal data like watcher lists; the two literals of a
/// variable occupy neighboring slots and negation just flips the lowest bit.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Lit {
    code: LitIdx,
}

impl Lit {
    /// The literal of `var` with the given sense.
    #[inline]
    pub fn new(var: Var, sense: bool) -> Lit {
        Lit {
            code: (var.index << 1) | (!sense as LitIdx),
        }
    }

    /// The literal of the variable with the given 0-based index.
    #[inline]
    pub fn from_index(index: usize, sense: bool) -> Lit {
        Lit::new(Var::from_index(index), sense)
    }

    /// Parses the signed integer form, where the absolute value is the variable id and negative
    /// values denote the false sense.
    ///
    /// Zero is not a literal.
    #[inline]
    pub fn from_signed(number: isize) -> Lit {
        debug_assert!(number != 0, "0 is not a literal");
        Lit::new(Var::from_id(number.abs()), number > 0)
    }

    /// Signed integer form, inverse of [`from_signed`](Lit::from_signed).
    #[inline]
    pub fn to_signed(self) -> isize {
        if self.sense() {
            self.var().id()
        } else {
            -self.var().id()
        }
    }

    /// The literal with the given code.
    #[inline]
    pub fn from_code(code: usize) -> Lit {
        debug_assert!(code <= Var::MAX_INDEX * 2 + 1);
        Lit {
            code: code as LitIdx,
        }
    }

    /// Per-literal index, see the type level documentation.
    #[inline]
    pub fn code(self) -> usize {
        self.code as usize
    }

    #[inline]
    pub fn var(self) -> Var {
        Var {
            index: self.code >> 1,
        }
    }

    /// 0-based index of the variable.
    #[inline]
    pub fn index(self) -> usize {
        (self.code >> 1) as usize
    }

    /// The value the variable must take to make this literal true.
    #[inline]
    pub fn sense(self) -> bool {
        self.code & 1 == 0
    }

    #[inline]
    pub fn is_negative(self) -> bool {
        !self.sense()
    }
}

impl ops::Not for Lit {
    type Output = Lit;

    #[inline]
    fn not(self) -> Lit {
        Lit {
            code: self.code ^ 1,
        }
    }
}

/// Negates the literal when the right hand side is true.
impl ops::BitXor<bool> for Lit {
    type Output = Lit;

    #[inline]
    fn bitxor(self, rhs: bool) -> Lit {
        Lit {
            code: self.code ^ (rhs as LitIdx),
        }
    }
}

impl From<Var> for Lit {
    #[inline]
    fn from(var: Var) -> Lit {
        var.positive()
    }
}

impl fmt::Debug for Lit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_signed())
    }
}

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(any(test, feature = "proptest-strategies"))]
#[doc(hidden)]
pub mod strategy {
    use super::*;
    use proptest::{prelude::*, *};

    pub fn var(index: impl Strategy<Value = usize>) -> impl Strategy<Value = Var> {
        index.prop_map(Var::from_index)
    }

    pub fn lit(index: impl Strategy<Value = usize>) -> impl Strategy<Value = Lit> {
        (var(index), bool::ANY).prop_map(|(var, sense)| var.lit(sense))
    }
}
