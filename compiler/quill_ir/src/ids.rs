//! Arena indices.

use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub const fn new(index: u32) -> Self {
                $name(index)
            }

            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }

            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }
    };
}

define_id!(
    /// Index of an expression in [`Program`](crate::Program).
    ExprId
);
define_id!(
    /// Index of a statement in [`Program`](crate::Program).
    StmtId
);
define_id!(
    /// Index of a function (the program body is function 0).
    FuncId
);
define_id!(
    /// Index of a variable occurrence: a declaration site or a reference.
    VarId
);

crate::static_assert_size!(ExprId, 4);
crate::static_assert_size!(Option<StmtId>, 8);
