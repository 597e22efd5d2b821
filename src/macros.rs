/// Defines an open set of named protocol constants backed by a raw integer.
///
/// Unlike a Rust `enum`, the resulting type can hold any value of `$native`, so codes that were
/// added to the protocol after this crate was written still round-trip without loss.
macro_rules! ffi_enum {
    (
        $( #[$attrs:meta] )*
        $v:vis enum $name:ident: $native:ty {
            $(
                $( #[$variant_attrs:meta] )*
                $variant:ident = $value:expr
            ),+
            $(,)?
        }
    ) => {
        $( #[$attrs] )*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(transparent)]
        $v struct $name(pub(crate) $native);

        impl $name {
            $(
                $( #[$variant_attrs] )*
                $v const $variant: Self = Self($value);
            )+

            /// Wraps a raw protocol value.
            #[inline]
            $v const fn from_raw(raw: $native) -> Self {
                Self(raw)
            }

            /// Returns the raw protocol value.
            #[inline]
            $v const fn raw(self) -> $native {
                self.0
            }

            #[allow(dead_code, unreachable_patterns)]
            fn variant_name(&self) -> Option<&'static str> {
                match self {
                    $(
                        &Self::$variant => Some(stringify!($variant)),
                    )*
                    _ => None,
                }
            }

            #[allow(dead_code)]
            fn from_variant_name(name: &str) -> Option<Self> {
                match name {
                    $(
                        stringify!($variant) => Some(Self::$variant),
                    )*
                    _ => None,
                }
            }
        }
    };
}
