//! `define_port_error!` builds the error enums returned by driven ports.
//!
//! Each variant is written as `Variant { field: Ty, .. } => "display"` or as a
//! bare `Variant => "display"`. The macro derives `thiserror::Error` and adds
//! a snake_case constructor per variant whose arguments accept anything that
//! converts into the declared field type.

macro_rules! define_port_error {
    (@constructor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@constructor $variant:ident { $($field:ident : $ty:ty),+ }) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($field: impl Into<$ty>),+) -> Self {
                Self::$variant { $($field: $field.into()),+ }
            }
        }
    };

    (
        $(#[$enum_meta:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $({ $($field:ident : $ty:ty),+ $(,)? })? => $display:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($display)]
                $variant $({ $($field: $ty),+ })?,
            )+
        }

        impl $name {
            $(
                define_port_error!(@constructor $variant $({ $($field: $ty),+ })?);
            )+
        }
    };
}

pub(crate) use define_port_error;
