//! `define_contract!`

/// Declare a static contract
///
/// Generates a unit struct implementing [`ContractType`](crate::contract::ContractType)
/// and one typed [`PropertyRef`](crate::contract::PropertyRef) constant per
/// declared property. Accessor shapes name the `AccessorShape` constants.
///
/// ```
/// use dtoforge_core::define_contract;
/// use dtoforge_core::contract::ContractType;
///
/// define_contract! {
///     pub struct Article {
///         id: i64 = GET,
///     }
/// }
///
/// define_contract! {
///     pub struct Priced: Article {
///         price: f64 = GET_SET,
///     }
///     restricted {
///         obsolete: bool = GET_SET,
///     }
/// }
///
/// assert_eq!(Priced::price.name(), "price");
/// assert_eq!(Priced::contract().parents().len(), 1);
/// ```
#[macro_export]
macro_rules! define_contract {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident $(: $($parent:ty),+ )? {
            $( $field:ident : $fty:ty = $shape:ident ),* $(,)?
        }
        $( restricted {
            $( $rfield:ident : $rty:ty = $rshape:ident ),* $(,)?
        } )?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        $vis struct $name;

        #[allow(non_upper_case_globals)]
        impl $name {
            $(
                /// Property reference
                pub const $field: $crate::contract::PropertyRef<$name, $fty> =
                    $crate::contract::PropertyRef::new(stringify!($field));
            )*
            $($(
                /// Restricted property reference
                pub const $rfield: $crate::contract::PropertyRef<$name, $rty> =
                    $crate::contract::PropertyRef::new(stringify!($rfield));
            )*)?
        }

        impl $crate::contract::ContractType for $name {
            fn contract() -> ::std::sync::Arc<$crate::contract::Contract> {
                static CONTRACT: ::std::sync::OnceLock<::std::sync::Arc<$crate::contract::Contract>> =
                    ::std::sync::OnceLock::new();
                ::std::sync::Arc::clone(CONTRACT.get_or_init(|| {
                    $crate::contract::Contract::builder(stringify!($name))
                        $($( .extends(<$parent as $crate::contract::ContractType>::contract()) )+)?
                        $( .property::<$fty>(stringify!($field), $crate::contract::AccessorShape::$shape) )*
                        $($( .restricted::<$rty>(stringify!($rfield), $crate::contract::AccessorShape::$rshape) )*)?
                        .build()
                }))
            }
        }
    };
}
