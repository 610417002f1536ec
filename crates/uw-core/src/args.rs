//! Positional update arguments
//!
//! Lets an update method forward one `OptionalValue<_>` per intent as a tuple
//! instead of building a `RawUpdate` slice by hand.

use uw_shape::{Field, OptionalValue, RawUpdate};

/// Tuple of typed update values, one per intent
pub trait UpdateArgs {
    /// Number of values carried
    const ARITY: usize;

    /// Erase into positional raw values
    fn into_raw(self) -> Vec<RawUpdate>;
}

macro_rules! impl_update_args {
    ($arity:expr; $($name:ident),+) => {
        impl<$($name: Field),+> UpdateArgs for ($(OptionalValue<$name>,)+) {
            const ARITY: usize = $arity;

            #[allow(non_snake_case)]
            fn into_raw(self) -> Vec<RawUpdate> {
                let ($($name,)+) = self;
                vec![$($name.erase()),+]
            }
        }
    };
}

impl_update_args!(1; A);
impl_update_args!(2; A, B);
impl_update_args!(3; A, B, C);
impl_update_args!(4; A, B, C, D);
impl_update_args!(5; A, B, C, D, E);
impl_update_args!(6; A, B, C, D, E, F);
impl_update_args!(7; A, B, C, D, E, F, G);
impl_update_args!(8; A, B, C, D, E, F, G, H);
impl_update_args!(9; A, B, C, D, E, F, G, H, I);

#[cfg(test)]
mod tests {
    use super::*;
    use uw_shape::{FieldValue, TypeRef};

    #[test]
    fn single_value_tuple() {
        let raw = (OptionalValue::Set("x".to_string()),).into_raw();
        assert_eq!(raw, vec![OptionalValue::Set(FieldValue::new("x".to_string()))]);
        assert_eq!(<(OptionalValue<String>,) as UpdateArgs>::ARITY, 1);
    }

    #[test]
    fn order_and_unset_preserved() {
        let raw = (
            OptionalValue::Set(1_u32),
            OptionalValue::<String>::Unset,
            OptionalValue::Set(None::<u32>),
        )
            .into_raw();

        assert_eq!(raw.len(), 3);
        assert_eq!(raw[0].value_type(), Some(TypeRef::of::<u32>()));
        assert_eq!(raw[1], RawUpdate::Unset);
        assert_eq!(raw[2].value_type(), Some(TypeRef::of::<Option<u32>>()));
    }

    #[test]
    fn nine_values() {
        let raw = (
            OptionalValue::Set(1_u8),
            OptionalValue::Set(2_u8),
            OptionalValue::Set(3_u8),
            OptionalValue::Set(4_u8),
            OptionalValue::Set(5_u8),
            OptionalValue::Set(6_u8),
            OptionalValue::Set(7_u8),
            OptionalValue::Set(8_u8),
            OptionalValue::Set(9_u8),
        )
            .into_raw();
        assert_eq!(raw.len(), 9);
        assert_eq!(raw[8].as_set().and_then(|v| v.downcast::<u8>()), Some(9));
    }
}
