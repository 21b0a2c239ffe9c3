//! Inputs - the cells a rule is allowed to read.

use super::Handle;

/// A set of cell handles handed to a derivation rule.
///
/// Implemented for `()`, a single handle, and tuples of up to eight
/// handles. `names` reports the cells in declaration order.
pub trait Inputs {
    fn names(&self) -> Vec<&'static str>;
}

impl Inputs for () {
    fn names(&self) -> Vec<&'static str> { Vec::new() }
}

impl<T: Clone + 'static> Inputs for Handle<T> {
    fn names(&self) -> Vec<&'static str> { vec![self.name()] }
}

macro_rules! tuple_inputs {
    ($($input:ident),+) => {
        impl<$($input: Inputs),+> Inputs for ($($input,)+) {
            #[allow(non_snake_case)]
            fn names(&self) -> Vec<&'static str> {
                let ($($input,)+) = self;
                let mut names = Vec::new();
                $(names.extend($input.names());)+
                names
            }
        }
    };
}

tuple_inputs!(A);
tuple_inputs!(A, B);
tuple_inputs!(A, B, C);
tuple_inputs!(A, B, C, D);
tuple_inputs!(A, B, C, D, E);
tuple_inputs!(A, B, C, D, E, F);
tuple_inputs!(A, B, C, D, E, F, G);
tuple_inputs!(A, B, C, D, E, F, G, H);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::Attribute;

    #[test]
    fn test_tuple_names_in_order() {
        let a = Attribute::<u32>::new("a", "INDEX", "", |v| v.to_string(), |_| Ok(0));
        let b = Attribute::<u32>::new("b", "INDEX", "", |v| v.to_string(), |_| Ok(0));
        assert_eq!((b.clone(), a.clone()).names(), vec!["b", "a"]);
        assert!(().names().is_empty());
    }
}
