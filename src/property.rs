//! Fixed tag enumerations for the categorical families.
pub mod east_asian_width;
pub mod word_break;

use std::fmt::Debug;

pub use east_asian_width::EastAsianWidth;
pub use word_break::WordBreak;

/// A closed set of property values as spelled in the character database.
pub trait PropertyTag: Copy + Eq + Debug + Send + Sync + 'static {
    /// Value used for unlisted code points when no directive says otherwise.
    const BUILTIN_FALLBACK: Self;

    fn from_name(name: &str) -> Option<Self>;

    fn name(self) -> &'static str;
}

/// Declare a tag enum whose variants map one-to-one onto database spellings.
/// Variant order is the runtime ordinal order; the first variant is the
/// built-in fallback.
macro_rules! property_tags {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $first:ident => $first_spelling:literal,
            $($variant:ident => $spelling:literal,)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $first,
            $($variant,)*
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$name::$first, $($name::$variant,)*];
        }

        impl $crate::property::PropertyTag for $name {
            const BUILTIN_FALLBACK: Self = $name::$first;

            fn from_name(name: &str) -> Option<Self> {
                match name {
                    $first_spelling => Some($name::$first),
                    $($spelling => Some($name::$variant),)*
                    _ => None,
                }
            }

            fn name(self) -> &'static str {
                match self {
                    $name::$first => $first_spelling,
                    $($name::$variant => $spelling,)*
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($crate::property::PropertyTag::name(*self))
            }
        }
    };
}

pub(crate) use property_tags;

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for &tag in WordBreak::ALL {
            assert_eq!(WordBreak::from_name(tag.name()), Some(tag));
        }
        for &tag in EastAsianWidth::ALL {
            assert_eq!(EastAsianWidth::from_name(tag.name()), Some(tag));
        }
    }

    #[test]
    fn builtin_fallbacks() {
        assert_eq!(WordBreak::BUILTIN_FALLBACK, WordBreak::Other);
        assert_eq!(EastAsianWidth::BUILTIN_FALLBACK, EastAsianWidth::Neutral);
    }

    #[test]
    fn unknown_spellings_are_rejected() {
        assert_eq!(WordBreak::from_name("Letter"), None);
        assert_eq!(WordBreak::from_name("aletter"), None);
        assert_eq!(EastAsianWidth::from_name("Wide"), None);
    }
}
