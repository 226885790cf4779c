//! Macro for implementing Display and FromStr for kind enums
//!
//! Kind enums (repeat kinds, and the like) arrive from the surrounding
//! application as loosely-cased strings. This macro gives them a single
//! canonical spelling for output and case-insensitive parsing on input,
//! failing with a caller-chosen tuple-struct error that carries the
//! rejected text.
//!
//! # Example
//!
//! ```rust
//! use slotwise_domain::impl_domain_kind_conversions;
//!
//! #[derive(Debug)]
//! pub struct UnknownColor(pub String);
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Color {
//!     Red,
//!     Green,
//! }
//!
//! impl_domain_kind_conversions!(Color, UnknownColor {
//!     Red => "RED",
//!     Green => "GREEN",
//! });
//!
//! assert_eq!("green".parse::<Color>().unwrap(), Color::Green);
//! assert_eq!(Color::Red.to_string(), "RED");
//! ```

/// Implements Display and FromStr traits for kind enums
///
/// * `$enum_name` - The name of the enum type
/// * `$error` - Tuple-struct error constructed from the rejected input
/// * `$variant => $str` - Mapping of enum variants to their canonical names
#[macro_export]
macro_rules! impl_domain_kind_conversions {
    ($enum_name:ident, $error:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = $error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                $(
                    if trimmed.eq_ignore_ascii_case($str) {
                        return Ok(Self::$variant);
                    }
                )+
                Err($error(s.to_string()))
            }
        }
    };
}
