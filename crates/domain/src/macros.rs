//! Macro for implementing Display and FromStr for wire-name enums
//!
//! Several small enums travel over the wire as fixed tokens (HTTP methods,
//! for instance). This macro maps each variant to its canonical token and
//! parses tokens back case-insensitively.
//!
//! # Example
//!
//! ```rust
//! use smartthings_domain::impl_wire_name_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Grant {
//!     RefreshToken,
//!     ClientCredentials,
//! }
//!
//! impl_wire_name_conversions!(Grant {
//!     RefreshToken => "refresh_token",
//!     ClientCredentials => "client_credentials",
//! });
//!
//! assert_eq!("REFRESH_TOKEN".parse::<Grant>().unwrap(), Grant::RefreshToken);
//! assert_eq!(Grant::ClientCredentials.to_string(), "client_credentials");
//! ```

/// Implements Display and FromStr traits for wire-name enums
///
/// This macro generates:
/// - Display trait: writes the canonical token of the variant
/// - FromStr trait: accepts the token in any ASCII case
///
/// # Arguments
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their canonical tokens
#[macro_export]
macro_rules! impl_wire_name_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(
                    if s.eq_ignore_ascii_case($str) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(format!("Invalid {}: {}", stringify!($enum_name), s))
            }
        }
    };
}
