//! String-backed identity newtypes.
//!
//! Catalog ids arrive as JSON numbers from the RAWG API and as strings from
//! form fields and persisted state. Use the `define_string_id!` macro to
//! create wrappers that normalise both forms to the same identity.

/// Macro to define a string-backed identity wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize` with `#[serde(transparent)]`
/// - `Deserialize` accepting either a JSON string or a JSON integer
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Construction that trims surrounding whitespace
/// - `From<&str>`, `From<String>` and `From` for the integer types
///
/// # Example
///
/// ```rust
/// # use jm_games_core::define_string_id;
/// define_string_id!(GameId);
///
/// assert_eq!(GameId::from(1234_u64), GameId::from("1234"));
/// assert_eq!(GameId::from(" 42 ").as_str(), "42");
/// ```
#[macro_export]
macro_rules! define_string_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new id, trimming surrounding whitespace.
            #[must_use]
            pub fn new(id: impl AsRef<str>) -> Self {
                Self(id.as_ref().trim().to_owned())
            }

            /// Get the normalised string form.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Whether the id is empty after normalisation.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            /// Consume the id and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self::new(id)
            }
        }

        impl From<&$name> for $name {
            fn from(id: &$name) -> Self {
                id.clone()
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id.to_string())
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id.to_string())
            }
        }

        impl From<u32> for $name {
            fn from(id: u32) -> Self {
                Self(id.to_string())
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id.to_string())
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::core::result::Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                struct IdVisitor;

                impl ::serde::de::Visitor<'_> for IdVisitor {
                    type Value = $name;

                    fn expecting(
                        &self,
                        f: &mut ::core::fmt::Formatter<'_>,
                    ) -> ::core::fmt::Result {
                        f.write_str("a string or integer identifier")
                    }

                    fn visit_str<E>(self, v: &str) -> ::core::result::Result<Self::Value, E>
                    where
                        E: ::serde::de::Error,
                    {
                        Ok($name::new(v))
                    }

                    fn visit_u64<E>(self, v: u64) -> ::core::result::Result<Self::Value, E>
                    where
                        E: ::serde::de::Error,
                    {
                        Ok($name::from(v))
                    }

                    fn visit_i64<E>(self, v: i64) -> ::core::result::Result<Self::Value, E>
                    where
                        E: ::serde::de::Error,
                    {
                        Ok($name::from(v))
                    }
                }

                deserializer.deserialize_any(IdVisitor)
            }
        }
    };
}

// Catalog product identity (RAWG game id)
define_string_id!(ProductId);

// Genre or platform slug used in catalog filters
define_string_id!(Slug);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_and_string_ids_are_equal() {
        assert_eq!(ProductId::from(1234_u64), ProductId::from("1234"));
        assert_eq!(ProductId::from(1234_i64), ProductId::from(String::from("1234")));
    }

    #[test]
    fn test_id_is_trimmed() {
        let id = ProductId::from("  3498 ");
        assert_eq!(id.as_str(), "3498");
        assert!(ProductId::from("   ").is_empty());
    }

    #[test]
    fn test_deserialize_from_number_or_string() {
        let from_number: ProductId = serde_json::from_str("3498").unwrap();
        let from_string: ProductId = serde_json::from_str("\"3498\"").unwrap();
        assert_eq!(from_number, from_string);
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&ProductId::from(7_u32)).unwrap();
        assert_eq!(json, "\"7\"");
    }

    #[test]
    fn test_deserialize_rejects_objects() {
        let result: Result<Slug, _> = serde_json::from_str("{\"slug\":\"action\"}");
        assert!(result.is_err());
    }
}
