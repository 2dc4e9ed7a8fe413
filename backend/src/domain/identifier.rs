//! UUID-backed entity identifiers.

/// Error returned when parsing an identifier from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    /// The value was not a UUID.
    #[error("identifier must be a valid UUID")]
    Invalid,
    /// The value was the nil UUID.
    #[error("identifier must not be the nil UUID")]
    Nil,
}

/// Declare a `Copy` newtype around [`uuid::Uuid`] with parsing, display and
/// transparent serde support.
macro_rules! define_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(uuid::Uuid);

        impl $name {
            /// Generate a new random identifier.
            #[must_use]
            pub fn random() -> Self {
                Self(uuid::Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Access the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &uuid::Uuid {
                &self.0
            }

            /// Whether this is the nil UUID.
            #[must_use]
            pub fn is_nil(&self) -> bool {
                self.0.is_nil()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::domain::identifier::IdentifierError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let uuid = uuid::Uuid::parse_str(s.trim())
                    .map_err(|_| $crate::domain::identifier::IdentifierError::Invalid)?;
                if uuid.is_nil() {
                    return Err($crate::domain::identifier::IdentifierError::Nil);
                }
                Ok(Self(uuid))
            }
        }

        impl From<uuid::Uuid> for $name {
            fn from(value: uuid::Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$name> for uuid::Uuid {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

pub(crate) use define_identifier;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use uuid::Uuid;

    define_identifier!(
        /// Identifier used only by these tests.
        SampleId
    );

    #[rstest]
    fn parses_valid_uuid() {
        let uuid = Uuid::new_v4();
        let id: SampleId = uuid.to_string().parse().expect("valid id");
        assert_eq!(id.as_uuid(), &uuid);
    }

    #[rstest]
    #[case("nope", IdentifierError::Invalid)]
    #[case("00000000-0000-0000-0000-000000000000", IdentifierError::Nil)]
    fn rejects_bad_input(#[case] input: &str, #[case] expected: IdentifierError) {
        assert_eq!(input.parse::<SampleId>(), Err(expected));
    }

    #[rstest]
    fn serialises_as_plain_string() {
        let id = SampleId::from_uuid(Uuid::nil());
        let json = serde_json::to_string(&id).expect("serialise");
        assert_eq!(json, "\"00000000-0000-0000-0000-000000000000\"");
    }
}
