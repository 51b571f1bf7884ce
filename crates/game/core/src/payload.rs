//! Opaque text payloads exchanged between environments and producers.
//!
//! The runtime never inspects either payload; environments define their own
//! wire format on top of plain text.
use core::fmt;

macro_rules! text_payload {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(String);

        impl $name {
            pub fn new(text: impl Into<String>) -> Self {
                Self(text.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            /// Returns at most `max_chars` characters, appending `...` when cut.
            pub fn preview(&self, max_chars: usize) -> String {
                match self.0.char_indices().nth(max_chars) {
                    Some((cut, _)) => format!("{}...", &self.0[..cut]),
                    None => self.0.clone(),
                }
            }
        }

        impl From<String> for $name {
            fn from(text: String) -> Self {
                Self(text)
            }
        }

        impl From<&str> for $name {
            fn from(text: &str) -> Self {
                Self(text.to_owned())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

text_payload!(
    /// Text emitted by the environment for exactly one player.
    Observation
);

text_payload!(
    /// Text produced in response to exactly one [`Observation`].
    Action
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_truncates_on_char_boundary() {
        let obs = Observation::new("héllo world");
        assert_eq!(obs.preview(5), "héllo...");
        assert_eq!(obs.preview(64), "héllo world");
    }

    #[test]
    fn action_round_trips_through_str() {
        let action = Action::from("[cooperate]");
        assert_eq!(action.as_str(), "[cooperate]");
        assert_eq!(action.to_string(), "[cooperate]");
        assert!(!action.is_empty());
    }
}
