use core::fmt;

/// Identifier of a seat in a session.
///
/// Ids are small non-negative integers, unique within a session and never
/// reassigned once handed out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PlayerId(pub u32);

impl PlayerId {
    /// First id handed out by an empty registry.
    pub const FIRST: Self = Self(0);

    /// The id directly after this one, or `None` past `u32::MAX`.
    #[inline]
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }

    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for PlayerId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_stops_at_the_last_id() {
        assert_eq!(PlayerId(4).next(), Some(PlayerId(5)));
        assert_eq!(PlayerId(u32::MAX).next(), None);
    }
}
