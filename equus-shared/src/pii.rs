use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Free text a customer typed about themselves (home address, notes).
/// Hidden from `Debug`/`Display`; serialized as the plain inner value.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Masked<T>(pub T);

impl<T> fmt::Debug for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "********")
    }
}

impl<T> fmt::Display for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "********")
    }
}

impl<T: Serialize> Serialize for Masked<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<T> Masked<T> {
    pub fn into_inner(self) -> T {
        self.0
    }

    pub fn expose(&self) -> &T {
        &self.0
    }
}

impl Masked<String> {
    /// Whitespace-only input counts as not provided.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<&str> for Masked<String> {
    fn from(value: &str) -> Self {
        Masked(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_value() {
        let address = Masked::from("12 Stable Lane, Riyadh");
        assert_eq!(format!("{:?}", address), "********");
        assert_eq!(address.expose(), "12 Stable Lane, Riyadh");
    }

    #[test]
    fn test_serializes_inner_value() {
        let address = Masked::from("Farm 7");
        assert_eq!(serde_json::to_string(&address).unwrap(), "\"Farm 7\"");

        let parsed: Masked<String> = serde_json::from_str("\"  \"").unwrap();
        assert!(parsed.is_blank());
    }
}
