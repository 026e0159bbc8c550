use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Global string interner for location IDs.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// An interned identifier for a location in the catalog.
/// Internally a 4-byte `Spur` index.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocationId(Spur);

impl LocationId {
    /// Intern a string as a LocationId, or return the existing handle.
    pub fn intern(s: &str) -> Self {
        LocationId(INTERNER.get_or_intern(s))
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }
}

impl fmt::Debug for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for LocationId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LocationId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(LocationId::intern(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_roundtrip() {
        let a = LocationId::intern("niseko");
        let b = LocationId::intern("niseko");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "niseko");
        assert_eq!(a.to_string(), "niseko");
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = LocationId::intern("hakuba");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#""hakuba""#);
        let back: LocationId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
