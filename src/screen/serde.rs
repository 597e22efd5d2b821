use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{Position, Rectangle};

// Both types serialize as tuples: `(x, y)` and `(x, y, width, height)`.

impl Serialize for Position {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (self.x, self.y).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (x, y) = <(i32, i32)>::deserialize(deserializer)?;
        Ok(Self::new(x, y))
    }
}

impl Serialize for Rectangle {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (self.x, self.y, self.width, self.height).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Rectangle {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (x, y, width, height) = <(i32, i32, i32, i32)>::deserialize(deserializer)?;
        Ok(Self::new(x, y, width, height))
    }
}
