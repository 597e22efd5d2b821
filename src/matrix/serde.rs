use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::TransformationMatrix;

impl Serialize for TransformationMatrix {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.as_array().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TransformationMatrix {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        <[f32; 6]>::deserialize(deserializer).map(Self::from_array)
    }
}
