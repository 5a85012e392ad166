use crate::prelude::*;
use derive_more::Display;

///
/// FieldType
///
/// Closed vocabulary of field value types. Deserialization accepts the
/// spellings found in existing model documents (`objectID`, `IPAddress`, ...).
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[remain::sorted]
pub enum FieldType {
    #[display("bigInteger")]
    #[serde(rename = "bigInteger", alias = "biginteger", alias = "BigInteger")]
    BigInteger,

    #[display("boolean")]
    #[serde(rename = "boolean", alias = "bool")]
    Boolean,

    #[display("datetime")]
    #[serde(rename = "datetime")]
    Datetime,

    #[display("decimal")]
    #[serde(rename = "decimal")]
    Decimal,

    #[display("duration")]
    #[serde(rename = "duration")]
    Duration,

    #[display("dynamic")]
    #[serde(rename = "dynamic")]
    Dynamic,

    #[display("integer")]
    #[serde(rename = "integer")]
    Integer,

    #[display("ipAddress")]
    #[serde(rename = "ipAddress", alias = "ipaddress", alias = "IPAddress")]
    IpAddress,

    #[display("map")]
    #[serde(rename = "map")]
    Map,

    #[display("objectId")]
    #[serde(rename = "objectId", alias = "objectID", alias = "ObjectId")]
    ObjectId,

    #[display("password")]
    #[serde(rename = "password")]
    Password,

    #[display("physicalAddress")]
    #[serde(rename = "physicalAddress", alias = "PhysicalAddress")]
    PhysicalAddress,

    #[display("string")]
    #[serde(rename = "string")]
    String,
}

///
/// AssociationKind
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "snake_case")]
#[remain::sorted]
pub enum AssociationKind {
    #[display("belongs_to")]
    BelongsTo,

    #[display("has_and_belongs_to_many")]
    HasAndBelongsToMany,

    #[display("has_many")]
    HasMany,

    #[display("has_one")]
    HasOne,
}

impl AssociationKind {
    /// Every association kind, in declaration order of the input format.
    pub const ALL: [Self; 4] = [
        Self::BelongsTo,
        Self::HasMany,
        Self::HasOne,
        Self::HasAndBelongsToMany,
    ];

    /// Whether the foreign key of this kind lives on the target class.
    #[must_use]
    pub const fn key_on_target(self) -> bool {
        matches!(self, Self::HasMany | Self::HasOne)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_type_accepts_legacy_spellings() {
        let parsed: Vec<FieldType> =
            serde_json::from_str(r#"["objectID", "IPAddress", "biginteger", "string"]"#).unwrap();

        assert_eq!(
            parsed,
            vec![
                FieldType::ObjectId,
                FieldType::IpAddress,
                FieldType::BigInteger,
                FieldType::String
            ]
        );
    }

    #[test]
    fn field_type_displays_canonical_name() {
        assert_eq!(FieldType::ObjectId.to_string(), "objectId");
        assert_eq!(FieldType::PhysicalAddress.to_string(), "physicalAddress");
    }

    #[test]
    fn association_kind_display_matches_wire_name() {
        for kind in AssociationKind::ALL {
            let wire = serde_json::to_string(&kind).unwrap();
            assert_eq!(wire, format!("\"{kind}\""));
        }
    }
}
