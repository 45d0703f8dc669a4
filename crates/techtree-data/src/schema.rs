//! Serde data file structs for the game's record tables.
//!
//! These structs define the on-disk shape of each table: technologies,
//! nations, bonuses, the unlockable entity tables, effect-player unlock
//! lists and localized text. Field names follow the game's record schema
//! (`zType`, `iCost`, `abTechPrereq`, ...) so the tables can be exported
//! straight from the game files. They are deserialized from RON, JSON, or
//! TOML and then resolved into graph types by `techtree-graph`.

use serde::Deserialize;
use serde::de::IgnoredAny;
use std::collections::HashMap;

// ===========================================================================
// Scalars
// ===========================================================================

/// A loosely-typed scalar field.
///
/// The game's tables store every scalar as text; exported data may carry
/// native integers or booleans instead. All three encodings are accepted and
/// interpreted leniently: a malformed value never fails deserialization.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Text(String),
    /// Floats, out-of-range integers, arrays and maps. Read as absent.
    Other(IgnoredAny),
}

impl FieldValue {
    /// Whether this value is the truthy sentinel: the text `"1"`, or its
    /// native encodings `1` and `true`. Any other value, including other
    /// non-empty text, is false.
    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Bool(b) => *b,
            FieldValue::Int(i) => *i == 1,
            FieldValue::Text(s) => s == "1",
            FieldValue::Other(_) => false,
        }
    }

    /// Interpret the value as an integer. Text is parsed after trimming;
    /// booleans, unparsable text and any other scalar yield `None`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(i) => Some(*i),
            FieldValue::Text(s) => s.trim().parse().ok(),
            FieldValue::Bool(_) | FieldValue::Other(_) => None,
        }
    }
}

/// Truthiness of an optional flag field. Absent means false.
pub fn flag(value: Option<&FieldValue>) -> bool {
    value.is_some_and(FieldValue::is_truthy)
}

/// Integer value of an optional field, falling back to `default` when the
/// field is absent or malformed.
pub fn int_or(value: Option<&FieldValue>, default: i64) -> i64 {
    value.and_then(FieldValue::as_int).unwrap_or(default)
}

// ===========================================================================
// Technologies
// ===========================================================================

/// A technology entry in `tech.*`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TechRecord {
    #[serde(rename = "zType", default)]
    pub id: Option<String>,
    /// Text tag of the display name.
    #[serde(rename = "Name", default)]
    pub name_tag: Option<String>,
    /// Text tag of the advice (description) string.
    #[serde(rename = "Advice", default)]
    pub advice_tag: Option<String>,
    #[serde(rename = "iCost", default)]
    pub cost: Option<FieldValue>,
    #[serde(rename = "iRow", default)]
    pub row: Option<FieldValue>,
    #[serde(rename = "iColumn", default)]
    pub column: Option<FieldValue>,
    /// Prerequisite bit-matrix: one pair per other technology.
    #[serde(rename = "abTechPrereq", default)]
    pub prereqs: Vec<PrereqPair>,
    #[serde(rename = "EffectPlayer", default)]
    pub effect_player: Option<String>,
    #[serde(rename = "bHide", default)]
    pub hide: Option<FieldValue>,
    #[serde(rename = "bTrash", default)]
    pub trash: Option<FieldValue>,
    #[serde(rename = "bNoFree", default)]
    pub no_free: Option<FieldValue>,
    #[serde(rename = "BonusDiscover", default)]
    pub bonus_discover: Option<String>,
    #[serde(rename = "aeNationValid", default)]
    pub nation_valid: Vec<String>,
}

/// One cell of the prerequisite bit-matrix.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrereqPair {
    #[serde(rename = "zIndex", default)]
    pub tech: Option<String>,
    #[serde(rename = "bValue", default)]
    pub value: Option<FieldValue>,
}

// ===========================================================================
// Nations and bonuses
// ===========================================================================

/// A nation entry in `nation.*`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NationRecord {
    #[serde(rename = "zType", default)]
    pub id: Option<String>,
    #[serde(rename = "Name", default)]
    pub name_tag: Option<String>,
    #[serde(rename = "aeStartingTech", default)]
    pub starting_techs: Vec<String>,
}

/// A bonus entry in `bonus.*`. Only the global yields are read.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BonusRecord {
    #[serde(rename = "zType", default)]
    pub id: Option<String>,
    #[serde(rename = "aiGlobalYields", default)]
    pub global_yields: Vec<YieldPair>,
}

/// A `(yield, amount)` pair from a bonus entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct YieldPair {
    #[serde(rename = "zIndex", default)]
    pub yield_type: Option<String>,
    #[serde(rename = "iValue", default)]
    pub value: Option<FieldValue>,
}

// ===========================================================================
// Unlockable entities
// ===========================================================================

/// An entry of the unit, improvement, law, or project tables. All four
/// share the same two relevant fields: the entity's own identifier and the
/// technology that unlocks it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntityRecord {
    #[serde(rename = "zType", default)]
    pub id: Option<String>,
    #[serde(rename = "TechPrereq", default)]
    pub tech_prereq: Option<String>,
}

/// An entry in `effectPlayer.*`: the unlock lists attached to an effect.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EffectPlayerRecord {
    #[serde(rename = "zType", default)]
    pub id: Option<String>,
    #[serde(rename = "aeUnitUnlock", default)]
    pub units: Vec<String>,
    #[serde(rename = "aeImprovementUnlock", default)]
    pub improvements: Vec<String>,
    #[serde(rename = "aeLawUnlock", default)]
    pub laws: Vec<String>,
    #[serde(rename = "aeProjectUnlock", default)]
    pub projects: Vec<String>,
    #[serde(rename = "aeSpecialistUnlock", default)]
    pub specialists: Vec<String>,
}

// ===========================================================================
// Text
// ===========================================================================

/// A localized text entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextRecord {
    #[serde(rename = "zTag", default)]
    pub tag: Option<String>,
    #[serde(rename = "zText", default)]
    pub text: Option<String>,
}

// ===========================================================================
// Overrides
// ===========================================================================

/// Replacement maps for the curated unlock overrides. A category left out
/// keeps its curated default.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UnlockOverrideData {
    #[serde(default)]
    pub laws: Option<HashMap<String, Vec<String>>>,
    #[serde(default)]
    pub improvements: Option<HashMap<String, Vec<String>>>,
}

/// Returns the identifier if present and non-empty.
pub fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}

// ===========================================================================
// Tests
// ===========================================================================
