pub mod compound;
pub mod haber;
pub mod json_format;
pub mod reflexive;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::reflexive::split_reflexive;

/// The seven grammatical person slots a tense provides forms for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Person {
    FirstSingular,
    SecondSingular,
    SecondSingularVosForm,
    ThirdSingular,
    FirstPlural,
    SecondPlural,
    ThirdPlural,
}

impl Person {
    pub const ALL: [Person; 7] = [
        Person::FirstSingular,
        Person::SecondSingular,
        Person::SecondSingularVosForm,
        Person::ThirdSingular,
        Person::FirstPlural,
        Person::SecondPlural,
        Person::ThirdPlural,
    ];

    /// The JSON key of this person slot.
    pub fn key(self) -> &'static str {
        match self {
            Person::FirstSingular => "first_singular",
            Person::SecondSingular => "second_singular",
            Person::SecondSingularVosForm => "second_singular_vos_form",
            Person::ThirdSingular => "third_singular",
            Person::FirstPlural => "first_plural",
            Person::SecondPlural => "second_plural",
            Person::ThirdPlural => "third_plural",
        }
    }
}

/// One tense of one mood: the regularity flag plus the seven person slots.
///
/// Person slots are always sequences, never scalars. `regular` defaults to
/// false whenever upstream data is missing or not strictly boolean.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct TenseSlot {
    pub regular: bool,
    pub first_singular: Vec<String>,
    pub second_singular: Vec<String>,
    pub second_singular_vos_form: Vec<String>,
    pub third_singular: Vec<String>,
    pub first_plural: Vec<String>,
    pub second_plural: Vec<String>,
    pub third_plural: Vec<String>,
}

impl TenseSlot {
    pub fn forms(&self, person: Person) -> &[String] {
        match person {
            Person::FirstSingular => &self.first_singular,
            Person::SecondSingular => &self.second_singular,
            Person::SecondSingularVosForm => &self.second_singular_vos_form,
            Person::ThirdSingular => &self.third_singular,
            Person::FirstPlural => &self.first_plural,
            Person::SecondPlural => &self.second_plural,
            Person::ThirdPlural => &self.third_plural,
        }
    }

    pub fn forms_mut(&mut self, person: Person) -> &mut Vec<String> {
        match person {
            Person::FirstSingular => &mut self.first_singular,
            Person::SecondSingular => &mut self.second_singular,
            Person::SecondSingularVosForm => &mut self.second_singular_vos_form,
            Person::ThirdSingular => &mut self.third_singular,
            Person::FirstPlural => &mut self.first_plural,
            Person::SecondPlural => &mut self.second_plural,
            Person::ThirdPlural => &mut self.third_plural,
        }
    }

    /// Build a canonical slot from an arbitrary JSON value. Anything that is
    /// not an object yields an empty slot; inside an object, every person
    /// field is coerced to a sequence of strings and `regular` to a strict
    /// boolean. Never fails.
    pub fn from_value(value: &Value) -> TenseSlot {
        let mut slot = TenseSlot::default();
        if let Value::Object(map) = value {
            slot.regular = map.get("regular").and_then(Value::as_bool).unwrap_or(false);
            for person in Person::ALL {
                if let Some(forms) = map.get(person.key()) {
                    *slot.forms_mut(person) = coerce_form_list(forms);
                }
            }
        }
        slot.apply_vos_fallback();
        slot
    }

    /// If the vos slot is empty and second-person singular is not, copy the
    /// second-singular forms into the vos slot.
    pub fn apply_vos_fallback(&mut self) {
        if self.second_singular_vos_form.is_empty() && !self.second_singular.is_empty() {
            self.second_singular_vos_form = self.second_singular.clone();
        }
    }
}

impl<'de> Deserialize<'de> for TenseSlot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(TenseSlot::from_value(&value))
    }
}

/// A mood: an insertion-ordered map from tense name to tense slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct MoodBlock(pub IndexMap<String, TenseSlot>);

impl MoodBlock {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, tense: &str) -> Option<&TenseSlot> {
        self.0.get(tense)
    }

    pub fn insert(&mut self, tense: &str, slot: TenseSlot) {
        self.0.insert(tense.to_string(), slot);
    }
}

impl<'de> Deserialize<'de> for MoodBlock {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let mut block = MoodBlock::default();
        if let Value::Object(map) = value {
            for (tense, tense_value) in map {
                block.0.insert(tense, TenseSlot::from_value(&tense_value));
            }
        }
        Ok(block)
    }
}

/// Clitic-pronoun support verdict for a verb: absent from the document (the
/// tagging pass has not run), null (judged but undetermined, or the judgment
/// failed), or a definite boolean.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SupportFlag {
    #[default]
    Unset,
    Unknown,
    Known(bool),
}

impl SupportFlag {
    pub fn is_unset(&self) -> bool {
        matches!(self, SupportFlag::Unset)
    }

    pub fn from_option(value: Option<bool>) -> SupportFlag {
        match value {
            Some(b) => SupportFlag::Known(b),
            None => SupportFlag::Unknown,
        }
    }
}

impl serde::Serialize for SupportFlag {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SupportFlag::Unset | SupportFlag::Unknown => serializer.serialize_none(),
            SupportFlag::Known(b) => serializer.serialize_bool(*b),
        }
    }
}

impl<'de> Deserialize<'de> for SupportFlag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(SupportFlag::from_option(coerce_bool(&value)))
    }
}

/// One verb's full conjugation document. Field order is the output key order.
///
/// Deserialization is the normalization pass: any JSON object coerces into a
/// canonical record, whatever shape the upstream service produced. Unknown
/// top-level fields are carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VerbRecord {
    #[serde(default, deserialize_with = "de_lenient_string")]
    pub infinitive: String,
    #[serde(default, deserialize_with = "de_lenient_string")]
    pub gerund: String,
    #[serde(default, alias = "participle", deserialize_with = "de_form_list")]
    pub participles: Vec<String>,
    #[serde(default, deserialize_with = "de_strict_bool")]
    pub is_reflexive: bool,
    #[serde(
        default,
        deserialize_with = "de_lenient_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub has_tr_use: Option<bool>,
    #[serde(
        default,
        deserialize_with = "de_lenient_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub has_intr_use: Option<bool>,
    #[serde(default, skip_serializing_if = "SupportFlag::is_unset")]
    pub supports_do: SupportFlag,
    #[serde(default, skip_serializing_if = "SupportFlag::is_unset")]
    pub supports_io: SupportFlag,
    #[serde(default, skip_serializing_if = "SupportFlag::is_unset")]
    pub supports_do_io: SupportFlag,
    #[serde(
        default,
        deserialize_with = "de_translation",
        skip_serializing_if = "Option::is_none"
    )]
    pub translation: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "MoodBlock::is_empty")]
    pub indicative: MoodBlock,
    #[serde(default, skip_serializing_if = "MoodBlock::is_empty")]
    pub subjunctive: MoodBlock,
    #[serde(default, skip_serializing_if = "MoodBlock::is_empty")]
    pub imperative: MoodBlock,
    #[serde(default, skip_serializing_if = "MoodBlock::is_empty")]
    pub compound_indicative: MoodBlock,
    #[serde(default, skip_serializing_if = "MoodBlock::is_empty")]
    pub compound_subjunctive: MoodBlock,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl VerbRecord {
    /// Normalize an arbitrary JSON value into a canonical record. Values that
    /// are not objects yield the default (empty) record. Never fails.
    pub fn from_value(value: Value) -> VerbRecord {
        serde_json::from_value(value).unwrap_or_default()
    }

    /// Build the final record for one input token from the upstream payload:
    /// normalize the simple tenses, override `infinitive`/`is_reflexive` from
    /// the parsed token, derive the compound tenses, and normalize again so
    /// the vos fallback reaches the derived blocks.
    pub fn from_upstream(raw_token: &str, payload: Value) -> VerbRecord {
        let (base, is_reflexive) = split_reflexive(raw_token);
        let mut record = VerbRecord::from_value(payload);
        record.is_reflexive = is_reflexive;
        record.infinitive = if is_reflexive { format!("{base}se") } else { base };
        compound::add_compound_tenses(&mut record);
        record.normalize();
        record
    }

    /// Re-apply the vos fallback to every tense of every mood. All other
    /// normalization rules are guaranteed by construction on typed records.
    pub fn normalize(&mut self) {
        for block in [
            &mut self.indicative,
            &mut self.subjunctive,
            &mut self.imperative,
            &mut self.compound_indicative,
            &mut self.compound_subjunctive,
        ] {
            for slot in block.0.values_mut() {
                slot.apply_vos_fallback();
            }
        }
    }

    /// Turn any still-absent support field into an explicit null, so the
    /// tagging pass always emits all three fields.
    pub fn materialize_support_fields(&mut self) {
        for flag in [
            &mut self.supports_do,
            &mut self.supports_io,
            &mut self.supports_do_io,
        ] {
            if flag.is_unset() {
                *flag = SupportFlag::Unknown;
            }
        }
    }
}

/// Lenient boolean reading: booleans pass through, numbers count as their
/// truthiness, and the usual string spellings ("true"/"1"/"yes"/"y" and
/// their negatives) are accepted. Anything else is indeterminate.
pub fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "y" => Some(true),
            "false" | "0" | "no" | "n" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Coerce a value to a sequence of surface-form strings: a string becomes a
/// singleton, a list keeps its string elements, anything else is empty.
fn coerce_form_list(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

/// Coerce a value to a single string: lists collapse to their first string
/// element, non-strings become empty.
fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .first()
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        _ => String::new(),
    }
}

fn de_lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_string(&value))
}

fn de_form_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_form_list(&value))
}

fn de_strict_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_bool().unwrap_or(false))
}

fn de_lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_bool(&value))
}

fn de_translation<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<String>>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => None,
        other => Some(coerce_form_list(&other)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn person_slots_coerce_to_sequences() {
        let slot = TenseSlot::from_value(&json!({
            "regular": true,
            "first_singular": "hablo",
            "second_singular": ["hablas"],
            "third_singular": null,
            "first_plural": ["hablamos", 5],
        }));
        assert!(slot.regular);
        assert_eq!(slot.first_singular, vec!["hablo"]);
        assert_eq!(slot.second_singular, vec!["hablas"]);
        assert!(slot.third_singular.is_empty());
        assert_eq!(slot.first_plural, vec!["hablamos"]);
        assert!(slot.second_plural.is_empty());
    }

    #[test]
    fn regular_defaults_to_false_when_not_boolean() {
        assert!(!TenseSlot::from_value(&json!({ "regular": "yes" })).regular);
        assert!(!TenseSlot::from_value(&json!({})).regular);
        assert!(!TenseSlot::from_value(&json!("garbage")).regular);
    }

    #[test]
    fn vos_fallback_copies_second_singular() {
        let slot = TenseSlot::from_value(&json!({
            "second_singular": ["hablas"],
            "second_singular_vos_form": [],
        }));
        assert_eq!(slot.second_singular_vos_form, vec!["hablas"]);

        // An explicit vos form is left alone.
        let slot = TenseSlot::from_value(&json!({
            "second_singular": ["hablas"],
            "second_singular_vos_form": ["hablás"],
        }));
        assert_eq!(slot.second_singular_vos_form, vec!["hablás"]);
    }

    #[test]
    fn gerund_and_infinitive_coerce_to_strings() {
        let record = VerbRecord::from_value(json!({
            "infinitive": ["hablar"],
            "gerund": ["hablando", "extra"],
        }));
        assert_eq!(record.infinitive, "hablar");
        assert_eq!(record.gerund, "hablando");

        let record = VerbRecord::from_value(json!({ "gerund": 5 }));
        assert_eq!(record.gerund, "");
    }

    #[test]
    fn legacy_participle_key_is_accepted() {
        let record = VerbRecord::from_value(json!({ "participle": ["hablado"] }));
        assert_eq!(record.participles, vec!["hablado"]);

        let record = VerbRecord::from_value(json!({ "participles": "hablado" }));
        assert_eq!(record.participles, vec!["hablado"]);
    }

    #[test]
    fn non_object_moods_collapse_to_empty() {
        let record = VerbRecord::from_value(json!({
            "indicative": "broken",
            "subjunctive": { "present": "also broken" },
        }));
        assert!(record.indicative.is_empty());
        let present = record.subjunctive.get("present").unwrap();
        assert_eq!(*present, TenseSlot::default());
    }

    #[test]
    fn normalization_is_idempotent() {
        let messy = json!({
            "infinitive": "poner",
            "gerund": ["poniendo"],
            "participle": "puesto",
            "is_reflexive": "nope",
            "indicative": {
                "present": {
                    "regular": 1,
                    "first_singular": "pongo",
                    "second_singular": ["pones"],
                },
            },
            "legacy_field": { "kept": true },
        });

        let once = VerbRecord::from_value(messy);
        let twice = VerbRecord::from_value(serde_json::to_value(&once).unwrap());
        assert_eq!(once, twice);
    }

    #[test]
    fn unknown_top_level_fields_survive() {
        let record = VerbRecord::from_value(json!({
            "infinitive": "ir",
            "legacy_field": { "kept": true },
        }));
        assert_eq!(record.extra["legacy_field"], json!({ "kept": true }));

        let output = serde_json::to_value(&record).unwrap();
        assert_eq!(output["legacy_field"], json!({ "kept": true }));
    }

    #[test]
    fn support_flags_distinguish_absent_from_null() {
        let record = VerbRecord::from_value(json!({ "supports_do": null }));
        assert_eq!(record.supports_do, SupportFlag::Unknown);
        assert_eq!(record.supports_io, SupportFlag::Unset);

        let output = serde_json::to_value(&record).unwrap();
        assert!(output["supports_do"].is_null());
        assert!(output.get("supports_io").is_none());

        let record = VerbRecord::from_value(json!({ "supports_do": "yes" }));
        assert_eq!(record.supports_do, SupportFlag::Known(true));
    }

    #[test]
    fn materialize_support_fields_nulls_absent_flags() {
        let mut record = VerbRecord::from_value(json!({ "supports_io": true }));
        record.materialize_support_fields();
        assert_eq!(record.supports_do, SupportFlag::Unknown);
        assert_eq!(record.supports_io, SupportFlag::Known(true));

        let output = serde_json::to_value(&record).unwrap();
        assert!(output["supports_do"].is_null());
        assert_eq!(output["supports_io"], json!(true));
        assert!(output["supports_do_io"].is_null());
    }

    #[test]
    fn coerce_bool_accepts_common_spellings() {
        assert_eq!(coerce_bool(&json!(true)), Some(true));
        assert_eq!(coerce_bool(&json!(1)), Some(true));
        assert_eq!(coerce_bool(&json!(0)), Some(false));
        assert_eq!(coerce_bool(&json!("Yes")), Some(true));
        assert_eq!(coerce_bool(&json!(" no ")), Some(false));
        assert_eq!(coerce_bool(&json!("maybe")), None);
        assert_eq!(coerce_bool(&json!(null)), None);
        assert_eq!(coerce_bool(&json!(["true"])), None);
    }

    #[test]
    fn from_upstream_overrides_infinitive_and_reflexive() {
        let payload = json!({
            "infinitive": "llamar",
            "is_reflexive": false,
            "gerund": "llamando",
            "participles": ["llamado"],
        });
        let record = VerbRecord::from_upstream("llamar(se)", payload);
        assert_eq!(record.infinitive, "llamarse");
        assert!(record.is_reflexive);

        let record = VerbRecord::from_upstream(
            "llamar",
            json!({ "infinitive": "WRONG", "is_reflexive": true }),
        );
        assert_eq!(record.infinitive, "llamar");
        assert!(!record.is_reflexive);
    }

    #[test]
    fn from_upstream_derives_all_compound_variants() {
        let payload = json!({
            "infinitive": "imprimir",
            "gerund": "imprimiendo",
            "participles": ["imprimido", "impreso"],
        });
        let record = VerbRecord::from_upstream("imprimir", payload);

        let anterior = record
            .compound_indicative
            .get("preterite_anterior")
            .unwrap();
        assert_eq!(
            anterior.first_singular,
            vec!["hube imprimido", "hube impreso"]
        );

        let pluperfect = record.compound_subjunctive.get("pluperfect").unwrap();
        assert_eq!(
            pluperfect.first_singular,
            vec![
                "hubiera imprimido",
                "hubiese imprimido",
                "hubiera impreso",
                "hubiese impreso",
            ]
        );

        // The vos fallback reaches derived tenses through the second pass.
        assert_eq!(
            pluperfect.second_singular_vos_form,
            pluperfect.second_singular
        );
    }

    #[test]
    fn empty_participles_add_no_compound_blocks() {
        let record = VerbRecord::from_upstream("hablar", json!({ "gerund": "hablando" }));
        assert!(record.compound_indicative.is_empty());
        assert!(record.compound_subjunctive.is_empty());

        let output = serde_json::to_value(&record).unwrap();
        assert!(output.get("compound_indicative").is_none());
        assert!(output.get("compound_subjunctive").is_none());
    }
}
