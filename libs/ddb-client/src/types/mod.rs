//! Payload types.
//!
//! Resource schemas belong to the server, so domain resources are an `id`
//! plus an open field map: every field the server sends survives a decode,
//! and inputs send exactly the fields set on them. Authentication payloads,
//! whose shape the client depends on, are typed ([`auth`]).

pub mod auth;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Open set of named fields
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Fields(Map<String, Value>);

impl Fields {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String value of `key`, if it is a string
    #[must_use]
    pub fn str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Fields {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<'de> Deserialize<'de> for Fields {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = Map::deserialize(deserializer)?;
        Ok(Self(
            map.into_iter()
                .map(|(key, value)| (key, collapse_text(value)))
                .collect(),
        ))
    }
}

/// Untyped XML decoding yields element text as `{"$text": ...}`
fn collapse_text(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.len() == 1 && map.contains_key("$text") => map
            .remove("$text")
            .map_or(Value::Null, collapse_text),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (key, collapse_text(value)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(collapse_text).collect()),
        other => other,
    }
}

/// `id` sits next to a flattened map, so XML hands it over as element content
fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match collapse_text(Value::deserialize(deserializer)?) {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

macro_rules! resources {
    ($($(#[$meta:meta])* $name:ident;)*) => {$(
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        pub struct $name {
            #[serde(default, deserialize_with = "text")]
            pub id: String,
            #[serde(flatten)]
            pub fields: Fields,
        }

        impl $name {
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self { id: id.into(), fields: Fields::new() }
            }

            #[must_use]
            pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
                self.fields.insert(key, value);
                self
            }
        }
    )*};
}

macro_rules! inputs {
    ($($(#[$meta:meta])* $name:ident;)*) => {$(
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        pub struct $name {
            #[serde(flatten)]
            pub fields: Fields,
        }

        impl $name {
            #[must_use]
            pub fn new() -> Self {
                Self::default()
            }

            #[must_use]
            pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
                self.fields.insert(key, value);
                self
            }
        }
    )*};
}

resources! {
    Recipe;
    RecipePrepTask;
    RecipeStep;
    RecipeStepIngredient;
    RecipeStepInstrument;
    RecipeStepProduct;
    RecipeStepVessel;
    RecipeStepCompletionCondition;
    MealPlan;
    MealPlanEvent;
    MealPlanOption;
    MealPlanOptionVote;
    ValidIngredient;
    ValidInstrument;
    ValidMeasurementUnit;
    ValidPreparation;
    ValidPreparationInstrument;
    ValidIngredientPreparation;
    Household;
    HouseholdInvitation;
    /// Roles granted to a household member after a permissions change
    UserPermissionsResponse;
    ServiceSetting;
    ServiceSettingConfiguration;
    UserNotification;
    UserIngredientPreference;
    Webhook;
    WebhookTriggerEvent;
    OAuth2Client;
    AuditLogEntry;
    User;
    /// Returned by user registration
    UserCreationResponse;
    /// Returned by client creation; carries the client secret once
    OAuth2ClientCreationResponse;
}

inputs! {
    RecipeCreationRequestInput;
    RecipeUpdateRequestInput;
    RecipePrepTaskCreationRequestInput;
    RecipePrepTaskUpdateRequestInput;
    RecipeStepCreationRequestInput;
    RecipeStepUpdateRequestInput;
    RecipeStepIngredientCreationRequestInput;
    RecipeStepIngredientUpdateRequestInput;
    RecipeStepInstrumentCreationRequestInput;
    RecipeStepInstrumentUpdateRequestInput;
    RecipeStepProductCreationRequestInput;
    RecipeStepProductUpdateRequestInput;
    RecipeStepVesselCreationRequestInput;
    RecipeStepVesselUpdateRequestInput;
    RecipeStepCompletionConditionCreationRequestInput;
    RecipeStepCompletionConditionUpdateRequestInput;
    MealPlanCreationRequestInput;
    MealPlanUpdateRequestInput;
    MealPlanEventCreationRequestInput;
    MealPlanEventUpdateRequestInput;
    MealPlanOptionCreationRequestInput;
    MealPlanOptionUpdateRequestInput;
    MealPlanOptionVoteCreationRequestInput;
    MealPlanOptionVoteUpdateRequestInput;
    ValidIngredientCreationRequestInput;
    ValidIngredientUpdateRequestInput;
    ValidInstrumentCreationRequestInput;
    ValidInstrumentUpdateRequestInput;
    ValidMeasurementUnitCreationRequestInput;
    ValidMeasurementUnitUpdateRequestInput;
    ValidPreparationCreationRequestInput;
    ValidPreparationUpdateRequestInput;
    ValidPreparationInstrumentCreationRequestInput;
    ValidPreparationInstrumentUpdateRequestInput;
    ValidIngredientPreparationCreationRequestInput;
    ValidIngredientPreparationUpdateRequestInput;
    HouseholdCreationRequestInput;
    HouseholdUpdateRequestInput;
    HouseholdInvitationCreationRequestInput;
    ModifyUserPermissionsInput;
    ServiceSettingCreationRequestInput;
    ServiceSettingConfigurationCreationRequestInput;
    ServiceSettingConfigurationUpdateRequestInput;
    UserNotificationCreationRequestInput;
    UserNotificationUpdateRequestInput;
    UserIngredientPreferenceCreationRequestInput;
    UserIngredientPreferenceUpdateRequestInput;
    WebhookCreationRequestInput;
    WebhookTriggerEventCreationRequestInput;
    OAuth2ClientCreationRequestInput;
    UserRegistrationInput;
}

/// Outcome of finalizing meal plans
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinalizeMealPlansResponse {
    /// Number of meal plans that were finalized
    pub count: u64,
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::encoding::{ContentType, Encoder};
    use crate::envelope::Envelope;
    use serde_json::json;

    #[test]
    fn unknown_fields_survive_a_decode() {
        let recipe: Recipe = serde_json::from_value(json!({
            "id": "r1",
            "name": "shakshuka",
            "yieldsComponentType": "main",
            "steps": [{"index": 0}],
        }))
        .unwrap();

        assert_eq!(recipe.id, "r1");
        assert_eq!(recipe.fields.str("name"), Some("shakshuka"));
        assert_eq!(recipe.fields.get("steps").unwrap()[0]["index"], 0);

        let back = serde_json::to_value(&recipe).unwrap();
        assert_eq!(back["yieldsComponentType"], "main");
    }

    #[test]
    fn inputs_send_only_their_fields() {
        let input = MealPlanCreationRequestInput::new()
            .with("notes", "weekly")
            .with("votingDeadline", 1_700_000_000);
        assert_eq!(
            serde_json::to_value(&input).unwrap(),
            json!({"notes": "weekly", "votingDeadline": 1_700_000_000})
        );
    }

    #[test]
    fn xml_text_fields_decode_as_strings() {
        let encoder = Encoder::new(ContentType::Xml);
        let instrument = ValidInstrument::new("i1")
            .with("name", "whisk")
            .with("description", "balloon");

        let bytes = encoder.encode(&Envelope::with_data(instrument.clone())).unwrap();
        let back: Envelope<ValidInstrument> = encoder.decode(&bytes, None).unwrap();

        assert_eq!(back.data, Some(instrument));
    }

    #[test]
    fn xml_fields_keep_their_types() {
        let encoder = Encoder::new(ContentType::Xml);
        let instrument = ValidInstrument::new("i1")
            .with("weight", 3)
            .with("usable", true)
            .with("code", "7")
            .with("tags", json!([]))
            .with("aliases", json!(["balloon"]));

        let bytes = encoder.encode(&Envelope::with_data(instrument.clone())).unwrap();
        let back: Envelope<ValidInstrument> = encoder.decode(&bytes, None).unwrap();
        let back = back.data.unwrap();

        assert_eq!(back.fields.get("weight"), Some(&json!(3)));
        assert_eq!(back.fields.get("usable"), Some(&json!(true)));
        assert_eq!(back.fields.str("code"), Some("7"));
        assert_eq!(back, instrument);
    }

    #[test]
    fn xml_empty_list_stays_a_list() {
        let encoder = Encoder::new(ContentType::Xml);
        let bytes = encoder
            .encode(&Envelope::with_data(Vec::<ValidInstrument>::new()))
            .unwrap();
        let back: Envelope<Vec<ValidInstrument>> = encoder.decode(&bytes, None).unwrap();
        assert_eq!(back.data, Some(vec![]));

        let one = vec![ValidInstrument::new("i1").with("name", "whisk")];
        let bytes = encoder.encode(&Envelope::with_data(one.clone())).unwrap();
        let back: Envelope<Vec<ValidInstrument>> = encoder.decode(&bytes, None).unwrap();
        assert_eq!(back.data, Some(one));
    }

    #[test]
    fn collapse_text_is_recursive() {
        let value = collapse_text(json!({"a": {"$text": "x"}, "b": [{"$text": "y"}], "c": {"$text": "z", "d": 1}}));
        assert_eq!(value, json!({"a": "x", "b": ["y"], "c": {"$text": "z", "d": 1}}));
    }
}
