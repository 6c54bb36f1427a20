use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Vocabulary entry as exchanged with clients.
///
/// Field names are capitalized on the wire (`Id`, `Word`, `Translation`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Entry {
    /// Store-assigned identifier
    #[serde(rename = "Id")]
    pub id: Uuid,
    /// Word
    #[serde(rename = "Word")]
    pub word: String,
    /// Translation of the word
    #[serde(rename = "Translation")]
    pub translation: String,
}

impl From<vocab_store::entities::entry::Model> for Entry {
    fn from(model: vocab_store::entities::entry::Model) -> Self {
        Self {
            id: model.id,
            word: model.word,
            translation: model.translation,
        }
    }
}

/// Body of `POST /api/entry/`. Any `Id` sent by the client is ignored.
///
/// Absent or `null` fields decode as empty strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct CreateEntryRequest {
    /// Word
    #[serde(
        rename = "Word",
        alias = "word",
        alias = "WORD",
        deserialize_with = "null_as_empty"
    )]
    pub word: String,
    /// Translation of the word
    #[serde(
        rename = "Translation",
        alias = "translation",
        alias = "TRANSLATION",
        deserialize_with = "null_as_empty"
    )]
    pub translation: String,
}

/// Login request
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    /// Login name
    #[serde(alias = "Login", alias = "LOGIN", deserialize_with = "null_as_empty")]
    pub login: String,
    /// Password (plain text)
    #[serde(
        alias = "Password",
        alias = "PASSWORD",
        deserialize_with = "null_as_empty"
    )]
    pub password: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
