use crate::error::ValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Wire and storage format of `release_date`.
pub const RELEASE_DATE_FORMAT: &str = "%Y-%m-%d";

/// A row of the `killers` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Killer {
    pub id: i32,
    pub name: String,
    pub alias: String,
    pub power: String,
    pub speed: f64,
    pub terror_radius: i32,
    pub height: String,
    pub difficulty: String,
    pub release_date: NaiveDate,
    pub dlc: bool,
}

impl Killer {
    /// Builds a row from a storage-assigned id and a validated field set.
    pub fn from_fields(id: i32, fields: KillerFields) -> Self {
        Self {
            id,
            name: fields.name,
            alias: fields.alias,
            power: fields.power,
            speed: fields.speed,
            terror_radius: fields.terror_radius,
            height: fields.height,
            difficulty: fields.difficulty,
            release_date: fields.release_date,
            dlc: fields.dlc,
        }
    }

    /// Every column except `id`.
    pub fn fields(&self) -> KillerFields {
        KillerFields {
            name: self.name.clone(),
            alias: self.alias.clone(),
            power: self.power.clone(),
            speed: self.speed,
            terror_radius: self.terror_radius,
            height: self.height.clone(),
            difficulty: self.difficulty.clone(),
            release_date: self.release_date,
            dlc: self.dlc,
        }
    }
}

/// The full set of writable columns, checked and typed.
///
/// Only `KillerPayload::validate` produces one from client input, so the
/// repository never sees a partial or unparsed record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KillerFields {
    pub name: String,
    pub alias: String,
    pub power: String,
    pub speed: f64,
    pub terror_radius: i32,
    pub height: String,
    pub difficulty: String,
    pub release_date: NaiveDate,
    pub dlc: bool,
}

/// Request body for create and update. Every field is optional here so that
/// an absent field surfaces as a `ValidationError` rather than a body
/// rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KillerPayload {
    pub name: Option<String>,
    pub alias: Option<String>,
    pub power: Option<String>,
    pub speed: Option<f64>,
    pub terror_radius: Option<i32>,
    pub height: Option<String>,
    pub difficulty: Option<String>,
    pub release_date: Option<String>,
    pub dlc: Option<bool>,
}

impl KillerPayload {
    pub fn validate(self) -> Result<KillerFields, ValidationError> {
        // release_date errors take precedence over missing fields.
        let release_date = parse_release_date(self.release_date.as_deref())?;

        Ok(KillerFields {
            name: required("name", self.name)?,
            alias: required("alias", self.alias)?,
            power: required("power", self.power)?,
            speed: required("speed", self.speed)?,
            terror_radius: required("terror_radius", self.terror_radius)?,
            height: required("height", self.height)?,
            difficulty: required("difficulty", self.difficulty)?,
            release_date,
            dlc: self.dlc.unwrap_or(false),
        })
    }
}

impl From<KillerFields> for KillerPayload {
    fn from(fields: KillerFields) -> Self {
        Self {
            name: Some(fields.name),
            alias: Some(fields.alias),
            power: Some(fields.power),
            speed: Some(fields.speed),
            terror_radius: Some(fields.terror_radius),
            height: Some(fields.height),
            difficulty: Some(fields.difficulty),
            release_date: Some(fields.release_date.format(RELEASE_DATE_FORMAT).to_string()),
            dlc: Some(fields.dlc),
        }
    }
}

fn required<T>(field: &'static str, value: Option<T>) -> Result<T, ValidationError> {
    value.ok_or(ValidationError::MissingField(field))
}

fn parse_release_date(raw: Option<&str>) -> Result<NaiveDate, ValidationError> {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(ValidationError::InvalidReleaseDate(String::new()));
    }
    NaiveDate::parse_from_str(raw, RELEASE_DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidReleaseDate(raw.to_string()))
}
