use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serializer};
use surrealdb::sql::Thing;
use validator::ValidationError;

static NICK_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]{3,12}$").expect("valid nick regex"));

static PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9]{7,15}$").expect("valid phone regex"));

pub fn trim_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    Ok(s.trim().to_string())
}

pub fn validate_member_nick(nick: &str) -> Result<(), ValidationError> {
    if !NICK_REGEX.is_match(nick) {
        return Err(ValidationError::new("member_nick")
            .with_message("Letters, numbers and '_'. 3 to 12 characters".into()));
    }
    Ok(())
}

pub fn validate_phone_number(phone: &str) -> Result<(), ValidationError> {
    if PHONE_REGEX.is_match(phone) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_phone_number"))
    }
}

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("Cannot be blank".into()));
    }
    Ok(())
}

pub fn validate_images(images: &[String]) -> Result<(), ValidationError> {
    if images.is_empty() {
        return Err(ValidationError::new("images").with_message("Min 1 image".into()));
    }
    if images.iter().any(|img| img.trim().is_empty()) {
        return Err(ValidationError::new("images").with_message("Image path is empty".into()));
    }
    Ok(())
}

// record ids leave the api as "table:key" strings
pub fn serialize_thing<S>(thing: &Thing, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&thing.to_raw())
}

pub fn serialize_option_thing<S>(thing: &Option<Thing>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match thing {
        Some(thing) => serializer.serialize_some(&thing.to_raw()),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nick_rules() {
        assert!(validate_member_nick("john_01").is_ok());
        assert!(validate_member_nick("ab").is_err());
        assert!(validate_member_nick("john doe").is_err());
        assert!(validate_member_nick("a_very_long_nickname").is_err());
    }

    #[test]
    fn phone_rules() {
        assert!(validate_phone_number("+821012345678").is_ok());
        assert!(validate_phone_number("12ab").is_err());
    }

    #[test]
    fn thing_serializes_as_raw_id() {
        #[derive(serde::Serialize)]
        struct Row {
            #[serde(serialize_with = "serialize_thing")]
            id: Thing,
            #[serde(serialize_with = "serialize_option_thing")]
            ref_id: Option<Thing>,
        }
        let row = Row {
            id: Thing::from(("job", "abc")),
            ref_id: None,
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["id"], "job:abc");
        assert!(json["ref_id"].is_null());
    }

    #[test]
    fn images_rules() {
        assert!(validate_images(&["a.png".to_string()]).is_ok());
        assert!(validate_images(&[]).is_err());
        assert!(validate_images(&[" ".to_string()]).is_err());
    }
}
