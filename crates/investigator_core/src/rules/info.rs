//! Free-text field checks for character info and items.
//!
//! Field errors are keyed by the form labels the web tier renders
//! (`Name`, `Beruf`, `Alter`, ...).

use crate::model::character::{Info, NewItem};
use crate::rules::validation::ValidationErrors;

pub const BLANK_MESSAGE: &str = "field must not be blank";
pub const TOO_LONG_MESSAGE: &str = "field is too long";
pub const AGE_NOT_NUMBER_MESSAGE: &str = "age must be a number";
pub const AGE_OUT_OF_RANGE_MESSAGE: &str = "age is out of range";
pub const INVALID_GENDER_MESSAGE: &str = "gender is not permitted";
pub const NON_POSITIVE_COUNT_MESSAGE: &str = "count must be positive";

pub const MAX_INFO_CHARS: usize = 50;
pub const MAX_ITEM_NAME_CHARS: usize = 50;
pub const MAX_ITEM_DESCRIPTION_CHARS: usize = 255;
pub const MIN_AGE: i64 = 18;
pub const MAX_AGE: i64 = 100;
pub const PERMITTED_GENDERS: [&str; 2] = ["männlich", "weiblich"];

fn not_blank(value: &str) -> bool {
    !value.trim().is_empty()
}

fn max_chars(value: &str, limit: usize) -> bool {
    value.chars().count() <= limit
}

/// Records blank, length, age and gender failures of `info`.
pub fn check_info(info: &Info, errors: &mut ValidationErrors) {
    let fields = [
        ("Name", info.name.as_str()),
        ("Beruf", info.profession.as_str()),
        ("Alter", info.age.as_str()),
        ("Geschlecht", info.gender.as_str()),
        ("Wohnort", info.residence.as_str()),
        ("Geburtsort", info.birthplace.as_str()),
    ];
    for (key, value) in fields {
        errors.check_field(not_blank(value), key, BLANK_MESSAGE);
        if key != "Alter" && key != "Geschlecht" {
            errors.check_field(max_chars(value, MAX_INFO_CHARS), key, TOO_LONG_MESSAGE);
        }
    }

    match info.age.trim().parse::<i64>() {
        Ok(age) => errors.check_field(
            (MIN_AGE..=MAX_AGE).contains(&age),
            "Alter",
            AGE_OUT_OF_RANGE_MESSAGE,
        ),
        Err(_) => errors.add_field("Alter", AGE_NOT_NUMBER_MESSAGE),
    }

    errors.check_field(
        PERMITTED_GENDERS.contains(&info.gender.as_str()),
        "Geschlecht",
        INVALID_GENDER_MESSAGE,
    );
}

/// Records name, description and count failures of a new item.
pub fn check_item(item: &NewItem, errors: &mut ValidationErrors) {
    errors.check_field(not_blank(&item.name), "Name", BLANK_MESSAGE);
    errors.check_field(
        max_chars(&item.name, MAX_ITEM_NAME_CHARS),
        "Name",
        TOO_LONG_MESSAGE,
    );
    errors.check_field(not_blank(&item.description), "Description", BLANK_MESSAGE);
    errors.check_field(
        max_chars(&item.description, MAX_ITEM_DESCRIPTION_CHARS),
        "Description",
        TOO_LONG_MESSAGE,
    );
    errors.check_field(item.count > 0, "Count", NON_POSITIVE_COUNT_MESSAGE);
}

#[cfg(test)]
mod tests {
    use super::{
        check_info, check_item, AGE_NOT_NUMBER_MESSAGE, AGE_OUT_OF_RANGE_MESSAGE, BLANK_MESSAGE,
        INVALID_GENDER_MESSAGE, NON_POSITIVE_COUNT_MESSAGE, TOO_LONG_MESSAGE,
    };
    use crate::model::character::{Info, NewItem};
    use crate::rules::validation::ValidationErrors;

    fn info() -> Info {
        Info {
            name: "Otto Hightower".to_string(),
            profession: "Hand of the King".to_string(),
            age: "54".to_string(),
            gender: "männlich".to_string(),
            residence: "King's Landing".to_string(),
            birthplace: "Oldtown".to_string(),
        }
    }

    #[test]
    fn complete_info_passes() {
        let mut errors = ValidationErrors::new();
        check_info(&info(), &mut errors);
        assert!(errors.is_valid(), "{errors:?}");
    }

    #[test]
    fn blank_field_reports_blank_first() {
        let mut draft = info();
        draft.residence = "   ".to_string();
        let mut errors = ValidationErrors::new();
        check_info(&draft, &mut errors);
        assert_eq!(errors.field("Wohnort"), Some(BLANK_MESSAGE));
    }

    #[test]
    fn long_name_is_rejected_by_char_count() {
        let mut draft = info();
        draft.name = "ä".repeat(51);
        let mut errors = ValidationErrors::new();
        check_info(&draft, &mut errors);
        assert_eq!(errors.field("Name"), Some(TOO_LONG_MESSAGE));

        draft.name = "ä".repeat(50);
        let mut errors = ValidationErrors::new();
        check_info(&draft, &mut errors);
        assert!(errors.is_valid());
    }

    #[test]
    fn age_must_be_number_in_range() {
        let mut draft = info();
        draft.age = "alt".to_string();
        let mut errors = ValidationErrors::new();
        check_info(&draft, &mut errors);
        assert_eq!(errors.field("Alter"), Some(AGE_NOT_NUMBER_MESSAGE));

        draft.age = "17".to_string();
        let mut errors = ValidationErrors::new();
        check_info(&draft, &mut errors);
        assert_eq!(errors.field("Alter"), Some(AGE_OUT_OF_RANGE_MESSAGE));

        draft.age = "100".to_string();
        let mut errors = ValidationErrors::new();
        check_info(&draft, &mut errors);
        assert!(errors.is_valid());
    }

    #[test]
    fn unknown_gender_is_rejected() {
        let mut draft = info();
        draft.gender = "divers".to_string();
        let mut errors = ValidationErrors::new();
        check_info(&draft, &mut errors);
        assert_eq!(errors.field("Geschlecht"), Some(INVALID_GENDER_MESSAGE));
    }

    #[test]
    fn item_count_must_be_positive() {
        let item = NewItem {
            name: "Revolver".to_string(),
            description: ".38 Smith & Wesson".to_string(),
            count: 0,
        };
        let mut errors = ValidationErrors::new();
        check_item(&item, &mut errors);
        assert_eq!(errors.field("Count"), Some(NON_POSITIVE_COUNT_MESSAGE));
        assert_eq!(errors.fields.len(), 1);
    }
}
