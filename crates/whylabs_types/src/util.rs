use crate::error::TypeError;
use colored_json::{Color, ColorMode, ColoredFormatter, PrettyFormatter, Styler};
use regex::Regex;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::OnceLock;

pub struct JsonFuncs {}

impl JsonFuncs {
    /// Colored, pretty printed json used when describing objects in a terminal
    pub fn colored_str<T: Serialize>(object: T) -> String {
        match ColoredFormatter::with_styler(
            PrettyFormatter::default(),
            Styler {
                key: Color::Rgb(245, 77, 85).bold(),
                string_value: Color::Rgb(249, 179, 93).foreground(),
                float_value: Color::Rgb(249, 179, 93).foreground(),
                integer_value: Color::Rgb(249, 179, 93).foreground(),
                bool_value: Color::Rgb(249, 179, 93).foreground(),
                nil_value: Color::Rgb(249, 179, 93).foreground(),
                ..Default::default()
            },
        )
        .to_colored_json(&object, ColorMode::On)
        {
            Ok(json) => json,
            Err(e) => format!("Failed to serialize to json: {e}"),
        }
    }

    pub fn pretty_str<T: Serialize>(object: T) -> String {
        match serde_json::to_string_pretty(&object) {
            Ok(json) => json,
            Err(e) => format!("Failed to serialize to json: {e}"),
        }
    }

    pub fn save_to_json<T>(
        model: T,
        path: Option<PathBuf>,
        filename: &str,
    ) -> Result<PathBuf, TypeError>
    where
        T: Serialize,
    {
        let json = serde_json::to_string_pretty(&model)?;

        let write_path = match path {
            Some(mut new_path) => {
                new_path.set_extension("json");

                if !new_path.exists() {
                    let parent_path = new_path.parent().ok_or(TypeError::GetParentPathError)?;

                    std::fs::create_dir_all(parent_path)
                        .map_err(|_| TypeError::CreateDirectoryError)?;
                }

                new_path
            }
            None => PathBuf::from(filename),
        };

        std::fs::write(&write_path, json)?;

        Ok(write_path)
    }
}

fn duration_regex() -> &'static Regex {
    static DURATION: OnceLock<Regex> = OnceLock::new();
    DURATION.get_or_init(|| {
        Regex::new(r"^P(\d+Y)?(\d+M)?(\d+D)?(T(\d+H)?(\d+M)?(\d+S)?)?$")
            .expect("duration regex is valid")
    })
}

/// Checks an ISO 8601 duration such as `P1D`, `PT6H` or `P1DT18H`.
///
/// At least one component is required and a `T` must be followed by a time component.
pub fn is_iso8601_duration(value: &str) -> bool {
    if value == "P" || value.ends_with('T') {
        return false;
    }
    duration_regex().is_match(value)
}

fn identifier_regex() -> &'static Regex {
    static IDENTIFIER: OnceLock<Regex> = OnceLock::new();
    IDENTIFIER.get_or_init(|| Regex::new(r"^[0-9a-zA-Z\-_]+$").expect("identifier regex is valid"))
}

fn tag_regex() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"^[0-9a-zA-Z\-_]").expect("tag regex is valid"))
}

fn display_name_regex() -> &'static Regex {
    static DISPLAY_NAME: OnceLock<Regex> = OnceLock::new();
    DISPLAY_NAME
        .get_or_init(|| Regex::new(r"^[0-9a-zA-Z \-_]+$").expect("display name regex is valid"))
}

pub(crate) fn check_length(
    field: &str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), TypeError> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(TypeError::invalid_field(
            field,
            format!("length {len} is outside of {min}..={max}"),
        ));
    }
    Ok(())
}

pub(crate) fn check_max_items<T>(field: &str, items: &[T], max: usize) -> Result<(), TypeError> {
    if items.len() > max {
        return Err(TypeError::invalid_field(
            field,
            format!("{} items exceeds the maximum of {max}", items.len()),
        ));
    }
    Ok(())
}

/// Monitor and analyzer ids: 10 to 128 alphanumerics, dashes or underscores
pub(crate) fn check_identifier(field: &str, value: &str) -> Result<(), TypeError> {
    check_length(field, value, 10, 128)?;
    if !identifier_regex().is_match(value) {
        return Err(TypeError::invalid_field(
            field,
            format!("'{value}' may only contain alphanumerics, dashes and underscores"),
        ));
    }
    Ok(())
}

pub(crate) fn check_display_name(field: &str, value: &str) -> Result<(), TypeError> {
    check_length(field, value, 10, 256)?;
    if !display_name_regex().is_match(value) {
        return Err(TypeError::invalid_field(
            field,
            format!("'{value}' may only contain alphanumerics, spaces, dashes and underscores"),
        ));
    }
    Ok(())
}

pub(crate) fn check_tags(field: &str, tags: &[String]) -> Result<(), TypeError> {
    for tag in tags {
        check_length(field, tag, 3, 32)?;
        if !tag_regex().is_match(tag) {
            return Err(TypeError::invalid_field(
                field,
                format!("tag '{tag}' must start with an alphanumeric, dash or underscore"),
            ));
        }
    }
    Ok(())
}

pub(crate) fn check_reference_id(field: &str, value: &str) -> Result<(), TypeError> {
    check_length(field, value, 1, 100)?;
    if !identifier_regex().is_match(value) {
        return Err(TypeError::invalid_field(
            field,
            format!("'{value}' may only contain alphanumerics, dashes and underscores"),
        ));
    }
    Ok(())
}
