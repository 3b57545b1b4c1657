//! The design descriptor: one document's visual styling choices, expressed as
//! utility-class strings plus a highlight color and a layout kind.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ParseError;
use crate::presets;

/// How the content is laid out on the page.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutType {
    Card,
    Flat,
    MultiCard,
}

impl LayoutType {
    pub const ALL: [LayoutType; 3] = [LayoutType::Card, LayoutType::Flat, LayoutType::MultiCard];

    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutType::Card => "card",
            LayoutType::Flat => "flat",
            LayoutType::MultiCard => "multi-card",
        }
    }
}

impl fmt::Display for LayoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "card" => Ok(LayoutType::Card),
            "flat" => Ok(LayoutType::Flat),
            "multi-card" => Ok(LayoutType::MultiCard),
            other => Err(ParseError::InvalidLayout(other.to_string())),
        }
    }
}

/// The caller's layout wish passed to design generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LayoutPreference {
    /// Let the model decide.
    #[default]
    Auto,
    Fixed(LayoutType),
}

impl fmt::Display for LayoutPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutPreference::Auto => f.write_str("auto"),
            LayoutPreference::Fixed(layout) => layout.fmt(f),
        }
    }
}

impl FromStr for LayoutPreference {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "auto" | "" => Ok(LayoutPreference::Auto),
            other => other.parse().map(LayoutPreference::Fixed),
        }
    }
}

impl TryFrom<String> for LayoutPreference {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LayoutPreference> for String {
    fn from(value: LayoutPreference) -> Self {
        value.to_string()
    }
}

/// Validated design descriptor.
///
/// Every style field holds a non-empty utility-class string. A descriptor is
/// never patched field by field; a new generation or preset replaces it whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignDescriptor {
    pub id: String,
    pub theme_name: String,
    pub layout_type: LayoutType,
    pub page_background: String,
    pub container_background: String,
    pub container_shadow: String,
    pub container_max_width: String,
    pub container_padding: String,
    pub container_border_radius: String,
    pub font_family: String,
    pub base_font_size: String,
    pub line_height: String,
    pub text_color: String,
    pub title_size: String,
    pub heading1: String,
    pub heading2: String,
    pub paragraph: String,
    pub blockquote: String,
    /// Hex color, e.g. `#07c160`.
    pub highlight_color: String,
    pub divider_style: String,
}

/// Descriptor as emitted by a model: every field optional and unchecked.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawDesign {
    pub id: Option<String>,
    pub theme_name: Option<String>,
    pub layout_type: Option<String>,
    pub page_background: Option<String>,
    pub container_background: Option<String>,
    pub container_shadow: Option<String>,
    pub container_max_width: Option<String>,
    pub container_padding: Option<String>,
    pub container_border_radius: Option<String>,
    pub font_family: Option<String>,
    pub base_font_size: Option<String>,
    pub line_height: Option<String>,
    pub text_color: Option<String>,
    pub title_size: Option<String>,
    pub heading1: Option<String>,
    pub heading2: Option<String>,
    pub paragraph: Option<String>,
    pub blockquote: Option<String>,
    pub highlight_color: Option<String>,
    pub divider_style: Option<String>,
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ParseError> {
    present(value).ok_or(ParseError::MissingField(field))
}

fn optional(value: Option<String>, fallback: &str) -> String {
    present(value).unwrap_or_else(|| fallback.to_string())
}

/// `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`.
pub fn is_hex_color(value: &str) -> bool {
    let Some(digits) = value.strip_prefix('#') else {
        return false;
    };
    matches!(digits.len(), 3 | 4 | 6 | 8) && digits.chars().all(|c| c.is_ascii_hexdigit())
}

impl DesignDescriptor {
    /// Parse a model response body into a validated descriptor.
    pub fn from_json(body: &str) -> Result<Self, ParseError> {
        if body.trim().is_empty() {
            return Err(ParseError::Empty);
        }
        let raw: RawDesign = serde_json::from_str(body)?;
        Self::from_raw(raw, &presets::default_design())
    }

    /// Validate a raw descriptor. Optional fields the model left out are taken
    /// from `base`; required fields must be present.
    pub fn from_raw(raw: RawDesign, base: &DesignDescriptor) -> Result<Self, ParseError> {
        let theme_name = required(raw.theme_name, "themeName")?;
        let layout_type: LayoutType = required(raw.layout_type, "layoutType")?.parse()?;
        let page_background = required(raw.page_background, "pageBackground")?;
        let container_background = required(raw.container_background, "containerBackground")?;
        let heading2 = required(raw.heading2, "heading2")?;
        let text_color = required(raw.text_color, "textColor")?;

        let highlight_color = match present(raw.highlight_color) {
            Some(color) if is_hex_color(&color) => color,
            Some(color) => return Err(ParseError::InvalidHighlight(color)),
            None => base.highlight_color.clone(),
        };

        let id = present(raw.id).unwrap_or_else(|| format!("design-{}", Uuid::new_v4().simple()));

        Ok(Self {
            id,
            theme_name,
            layout_type,
            page_background,
            container_background,
            container_shadow: optional(raw.container_shadow, &base.container_shadow),
            container_max_width: optional(raw.container_max_width, &base.container_max_width),
            container_padding: optional(raw.container_padding, &base.container_padding),
            container_border_radius: optional(
                raw.container_border_radius,
                &base.container_border_radius,
            ),
            font_family: optional(raw.font_family, &base.font_family),
            base_font_size: optional(raw.base_font_size, &base.base_font_size),
            line_height: optional(raw.line_height, &base.line_height),
            text_color,
            title_size: optional(raw.title_size, &base.title_size),
            heading1: optional(raw.heading1, &base.heading1),
            heading2,
            paragraph: optional(raw.paragraph, &base.paragraph),
            blockquote: optional(raw.blockquote, &base.blockquote),
            highlight_color,
            divider_style: optional(raw.divider_style, &base.divider_style),
        })
    }

    /// Pretty JSON used as styling context in prompts.
    pub fn to_prompt_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| format!("{self:?}"))
    }

    /// JSON schema handed to schema-constrained backends.
    pub fn json_schema() -> serde_json::Value {
        let string = serde_json::json!({ "type": "string" });
        let mut properties = serde_json::Map::new();
        for field in [
            "id",
            "themeName",
            "pageBackground",
            "containerBackground",
            "containerShadow",
            "containerMaxWidth",
            "containerPadding",
            "containerBorderRadius",
            "fontFamily",
            "baseFontSize",
            "lineHeight",
            "textColor",
            "titleSize",
            "heading1",
            "heading2",
            "paragraph",
            "blockquote",
            "highlightColor",
            "dividerStyle",
        ] {
            properties.insert(field.to_string(), string.clone());
        }
        properties.insert(
            "layoutType".to_string(),
            serde_json::json!({
                "type": "string",
                "enum": LayoutType::ALL.iter().map(LayoutType::as_str).collect::<Vec<_>>(),
            }),
        );
        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": [
                "themeName",
                "layoutType",
                "pageBackground",
                "containerBackground",
                "heading2",
                "textColor"
            ],
        })
    }
}
