//! Cinematic entity - shots of camera setups and dialog nodes

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::core::entity::Entity;
use crate::core::slug::slugify;
use crate::schema::registry::CINEMATIC;

/// An `{x, y}` position in meters
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2d {
    pub x: f64,
    pub y: f64,
}

impl Point2d {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Camera framing for a shot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CameraType {
    RightClose,
    LeftClose,
    #[default]
    Dual,
}

impl CameraType {
    /// The side the camera closes in on, if any
    pub fn close_side(&self) -> Option<Side> {
        match self {
            CameraType::RightClose => Some(Side::Right),
            CameraType::LeftClose => Some(Side::Left),
            CameraType::Dual => None,
        }
    }
}

impl fmt::Display for CameraType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraType::RightClose => write!(f, "right-close"),
            CameraType::LeftClose => write!(f, "left-close"),
            CameraType::Dual => write!(f, "dual"),
        }
    }
}

impl FromStr for CameraType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "right-close" => Ok(CameraType::RightClose),
            "left-close" => Ok(CameraType::LeftClose),
            "dual" => Ok(CameraType::Dual),
            _ => Err(format!("Unknown camera type: {}", s)),
        }
    }
}

/// Side of the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

/// Which character(s) leave when a dialog node completes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExitCharacter {
    Left,
    Right,
    Both,
}

impl ExitCharacter {
    pub fn sides(&self) -> &'static [Side] {
        match self {
            ExitCharacter::Left => &[Side::Left],
            ExitCharacter::Right => &[Side::Right],
            ExitCharacter::Both => &[Side::Left, Side::Right],
        }
    }
}

/// Programming language a dialog node can be restricted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    Javascript,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Python => write!(f, "python"),
            Language::Javascript => write!(f, "javascript"),
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "python" => Ok(Language::Python),
            "javascript" => Ok(Language::Javascript),
            _ => Err(format!("Unknown language: {}", s)),
        }
    }
}

/// Who a character is: the player's hero, or a ThangType picked by slug.
///
/// On the wire the hero is the bare string `"hero"` and a ThangType is
/// `{slug: ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawCharacterType", into = "RawCharacterType")]
pub enum CharacterType {
    #[default]
    Hero,
    ThangType { slug: String },
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawCharacterType {
    Literal(String),
    Slug { slug: String },
}

impl TryFrom<RawCharacterType> for CharacterType {
    type Error = String;

    fn try_from(raw: RawCharacterType) -> Result<Self, Self::Error> {
        match raw {
            RawCharacterType::Literal(s) if s == "hero" => Ok(CharacterType::Hero),
            RawCharacterType::Literal(s) => Err(format!(
                "character type must be \"hero\" or {{slug}}, got \"{}\"",
                s
            )),
            RawCharacterType::Slug { slug } => Ok(CharacterType::ThangType { slug }),
        }
    }
}

impl From<CharacterType> for RawCharacterType {
    fn from(kind: CharacterType) -> Self {
        match kind {
            CharacterType::Hero => RawCharacterType::Literal("hero".to_string()),
            CharacterType::ThangType { slug } => RawCharacterType::Slug { slug },
        }
    }
}

impl fmt::Display for CharacterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CharacterType::Hero => write!(f, "hero"),
            CharacterType::ThangType { slug } => write!(f, "{}", slug),
        }
    }
}

impl FromStr for CharacterType {
    type Err = String;

    /// `hero` selects the player character; anything else is a ThangType slug
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("character slug cannot be empty".to_string());
        }
        if s.eq_ignore_ascii_case("hero") {
            Ok(CharacterType::Hero)
        } else {
            Ok(CharacterType::ThangType { slug: s.to_string() })
        }
    }
}

/// A character standing on one side of the screen
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    #[serde(rename = "type")]
    pub kind: CharacterType,

    /// Animate in instead of starting on screen
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enter_on_start: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Point2d>,
}

impl Character {
    pub fn new(kind: CharacterType) -> Self {
        Self {
            kind,
            enter_on_start: None,
            position: None,
        }
    }
}

/// Reference to a ThangType asset
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThangTypeRef {
    pub slug: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_x: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_y: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<Point2d>,
}

impl ThangTypeRef {
    pub fn new(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            ..Default::default()
        }
    }
}

/// Camera and stage setup for a shot
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShotSetup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera_type: Option<CameraType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_thang_type: Option<Character>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_thang_type: Option<Character>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_art: Option<ThangTypeRef>,
}

impl ShotSetup {
    /// Effective camera type; absent means `dual`
    pub fn camera(&self) -> CameraType {
        self.camera_type.unwrap_or_default()
    }

    pub fn character(&self, side: Side) -> Option<&Character> {
        match side {
            Side::Left => self.left_thang_type.as_ref(),
            Side::Right => self.right_thang_type.as_ref(),
        }
    }
}

/// JSON Schema `integer` admits integral floats such as `100.0`
#[derive(Deserialize)]
#[serde(untagged)]
enum RawInteger {
    Int(i64),
    Float(f64),
}

impl RawInteger {
    fn into_i64<E: de::Error>(self) -> Result<i64, E> {
        match self {
            RawInteger::Int(i) => Ok(i),
            RawInteger::Float(f)
                if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 =>
            {
                Ok(f as i64)
            }
            RawInteger::Float(f) => Err(E::custom(format!("expected an integer, got {}", f))),
        }
    }
}

fn integer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    RawInteger::deserialize(deserializer)?.into_i64()
}

fn optional_integer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    Option::<RawInteger>::deserialize(deserializer)?
        .map(RawInteger::into_i64)
        .transpose()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeBackground {
    pub art: String,
    #[serde(deserialize_with = "integer")]
    pub trigger_start: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundObject {
    pub thang_type: ThangTypeRef,
    #[serde(deserialize_with = "integer")]
    pub trigger_start: i64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearBackgroundObject {
    #[serde(
        default,
        deserialize_with = "optional_integer",
        skip_serializing_if = "Option::is_none"
    )]
    pub trigger_start: Option<i64>,
}

/// Timed events fired during a dialog node. Times are milliseconds.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Triggers {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_background: Option<ChangeBackground>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_object: Option<BackgroundObject>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clear_background_object: Option<ClearBackgroundObject>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DialogFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
}

/// One beat of dialog
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<Side>,

    /// HTML text, at most 500 characters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Translations keyed by locale, e.g. `{es-ES: {text: ...}}`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub i18n: Option<Map<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_location: Option<Point2d>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triggers: Option<Triggers>,

    /// Clear any dialog already on screen
    pub dialog_clear: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_character: Option<ExitCharacter>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<DialogFilters>,

    /// Milliseconds to wait before anything else happens
    #[serde(
        default,
        deserialize_with = "optional_integer",
        skip_serializing_if = "Option::is_none"
    )]
    pub delay: Option<i64>,
}

impl DialogNode {
    /// Whether this node plays when the player codes in `language`
    pub fn is_shown_for(&self, language: Language) -> bool {
        match self.filters.as_ref().and_then(|f| f.language) {
            Some(only) => only == language,
            None => true,
        }
    }

    /// Text for a locale such as `es-ES`.
    ///
    /// Falls back from the full locale to its language (`es`) and then to
    /// the untranslated text.
    pub fn text_for(&self, locale: &str) -> Option<&str> {
        let translated = self.i18n.as_ref().and_then(|i18n| {
            let lookup = |key: &str| {
                i18n.get(key)
                    .and_then(|entry| entry.get("text"))
                    .and_then(Value::as_str)
            };
            lookup(locale).or_else(|| {
                locale
                    .split_once('-')
                    .and_then(|(language, _)| lookup(language))
            })
        });
        translated.or(self.text.as_deref())
    }
}

/// A camera setup plus the dialog played in it
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shot_setup: Option<ShotSetup>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dialog_nodes: Vec<DialogNode>,
}

impl Shot {
    /// Dialog nodes that play for `language`, in order
    pub fn nodes_for(&self, language: Language) -> impl Iterator<Item = &DialogNode> + '_ {
        self.dialog_nodes
            .iter()
            .filter(move |node| node.is_shown_for(language))
    }
}

/// Cinematic document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Cinematic {
    /// Database id, assigned by the server
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub db_id: Option<Value>,

    /// Database document version
    #[serde(rename = "__v", default, skip_serializing_if = "Option::is_none")]
    pub db_version: Option<Value>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub slug: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shots: Vec<Shot>,
}

impl Cinematic {
    /// A named cinematic with one empty shot
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            slug: slugify(&name),
            name,
            shots: vec![Shot::default()],
            ..Default::default()
        }
    }

    pub fn dialog_node_count(&self) -> usize {
        self.shots.iter().map(|s| s.dialog_nodes.len()).sum()
    }
}

impl Entity for Cinematic {
    const SCHEMA: &'static str = CINEMATIC;

    fn name(&self) -> &str {
        &self.name
    }

    fn slug(&self) -> &str {
        &self.slug
    }
}
