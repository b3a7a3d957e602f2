//! Template generation for new cinematics

use chrono::{DateTime, Utc};
use rust_embed::Embed;
use tera::Tera;
use thiserror::Error;

use crate::core::slug::slugify;
use crate::entities::cinematic::{
    CameraType, Character, CharacterType, Cinematic, DialogNode, Shot, ShotSetup, Side,
    ThangTypeRef,
};

#[derive(Embed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

const CINEMATIC_TEMPLATE: &str = "cinematic.yaml.tera";

const STARTER_TEXT: &str = "Write the first line of dialog here.";

/// Context for template generation
#[derive(Debug, Clone)]
pub struct TemplateContext {
    pub name: String,
    pub slug: Option<String>,
    pub author: String,
    pub created: DateTime<Utc>,
    pub camera_type: CameraType,
    pub left: Option<CharacterType>,
    pub right: Option<CharacterType>,
    pub background: Option<String>,
}

impl TemplateContext {
    pub fn new(name: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slug: None,
            author: author.into(),
            created: Utc::now(),
            camera_type: CameraType::default(),
            left: None,
            right: None,
            background: None,
        }
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn with_camera_type(mut self, camera_type: CameraType) -> Self {
        self.camera_type = camera_type;
        self
    }

    pub fn with_left(mut self, character: CharacterType) -> Self {
        self.left = Some(character);
        self
    }

    pub fn with_right(mut self, character: CharacterType) -> Self {
        self.right = Some(character);
        self
    }

    pub fn with_background(mut self, slug: impl Into<String>) -> Self {
        self.background = Some(slug.into());
        self
    }

    /// Explicit slug, or one derived from the name
    pub fn slug(&self) -> String {
        self.slug.clone().unwrap_or_else(|| slugify(&self.name))
    }

    /// The first dialog node is spoken by whichever side has a character, left first
    fn speaker(&self) -> Option<Side> {
        if self.left.is_some() {
            Some(Side::Left)
        } else if self.right.is_some() {
            Some(Side::Right)
        } else {
            None
        }
    }
}

/// Template generator using Tera
pub struct TemplateGenerator {
    tera: Tera,
}

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Template rendering error: {0}")]
    RenderError(String),
}

impl TemplateGenerator {
    /// Create a new template generator with embedded templates
    pub fn new() -> Result<Self, TemplateError> {
        let mut tera = Tera::default();

        for file in EmbeddedTemplates::iter() {
            let filename = file.as_ref();
            if let Some(content) = EmbeddedTemplates::get(filename) {
                if let Ok(template_str) = std::str::from_utf8(&content.data) {
                    tera.add_raw_template(filename, template_str)
                        .map_err(|e| TemplateError::RenderError(e.to_string()))?;
                }
            }
        }

        Ok(Self { tera })
    }

    /// Render a starter cinematic document
    pub fn generate_cinematic(&self, ctx: &TemplateContext) -> Result<String, TemplateError> {
        if !self
            .tera
            .get_template_names()
            .any(|n| n == CINEMATIC_TEMPLATE)
        {
            tracing::debug!("embedded cinematic template missing, serializing model instead");
            return self.fallback_cinematic(ctx);
        }

        let side = |c: &Option<CharacterType>| c.as_ref().map(|c| c.to_string()).unwrap_or_default();

        let mut context = tera::Context::new();
        context.insert("name", &ctx.name);
        context.insert("slug", &ctx.slug());
        context.insert("name_comment", &single_line(&ctx.name));
        context.insert("author_comment", &single_line(&ctx.author));
        context.insert("created_date", &ctx.created.format("%Y-%m-%d").to_string());
        context.insert("camera_type", &ctx.camera_type.to_string());
        context.insert("left", &side(&ctx.left));
        context.insert("right", &side(&ctx.right));
        context.insert("background", &ctx.background.clone().unwrap_or_default());
        context.insert(
            "speaker",
            &ctx.speaker().map(|s| s.to_string()).unwrap_or_default(),
        );

        self.tera
            .render(CINEMATIC_TEMPLATE, &context)
            .map_err(|e| TemplateError::RenderError(e.to_string()))
    }

    /// Build the same document from the typed model
    fn fallback_cinematic(&self, ctx: &TemplateContext) -> Result<String, TemplateError> {
        let entering = |kind: &CharacterType| Character {
            enter_on_start: Some(true),
            ..Character::new(kind.clone())
        };

        let setup = ShotSetup {
            camera_type: Some(ctx.camera_type),
            left_thang_type: ctx.left.as_ref().map(entering),
            right_thang_type: ctx.right.as_ref().map(entering),
            background_art: ctx.background.as_ref().map(ThangTypeRef::new),
        };

        let cinematic = Cinematic {
            name: ctx.name.clone(),
            slug: ctx.slug(),
            shots: vec![Shot {
                shot_setup: Some(setup),
                dialog_nodes: vec![DialogNode {
                    speaker: ctx.speaker(),
                    text: Some(STARTER_TEXT.to_string()),
                    dialog_clear: true,
                    ..Default::default()
                }],
            }],
            ..Default::default()
        };

        let body = serde_yml::to_string(&cinematic)
            .map_err(|e| TemplateError::RenderError(e.to_string()))?;
        Ok(format!(
            "# Cinematic: {}\n# Created {} by {}\n\n{}",
            single_line(&ctx.name),
            ctx.created.format("%Y-%m-%d"),
            single_line(&ctx.author),
            body
        ))
    }
}

/// Text safe to place in a YAML comment
fn single_line(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}

/// A generator with no templates loaded; it renders from the typed model
impl Default for TemplateGenerator {
    fn default() -> Self {
        Self {
            tera: Tera::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::lint::lint;
    use crate::schema::registry::CINEMATIC;
    use crate::schema::validator::Validator;

    fn full_context() -> TemplateContext {
        TemplateContext::new("Ogre \"Ambush\"", "tester")
            .with_camera_type(CameraType::LeftClose)
            .with_left(CharacterType::Hero)
            .with_right(CharacterType::ThangType {
                slug: "ogre-munchkin-m".to_string(),
            })
            .with_background("forest-bg")
    }

    #[test]
    fn test_template_generates_valid_cinematic() {
        let generator = TemplateGenerator::new().unwrap();
        let yaml = generator.generate_cinematic(&full_context()).unwrap();

        let cinematic: Cinematic = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(cinematic.name, "Ogre \"Ambush\"");
        assert_eq!(cinematic.slug, "ogre-ambush");

        let setup = cinematic.shots[0].shot_setup.as_ref().unwrap();
        assert_eq!(setup.camera(), CameraType::LeftClose);
        assert_eq!(setup.character(Side::Left).unwrap().kind, CharacterType::Hero);
        assert_eq!(setup.background_art.as_ref().unwrap().slug, "forest-bg");
        assert_eq!(cinematic.shots[0].dialog_nodes[0].speaker, Some(Side::Left));

        let validator = Validator::default();
        assert!(validator.iter_errors(&yaml, "t.cine.yaml", CINEMATIC).is_ok());
        assert!(lint(&cinematic).is_empty());
    }

    #[test]
    fn test_template_without_characters() {
        let generator = TemplateGenerator::new().unwrap();
        let ctx = TemplateContext::new("Empty Stage", "tester").with_slug("stage");
        let yaml = generator.generate_cinematic(&ctx).unwrap();

        let cinematic: Cinematic = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(cinematic.slug, "stage");
        let node = &cinematic.shots[0].dialog_nodes[0];
        assert_eq!(node.speaker, None);
        assert!(node.dialog_clear);
        assert!(Validator::default()
            .iter_errors(&yaml, "t.cine.yaml", CINEMATIC)
            .is_ok());
    }

    #[test]
    fn test_multiline_name_stays_in_comment() {
        let ctx = TemplateContext::new("Two\nLines: here", "a\nb").with_slug("two-lines");
        for generator in [TemplateGenerator::new().unwrap(), TemplateGenerator::default()] {
            let yaml = generator.generate_cinematic(&ctx).unwrap();
            assert!(yaml.starts_with("# Cinematic: Two Lines: here\n"), "{}", yaml);
            let cinematic: Cinematic = serde_yml::from_str(&yaml).unwrap();
            assert_eq!(cinematic.name, "Two\nLines: here");
            assert_eq!(cinematic.slug, "two-lines");
            assert!(Validator::default()
                .iter_errors(&yaml, "t.cine.yaml", CINEMATIC)
                .is_ok());
        }
    }

    #[test]
    fn test_fallback_matches_template() {
        let ctx = full_context();
        let rendered: Cinematic = serde_yml::from_str(
            &TemplateGenerator::new().unwrap().generate_cinematic(&ctx).unwrap(),
        )
        .unwrap();
        let fallback: Cinematic = serde_yml::from_str(
            &TemplateGenerator::default().generate_cinematic(&ctx).unwrap(),
        )
        .unwrap();
        assert_eq!(rendered, fallback);
    }
}
