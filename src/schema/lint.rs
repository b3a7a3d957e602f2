//! Semantic checks for cinematics that the JSON schema cannot express
//!
//! Everything reported here is a warning: the document is well-formed, but
//! will probably not play the way the author intended.

use crate::entities::cinematic::{Cinematic, DialogNode, ShotSetup, Side};
use crate::schema::validator::ValidationIssue;

/// Run every check and collect the warnings in document order
pub fn lint(cinematic: &Cinematic) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if cinematic.shots.is_empty() {
        issues.push(
            ValidationIssue::new("/shots", "Cinematic has no shots")
                .with_suggestion("Add at least one shot with a dialog node"),
        );
    }

    for (s, shot) in cinematic.shots.iter().enumerate() {
        let shot_path = format!("/shots/{}", s);
        let setup = shot.shot_setup.clone().unwrap_or_default();

        check_camera(&setup, &shot_path, &mut issues);

        if shot.dialog_nodes.is_empty() {
            issues.push(ValidationIssue::new(
                format!("{}/dialogNodes", shot_path),
                "Shot has no dialog nodes",
            ));
        }

        for (n, node) in shot.dialog_nodes.iter().enumerate() {
            let node_path = format!("{}/dialogNodes/{}", shot_path, n);
            check_node(node, &setup, &node_path, &mut issues);
        }
    }

    issues
}

fn check_camera(setup: &ShotSetup, shot_path: &str, issues: &mut Vec<ValidationIssue>) {
    let camera = setup.camera();
    if let Some(side) = camera.close_side() {
        if setup.character(side).is_none() {
            issues.push(
                ValidationIssue::new(
                    format!("{}/shotSetup/cameraType", shot_path),
                    format!("Camera '{}' closes in on the {} side, which has no character", camera, side),
                )
                .with_suggestion(format!("Set {}ThangType or use the 'dual' camera", side)),
            );
        }
    }
}

fn check_node(
    node: &DialogNode,
    setup: &ShotSetup,
    node_path: &str,
    issues: &mut Vec<ValidationIssue>,
) {
    if let Some(speaker) = node.speaker {
        if setup.character(speaker).is_none() {
            issues.push(
                ValidationIssue::new(
                    format!("{}/speaker", node_path),
                    format!("Speaker is on the {} side, but the shot has no {} character", speaker, speaker),
                )
                .with_suggestion(format!("Set shotSetup.{}ThangType", speaker)),
            );
        }
    }

    if let Some(exit) = node.exit_character {
        let missing: Vec<Side> = exit
            .sides()
            .iter()
            .copied()
            .filter(|side| setup.character(*side).is_none())
            .collect();
        for side in missing {
            issues.push(ValidationIssue::new(
                format!("{}/exitCharacter", node_path),
                format!("Exiting the {} character, but the shot has none", side),
            ));
        }
    }

    if let Some(delay) = node.delay {
        if delay < 0 {
            issues.push(negative_time(format!("{}/delay", node_path), delay));
        }
    }

    if let Some(ref triggers) = node.triggers {
        let triggers_path = format!("{}/triggers", node_path);

        if let Some(ref change) = triggers.change_background {
            if change.trigger_start < 0 {
                issues.push(negative_time(
                    format!("{}/changeBackground/triggerStart", triggers_path),
                    change.trigger_start,
                ));
            }
        }

        let added_at = triggers.background_object.as_ref().map(|o| o.trigger_start);
        if let Some(start) = added_at.filter(|t| *t < 0) {
            issues.push(negative_time(
                format!("{}/backgroundObject/triggerStart", triggers_path),
                start,
            ));
        }

        if let Some(cleared_at) = triggers
            .clear_background_object
            .as_ref()
            .and_then(|c| c.trigger_start)
        {
            let path = format!("{}/clearBackgroundObject/triggerStart", triggers_path);
            if cleared_at < 0 {
                issues.push(negative_time(path.clone(), cleared_at));
            }
            if let Some(added_at) = added_at {
                if cleared_at < added_at {
                    issues.push(
                        ValidationIssue::new(
                            path,
                            format!(
                                "Background objects are cleared at {}ms, before the new object appears at {}ms",
                                cleared_at, added_at
                            ),
                        )
                        .with_suggestion("Clear after the background object's triggerStart"),
                    );
                }
            }
        }
    }

    if let Some(ref i18n) = node.i18n {
        for (locale, entry) in i18n {
            let Some(fields) = entry.as_object() else {
                issues.push(ValidationIssue::new(
                    format!("{}/i18n/{}", node_path, locale),
                    "Translation entry should be an object like {text: ...}",
                ));
                continue;
            };
            for field in fields.keys().filter(|k| k.as_str() != "text") {
                issues.push(
                    ValidationIssue::new(
                        format!("{}/i18n/{}/{}", node_path, locale, field),
                        format!("'{}' is not translatable on a dialog node", field),
                    )
                    .with_suggestion("Only 'text' is translated"),
                );
            }
        }
    }
}

fn negative_time(path: String, value: i64) -> ValidationIssue {
    ValidationIssue::new(path, format!("Time is negative ({}ms)", value))
        .with_suggestion("Times are milliseconds from the start of the dialog node")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> Cinematic {
        serde_yml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_clean_cinematic_has_no_warnings() {
        let cinematic = parse(
            r#"
shots:
  - shotSetup:
      cameraType: left-close
      leftThangType:
        type: hero
    dialogNodes:
      - speaker: left
        text: "Hi"
        dialogClear: true
        exitCharacter: left
"#,
        );
        assert!(lint(&cinematic).is_empty(), "{:?}", lint(&cinematic));
    }

    #[test]
    fn test_empty_cinematic() {
        let issues = lint(&Cinematic::default());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, "/shots");
    }

    #[test]
    fn test_shot_without_nodes() {
        let issues = lint(&Cinematic::new("Intro"));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, "/shots/0/dialogNodes");
    }

    #[test]
    fn test_speaker_without_character() {
        let cinematic = parse(
            r#"
shots:
  - shotSetup:
      leftThangType:
        type: hero
    dialogNodes:
      - speaker: right
        dialogClear: true
        exitCharacter: both
"#,
        );
        let issues = lint(&cinematic);
        let paths: Vec<_> = issues.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "/shots/0/dialogNodes/0/speaker",
                "/shots/0/dialogNodes/0/exitCharacter",
            ]
        );
    }

    #[test]
    fn test_close_camera_without_character() {
        let cinematic = parse(
            r#"
shots:
  - shotSetup:
      cameraType: right-close
    dialogNodes:
      - dialogClear: true
"#,
        );
        let issues = lint(&cinematic);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, "/shots/0/shotSetup/cameraType");
    }

    #[test]
    fn test_clear_before_add() {
        let cinematic = parse(
            r#"
shots:
  - dialogNodes:
      - dialogClear: true
        delay: -5
        triggers:
          backgroundObject:
            thangType:
              slug: torch
            triggerStart: 800
          clearBackgroundObject:
            triggerStart: 300
"#,
        );
        let issues = lint(&cinematic);
        assert_eq!(issues.len(), 2);
        assert!(issues[0].message.contains("negative"));
        assert!(issues[1].message.contains("before the new object"));
    }

    #[test]
    fn test_untranslatable_i18n_field() {
        let cinematic = parse(
            r#"
shots:
  - dialogNodes:
      - dialogClear: true
        text: "Hello"
        i18n:
          de:
            text: "Hallo"
            action: "wave"
"#,
        );
        let issues = lint(&cinematic);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, "/shots/0/dialogNodes/0/i18n/de/action");
    }
}
