//! Cinematic schema definition
//!
//! A cinematic is an ordered list of shots. Each shot sets up the camera and
//! the characters on stage, then plays an ordered list of dialog nodes.

use serde_json::{json, Value};

use crate::schema::builder as c;

/// Camera framings a shot can use
pub const CAMERA_TYPES: &[&str] = &["right-close", "left-close", "dual"];

/// Sides a speaker can stand on
pub const SPEAKERS: &[&str] = &["left", "right"];

/// Characters that can leave at the end of a dialog node
pub const EXIT_CHARACTERS: &[&str] = &["left", "right", "both"];

/// Programming languages a dialog node can be restricted to
pub const LANGUAGES: &[&str] = &["python", "javascript"];

/// Maximum length of a dialog node's text
pub const TEXT_MAX_LENGTH: u64 = 500;

/// Reference to a ThangType asset by slug, with optional scale and placement
pub fn thang_type_schema(title: &str, description: &str) -> Value {
    c::object(
        json!({ "title": title, "description": description, "required": ["slug"] }),
        json!({
            "slug": c::short_string(json!({
                "title": "Background Slug",
                "description": "The thangType slug of the asset",
            })),
            "scaleX": c::float(json!({
                "title": "scaleX",
                "description": "The scaling factor along x axis to apply to the ThangType",
            })),
            "scaleY": c::float(json!({
                "title": "scaleY",
                "description": "The scaling factor along y axis to apply to the ThangType",
            })),
            "pos": c::point2d(json!({
                "title": "Position",
                "description": "The position in meters to place the thangType.",
            })),
        }),
    )
}

/// A character standing on one side of the screen: the hero or a ThangType
pub fn character_schema(title: &str) -> Value {
    c::object(
        json!({
            "title": title,
            "description": "ThangType that will appear on either the left or right side of the screen.",
            "required": ["type"],
        }),
        json!({
            "type": {
                "oneOf": [
                    c::short_string(json!({
                        "title": "Type Hero",
                        "description": "This character is the player character",
                        "default": "hero",
                        "enum": ["hero"],
                    })),
                    c::object(
                        json!({
                            "title": "Type ThangType Slug",
                            "description": "The thangType that will appear",
                            "required": ["slug"],
                        }),
                        json!({
                            "slug": c::short_string(json!({
                                "title": "ThangType Slug",
                                "description": "Required if type is set to `slug`",
                                "minLength": 1,
                            })),
                        }),
                    ),
                ],
            },
            "enterOnStart": {
                "type": "boolean",
                "title": "Animate in?",
                "description": "If true the character will animate in. Otherwise the character will start simply there.",
            },
            "position": c::point2d(json!({
                "title": "Position",
                "description": "Where character is located in meters",
            })),
        }),
    )
}

pub fn shot_setup_schema() -> Value {
    c::object(
        json!({ "title": "ShotSetup" }),
        json!({
            "cameraType": c::short_string(json!({
                "title": "Camera Type",
                "description": "The shot type",
                "enum": CAMERA_TYPES,
                "default": "dual",
            })),
            "rightThangType": character_schema("Right Character"),
            "leftThangType": character_schema("Left Character"),
            "backgroundArt": thang_type_schema(
                "Background Art",
                "The rasterized image to place on the background",
            ),
        }),
    )
}

fn triggers_schema() -> Value {
    c::object(
        json!({
            "title": "Triggers",
            "description": "Events that can occur during the dialogue.",
        }),
        json!({
            "changeBackground": c::object(
                json!({
                    "title": "Change Background",
                    "description": "Change the background image of the cinematic",
                    "required": ["art", "triggerStart"],
                }),
                json!({
                    "art": c::short_string(json!({ "title": "Art", "description": "The background art path" })),
                    "triggerStart": c::int(json!({
                        "title": "Trigger Start(ms)",
                        "description": "The number of milliseconds until the background changes.",
                    })),
                }),
            ),
            "backgroundObject": c::object(
                json!({
                    "title": "Background Object",
                    "description": "Add a background object after given duration",
                    "required": ["thangType", "triggerStart"],
                }),
                json!({
                    "thangType": thang_type_schema("Background Object", "The image to place"),
                    "triggerStart": c::int(json!({
                        "title": "Trigger Start(ms)",
                        "description": "The number of milliseconds until background image art appears",
                    })),
                }),
            ),
            "clearBackgroundObject": c::object(
                json!({
                    "title": "Clear Background Object",
                    "description": "Clears the background objects from the screen after a given duration",
                }),
                json!({
                    "triggerStart": c::int(json!({
                        "title": "Trigger Start(ms)",
                        "description": "The number of milliseconds until background object is cleared",
                    })),
                }),
            ),
        }),
    )
}

pub fn dialog_node_schema() -> Value {
    c::object(
        json!({
            "title": "Dialog Node",
            "description": "A node of a shot. Contains dialog instructions.",
            "required": ["dialogClear"],
        }),
        json!({
            "speaker": c::short_string(json!({
                "enum": SPEAKERS,
                "title": "Speaker",
                "description": "Which character is speaking. Used to select speech bubble.",
            })),
            "text": {
                "type": "string",
                "title": "Text",
                "description": "html text",
                "maxLength": TEXT_MAX_LENGTH,
            },
            "i18n": {
                "type": "object",
                "format": "i18n",
                "props": ["text"],
                "description": "Help translate this cinematic dialogNode.",
            },
            // Text anchors default to the origin rather than the generic point defaults.
            "textLocation": c::object(
                json!({
                    "title": "Text Location",
                    "description": "An {x, y} coordinate point.",
                    "format": "point2d",
                    "required": ["x", "y"],
                }),
                json!({
                    "x": { "title": "x", "description": "The x coordinate.", "type": "number", "default": 0 },
                    "y": { "title": "y", "description": "The y coordinate.", "type": "number", "default": 0 },
                }),
            ),
            "action": c::short_string(json!({
                "title": "Action",
                "description": "The action or animation to play on the speaker.",
            })),
            "triggers": triggers_schema(),
            "dialogClear": {
                "type": "boolean",
                "title": "Clear dialog on screen",
                "description": "Whether we clear any existing dialog nodes.",
            },
            "exitCharacter": c::short_string(json!({
                "title": "Exit Character",
                "description": "whether character exits at dialog node completion",
                "enum": EXIT_CHARACTERS,
            })),
            "filters": c::object(
                json!({
                    "title": "Filters",
                    "description": "Context specific filters that are checked at runtime.",
                }),
                json!({
                    "language": c::short_string(json!({
                        "enum": LANGUAGES,
                        "title": "Language",
                        "description": "If set, this Dialog Node is only shown for the given language.",
                    })),
                }),
            ),
            "delay": c::int(json!({
                "title": "Delay(ms)",
                "description": "A delay in ms before anything else happens in this Dialog Node.",
            })),
        }),
    )
}

pub fn shot_schema() -> Value {
    c::object(
        json!({
            "title": "Shot",
            "description": "A single shot, setting up camera and running dialog nodes",
        }),
        json!({
            "shotSetup": shot_setup_schema(),
            "dialogNodes": c::array(
                json!({
                    "title": "Dialog Nodes",
                    "description": "List of all possible nodes in the shot.",
                }),
                dialog_node_schema(),
            ),
        }),
    )
}

/// The full cinematic document schema, including identity and name fields
pub fn cinematic_schema() -> Value {
    let mut schema = c::object(
        json!({
            "description": "A cinematic composed of shots.",
            "title": "Cinematic",
        }),
        json!({
            "shots": c::array(
                json!({
                    "title": "Shots",
                    "description": "Ordered list of shots that make up a cinematic",
                }),
                shot_schema(),
            ),
        }),
    );
    c::extend_basic_properties(&mut schema, "cinematic");
    c::extend_named_properties(&mut schema);
    schema
}
