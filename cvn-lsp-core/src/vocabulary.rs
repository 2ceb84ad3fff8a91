//! Lexical vocabulary of the CVN language.
//!
//! Every keyword, asset subtype, property name and transition the analysis
//! passes know about lives in the tables below. Extending the language means
//! editing these tables; the diagnostic and completion passes iterate them
//! rather than naming tokens themselves.

use crate::completion::CandidateKind;
use crate::error::VocabularyError;
use crate::scope::BlockKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The fixed set of asset categories an `asset` declaration may name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetSubtype {
    Bg,
    Sprite,
    Music,
    Sfx,
    Ui,
    Text,
}

impl AssetSubtype {
    pub const ALL: [AssetSubtype; 6] = [
        AssetSubtype::Bg,
        AssetSubtype::Sprite,
        AssetSubtype::Music,
        AssetSubtype::Sfx,
        AssetSubtype::Ui,
        AssetSubtype::Text,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AssetSubtype::Bg => "bg",
            AssetSubtype::Sprite => "sprite",
            AssetSubtype::Music => "music",
            AssetSubtype::Sfx => "sfx",
            AssetSubtype::Ui => "ui",
            AssetSubtype::Text => "text",
        }
    }

    /// Regex alternation matching any subtype token, e.g. `bg|sprite|...`.
    pub fn alternation() -> String {
        Self::ALL
            .iter()
            .map(|subtype| subtype.as_str())
            .collect::<Vec<_>>()
            .join("|")
    }
}

impl fmt::Display for AssetSubtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetSubtype {
    type Err = VocabularyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|subtype| subtype.as_str() == s)
            .ok_or_else(|| VocabularyError::UnknownAssetSubtype(s.to_string()))
    }
}

/// Tag attached to a candidate whose documentation is resolved on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailTag {
    Character,
    Asset,
    Style,
    Show,
    Say,
}

impl DetailTag {
    pub fn as_str(self) -> &'static str {
        match self {
            DetailTag::Character => "character",
            DetailTag::Asset => "asset",
            DetailTag::Style => "style",
            DetailTag::Show => "show",
            DetailTag::Say => "say",
        }
    }
}

impl FromStr for DetailTag {
    type Err = VocabularyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DETAILS
            .iter()
            .map(|entry| entry.tag)
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| VocabularyError::UnknownDetailTag(s.to_string()))
    }
}

/// A statement offered at the start of a statement, with its snippet template.
#[derive(Debug, Clone, Copy)]
pub struct Statement {
    pub label: &'static str,
    pub kind: CandidateKind,
    pub template: &'static str,
    pub detail_tag: Option<DetailTag>,
}

pub const STATEMENTS: &[Statement] = &[
    Statement {
        label: "character",
        kind: CandidateKind::Keyword,
        template: "character ${1:Name} {\n\tdisplay_name: \"${2:Display Name}\";\n\tname_color: 0x${3:ffffff};\n\tvoice_tag: \"${4:voice}\";\n}",
        detail_tag: Some(DetailTag::Character),
    },
    Statement {
        label: "asset",
        kind: CandidateKind::Keyword,
        template: "asset ${1|bg,sprite,music,sfx,ui,text|} ${2:name} = \"${3:path}\";",
        detail_tag: Some(DetailTag::Asset),
    },
    Statement {
        label: "style",
        kind: CandidateKind::Keyword,
        template: "style ${1:name} {\n\t$0\n}",
        detail_tag: Some(DetailTag::Style),
    },
    Statement {
        label: "start",
        kind: CandidateKind::Keyword,
        template: "start {\n\t$0\n}",
        detail_tag: None,
    },
    Statement {
        label: "native",
        kind: CandidateKind::Keyword,
        template: "native \"c\" {\n\t$0\n}",
        detail_tag: None,
    },
    Statement {
        label: "scene",
        kind: CandidateKind::Command,
        template: "scene bg ${1:name};",
        detail_tag: None,
    },
    Statement {
        label: "show",
        kind: CandidateKind::Command,
        template: "show ${1:Character} sprite ${2:sprite} as \"${3:id}\" use ${4:style};",
        detail_tag: Some(DetailTag::Show),
    },
    Statement {
        label: "hide",
        kind: CandidateKind::Command,
        template: "hide \"${1:id}\";",
        detail_tag: None,
    },
    Statement {
        label: "say",
        kind: CandidateKind::Command,
        template: "say(${1:Character}, \"${2:text}\");",
        detail_tag: Some(DetailTag::Say),
    },
    Statement {
        label: "pause",
        kind: CandidateKind::Command,
        template: "pause ${1:1.0};",
        detail_tag: None,
    },
    Statement {
        label: "music",
        kind: CandidateKind::Command,
        template: "music ${1|play,stop,pause|} ${2:name};",
        detail_tag: None,
    },
    Statement {
        label: "sfx",
        kind: CandidateKind::Command,
        template: "sfx play ${1:name};",
        detail_tag: None,
    },
];

pub const CHARACTER_PROPERTIES: &[&str] = &["display_name", "name_color", "voice_tag"];

/// Property a character block should declare; its absence is a warning.
pub const REQUIRED_CHARACTER_PROPERTY: &str = "display_name";

pub const VISUAL_PROPERTIES: &[&str] = &[
    "layer", "x", "y", "anchor_x", "anchor_y", "scale", "alpha", "rotation", "tint", "z",
    "flip_x", "flip_y",
];

pub const TRANSITIONS: &[&str] = &["fade", "dissolve", "move", "wipe"];

/// Placeholder inserted as the argument of a transition call.
pub const TRANSITION_ARGUMENT: &str = "${1:0.5}";

/// Documentation shown for a candidate once the host previews it.
#[derive(Debug, Clone, Copy)]
pub struct DetailEntry {
    pub tag: DetailTag,
    pub title: &'static str,
    pub documentation: &'static str,
}

pub const DETAILS: &[DetailEntry] = &[
    DetailEntry {
        tag: DetailTag::Character,
        title: "Character Declaration",
        documentation: "Defines a character with display name, color, and voice tag",
    },
    DetailEntry {
        tag: DetailTag::Asset,
        title: "Asset Declaration",
        documentation: "Defines an asset reference (bg, sprite, music, sfx, ui, text)",
    },
    DetailEntry {
        tag: DetailTag::Style,
        title: "Style Declaration",
        documentation: "Defines a reusable style with positioning and visual properties",
    },
    DetailEntry {
        tag: DetailTag::Show,
        title: "Show Command",
        documentation: "Shows a character or element on screen with specified sprite and style",
    },
    DetailEntry {
        tag: DetailTag::Say,
        title: "Say Command",
        documentation: "Character dialogue: say(Character, \"text\")",
    },
];

/// Property names offered inside a block of the given kind.
pub fn block_properties(kind: BlockKind) -> &'static [&'static str] {
    match kind {
        BlockKind::Character => CHARACTER_PROPERTIES,
        BlockKind::Style | BlockKind::Show => VISUAL_PROPERTIES,
        BlockKind::Start | BlockKind::Unknown => &[],
    }
}
