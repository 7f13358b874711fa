use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Filename used when the backend does not suggest one.
pub const DEFAULT_RESULT_FILENAME: &str = "storyboard.json";

/// Raw field values read from the form at submit time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormInput {
    pub characters: String,
    pub keywords: String,
    pub plot: String,
    pub pages: String,
}

impl FormInput {
    /// Plot must contain something besides whitespace and a page count must be selected.
    pub fn is_complete(&self) -> bool {
        !self.plot.trim().is_empty() && !self.pages.is_empty()
    }
}

/// Body of `POST /api/generate`. Field order is part of the wire format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerateRequest {
    pub characters: String,
    pub keywords: String,
    pub plot: String,
    pub pages: String,
}

impl From<&FormInput> for GenerateRequest {
    fn from(input: &FormInput) -> Self {
        Self {
            characters: input.characters.clone(),
            keywords: input.keywords.clone(),
            plot: input.plot.clone(),
            pages: input.pages.clone(),
        }
    }
}

/// Body of `POST /api/download-docx`.
#[derive(Debug, Serialize)]
pub struct ExportRequest<'a> {
    pub storyboard: &'a Storyboard,
}

/// Reply of `POST /api/generate`, success or failure alike.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateReply {
    #[serde(default)]
    pub success: bool,
    pub storyboard: Option<Storyboard>,
    pub filename: Option<String>,
    pub text_content: Option<String>,
    pub error: Option<String>,
}

/// JSON body the backend sends alongside a non-2xx status.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Storyboard {
    pub whole_title: String,
    pub story_topic: String,
    pub hashtags: Vec<String>,
    pub pages: Vec<PageEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageEntry {
    pub page: u32,
    #[serde(default)]
    pub character: Vec<String>,
    #[serde(default)]
    pub background: String,
    #[serde(default)]
    pub dialogue: Dialogue,
    #[serde(default)]
    pub expression_pose: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueLine {
    pub speaker: String,
    pub line: String,
}

/// Speaker-to-line mapping that remembers the order the backend sent it in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dialogue(Vec<DialogueLine>);

impl Dialogue {
    pub fn insert(&mut self, speaker: impl Into<String>, line: impl Into<String>) {
        let speaker = speaker.into();
        let line = line.into();
        match self.0.iter_mut().find(|entry| entry.speaker == speaker) {
            Some(existing) => existing.line = line,
            None => self.0.push(DialogueLine { speaker, line }),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &DialogueLine> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S, L> FromIterator<(S, L)> for Dialogue
where
    S: Into<String>,
    L: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (S, L)>>(iter: I) -> Self {
        let mut dialogue = Dialogue::default();
        for (speaker, line) in iter {
            dialogue.insert(speaker, line);
        }
        dialogue
    }
}

impl Serialize for Dialogue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for entry in &self.0 {
            map.serialize_entry(&entry.speaker, &entry.line)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Dialogue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DialogueVisitor;

        impl<'de> Visitor<'de> for DialogueVisitor {
            type Value = Dialogue;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of speaker names to lines")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Dialogue, A::Error> {
                let mut dialogue = Dialogue::default();
                while let Some((speaker, line)) = access.next_entry::<String, String>()? {
                    dialogue.insert(speaker, line);
                }
                Ok(dialogue)
            }
        }

        deserializer.deserialize_map(DialogueVisitor)
    }
}

impl Storyboard {
    /// Flattened text rendition, used for copying when the backend omitted one.
    pub fn to_plain_text(&self) -> String {
        let rule = "=".repeat(50);
        let mut lines = vec![
            self.whole_title.clone(),
            rule.clone(),
            format!("Topic: {}", self.story_topic),
            String::new(),
            format!("Hashtags: {}", self.hashtags.join(" ")),
            String::new(),
            rule,
            String::new(),
        ];

        for page in &self.pages {
            lines.push(format!("Page {}", page.page));
            lines.push("-".repeat(30));
            lines.push(format!("Characters: {}", page.character.join(", ")));
            lines.push(format!("Background: {}", page.background));
            lines.push("Dialogue:".to_string());
            for entry in page.dialogue.iter() {
                lines.push(format!("   {}: \"{}\"", entry.speaker, entry.line));
            }
            lines.push(format!("Expression/Pose: {}", page.expression_pose));
            lines.push(String::new());
        }

        lines.join("\n")
    }
}

/// The current result: storyboard plus the text and filename that came with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub storyboard: Storyboard,
    pub text_content: String,
    pub filename: String,
}

impl GenerationResult {
    pub fn new(storyboard: Storyboard, text_content: Option<String>, filename: Option<String>) -> Self {
        let text_content = text_content.unwrap_or_else(|| storyboard.to_plain_text());
        let filename = filename.unwrap_or_else(|| DEFAULT_RESULT_FILENAME.to_string());
        Self {
            storyboard,
            text_content,
            filename,
        }
    }
}
