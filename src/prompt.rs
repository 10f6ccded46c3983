pub const SYSTEM_INSTRUCTION: &str =
    "You are an AI assistant that helps users identify gaps in learning material.";

const ANALYSIS_DIRECTIVE: &str =
    "Analyze this explanation and highlight missing or unclear points.";

/// The three fields posted by the page. Missing fields come through as empty strings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisForm {
    pub topic: String,
    pub concepts: String,
    pub explanation: String,
}

impl AnalysisForm {
    /// Builds the form from submitted name/value pairs. The first value of a
    /// repeated field wins and unknown names are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut topic: Option<String> = None;
        let mut concepts: Option<String> = None;
        let mut explanation: Option<String> = None;
        for (name, value) in pairs {
            let slot = match name.as_ref() {
                "topic" => &mut topic,
                "concepts" => &mut concepts,
                "explanation" => &mut explanation,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        AnalysisForm {
            topic: topic.unwrap_or_default(),
            concepts: concepts.unwrap_or_default(),
            explanation: explanation.unwrap_or_default(),
        }
    }

    /// User input is interpolated verbatim.
    pub fn build_prompt(&self) -> String {
        format!(
            "Topic: {}\nConcepts: {}\nExplanation: {}\n{}",
            self.topic, self.concepts, self.explanation, ANALYSIS_DIRECTIVE
        )
    }
}
