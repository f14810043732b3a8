//! User-supplied term substitutions applied to translated output.
//!
//! The format is a line-oriented mini-language: every line containing the
//! literal separator `=>` maps the trimmed left side to the trimmed right
//! side; all other lines are ignored. Substitution is sequential literal
//! string replacement with no word-boundary awareness — both behaviors
//! are deliberate contract, not accident.

/// An ordered sequence of (source_term, target_term) pairs.
#[derive(Debug, Clone, Default)]
pub struct Glossary {
    pairs: Vec<(String, String)>,
}

impl Glossary {
    /// Parses the raw glossary text. A repeated source term drops the
    /// earlier entry: the last line wins, for value and position both.
    pub fn parse(raw: &str) -> Self {
        let mut pairs: Vec<(String, String)> = Vec::new();

        for line in raw.lines() {
            let Some((left, right)) = line.split_once("=>") else {
                continue;
            };
            let source = left.trim();
            let target = right.trim();
            if source.is_empty() {
                continue;
            }
            if let Some(pos) = pairs.iter().position(|(s, _)| s == source) {
                pairs.remove(pos);
            }
            pairs.push((source.to_string(), target.to_string()));
        }

        Self { pairs }
    }

    /// Applies each pair in order as a literal substring replacement.
    /// Later pairs operate on already-substituted text.
    pub fn apply(&self, text: &str) -> String {
        let mut out = text.to_string();
        for (source, target) in &self.pairs {
            out = out.replace(source.as_str(), target.as_str());
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }
}
