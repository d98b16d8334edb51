//! User-adjustable classification options.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Backend model used to classify the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    OpenAi,
    HuggingFace,
}

impl Provider {
    pub fn all() -> &'static [Provider] {
        &[Provider::OpenAi, Provider::HuggingFace]
    }

    /// Value sent in the `provider` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::HuggingFace => "huggingface",
        }
    }

    /// Human-readable label naming the underlying model.
    pub fn label(self) -> &'static str {
        match self {
            Provider::OpenAi => "OpenAI (GPT-4o-mini)",
            Provider::HuggingFace => "HuggingFace (mDeBERTa-v3-xnli)",
        }
    }

    /// The provider after this one, wrapping around.
    pub fn next(self) -> Provider {
        let all = Self::all();
        let pos = all.iter().position(|p| *p == self).unwrap_or(0);
        all[(pos + 1) % all.len()]
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAi),
            "huggingface" => Ok(Provider::HuggingFace),
            other => Err(format!("Unknown provider: {}", other)),
        }
    }
}

/// Options sent along with every submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationOptions {
    pub stemming_enabled: bool,
    pub provider: Provider,
}

impl ClassificationOptions {
    pub fn toggle_stemming(&mut self) {
        self.stemming_enabled = !self.stemming_enabled;
    }

    pub fn cycle_provider(&mut self) {
        self.provider = self.provider.next();
    }

    /// Apply command-line choices on top of the configured defaults. `None`
    /// keeps the configured value.
    pub fn with_overrides(mut self, stemming: Option<bool>, provider: Option<Provider>) -> Self {
        if let Some(on) = stemming {
            self.stemming_enabled = on;
        }
        if let Some(p) = provider {
            self.provider = p;
        }
        self
    }

    /// Literal `"true"` / `"false"` for the `stemming` query parameter.
    pub fn stemming_param(&self) -> &'static str {
        if self.stemming_enabled { "true" } else { "false" }
    }

    /// Query parameters for the classify endpoint, in wire order.
    pub fn query_pairs(&self) -> [(&'static str, &'static str); 2] {
        [
            ("stemming", self.stemming_param()),
            ("provider", self.provider.as_str()),
        ]
    }
}
