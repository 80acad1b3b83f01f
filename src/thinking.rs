//! Reasoning-budget configuration for a generation request

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::pricing::PricingEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub(crate) enum ThinkingLevel {
    Low,
    Medium,
    High,
}

impl ThinkingLevel {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            ThinkingLevel::Low => "LOW",
            ThinkingLevel::Medium => "MEDIUM",
            ThinkingLevel::High => "HIGH",
        }
    }
}

/// Token budget for a named level
pub(crate) fn budget_for_level(level: ThinkingLevel, is_pro_class: bool) -> u32 {
    match level {
        ThinkingLevel::Low => 4096,
        ThinkingLevel::Medium => 12288,
        ThinkingLevel::High if is_pro_class => 32768,
        ThinkingLevel::High => 24576,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "SCREAMING_SNAKE_CASE")]
pub(crate) enum ThinkingConfig {
    #[default]
    None,
    Budget {
        budget: u32,
    },
    Level {
        level: ThinkingLevel,
    },
}

impl ThinkingConfig {
    /// Budget to send with the request, or `None` when thinking is off or the
    /// model cannot think
    pub(crate) fn directive(&self, entry: &PricingEntry) -> Option<u32> {
        if !entry.supports_thinking {
            return None;
        }
        match *self {
            ThinkingConfig::None => None,
            ThinkingConfig::Budget { budget } => Some(budget),
            ThinkingConfig::Level { level } => Some(budget_for_level(level, entry.is_pro_class())),
        }
    }

    pub(crate) fn describe(&self) -> String {
        match self {
            ThinkingConfig::None => "off".to_string(),
            ThinkingConfig::Budget { budget } => format!("budget {budget}"),
            ThinkingConfig::Level { level } => format!("level {}", level.as_str()),
        }
    }
}
