//! Offline keyword matching over the knowledge base
//!
//! Rules are checked top to bottom against the lowercased query using plain
//! substring containment (no word boundaries), and the first match wins.

use crate::knowledge::{KnowledgeBase, Topic};

pub const GREETING: &str = "Hello! I'm Sharique's AI assistant. I can tell you about his skills, experience, projects, education, and more. What would you like to know?";
pub const THANKS: &str = "You're welcome! Is there anything else you'd like to know about Sharique?";
pub const DEFAULT_REPLY: &str = "I'm Sharique's AI assistant. I can help you learn about his skills, projects, work experience, education, or background. What specific area interests you?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Matches when any needle occurs in the query.
    Any(&'static [&'static str]),
    /// Matches when a needle from each list occurs in the query.
    Both(&'static [&'static str], &'static [&'static str]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    Topic(Topic),
    Text(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordRule {
    pub name: &'static str,
    pub trigger: Trigger,
    pub reply: Reply,
}

fn contains_any(query: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| query.contains(needle))
}

impl KeywordRule {
    /// `query` must already be lowercased.
    pub fn matches(&self, query: &str) -> bool {
        match self.trigger {
            Trigger::Any(needles) => contains_any(query, needles),
            Trigger::Both(first, second) => contains_any(query, first) && contains_any(query, second),
        }
    }
}

pub const RULES: &[KeywordRule] = &[
    KeywordRule {
        name: "skills",
        trigger: Trigger::Any(&["skill", "tech", "programming", "language"]),
        reply: Reply::Topic(Topic::Skills),
    },
    KeywordRule {
        name: "experience",
        trigger: Trigger::Any(&["experience", "work", "job", "professional"]),
        reply: Reply::Topic(Topic::Experience),
    },
    KeywordRule {
        name: "internships",
        trigger: Trigger::Any(&["intern"]),
        reply: Reply::Topic(Topic::Internships),
    },
    KeywordRule {
        name: "education",
        trigger: Trigger::Any(&["education", "school", "university", "gpa", "degree", "penn state"]),
        reply: Reply::Topic(Topic::Education),
    },
    KeywordRule {
        name: "projects",
        trigger: Trigger::Any(&["project", "build", "portfolio", "github"]),
        reply: Reply::Topic(Topic::Projects),
    },
    KeywordRule {
        name: "achievements",
        trigger: Trigger::Any(&["achievement", "award", "expo", "dean"]),
        reply: Reply::Topic(Topic::Achievements),
    },
    KeywordRule {
        name: "contact",
        trigger: Trigger::Any(&["contact", "email", "phone", "reach", "hire"]),
        reply: Reply::Topic(Topic::Contact),
    },
    KeywordRule {
        name: "background",
        trigger: Trigger::Any(&["background", "about", "dubai", "personal"]),
        reply: Reply::Topic(Topic::Background),
    },
    KeywordRule {
        name: "future",
        trigger: Trigger::Any(&["future", "opportunity", "goal", "career"]),
        reply: Reply::Topic(Topic::Future),
    },
    // Never reached: "skills" already claims every query containing "language".
    KeywordRule {
        name: "languages",
        trigger: Trigger::Both(&["language"], &["speak", "fluent", "hindi", "english"]),
        reply: Reply::Topic(Topic::Languages),
    },
    KeywordRule {
        name: "greeting",
        trigger: Trigger::Any(&["hello", "hi", "hey", "greet"]),
        reply: Reply::Text(GREETING),
    },
    KeywordRule {
        name: "thanks",
        trigger: Trigger::Any(&["thank"]),
        reply: Reply::Text(THANKS),
    },
];

#[derive(Debug, Clone, Copy)]
pub struct Resolver {
    knowledge: KnowledgeBase,
    rules: &'static [KeywordRule],
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(KnowledgeBase::builtin())
    }
}

impl Resolver {
    pub fn new(knowledge: KnowledgeBase) -> Self {
        Self { knowledge, rules: RULES }
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn rules(&self) -> &'static [KeywordRule] {
        self.rules
    }

    /// First rule matching `query`, if any.
    pub fn matching_rule(&self, query: &str) -> Option<&'static KeywordRule> {
        let normalized = query.to_lowercase();
        self.rules.iter().find(|rule| rule.matches(&normalized))
    }

    /// Never returns an empty string.
    pub fn resolve(&self, query: &str) -> String {
        let rule = self.matching_rule(query);
        tracing::debug!(rule = rule.map_or("default", |r| r.name), "resolved query locally");
        let reply = match rule.map(|r| r.reply) {
            Some(Reply::Topic(topic)) => self.knowledge.answer(topic),
            Some(Reply::Text(text)) => text,
            None => DEFAULT_REPLY,
        };
        reply.to_string()
    }
}
