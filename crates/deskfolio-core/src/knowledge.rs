//! Canned answers about the site owner
//!
//! The knowledge base is fixed at build time. Every [`Topic`] has exactly one
//! answer, so lookups never fail.

use serde::{Deserialize, Serialize};

pub const OWNER_NAME: &str = "Sharique";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    Skills,
    Experience,
    Education,
    Projects,
    Internships,
    Achievements,
    Contact,
    Background,
    Future,
    Languages,
}

impl Topic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Skills => "skills",
            Topic::Experience => "experience",
            Topic::Education => "education",
            Topic::Projects => "projects",
            Topic::Internships => "internships",
            Topic::Achievements => "achievements",
            Topic::Contact => "contact",
            Topic::Background => "background",
            Topic::Future => "future",
            Topic::Languages => "languages",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        let needle = s.trim().to_lowercase();
        Self::all().into_iter().find(|topic| topic.as_str() == needle)
    }

    pub fn all() -> Vec<Topic> {
        vec![
            Topic::Skills,
            Topic::Experience,
            Topic::Education,
            Topic::Projects,
            Topic::Internships,
            Topic::Achievements,
            Topic::Contact,
            Topic::Background,
            Topic::Future,
            Topic::Languages,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Topic::Skills => "Skills",
            Topic::Experience => "Experience",
            Topic::Education => "Education",
            Topic::Projects => "Projects",
            Topic::Internships => "Internships",
            Topic::Achievements => "Achievements",
            Topic::Contact => "Contact",
            Topic::Background => "Background",
            Topic::Future => "Future",
            Topic::Languages => "Languages",
        }
    }
}

const SKILLS: &str = "I'm proficient in Python, Java, C, C++, C#, SQL, JavaScript, HTML/CSS. I work with React, Node.js, .NET, Django, Flask, and have experience with Azure DevOps, Docker, Git, MongoDB, and PostgreSQL. In AI/ML, I use LangChain, OpenAI API, Cohere, and TensorFlow.";
const EXPERIENCE: &str = "I'm currently a DevOps Intern at Penn State ORIS, modernizing systems with C# .NET. Previously, I was a Data Science Intern at Forth Square working with Azure and AI APIs. I also grade CS assignments at Penn State and led teams at Starbucks.";
const EDUCATION: &str = "I'm pursuing a B.S. in Computer Science with a Cybersecurity minor at Penn State (graduating May 2026). I maintain a 3.5 GPA and have been on the Dean's List multiple times. I graduated from high school in Dubai with a 3.8 GPA.";
const PROJECTS: &str = "Key projects: AI-Powered Travel Planner (React + LangChain), Smart Recipe Generator (ChatGPT API), YouTube Transcriber, custom compiler components (lexer/parser), and this interactive portfolio.";
const INTERNSHIPS: &str = "Penn State ORIS (DevOps, current) with C# .NET and Azure DevOps; Forth Square (Data Science) with cloud and AI app development.";
const ACHIEVEMENTS: &str = "Runner-up for Most Innovative Idea at EXPO 2020 Dubai; multiple Dean's List awards; bilingual in English and Hindi; Azure Fundamentals (in progress).";
const CONTACT: &str = "Reach me at sharique.khatri@gmail.com or (814) 769-0678. Based in State College, PA during the academic year.";
const BACKGROUND: &str = "Originally from Dubai, UAE. Passionate about AI, full-stack, and creative problem-solving.";
const FUTURE: &str = "Open to SWE roles in AI/ML apps, full-stack, or DevOps at companies building cutting-edge tech.";
const LANGUAGES: &str = "Fluent in English and Hindi. Programming: strongest in Python and JS; also Java, C, C++, C#, SQL.";

/// Immutable topic → answer table.
#[derive(Debug, Clone, Copy, Default)]
pub struct KnowledgeBase;

impl KnowledgeBase {
    pub fn builtin() -> Self {
        Self
    }

    pub fn answer(&self, topic: Topic) -> &'static str {
        match topic {
            Topic::Skills => SKILLS,
            Topic::Experience => EXPERIENCE,
            Topic::Education => EDUCATION,
            Topic::Projects => PROJECTS,
            Topic::Internships => INTERNSHIPS,
            Topic::Achievements => ACHIEVEMENTS,
            Topic::Contact => CONTACT,
            Topic::Background => BACKGROUND,
            Topic::Future => FUTURE,
            Topic::Languages => LANGUAGES,
        }
    }

    /// All entries in declaration order.
    pub fn entries(&self) -> Vec<(Topic, &'static str)> {
        Topic::all()
            .into_iter()
            .map(|topic| (topic, self.answer(topic)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_topic_has_an_answer() {
        let kb = KnowledgeBase::builtin();
        for (topic, answer) in kb.entries() {
            assert!(!answer.trim().is_empty(), "{} has no answer", topic.as_str());
        }
    }

    #[test]
    fn test_topic_ids_are_unique() {
        let ids: HashSet<&str> = Topic::all().iter().map(|t| t.as_str()).collect();
        assert_eq!(ids.len(), Topic::all().len());
    }

    #[test]
    fn test_topic_from_str() {
        assert_eq!(Topic::from_str("skills"), Some(Topic::Skills));
        assert_eq!(Topic::from_str(" Contact "), Some(Topic::Contact));
        assert_eq!(Topic::from_str("hobbies"), None);
    }
}
