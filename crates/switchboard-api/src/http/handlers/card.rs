//! Agent capability card.
//!
//! `GET /api/v1/card` describes what this agent can do, one entry per
//! capability route, so callers can discover the skill surface without
//! probing.

use axum::extract::State;

use crate::http::response::ApiResponse;
use crate::state::AppState;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct AgentSkill {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub tags: &'static [&'static str],
}

#[derive(Debug, Serialize)]
pub struct AgentCard {
    pub name: &'static str,
    pub description: &'static str,
    pub version: &'static str,
    pub model: String,
    pub input_modes: &'static [&'static str],
    pub output_modes: &'static [&'static str],
    pub skills: &'static [AgentSkill],
}

const SKILLS: &[AgentSkill] = &[
    AgentSkill {
        id: "math",
        name: "Elementary Math",
        description: "Solve elementary-level math problems",
        tags: &["math", "arithmetic", "problem-solving"],
    },
    AgentSkill {
        id: "hashing_pipeline",
        name: "Hash Chaining (SHA-512 & MD5)",
        description: "Perform a chain of hashing operations using SHA-512 and MD5, returning intermediate and final digests.",
        tags: &["hashing", "sha512", "md5", "tools"],
    },
    AgentSkill {
        id: "image_analysis",
        name: "Image Analysis & Classification",
        description: "Inspect images, describe their content, and answer related questions.",
        tags: &["vision", "image-classification", "multimodal"],
    },
    AgentSkill {
        id: "web_agent",
        name: "Automated Web Tasks",
        description: "Navigate the web, retrieve information, and complete interactive tasks.",
        tags: &["web", "automation", "browsing"],
    },
    AgentSkill {
        id: "code_runner",
        name: "Code Generation & Execution",
        description: "Generate and execute code (e.g., brute-force algorithms) and report results.",
        tags: &["programming", "code-execution", "algorithms"],
    },
    AgentSkill {
        id: "memory_manager",
        name: "Contextual Memory",
        description: "Store and recall user preferences, facts, and goals across sessions.",
        tags: &["memory", "long-term-memory", "personalization"],
    },
];

/// GET /api/v1/card - The agent capability card.
pub async fn get_card(State(state): State<AppState>) -> ApiResponse<AgentCard> {
    let card = AgentCard {
        name: "Switchboard",
        description: "A multi-skill agent: question answering, hashing pipelines, \
            image understanding, web browsing, code generation and execution, \
            and cross-session memory.",
        version: env!("CARGO_PKG_VERSION"),
        model: state.config.model.clone(),
        input_modes: &["text/plain", "image/*"],
        output_modes: &["text/plain"],
        skills: SKILLS,
    };
    ApiResponse::success(card, uuid::Uuid::now_v7().to_string(), 0)
}
