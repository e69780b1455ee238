// Shared prompt fragments.
// Each module that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting fragments only.

/// Instruction appended to prompts whose response is parsed as JSON.
pub const JSON_ONLY_INSTRUCTION: &str = "Return JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Instruction appended to every prompt that writes on the candidate's behalf.
pub const NO_FABRICATION_INSTRUCTION: &str = "Do NOT invent experience, tools, roles, \
    employers, or metrics that are not present in the resume.";
