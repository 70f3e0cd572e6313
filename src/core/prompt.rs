use crate::domain::model::ProposalGenerationRequest;

pub const SYSTEM_INSTRUCTION: &str = "You are a professional proposal writer. Always respond with valid JSON only, no markdown formatting.";

const SECTION_GUIDE: [(&str, &str); 5] = [
    ("scopeOfWork", "A detailed scope of work section"),
    ("deliverables", "A clear list of deliverables"),
    ("timeline", "A project timeline with milestones"),
    ("pricing", "Pricing structure and payment terms"),
    ("terms", "Terms and conditions"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system_instruction: String,
    pub user_prompt: String,
}

/// 將提案欄位組成送往上游的 prompt；未提供的選填欄位整行省略
pub fn build_prompt(request: &ProposalGenerationRequest) -> Prompt {
    let mut lines = vec![
        "You are an expert proposal writer for freelancers and agencies. Generate a professional project proposal based on the following information:".to_string(),
        String::new(),
        format!("Client Name: {}", request.client_name),
    ];

    if let Some(company) = present(&request.client_company) {
        lines.push(format!("Client Company: {}", company));
    }
    lines.push(format!("Project Title: {}", request.project_title));
    lines.push(format!("Project Description: {}", request.project_description));
    if let Some(budget) = present(&request.budget_range) {
        lines.push(format!("Budget Range: {}", budget));
    }
    if let Some(timeline) = present(&request.timeline_preference) {
        lines.push(format!("Timeline Preference: {}", timeline));
    }
    lines.push(format!("Services: {}", request.services.join(", ")));
    lines.push(format!("Tone: {}", request.tone));

    lines.push(String::new());
    lines.push("Please generate a comprehensive proposal with the following sections. Format your response as JSON with these exact keys:".to_string());
    for (key, description) in SECTION_GUIDE {
        lines.push(format!("- {}: {}", key, description));
    }

    lines.push(String::new());
    lines.push(format!(
        "Make the proposal professional, clear, and tailored to the project. Use a {} tone throughout.",
        request.tone
    ));

    Prompt {
        system_instruction: SYSTEM_INSTRUCTION.to_string(),
        user_prompt: lines.join("\n"),
    }
}

// 空字串視同未提供
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
