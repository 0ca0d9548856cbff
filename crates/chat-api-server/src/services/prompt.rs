use crate::models::UserProfile;

pub struct PromptBuilder {
    persona: String,
}

impl PromptBuilder {
    pub fn new(persona: String) -> Self {
        Self { persona }
    }

    pub fn persona(&self) -> &str {
        &self.persona
    }

    pub fn default_persona() -> String {
        "You are Cloud, a friendly AI assistant with a brotherly personality. You are helpful, \
         enthusiastic, and use casual language. You love to help people and always try to be \
         encouraging and supportive. Use emojis occasionally to make conversations more friendly. \
         Always respond in a warm, approachable manner."
            .to_string()
    }

    /// System prompt for one turn: persona, then the profile section when the
    /// caller told us a name or pronouns.
    pub fn build(&self, profile: Option<&UserProfile>) -> String {
        let mut prompt = self.persona.clone();

        let Some(profile) = profile.filter(|p| !p.is_empty()) else {
            return prompt;
        };

        prompt.push_str("\n\nUser Profile Information:");
        if let Some(name) = non_blank(&profile.name) {
            prompt.push_str(&format!("\n- Name: {}", name));
        }
        if let Some(pronouns) = non_blank(&profile.pronouns) {
            prompt.push_str(&format!("\n- Pronouns: {}", pronouns));
        }
        prompt.push_str(
            "\n\nPlease use this information to address the user appropriately and personally. \
             If you know their name, use it naturally in conversation. Respect their pronouns \
             when referring to them.",
        );
        prompt
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(Self::default_persona())
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
