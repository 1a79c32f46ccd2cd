//! Prompt templates sent to the text generator.

/// First draft from the author's opening prompt.
pub fn generation_prompt(prompt: &str, primary_keyword: &str, additional_keywords: &str) -> String {
    format!(
        "{prompt} Ensure the article uses the primary keyword '{primary_keyword}' 1-2 times. \
         Include additional keywords '{additional_keywords}' naturally. \
         Start the article with a markdown heading (e.g., # Article Title) for the title."
    )
}

/// Rewrite of the current draft driven by one refinement prompt.
///
/// `feedback` is appended only when non-empty.
pub fn refinement_prompt(
    previous_draft: &str,
    step_prompt: &str,
    primary_keyword: &str,
    additional_keywords: &str,
    feedback: &str,
) -> String {
    let mut prompt = format!(
        "Refine this article: '{previous_draft}' based on feedback: '{step_prompt}'. \
         Maintain the primary keyword '{primary_keyword}' usage and include additional keywords \
         '{additional_keywords}' naturally. \
         Ensure the article starts with a markdown heading (e.g., # Article Title) for the title."
    );
    if !feedback.is_empty() {
        prompt.push_str(&format!(
            " Additional user feedback: '{feedback}'. Incorporate this feedback as well."
        ));
    }
    prompt
}

/// Full article for an operator-scheduled topic, generated without review.
pub fn scheduled_article_prompt(
    topic: &str,
    primary_keyword: &str,
    additional_keywords: &str,
) -> String {
    format!(
        "Write a 500-word blog post on '{topic}'. Ensure the article uses the primary keyword \
         '{primary_keyword}' 5-10 times (1-2% density) for SEO. Include additional keywords \
         '{additional_keywords}' naturally."
    )
}
