use ammonia;

use crate::models::quiz::CreateQuizRequest;

/// Clean HTML content using the ammonia library.
///
/// Whitelist-based: safe tags (like <b>, <p>) survive, dangerous tags
/// (like <script>, <iframe>) and attributes (like onclick) are stripped.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}

/// Sanitizes the displayed text of an authored quiz.
///
/// The category is a filter and grouping key, so it is only trimmed.
pub fn sanitize_quiz(mut req: CreateQuizRequest) -> CreateQuizRequest {
    req.title = clean_html(&req.title);
    req.description = req.description.as_deref().map(clean_html);
    req.category = req.category.trim().to_string();
    for question in &mut req.questions {
        question.text = clean_html(&question.text);
        for option in &mut question.options {
            option.text = clean_html(&option.text);
        }
    }
    req
}
