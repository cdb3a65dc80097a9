use anyhow::Result;
use serde_json::json;
use tera::Context;

use crate::domains::recipe::models::GenerateRecipeRequest;
use crate::shared::utils::templates;

/// 생성 요청 -> 프롬프트 (같은 입력이면 항상 같은 결과)
/// Render the generation prompt; a pure function of the request.
pub fn build_prompt(request: &GenerateRecipeRequest) -> Result<String> {
    let ingredients = json!(request
        .ingredients
        .iter()
        .map(|i| json!({ "name": i.name, "quantity": i.quantity, "measure": i.measure }))
        .collect::<Vec<_>>());

    let country = if request.country.trim().eq_ignore_ascii_case("random") {
        "random country".to_string()
    } else {
        request.country.trim().to_string()
    };

    let mut context = Context::new();
    context.insert("ingredients", &ingredients.to_string());
    context.insert("options", &json!(request.options).to_string());
    context.insert("country", &country);
    context.insert("dish_type", &request.dish_type.to_string());

    templates::render(templates::RECIPE_PROMPT, &context)
}

/// 모델 출력에서 마크다운 코드 펜스 제거
/// Strip an optional Markdown code fence (```json / ``` ... ```) around model output
pub fn strip_code_fence(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        // 여는 펜스 뒤 언어 태그 (json 등)
        let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
        text = rest;
    }
    if let Some(rest) = text.trim_end().strip_suffix("```") {
        text = rest;
    }

    text.trim()
}
