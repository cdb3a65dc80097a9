use anyhow::{Context as _, Result};
use once_cell::sync::OnceCell;
use tera::{Context, Tera};

// 번들 템플릿 (.html 이름은 자동 이스케이프, .txt는 그대로)
pub const EMAIL_VERIFICATION: &str = "email_verification.html";
pub const RESET_PASSWORD: &str = "reset_password.html";
pub const RECIPE_PROMPT: &str = "prompt_template.txt";

static TEMPLATES: OnceCell<Tera> = OnceCell::new();

fn templates() -> Result<&'static Tera> {
    TEMPLATES.get_or_try_init(|| {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            (
                EMAIL_VERIFICATION,
                include_str!("../../../templates/email_verification.html"),
            ),
            (
                RESET_PASSWORD,
                include_str!("../../../templates/reset_password.html"),
            ),
            (
                RECIPE_PROMPT,
                include_str!("../../../templates/prompt_template.txt"),
            ),
        ])
        .context("Failed to parse bundled templates")?;
        Ok(tera)
    })
}

/// 번들 템플릿 렌더링
/// Render one of the bundled templates; a missing variable is an error.
pub fn render(name: &str, context: &Context) -> Result<String> {
    templates()?
        .render(name, context)
        .with_context(|| format!("Failed to render template {}", name))
}
