/// 이름으로부터 URL-safe 슬러그 생성
/// Derive a URL-safe slug from a human readable name.
///
/// 유니코드는 ASCII로 음역한 뒤 소문자 `[a-z0-9-]`만 남긴다.
/// Output only contains `[a-z0-9-]`, has no leading/trailing or doubled hyphens,
/// and `slugify(slugify(x)) == slugify(x)`.
pub fn slugify(name: &str) -> String {
    ::slug::slugify(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_url_safe(slug: &str) -> bool {
        slug.bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
            && !slug.starts_with('-')
            && !slug.ends_with('-')
            && !slug.contains("--")
    }

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Omelette"), "omelette");
        assert_eq!(slugify("Spicy  Chicken -- Curry!"), "spicy-chicken-curry");
        assert_eq!(slugify("  Pasta al Pomodoro  "), "pasta-al-pomodoro");
    }

    #[test]
    fn test_slugify_transliterates_to_ascii() {
        assert_eq!(slugify("Crème Brûlée"), "creme-brulee");
        assert_eq!(slugify("İstanbul Kebab"), "istanbul-kebab");
        assert_eq!(slugify("Ça va?"), "ca-va");
    }

    #[test]
    fn test_slugify_is_idempotent_and_url_safe() {
        for name in [
            "Omelette",
            "Mom's Apple Pie (v2)",
            "---",
            "Ça va?",
            "omelette-2",
            "İstanbul Kebab",
            "Crème Brûlée",
            "Smørrebrød",
            "Phở Bò",
        ] {
            let once = slugify(name);
            assert!(is_url_safe(&once), "not url safe for {:?}: {:?}", name, once);
            assert_eq!(slugify(&once), once, "not idempotent for {:?}", name);
        }
    }

    #[test]
    fn test_slugify_without_alphanumerics_is_empty() {
        assert_eq!(slugify("!!! ---"), "");
    }
}
