//! Normalization of model-emitted query text.
//!
//! Models asked to output "only SQL" still wrap it in Markdown fences often
//! enough that the pipeline strips them as a fixed, idempotent
//! transformation instead of ad hoc pattern matching at call sites.

/// Strip a single wrapping Markdown code fence (with or without an info
/// string such as `sql`) and surrounding whitespace.
///
/// Text without a leading fence is only trimmed, so the transformation is
/// idempotent: `strip_code_fences(strip_code_fences(x)) ==
/// strip_code_fences(x)`.
pub fn strip_code_fences(raw: &str) -> String {
    let trimmed = raw.trim();

    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed.to_string();
    };

    // Drop the info string on the opening fence line ("sql", "postgres", …).
    let body = match rest.split_once('\n') {
        Some((_info, body)) => body,
        None => rest,
    };

    let body = body.trim_end();
    let body = body.strip_suffix("```").unwrap_or(body);
    body.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUERY: &str = "SELECT org_name, plan_name, monthly_premium\n\
                         FROM cms_landscape_2025\n\
                         WHERE county ILIKE 'Cook'\n\
                         ORDER BY monthly_premium ASC\nLIMIT 5;";

    #[test]
    fn strips_fence_with_info_string() {
        let fenced = format!("```sql\n{QUERY}\n```");
        assert_eq!(strip_code_fences(&fenced), QUERY);
    }

    #[test]
    fn strips_bare_fence() {
        let fenced = format!("```\n{QUERY}\n```");
        assert_eq!(strip_code_fences(&fenced), QUERY);
    }

    #[test]
    fn strips_single_line_fence() {
        assert_eq!(strip_code_fences("```SELECT 1```"), "SELECT 1");
    }

    #[test]
    fn leaves_clean_text_untouched() {
        assert_eq!(strip_code_fences(QUERY), QUERY);
        assert_eq!(strip_code_fences("  SELECT 1  "), "SELECT 1");
    }

    #[test]
    fn is_idempotent() {
        let fenced = format!("```sql\n{QUERY}\n```");
        let once = strip_code_fences(&fenced);
        assert_eq!(strip_code_fences(&once), once);
    }

    #[test]
    fn handles_unterminated_fence() {
        assert_eq!(strip_code_fences("```sql\nSELECT 1"), "SELECT 1");
    }
}
