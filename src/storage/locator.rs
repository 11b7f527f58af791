//! Asset locator — deterministic storage keys
//!
//! Keys are derived from customer identity so repeated lookups find
//! previously stored artifacts. Two schemes exist: the customer scheme keyed
//! by the full email address, and the company scheme keyed by the email's
//! domain (used for quote/version history).

/// Artifact role under a customer folder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetRole {
    Logos,
    Mockups,
}

impl AssetRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Logos => "logos",
            Self::Mockups => "mockups",
        }
    }
}

/// Sanitize a path segment: lowercase, keep `[a-z0-9_-]`, everything else
/// becomes `_`. Stable and both URL- and filesystem-safe.
fn sanitize_segment(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Folder name for a customer: `jane@corp.com` -> `jane_at_corp_dot_com`
pub fn customer_folder(email: &str) -> String {
    let tokenized = email.to_lowercase().replace('@', "_at_").replace('.', "_dot_");
    sanitize_segment(&tokenized)
}

/// Customer-scoped key: `<folder>/<role>/<filename>`
pub fn customer_key(email: &str, role: AssetRole, filename: &str) -> String {
    format!(
        "{}/{}/{}",
        customer_folder(email),
        role.as_str(),
        sanitize_filename(filename)
    )
}

/// Key for a product's generated mockup: `<folder>/mockups/<product_id>.png`
pub fn mockup_key(email: &str, product_id: &str) -> String {
    customer_key(email, AssetRole::Mockups, &format!("{product_id}.png"))
}

/// Prefix under which all of a customer's mockups live
pub fn mockup_prefix(email: &str) -> String {
    format!("{}/{}/", customer_folder(email), AssetRole::Mockups.as_str())
}

/// Domain of an email address, sanitized for use as a folder
pub fn company_domain(email: &str) -> String {
    let domain = email.rsplit_once('@').map(|(_, d)| d).unwrap_or(email);
    let tokenized = domain.to_lowercase().replace('.', "_dot_");
    sanitize_segment(&tokenized)
}

/// Company-scoped key for quote/version artifacts:
/// `company/<domain>/quotes/<quote_id>/versions/<version_id>/<filename>`
pub fn company_key(email: &str, quote_id: &str, version_id: &str, filename: &str) -> String {
    format!(
        "company/{}/quotes/{}/versions/{}/{}",
        company_domain(email),
        sanitize_segment(quote_id),
        sanitize_segment(version_id),
        sanitize_filename(filename)
    )
}

/// Sanitize a filename, preserving the extension dot.
fn sanitize_filename(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => {
            format!("{}.{}", sanitize_segment(stem), sanitize_segment(ext))
        }
        _ => sanitize_segment(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_tokenizes_email() {
        assert_eq!(customer_folder("Jane@Corp.com"), "jane_at_corp_dot_com");
    }

    #[test]
    fn keys_are_stable() {
        let a = mockup_key("jane@corp.com", "tee-classic");
        let b = mockup_key("jane@corp.com", "tee-classic");
        assert_eq!(a, b);
        assert_eq!(a, "jane_at_corp_dot_com/mockups/tee-classic.png");
    }

    #[test]
    fn unsafe_characters_are_replaced() {
        let folder = customer_folder("j e+n@corp.com/..");
        assert!(folder.chars().all(|c| c.is_ascii_lowercase()
            || c.is_ascii_digit()
            || c == '_'
            || c == '-'));
    }

    #[test]
    fn filename_keeps_extension() {
        assert_eq!(
            customer_key("a@b.c", AssetRole::Logos, "My Logo.PNG"),
            "a_at_b_dot_c/logos/my_logo.png"
        );
    }

    #[test]
    fn company_scheme_uses_domain() {
        assert_eq!(
            company_key("jane@corp.com", "Q-42", "v1", "design.png"),
            "company/corp_dot_com/quotes/q-42/versions/v1/design.png"
        );
    }

    #[test]
    fn mockup_prefix_matches_mockup_key() {
        let key = mockup_key("jane@corp.com", "mug");
        assert!(key.starts_with(&mockup_prefix("jane@corp.com")));
    }
}
