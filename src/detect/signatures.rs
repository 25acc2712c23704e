//! Static signature tables and the matchers compiled from them.
//!
//! Each table is plain data. Rules are compiled once, on first use: a
//! pattern that compiles becomes a case-insensitive regex matcher; one that
//! does not becomes a substring matcher over the rule's own tags, so a bad
//! pattern degrades a rule instead of breaking detection.

use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;
use tracing::warn;

/// Upper bound on compiled regex size, guarding against pathological patterns.
const REGEX_SIZE_LIMIT: usize = 1 << 20;

/// Banner keyword -> technology tags.
pub const BANNER_SIGNATURES: &[(&str, &[&str])] = &[
    ("nginx", &["nginx"]),
    ("apache", &["apache", "httpd"]),
    ("iis", &["microsoft-iis", "microsoft httpapi"]),
    ("lighttpd", &["lighttpd"]),
    ("gunicorn", &["gunicorn"]),
    ("uvicorn", &["uvicorn"]),
    ("openresty", &["openresty"]),
    ("tomcat", &["tomcat"]),
    ("jetty", &["jetty"]),
    ("node(?:js)?", &["node", "express", "nodejs"]),
    ("php", &["php"]),
    ("wordpress", &["wordpress", "wp-"]),
    ("drupal", &["drupal"]),
    ("joomla", &["joomla"]),
    ("django", &["django"]),
    ("flask", &["flask"]),
    ("perl", &["perl"]),
    ("rails|ruby", &["ruby", "rails"]),
    ("asp.net", &["asp.net"]),
    ("openssh", &["openssh", "ssh-"]),
    ("smtp", &["exim", "postfix", "sendmail"]),
    ("mysql", &["mysql"]),
    ("postgres", &["postgres", "postgresql"]),
    ("redis", &["redis"]),
];

/// Header name -> ordered (pattern, tags) rules.
pub const HEADER_SIGNATURES: &[(&str, &[(&str, &[&str])])] = &[
    (
        "server",
        &[
            ("nginx", &["nginx"]),
            ("apache", &["apache"]),
            ("iis", &["microsoft-iis"]),
            ("openresty", &["openresty"]),
            ("gunicorn", &["gunicorn"]),
            ("tomcat", &["tomcat"]),
        ],
    ),
    (
        "x-powered-by",
        &[
            ("PHP", &["php"]),
            ("Express", &["node/express"]),
            ("ASP.NET", &["asp.net"]),
            ("WP Engine", &["wordpress"]),
        ],
    ),
];

/// HTML body markers -> technology tags.
pub const BODY_SIGNATURES: &[(&str, &[&str])] = &[
    ("wp-content", &["wordpress"]),
    ("wp-includes", &["wordpress"]),
    ("Joomla!", &["joomla"]),
    ("Drupal", &["drupal"]),
    ("Powered by Ruby", &["ruby"]),
];

/// `<meta name="generator" content="...">` value -> coarse technology tags.
pub const GENERATOR_SIGNATURES: &[(&str, &[&str])] = &[
    ("wordpress", &["wordpress"]),
    ("joomla", &["joomla"]),
    ("drupal", &["drupal"]),
    ("typo3", &["typo3"]),
    ("ghost", &["ghost"]),
    ("hugo", &["hugo"]),
    ("jekyll", &["jekyll"]),
    ("wix\\.com", &["wix"]),
];

/// Captures the content of a generator meta tag.
const META_GENERATOR_PATTERN: &str =
    r#"<meta[^>]*name=["']?generator["']?[^>]*content=["']?([^"'>]+)"#;

/// How a rule decides whether text matches.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Case-insensitive regular expression.
    Pattern(Regex),
    /// Lower-cased needles checked by containment; each hit yields its own tag.
    Substring(Vec<String>),
}

impl Matcher {
    fn compile(pattern: &str, tags: &[&str]) -> Self {
        match case_insensitive(pattern) {
            Ok(re) => Self::Pattern(re),
            Err(e) => {
                warn!(pattern, error = %e, "Signature pattern rejected, using substring matching.");
                Self::Substring(tags.iter().map(|t| t.to_lowercase()).collect())
            }
        }
    }
}

/// A pattern mapped to one or more technology tags.
#[derive(Debug, Clone)]
pub struct SignatureRule {
    pub pattern: &'static str,
    pub tags: &'static [&'static str],
    matcher: Matcher,
}

impl SignatureRule {
    pub fn new(pattern: &'static str, tags: &'static [&'static str]) -> Self {
        Self {
            pattern,
            tags,
            matcher: Matcher::compile(pattern, tags),
        }
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Tags contributed by this rule for `text`.
    pub fn matches(&self, text: &str) -> Vec<&'static str> {
        match &self.matcher {
            Matcher::Pattern(re) if re.is_match(text) => self.tags.to_vec(),
            Matcher::Pattern(_) => Vec::new(),
            Matcher::Substring(needles) => {
                let haystack = text.to_lowercase();
                self.tags
                    .iter()
                    .zip(needles)
                    .filter(|(_, needle)| haystack.contains(needle.as_str()))
                    .map(|(tag, _)| *tag)
                    .collect()
            }
        }
    }
}

fn case_insensitive(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .size_limit(REGEX_SIZE_LIMIT)
        .build()
}

fn compile_table(table: &'static [(&'static str, &'static [&'static str])]) -> Vec<SignatureRule> {
    table
        .iter()
        .map(|(pattern, tags)| SignatureRule::new(pattern, tags))
        .collect()
}

static BANNER_RULES: LazyLock<Vec<SignatureRule>> =
    LazyLock::new(|| compile_table(BANNER_SIGNATURES));

static HEADER_RULES: LazyLock<Vec<(&'static str, Vec<SignatureRule>)>> = LazyLock::new(|| {
    HEADER_SIGNATURES
        .iter()
        .map(|(header, rules)| (*header, compile_table(rules)))
        .collect()
});

static BODY_RULES: LazyLock<Vec<SignatureRule>> =
    LazyLock::new(|| compile_table(BODY_SIGNATURES));

static GENERATOR_RULES: LazyLock<Vec<SignatureRule>> =
    LazyLock::new(|| compile_table(GENERATOR_SIGNATURES));

static META_GENERATOR: LazyLock<Option<Regex>> =
    LazyLock::new(|| case_insensitive(META_GENERATOR_PATTERN).ok());

pub fn banner_rules() -> &'static [SignatureRule] {
    &BANNER_RULES
}

pub fn header_rules() -> &'static [(&'static str, Vec<SignatureRule>)] {
    &HEADER_RULES
}

pub fn body_rules() -> &'static [SignatureRule] {
    &BODY_RULES
}

pub fn generator_rules() -> &'static [SignatureRule] {
    &GENERATOR_RULES
}

/// Extract the trimmed content of the first generator meta tag, if any.
pub fn extract_meta_generator(body: &str) -> Option<String> {
    let re = META_GENERATOR.as_ref()?;
    re.captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|value| !value.is_empty())
}
