// src/config/profile.rs
// =============================================================================
// Site profiles: the per-site bundle of selectors, video extensions and
// duration heuristics.
//
// Every site lays out its video links differently. Instead of editing code
// for each target, users describe a site in a YAML file:
//
//   profiles:
//     mysite:
//       selectors:
//         - { selector: "a.download[href]", attribute: href }
//       extensions: [mp4, webm]
//       duration:
//         attributes: [data-duration]
//         ancestor_depth: 2
//       follow: ["/videos/"]
//       priority: ["/watch/"]
//
// Anything left out falls back to the built-in "default" profile. Selectors
// and regexes are compiled once, when the file is loaded, so a typo fails
// fast instead of silently matching nothing halfway through a crawl.
// =============================================================================

use crate::error::CrawlError;
use regex::Regex;
use scraper::Selector;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Name of the profile that always exists
pub const DEFAULT_PROFILE: &str = "default";

const DEFAULT_SELECTORS: &[(&str, &str)] = &[
    ("a[href]", "href"),
    ("video[src]", "src"),
    ("video source[src]", "src"),
    ("meta[property=\"og:video\"]", "content"),
    ("meta[property=\"og:video:url\"]", "content"),
];

const DEFAULT_EXTENSIONS: &[&str] = &[
    "mp4", "avi", "mov", "wmv", "flv", "webm", "mkv", "m4v", "3gp",
];

const DEFAULT_DURATION_ATTRIBUTES: &[&str] = &[
    "data-duration",
    "duration",
    "data-length",
    "length",
    "data-time",
];

const DEFAULT_ANCESTOR_DEPTH: usize = 3;

// Sections that usually list videos; crawled before the rest of the site
const DEFAULT_PRIORITY: &[&str] = &[r"(?i)/(?:videos?|movies?|films?|play|watch|v)/"];

// -----------------------------------------------------------------------------
// Compiled profile (what the crawler works with)
// -----------------------------------------------------------------------------

/// One CSS selector plus the attribute that holds the candidate URL
#[derive(Debug, Clone)]
pub struct CandidateSelector {
    pub source: String,
    pub selector: Selector,
    pub attribute: String,
}

/// Settings for `extract::estimate_duration`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationHeuristic {
    /// Element attributes inspected first, in order
    pub attributes: Vec<String>,
    /// How many ancestor elements to search for duration text
    pub ancestor_depth: usize,
    /// Look for duration hints in the URL path and query
    pub scan_url: bool,
    /// Fall back to page-level <meta> duration when a page has one candidate
    pub page_metadata: bool,
}

impl Default for DurationHeuristic {
    fn default() -> Self {
        Self {
            attributes: DEFAULT_DURATION_ATTRIBUTES
                .iter()
                .map(|a| a.to_string())
                .collect(),
            ancestor_depth: DEFAULT_ANCESTOR_DEPTH,
            scan_url: true,
            page_metadata: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SiteProfile {
    pub name: String,
    pub selectors: Vec<CandidateSelector>,
    /// Lowercase, without the leading dot
    pub extensions: Vec<String>,
    pub duration: DurationHeuristic,
    /// Same-site links must match one of these to be crawled (empty = all)
    pub follow: Vec<Regex>,
    /// Links matching one of these are crawled ahead of other pages
    pub priority: Vec<Regex>,
}

impl SiteProfile {
    /// The built-in profile used when no other is selected
    pub fn builtin() -> Self {
        let rules: Vec<SelectorRule> = DEFAULT_SELECTORS
            .iter()
            .map(|(selector, attribute)| SelectorRule {
                selector: selector.to_string(),
                attribute: attribute.to_string(),
            })
            .collect();

        Self {
            name: DEFAULT_PROFILE.to_string(),
            // The constants above are known-good selectors
            selectors: compile_selectors(DEFAULT_PROFILE, &rules)
                .unwrap_or_default(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            duration: DurationHeuristic::default(),
            follow: Vec::new(),
            priority: compile_patterns(DEFAULT_PROFILE, "priority", DEFAULT_PRIORITY)
                .unwrap_or_default(),
        }
    }

    /// Whether a same-site link should be queued for crawling
    pub fn should_follow(&self, url: &str) -> bool {
        self.follow.is_empty() || self.follow.iter().any(|re| re.is_match(url))
    }

    /// Whether a same-site link jumps the crawl queue
    pub fn is_priority(&self, url: &str) -> bool {
        self.priority.iter().any(|re| re.is_match(url))
    }

    // Builds a profile from its YAML form, taking missing pieces from `base`
    fn from_raw(name: &str, raw: RawProfile, base: &SiteProfile) -> Result<Self, CrawlError> {
        let selectors = match raw.selectors {
            Some(rules) => compile_selectors(name, &rules)?,
            None => base.selectors.clone(),
        };

        let extensions = match raw.extensions {
            Some(exts) => normalize_extensions(name, exts)?,
            None => base.extensions.clone(),
        };

        let duration = match raw.duration {
            Some(d) => DurationHeuristic {
                attributes: d.attributes.unwrap_or_else(|| base.duration.attributes.clone()),
                ancestor_depth: d.ancestor_depth.unwrap_or(base.duration.ancestor_depth),
                scan_url: d.scan_url.unwrap_or(base.duration.scan_url),
                page_metadata: d.page_metadata.unwrap_or(base.duration.page_metadata),
            },
            None => base.duration.clone(),
        };

        let follow = match raw.follow {
            Some(patterns) => compile_patterns(name, "follow", &patterns)?,
            None => base.follow.clone(),
        };

        let priority = match raw.priority {
            Some(patterns) => compile_patterns(name, "priority", &patterns)?,
            None => base.priority.clone(),
        };

        Ok(Self {
            name: name.to_string(),
            selectors,
            extensions,
            duration,
            follow,
            priority,
        })
    }
}

fn compile_selectors(profile: &str, rules: &[SelectorRule]) -> Result<Vec<CandidateSelector>, CrawlError> {
    if rules.is_empty() {
        return Err(CrawlError::Config(format!(
            "profile '{}': at least one selector is required",
            profile
        )));
    }

    rules
        .iter()
        .map(|rule| {
            let selector = Selector::parse(&rule.selector).map_err(|e| {
                CrawlError::Config(format!(
                    "profile '{}': invalid selector '{}': {}",
                    profile, rule.selector, e
                ))
            })?;
            Ok(CandidateSelector {
                source: rule.selector.clone(),
                selector,
                attribute: rule.attribute.clone(),
            })
        })
        .collect()
}

fn compile_patterns<S: AsRef<str>>(
    profile: &str,
    kind: &str,
    patterns: &[S],
) -> Result<Vec<Regex>, CrawlError> {
    patterns
        .iter()
        .map(|p| {
            Regex::new(p.as_ref()).map_err(|e| {
                CrawlError::Config(format!(
                    "profile '{}': invalid {} pattern '{}': {}",
                    profile,
                    kind,
                    p.as_ref(),
                    e
                ))
            })
        })
        .collect()
}

// Accepts "mp4", ".mp4" and "MP4" alike
fn normalize_extensions(profile: &str, exts: Vec<String>) -> Result<Vec<String>, CrawlError> {
    let mut out: Vec<String> = Vec::new();
    for ext in exts {
        let ext = ext.trim().trim_start_matches('.').to_lowercase();
        if ext.is_empty() {
            return Err(CrawlError::Config(format!(
                "profile '{}': empty video extension",
                profile
            )));
        }
        if !out.contains(&ext) {
            out.push(ext);
        }
    }
    if out.is_empty() {
        return Err(CrawlError::Config(format!(
            "profile '{}': at least one video extension is required",
            profile
        )));
    }
    Ok(out)
}

// -----------------------------------------------------------------------------
// YAML form
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SelectorRule {
    pub selector: String,
    #[serde(default = "default_attribute")]
    pub attribute: String,
}

fn default_attribute() -> String {
    "href".to_string()
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProfileFile {
    #[serde(default)]
    profiles: BTreeMap<String, RawProfile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawProfile {
    selectors: Option<Vec<SelectorRule>>,
    extensions: Option<Vec<String>>,
    duration: Option<RawDuration>,
    follow: Option<Vec<String>>,
    priority: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDuration {
    attributes: Option<Vec<String>>,
    ancestor_depth: Option<usize>,
    scan_url: Option<bool>,
    page_metadata: Option<bool>,
}

// -----------------------------------------------------------------------------
// Profile registry
// -----------------------------------------------------------------------------

/// All profiles available to one invocation, keyed by name
#[derive(Debug, Clone)]
pub struct ProfileSet {
    profiles: BTreeMap<String, SiteProfile>,
}

impl ProfileSet {
    /// Only the built-in default profile
    pub fn builtin() -> Self {
        let mut profiles = BTreeMap::new();
        profiles.insert(DEFAULT_PROFILE.to_string(), SiteProfile::builtin());
        Self { profiles }
    }

    /// Built-in profiles plus the ones defined in a YAML document.
    ///
    /// A "default" entry in the document overrides the built-in default,
    /// and every other profile inherits from the (possibly overridden)
    /// default.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CrawlError> {
        let mut file: ProfileFile = serde_yaml::from_str(yaml)
            .map_err(|e| CrawlError::Config(format!("invalid profile file: {}", e)))?;

        let mut base = SiteProfile::builtin();
        if let Some(raw_default) = file.profiles.remove(DEFAULT_PROFILE) {
            base = SiteProfile::from_raw(DEFAULT_PROFILE, raw_default, &base)?;
        }

        let mut set = Self {
            profiles: BTreeMap::new(),
        };
        for (name, raw) in file.profiles {
            let profile = SiteProfile::from_raw(&name, raw, &base)?;
            set.profiles.insert(name, profile);
        }
        set.profiles.insert(DEFAULT_PROFILE.to_string(), base);
        Ok(set)
    }

    /// Reads profiles from a YAML file
    pub fn load(path: &Path) -> Result<Self, CrawlError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CrawlError::Config(format!("cannot read profile file {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Looks up a profile by name
    pub fn get(&self, name: &str) -> Result<&SiteProfile, CrawlError> {
        self.profiles.get(name).ok_or_else(|| {
            CrawlError::Config(format!(
                "unknown profile '{}' (available: {})",
                name,
                self.names().collect::<Vec<_>>().join(", ")
            ))
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SiteProfile> {
        self.profiles.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_profile_has_defaults() {
        let profile = SiteProfile::builtin();
        assert_eq!(profile.name, "default");
        assert_eq!(profile.selectors.len(), DEFAULT_SELECTORS.len());
        assert!(profile.extensions.contains(&"mp4".to_string()));
        assert!(profile.extensions.contains(&"mkv".to_string()));
        assert_eq!(profile.duration.ancestor_depth, 3);
        assert!(profile.follow.is_empty());
        assert!(profile.is_priority("https://example.com/videos/latest"));
        assert!(profile.is_priority("https://example.com/watch/123"));
        assert!(!profile.is_priority("https://example.com/about"));
    }

    #[test]
    fn test_priority_patterns_override_and_inherit() {
        let yaml = r#"
profiles:
  custom:
    priority: ["/clips/"]
  plain:
    extensions: [mp4]
"#;
        let set = ProfileSet::from_yaml_str(yaml).unwrap();
        let custom = set.get("custom").unwrap();
        assert!(custom.is_priority("https://example.com/clips/1"));
        assert!(!custom.is_priority("https://example.com/videos/1"));

        let plain = set.get("plain").unwrap();
        assert!(plain.is_priority("https://example.com/videos/1"));
    }

    #[test]
    fn test_yaml_profile_inherits_missing_fields() {
        let yaml = r#"
profiles:
  mysite:
    extensions: [".MP4", webm]
    follow: ["/videos/"]
"#;
        let set = ProfileSet::from_yaml_str(yaml).unwrap();
        let profile = set.get("mysite").unwrap();
        assert_eq!(profile.extensions, vec!["mp4", "webm"]);
        assert_eq!(profile.selectors.len(), DEFAULT_SELECTORS.len());
        assert!(profile.should_follow("https://example.com/videos/page2"));
        assert!(!profile.should_follow("https://example.com/about"));
        // The default profile is still there
        assert!(set.get("default").is_ok());
    }

    #[test]
    fn test_default_override_propagates() {
        let yaml = r#"
profiles:
  default:
    extensions: [mkv]
  other:
    duration:
      ancestor_depth: 1
"#;
        let set = ProfileSet::from_yaml_str(yaml).unwrap();
        assert_eq!(set.get("default").unwrap().extensions, vec!["mkv"]);
        let other = set.get("other").unwrap();
        assert_eq!(other.extensions, vec!["mkv"]);
        assert_eq!(other.duration.ancestor_depth, 1);
        assert!(other.duration.scan_url);
    }

    #[test]
    fn test_selector_attribute_defaults_to_href() {
        let yaml = r#"
profiles:
  links:
    selectors:
      - selector: "a.video"
"#;
        let set = ProfileSet::from_yaml_str(yaml).unwrap();
        let profile = set.get("links").unwrap();
        assert_eq!(profile.selectors.len(), 1);
        assert_eq!(profile.selectors[0].attribute, "href");
    }

    #[test]
    fn test_invalid_selector_is_config_error() {
        let yaml = r#"
profiles:
  broken:
    selectors:
      - { selector: "a[[", attribute: href }
"#;
        let err = ProfileSet::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, CrawlError::Config(_)));
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_invalid_follow_pattern_is_config_error() {
        let yaml = "profiles:\n  bad:\n    follow: [\"(unclosed\"]\n";
        assert!(matches!(
            ProfileSet::from_yaml_str(yaml),
            Err(CrawlError::Config(_))
        ));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = "profiles:\n  typo:\n    extentions: [mp4]\n";
        assert!(ProfileSet::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn test_empty_extensions_rejected() {
        let yaml = "profiles:\n  none:\n    extensions: []\n";
        assert!(ProfileSet::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn test_unknown_profile_lists_available() {
        let set = ProfileSet::builtin();
        let err = set.get("nope").unwrap_err();
        assert!(err.to_string().contains("default"));
    }

    #[test]
    fn test_load_missing_file() {
        let result = ProfileSet::load(Path::new("/definitely/not/here.yaml"));
        assert!(matches!(result, Err(CrawlError::Config(_))));
    }
}
