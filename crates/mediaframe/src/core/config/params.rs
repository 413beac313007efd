//! URL Query Parameters
//!
//! Parses the wrapper's query string into typed, optional fields.
//! Invalid values are dropped with a warning so that the lower-priority
//! source for that field applies instead.

use tracing::warn;
use url::{form_urlencoded, Url};

use super::model::{Attribution, Caption, LinkedText};
use crate::core::{ThemePreference, TypeRequest, WrapperError};

/// Typed view of the wrapper's URL query parameters
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryParams {
    /// `m`, manifest URI
    pub manifest: Option<String>,
    /// `type`
    pub content_type: Option<TypeRequest>,
    /// `src`
    pub src: Option<String>,
    /// `t`
    pub title: Option<String>,
    /// `h`
    pub show_header: Option<bool>,
    /// `bg`
    pub background_color: Option<String>,
    /// `theme`
    pub theme: Option<ThemePreference>,
    /// `p`
    pub poster: Option<String>,
    /// `cs`/`cl`/`clb`/`cd`
    pub caption: Option<Caption>,
    /// `at`/`atu`, `aa`/`aau`, `al`/`alu`
    pub attribution: Option<Attribution>,
}

impl QueryParams {
    /// Parses a raw query string, with or without the leading `?`
    pub fn parse(query: &str) -> Self {
        let query = query.trim().trim_start_matches('?');
        let pairs: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        // Later duplicates win, matching URLSearchParams.get on a rebuilt map.
        let get = |key: &str| -> Option<String> {
            pairs
                .iter()
                .rev()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let content_type = get("type").and_then(|raw| {
            raw.parse::<TypeRequest>()
                .map_err(|reason| reject("type", &raw, reason))
                .ok()
        });

        let theme = get("theme").and_then(|raw| {
            raw.parse::<ThemePreference>()
                .map_err(|reason| reject("theme", &raw, reason))
                .ok()
        });

        let show_header = get("h").and_then(|raw| {
            parse_bool(&raw).or_else(|| {
                reject("h", &raw, "expected 1/0, true/false or yes/no".to_string());
                None
            })
        });

        let background_color = get("bg").and_then(|raw| {
            if is_valid_color(&raw) {
                Some(raw)
            } else {
                reject("bg", &raw, "not a CSS color".to_string());
                None
            }
        });

        let caption = get("cs").map(|uri| {
            let language = get("cl").unwrap_or_else(|| "en".to_string());
            let label = get("clb").unwrap_or_else(|| language.clone());
            let is_default = get("cd").and_then(|raw| parse_bool(&raw)).unwrap_or(true);
            Caption {
                uri,
                language,
                label,
                is_default,
            }
        });

        let linked = |text_key: &str, uri_key: &str| -> Option<LinkedText> {
            let part = LinkedText {
                text: get(text_key),
                uri: get(uri_key),
            };
            (!part.is_empty()).then_some(part)
        };
        let attribution = Attribution {
            title: linked("at", "atu"),
            author: linked("aa", "aau"),
            license: linked("al", "alu"),
        };

        Self {
            manifest: get("m"),
            content_type,
            src: get("src"),
            title: get("t"),
            show_header,
            background_color,
            theme,
            poster: get("p"),
            caption,
            attribution: (!attribution.is_empty()).then_some(attribution),
        }
    }

    /// Parses the query component of a full URL
    pub fn from_url(url: &Url) -> Self {
        Self::parse(url.query().unwrap_or_default())
    }
}

/// Logs a dropped parameter value and returns the error describing it
fn reject(name: &str, raw: &str, reason: String) -> WrapperError {
    let error = WrapperError::InvalidParameter {
        name: name.to_string(),
        reason,
    };
    warn!(value = %raw, error = %error, "Ignoring query parameter");
    error
}

/// Accepts `1/0`, `true/false`, `yes/no` (case-insensitive)
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

const COLOR_FUNCTIONS: &[&str] = &["rgb", "rgba", "hsl", "hsla"];

/// Accepts `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb()`/`rgba()`/`hsl()`/`hsla()`
/// with numeric arguments, or an alphabetic CSS keyword
pub fn is_valid_color(raw: &str) -> bool {
    let raw = raw.trim();
    if let Some(hex) = raw.strip_prefix('#') {
        return matches!(hex.len(), 3 | 4 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit());
    }
    if let Some((name, rest)) = raw.split_once('(') {
        let Some(args) = rest.strip_suffix(')') else {
            return false;
        };
        return COLOR_FUNCTIONS.contains(&name.to_ascii_lowercase().as_str())
            && !args.trim().is_empty()
            && args
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, ' ' | ',' | '.' | '%' | '/' | '-'))
            && !args.contains("--");
    }
    !raw.is_empty() && raw.len() <= 32 && raw.chars().all(|c| c.is_ascii_alphabetic())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ContentType;

    #[test]
    fn test_parse_basic_fields() {
        let params = QueryParams::parse("?type=video&src=https%3A%2F%2Fcdn.example.org%2Fa.mp4&t=Intro+Lecture&h=0");
        assert_eq!(
            params.content_type,
            Some(TypeRequest::Explicit(ContentType::Video))
        );
        assert_eq!(params.src.as_deref(), Some("https://cdn.example.org/a.mp4"));
        assert_eq!(params.title.as_deref(), Some("Intro Lecture"));
        assert_eq!(params.show_header, Some(false));
        assert!(params.manifest.is_none());
    }

    #[test]
    fn test_parse_empty_query() {
        assert_eq!(QueryParams::parse(""), QueryParams::default());
        assert_eq!(QueryParams::parse("?"), QueryParams::default());
    }

    #[test]
    fn test_invalid_values_are_dropped() {
        let params = QueryParams::parse("type=flash&h=maybe&bg=url(evil)&theme=neon");
        assert!(params.content_type.is_none());
        assert!(params.show_header.is_none());
        assert!(params.background_color.is_none());
        assert!(params.theme.is_none());
    }

    #[test]
    fn test_caption_defaults() {
        let params = QueryParams::parse("src=a.mp4&cs=a.vtt");
        let caption = params.caption.unwrap();
        assert_eq!(caption.language, "en");
        assert_eq!(caption.label, "en");
        assert!(caption.is_default);

        let params = QueryParams::parse("src=a.mp4&cs=b.vtt&cl=fr&clb=Fran%C3%A7ais&cd=false");
        let caption = params.caption.unwrap();
        assert_eq!(caption.language, "fr");
        assert_eq!(caption.label, "Français");
        assert!(!caption.is_default);
    }

    #[test]
    fn test_attribution_parts() {
        let params = QueryParams::parse("at=Cells&aa=Ada&aau=https%3A%2F%2Fada.example&al=CC-BY");
        let attribution = params.attribution.unwrap();
        assert_eq!(attribution.title.unwrap().text.as_deref(), Some("Cells"));
        let author = attribution.author.unwrap();
        assert_eq!(author.uri.as_deref(), Some("https://ada.example"));
        assert_eq!(attribution.license.unwrap().text.as_deref(), Some("CC-BY"));
    }

    #[test]
    fn test_no_attribution_when_absent() {
        assert!(QueryParams::parse("src=a.mp4").attribution.is_none());
    }

    #[test]
    fn test_from_url() {
        let url = Url::parse("https://wrap.example/index.html?m=manifest.json&theme=dark").unwrap();
        let params = QueryParams::from_url(&url);
        assert_eq!(params.manifest.as_deref(), Some("manifest.json"));
        assert_eq!(params.theme, Some(ThemePreference::Dark));
    }

    #[test]
    fn test_color_validation() {
        assert!(is_valid_color("#fff"));
        assert!(is_valid_color("#00ff00aa"));
        assert!(is_valid_color("black"));
        assert!(!is_valid_color("#ggg"));
        assert!(!is_valid_color("red;position:fixed"));
        assert!(is_valid_color("rgb(0, 0, 0)"));
        assert!(is_valid_color("hsla(120, 50%, 40%, 0.5)"));
        assert!(!is_valid_color("url(evil)"));
        assert!(!is_valid_color("rgb(0, 0, 0); color: red"));
        assert!(!is_valid_color("rgb()"));
    }

    #[test]
    fn test_invalid_parameter_error() {
        let error = reject("h", "maybe", "expected a boolean".to_string());
        assert!(matches!(error, WrapperError::InvalidParameter { ref name, .. } if name == "h"));
        assert_eq!(error.to_string(), "Invalid parameter 'h': expected a boolean");
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("YES"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("on"), None);
    }
}
