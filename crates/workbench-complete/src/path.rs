//! Dotted, bracket-escapable namespace paths.
//!
//! A path such as `db.[my schema].tab` is a sequence of tokens. Each token is either a
//! bracketed literal (`[text with spaces or dots]`) or a run of non-dot characters, and a
//! token followed by a dot names a level to descend into. The final undotted token is the
//! prefix being completed at that level.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

static PATH_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\[.*?\]|[^.]+)\.?").expect("valid path token pattern"));

/// Characters escaped in URL path segments. `/` is included so a name never adds a level.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'%');

/// Split `path` into tokens, keeping each token's trailing dot.
///
/// Returns `None` for an empty path or one that starts with a dot. With `unescape` set, the
/// brackets of bracketed tokens are removed (see [`unescape`]).
///
/// ```
/// use workbench_complete::tokenize;
///
/// assert_eq!(
///     tokenize("db.[my schema].ta", true),
///     Some(vec!["db.".to_string(), "my schema.".to_string(), "ta".to_string()])
/// );
/// assert_eq!(tokenize(".db", true), None);
/// ```
pub fn tokenize(path: &str, unescape: bool) -> Option<Vec<String>> {
    if path.is_empty() || path.starts_with('.') {
        return None;
    }
    let tokens = PATH_TOKEN
        .find_iter(path)
        .map(|m| {
            if unescape {
                self::unescape(m.as_str()).into_owned()
            } else {
                m.as_str().to_string()
            }
        })
        .collect();
    Some(tokens)
}

/// Strip the brackets of a bracketed token: `[a b]` becomes `a b`, `[a b].` becomes `a b.`.
///
/// Tokens without a closing bracket are returned unchanged.
pub fn unescape(token: &str) -> Cow<'_, str> {
    let Some(rest) = token.strip_prefix('[') else {
        return Cow::Borrowed(token);
    };
    if let Some(inner) = rest.strip_suffix(']') {
        return Cow::Borrowed(inner);
    }
    if let Some(inner) = rest.strip_suffix("].") {
        // The dot still marks a level.
        return Cow::Owned(format!("{inner}."));
    }
    Cow::Borrowed(token)
}

/// Bracket `name` when it contains a space, tab or dot, so it survives [`tokenize`].
pub fn escape(name: &str) -> String {
    if name.contains([' ', '\t', '.']) {
        format!("[{name}]")
    } else {
        name.to_string()
    }
}

/// Separate unescaped tokens into the levels to descend through and the trailing prefix.
///
/// Dotted tokens become levels (without their dot). The last token, when it is not dotted,
/// is the prefix; undotted tokens elsewhere do not name a level and are skipped.
pub fn split_levels(tokens: &[String]) -> (Vec<String>, String) {
    let mut levels = Vec::new();
    let mut prefix = String::new();
    for (i, token) in tokens.iter().enumerate() {
        if let Some(level) = token.strip_suffix('.') {
            levels.push(level.to_string());
        } else if i + 1 == tokens.len() {
            prefix = token.clone();
        }
    }
    (levels, prefix)
}

/// URL path addressing `levels`: percent-encoded names joined with `/`.
pub fn url_path_for(levels: &[String]) -> String {
    levels
        .iter()
        .map(|level| utf8_percent_encode(level, SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}
