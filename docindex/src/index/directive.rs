use crate::common::{
    IndexDirection, DIRECTIVE_GROUP, DIRECTIVE_GROUPSEQ, DIRECTIVE_SINGLE, DIRECTIVE_TOKEN_SEPARATOR,
    DIRECTIVE_UNIQUE,
};
use crate::errors::{DocIndexError, DocIndexResult, ErrorKind};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::fmt::{Display, Formatter};

// characters left as-is when a group name is written back into a directive
const GROUP_NAME_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'_').remove(b'-').remove(b'.');

/// Parsed form of one field's index directive.
///
/// A directive is the compact annotation a record field carries to describe
/// how it should be indexed, for example `unique`, `single=-1` or
/// `group=uniqueName,groupseq=2`. The grammar is a comma separated list of
/// `key` or `key=value` tokens read as a URL query string. Only `groupseq`,
/// `unique`, `group` and `single` are accepted.
///
/// # Resolution rules
/// - `groupseq` defaults to `1`. The declared number orders the field inside its
///   group; as a key direction only `-1` is meaningful (descending) and every
///   other number collapses to ascending.
/// - `unique` is set by a bare `unique` token or by `unique=true`.
/// - `single` is only present when declared, except that a field without a group
///   always gets a standalone index. `single=-1` asks for a descending standalone
///   index, any other number for an ascending one. An ungrouped `single=-1`
///   keeps its descending direction rather than being forced ascending.
///
/// # Examples
///
/// ```rust
/// use docindex::common::IndexDirection;
/// use docindex::index::IndexDirective;
///
/// let directive = IndexDirective::parse("email", "unique")?;
/// assert!(directive.is_unique());
/// assert_eq!(directive.single(), Some(IndexDirection::Ascending));
///
/// let directive = IndexDirective::parse("last", "group=uniqueName,groupseq=2")?;
/// assert_eq!(directive.group(), "uniqueName");
/// assert_eq!(directive.group_seq(), 2);
/// assert_eq!(directive.single(), None);
/// # Ok::<(), docindex::errors::DocIndexError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexDirective {
    group_seq: i64,
    unique: bool,
    group: String,
    single: Option<IndexDirection>,
}

impl IndexDirective {
    /// Parses the raw directive declared on `field`.
    ///
    /// # Errors
    /// Returns a `DirectiveParseError` when a token is not valid query syntax,
    /// when a key is not supported, or when `groupseq`/`single` is not an
    /// integer. Every message names the field.
    pub fn parse(field: &str, raw: &str) -> DocIndexResult<IndexDirective> {
        let pairs = parse_query(&raw.replace(DIRECTIVE_TOKEN_SEPARATOR, "&")).map_err(|_| {
            log::error!("Invalid directive on field '{}': {}", field, raw);
            DocIndexError::new(
                &format!("field '{}', invalid value format:{}", field, raw),
                ErrorKind::DirectiveParseError,
            )
        })?;

        let mut directive = IndexDirective {
            group_seq: 1,
            unique: false,
            group: String::new(),
            single: None,
        };

        for (key, value) in &pairs {
            match key.as_str() {
                DIRECTIVE_GROUPSEQ => {
                    if !value.is_empty() {
                        directive.group_seq = parse_number(field, DIRECTIVE_GROUPSEQ, raw, value)?;
                    }
                }
                DIRECTIVE_UNIQUE => {
                    directive.unique = value.is_empty() || value == "true";
                }
                DIRECTIVE_GROUP => {
                    directive.group = value.clone();
                }
                DIRECTIVE_SINGLE => {
                    if !value.is_empty() {
                        let single = parse_number(field, DIRECTIVE_SINGLE, raw, value)?;
                        directive.single = Some(IndexDirection::from_value(single));
                    }
                }
                _ => {
                    log::error!("Unsupported key '{}' in directive of field '{}'", key, field);
                    return Err(DocIndexError::new(
                        &format!("field '{}', unsupported key:{}", field, key),
                        ErrorKind::DirectiveParseError,
                    ));
                }
            }
        }

        if directive.group.is_empty() && directive.single.is_none() {
            directive.single = Some(IndexDirection::Ascending);
        }

        Ok(directive)
    }

    /// Declared position of the field inside its group.
    pub fn group_seq(&self) -> i64 {
        self.group_seq
    }

    /// Direction of the field inside its group's compound key.
    pub fn group_direction(&self) -> IndexDirection {
        IndexDirection::from_value(self.group_seq)
    }

    pub fn is_unique(&self) -> bool {
        self.unique
    }

    /// Group name, empty when the field belongs to no compound index.
    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn is_grouped(&self) -> bool {
        !self.group.is_empty()
    }

    /// Direction of the standalone index for this field, if one is wanted.
    pub fn single(&self) -> Option<IndexDirection> {
        self.single
    }
}

impl Default for IndexDirective {
    fn default() -> Self {
        IndexDirective {
            group_seq: 1,
            unique: false,
            group: String::new(),
            single: Some(IndexDirection::Ascending),
        }
    }
}

impl Display for IndexDirective {
    /// Writes the canonical form of the directive; parsing it back yields an
    /// equal value.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut tokens = Vec::new();
        if self.unique {
            tokens.push(DIRECTIVE_UNIQUE.to_string());
        }
        if self.is_grouped() {
            tokens.push(format!(
                "{}={}",
                DIRECTIVE_GROUP,
                utf8_percent_encode(&self.group, GROUP_NAME_ENCODE_SET)
            ));
        }
        if self.group_seq != 1 {
            tokens.push(format!("{}={}", DIRECTIVE_GROUPSEQ, self.group_seq));
        }
        match (self.single, self.is_grouped()) {
            (Some(IndexDirection::Descending), _) => {
                tokens.push(format!("{}=-1", DIRECTIVE_SINGLE));
            }
            (Some(IndexDirection::Ascending), true) => {
                tokens.push(format!("{}=1", DIRECTIVE_SINGLE));
            }
            _ => {}
        }
        write!(f, "{}", tokens.join(","))
    }
}

fn parse_number(field: &str, key: &str, raw: &str, value: &str) -> DocIndexResult<i64> {
    value.parse::<i64>().map_err(|err| {
        log::error!("Invalid {} '{}' on field '{}': {}", key, value, field, err);
        DocIndexError::new(
            &format!("field '{}', invalid {} format:{}", field, key, raw),
            ErrorKind::DirectiveParseError,
        )
    })
}

/// Splits a query string into decoded `(key, value)` pairs, keeping the first
/// value of a repeated key. Fails on semicolons and on bad percent escapes.
fn parse_query(query: &str) -> DocIndexResult<Vec<(String, String)>> {
    let mut pairs: Vec<(String, String)> = Vec::new();
    let mut failure = None;

    for token in query.split('&') {
        if token.contains(';') {
            failure = Some(DocIndexError::new(
                "invalid semicolon separator in query",
                ErrorKind::DirectiveParseError,
            ));
            continue;
        }
        if token.is_empty() {
            continue;
        }

        let (key, value) = token.split_once('=').unwrap_or((token, ""));
        match (query_unescape(key), query_unescape(value)) {
            (Ok(key), Ok(value)) => {
                if !pairs.iter().any(|(k, _)| *k == key) {
                    pairs.push((key, value));
                }
            }
            (Err(err), _) | (_, Err(err)) => failure = Some(err),
        }
    }

    match failure {
        Some(err) => Err(err),
        None => Ok(pairs),
    }
}

fn query_unescape(component: &str) -> DocIndexResult<String> {
    let bytes = component.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = i + 2 < bytes.len()
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !valid {
                return Err(DocIndexError::new(
                    &format!("invalid URL escape in '{}'", component),
                    ErrorKind::DirectiveParseError,
                ));
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    let plus_decoded = component.replace('+', " ");
    let decoded = percent_decode_str(&plus_decoded).decode_utf8()?;
    Ok(decoded.into_owned())
}
