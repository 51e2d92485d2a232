//! Desktop entry key-value file reader
//!
//! This module handles:
//! - Parsing the desktop entry text format into ordered groups
//! - Reporting malformed lines with source locations
//! - Locale-aware string lookup and list values
//! - The `OnlyShowIn` / `NotShowIn` visibility rules

mod error;
pub mod locale;
pub mod value;

pub use error::{KeyFileError, LookupError, ParseIssue};
pub use value::ValueError;

use std::path::Path;
use tracing::debug;

/// Key holding the environments a group is restricted to
pub const KEY_ONLY_SHOW_IN: &str = "OnlyShowIn";
/// Key holding the environments a group is hidden from
pub const KEY_NOT_SHOW_IN: &str = "NotShowIn";

/// A parsed desktop file
///
/// Groups keep their file order. A header repeating an earlier group name
/// continues that group, and a repeated key replaces the earlier value.
#[derive(Debug, Clone)]
pub struct KeyFile {
    groups: Vec<Group>,
    /// Preferred languages for `locale_string`, highest priority first
    languages: Vec<String>,
}

#[derive(Debug, Clone)]
struct Group {
    name: String,
    entries: Vec<Entry>,
}

#[derive(Debug, Clone)]
struct Entry {
    key: String,
    locale: Option<String>,
    /// Value as written, escapes not yet decoded
    raw: String,
}

impl Group {
    fn raw(&self, key: &str, locale: Option<&str>) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.key == key && e.locale.as_deref() == locale)
            .map(|e| e.raw.as_str())
    }

    fn set(&mut self, key: String, locale: Option<String>, raw: String) {
        match self
            .entries
            .iter_mut()
            .find(|e| e.key == key && e.locale == locale)
        {
            Some(entry) => entry.raw = raw,
            None => self.entries.push(Entry { key, locale, raw }),
        }
    }
}

impl KeyFile {
    /// Load and parse a desktop file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, KeyFileError> {
        let path = path.as_ref();
        let source_name = path.display().to_string();

        let content =
            std::fs::read_to_string(path).map_err(|e| KeyFileError::io(&source_name, e))?;

        Self::parse(&source_name, content)
    }

    /// Parse desktop file text
    ///
    /// `source_name` only labels diagnostics.
    pub fn parse(source_name: &str, content: String) -> Result<Self, KeyFileError> {
        KeyFileParser::new(source_name.to_string(), content).parse()
    }

    /// Replace the preferred languages used by `locale_string`
    pub fn with_languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.languages = languages.into_iter().map(Into::into).collect();
        self
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    /// Group names in file order
    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.name.as_str())
    }

    pub fn has_group(&self, group: &str) -> bool {
        self.group(group).is_some()
    }

    /// Whether the unlocalized `key` exists in `group`
    pub fn has_key(&self, group: &str, key: &str) -> bool {
        self.group(group)
            .is_some_and(|g| g.raw(key, None).is_some())
    }

    /// Read an unlocalized string value
    pub fn string(&self, group: &str, key: &str) -> Result<String, LookupError> {
        let raw = self.raw(group, key, None)?;
        value::unescape(raw).map_err(|e| LookupError::invalid_value(group, key, e))
    }

    /// Read an unlocalized list value
    pub fn string_list(&self, group: &str, key: &str) -> Result<Vec<String>, LookupError> {
        let raw = self.raw(group, key, None)?;
        value::split_list(raw).map_err(|e| LookupError::invalid_value(group, key, e))
    }

    /// Read a string value, preferring a translation for the configured languages
    ///
    /// Falls back to the unlocalized key when no translation matches.
    pub fn locale_string(&self, group: &str, key: &str) -> Result<String, LookupError> {
        let g = self
            .group(group)
            .ok_or_else(|| LookupError::GroupNotFound(group.to_string()))?;

        for language in &self.languages {
            for variant in locale::variants(language) {
                if let Some(raw) = g.raw(key, Some(&variant)) {
                    debug!(group, key, locale = %variant, "using translated value");
                    return value::unescape(raw)
                        .map_err(|e| LookupError::invalid_value(group, &format!("{key}[{variant}]"), e));
                }
            }
        }

        self.string(group, key)
    }

    /// Whether `group` applies to the desktop environment `identity`
    ///
    /// `identity` may be a colon-separated list as in `XDG_CURRENT_DESKTOP`;
    /// entries are checked in order. The first entry found in `OnlyShowIn`
    /// shows the group, the first found in `NotShowIn` hides it. When nothing
    /// matches, the group is shown unless it has an `OnlyShowIn` list.
    pub fn should_show(&self, group: &str, identity: &str) -> Result<bool, LookupError> {
        let only_show_in = self.optional_list(group, KEY_ONLY_SHOW_IN)?;
        let not_show_in = self.optional_list(group, KEY_NOT_SHOW_IN)?;

        for desktop in identity.split(':').filter(|d| !d.is_empty()) {
            if only_show_in
                .as_ref()
                .is_some_and(|list| list.iter().any(|d| d == desktop))
            {
                return Ok(true);
            }
            if not_show_in
                .as_ref()
                .is_some_and(|list| list.iter().any(|d| d == desktop))
            {
                return Ok(false);
            }
        }

        Ok(only_show_in.is_none())
    }

    fn optional_list(&self, group: &str, key: &str) -> Result<Option<Vec<String>>, LookupError> {
        if !self.has_group(group) {
            return Err(LookupError::GroupNotFound(group.to_string()));
        }
        if !self.has_key(group, key) {
            return Ok(None);
        }
        self.string_list(group, key).map(Some)
    }

    fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name == name)
    }

    fn raw(&self, group: &str, key: &str, locale: Option<&str>) -> Result<&str, LookupError> {
        let g = self
            .group(group)
            .ok_or_else(|| LookupError::GroupNotFound(group.to_string()))?;
        g.raw(key, locale).ok_or_else(|| LookupError::KeyNotFound {
            group: group.to_string(),
            key: key.to_string(),
        })
    }
}

/// Internal parser that keeps the source text around for diagnostics
struct KeyFileParser {
    source_name: String,
    source_content: String,
}

/// A classified, non-blank line
enum Line<'a> {
    Comment,
    Group(&'a str),
    Pair {
        key: &'a str,
        locale: Option<&'a str>,
        raw: &'a str,
    },
}

impl KeyFileParser {
    fn new(source_name: String, source_content: String) -> Self {
        Self {
            source_name,
            source_content,
        }
    }

    fn parse(&self) -> Result<KeyFile, KeyFileError> {
        let mut groups: Vec<Group> = Vec::new();
        let mut current: Option<usize> = None;
        let mut offset = 0;

        for (index, line) in self.source_content.split('\n').enumerate() {
            let start = offset;
            offset += line.len() + 1;

            let line = line.strip_suffix('\r').unwrap_or(line);
            let span = start..start + line.len();
            let trimmed = line.trim_start_matches(BLANK);
            if trimmed.is_empty() {
                continue;
            }

            let classified = match classify(trimmed) {
                Ok(classified) => classified,
                Err(issue) => return Err(self.error(span, index + 1, issue)),
            };

            match classified {
                Line::Comment => {}
                Line::Group(name) => {
                    let existing = groups.iter().position(|g| g.name == name);
                    current = Some(existing.unwrap_or_else(|| {
                        groups.push(Group {
                            name: name.to_string(),
                            entries: Vec::new(),
                        });
                        groups.len() - 1
                    }));
                }
                Line::Pair { key, locale, raw } => {
                    let Some(group_index) = current else {
                        return Err(self.error(span, index + 1, ParseIssue::key_outside_group(key)));
                    };
                    groups[group_index].set(
                        key.to_string(),
                        locale.map(str::to_string),
                        raw.to_string(),
                    );
                }
            }
        }

        debug!(
            source = %self.source_name,
            groups = groups.len(),
            "parsed desktop file"
        );

        Ok(KeyFile {
            groups,
            languages: locale::language_names_from_env(),
        })
    }

    fn error(&self, span: std::ops::Range<usize>, line: usize, issue: ParseIssue) -> KeyFileError {
        KeyFileError::parse(
            self.source_name.clone(),
            self.source_content.clone(),
            span,
            line,
            issue,
        )
    }
}

/// Whitespace the format trims around keys and values
const BLANK: [char; 2] = [' ', '\t'];

/// Classify a line with leading blanks already removed
fn classify(line: &str) -> Result<Line<'_>, ParseIssue> {
    if line.starts_with('#') {
        return Ok(Line::Comment);
    }

    if let Some(header) = line.strip_prefix('[') {
        let header = header.trim_end_matches(BLANK);
        let Some(name) = header.strip_suffix(']') else {
            return Err(ParseIssue::unterminated_group());
        };
        if name.is_empty() || name.contains(['[', ']']) || name.chars().any(char::is_control) {
            return Err(ParseIssue::invalid_group_name(name));
        }
        return Ok(Line::Group(name));
    }

    let Some((key_part, raw)) = line.split_once('=') else {
        return Err(ParseIssue::not_a_key_value());
    };
    let key_part = key_part.trim_end_matches(BLANK);
    let raw = raw.trim_start_matches(BLANK);

    let (key, locale) = match key_part.split_once('[') {
        Some((key, rest)) => match rest.strip_suffix(']') {
            Some(locale) if is_valid_locale(locale) => (key, Some(locale)),
            _ => return Err(ParseIssue::invalid_key(key_part)),
        },
        None => (key_part, None),
    };

    if !is_valid_key(key) {
        return Err(ParseIssue::invalid_key(key_part));
    }

    Ok(Line::Pair { key, locale, raw })
}

/// Keys may contain inner spaces but not leading or trailing whitespace
fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with(char::is_whitespace)
        && !key.ends_with(char::is_whitespace)
        && key
            .chars()
            .all(|c| !c.is_control() && !matches!(c, '[' | ']' | '='))
}

fn is_valid_locale(locale: &str) -> bool {
    !locale.is_empty()
        && locale
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '@' | '.' | '-'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::assert;

    const THUNDERBIRD: &str = "\
# Test desktop file
[Desktop Entry]
Name=Thunderbird
Exec=thunderbird %u
X-Ayatana-Desktop-Shortcuts=Compose;Contacts

[Compose Shortcut Group]
Name=Compose New Message
Name[de]=Neue Nachricht verfassen
Name[sr@latin]=Nova poruka
Exec=thunderbird -compose
OnlyShowIn=Unity;GNOME;

[Contacts Shortcut Group]
Name = Contacts
Exec=thunderbird -addressbook
NotShowIn=KDE;
";

    fn parse(content: &str) -> KeyFile {
        KeyFile::parse("test.desktop", content.to_string())
            .unwrap()
            .with_languages(Vec::<String>::new())
    }

    #[test]
    fn test_groups_in_file_order() {
        let kf = parse(THUNDERBIRD);
        let groups: Vec<&str> = kf.groups().collect();
        assert!(groups == vec!["Desktop Entry", "Compose Shortcut Group", "Contacts Shortcut Group"]);
    }

    #[test]
    fn test_key_lookup() {
        let kf = parse(THUNDERBIRD);
        assert!(kf.has_key("Compose Shortcut Group", "Name"));
        assert!(!kf.has_key("Compose Shortcut Group", "Icon"));
        assert!(!kf.has_key("Missing", "Name"));
        assert!(kf.string("Contacts Shortcut Group", "Name").unwrap() == "Contacts");
        assert!(
            kf.string("Compose Shortcut Group", "Icon")
                == Err(LookupError::KeyNotFound {
                    group: "Compose Shortcut Group".to_string(),
                    key: "Icon".to_string(),
                })
        );
    }

    #[test]
    fn test_string_list() {
        let kf = parse(THUNDERBIRD);
        assert!(
            kf.string_list("Compose Shortcut Group", "OnlyShowIn").unwrap()
                == vec!["Unity", "GNOME"]
        );
    }

    #[test]
    fn test_locale_string() {
        let kf = parse(THUNDERBIRD);
        assert!(kf.locale_string("Compose Shortcut Group", "Name").unwrap() == "Compose New Message");

        let kf = kf.with_languages(["de_DE.UTF-8"]);
        assert!(
            kf.locale_string("Compose Shortcut Group", "Name").unwrap()
                == "Neue Nachricht verfassen"
        );
        // No translation for this group, falls back to the plain key
        assert!(kf.locale_string("Contacts Shortcut Group", "Name").unwrap() == "Contacts");

        let kf = kf.with_languages(["fr_FR", "sr_RS@latin"]);
        assert!(kf.locale_string("Compose Shortcut Group", "Name").unwrap() == "Nova poruka");
    }

    #[test]
    fn test_should_show() {
        let kf = parse(THUNDERBIRD);
        assert!(kf.should_show("Compose Shortcut Group", "GNOME").unwrap());
        assert!(!kf.should_show("Compose Shortcut Group", "KDE").unwrap());
        assert!(kf.should_show("Contacts Shortcut Group", "GNOME").unwrap());
        assert!(!kf.should_show("Contacts Shortcut Group", "KDE").unwrap());
        assert!(kf.should_show("Desktop Entry", "anything").unwrap());
    }

    #[test]
    fn test_should_show_desktop_list() {
        let kf = parse(THUNDERBIRD);
        assert!(kf.should_show("Compose Shortcut Group", "ubuntu:GNOME").unwrap());
        assert!(!kf.should_show("Compose Shortcut Group", "").unwrap());
        assert!(kf.should_show("Contacts Shortcut Group", "").unwrap());
    }

    #[test]
    fn test_duplicate_groups_merge() {
        let kf = parse("[A]\nName=first\n[B]\nName=b\n[A]\nName=second\nExec=a\n");
        let groups: Vec<&str> = kf.groups().collect();
        assert!(groups == vec!["A", "B"]);
        assert!(kf.string("A", "Name").unwrap() == "second");
        assert!(kf.has_key("A", "Exec"));
    }

    #[test]
    fn test_crlf_and_whitespace() {
        let kf = parse("  [Desktop Entry]\r\n  Name  =  padded \r\n");
        assert!(kf.string("Desktop Entry", "Name").unwrap() == "padded ");
    }

    #[test]
    fn test_keys_with_inner_spaces() {
        let kf = parse("[Desktop Entry]\nName=App\nX-Vendor Key=1\nX-Vendor Key[de]=eins\n");
        assert!(kf.string("Desktop Entry", "X-Vendor Key").unwrap() == "1");
        assert!(kf.with_languages(["de"]).locale_string("Desktop Entry", "X-Vendor Key").unwrap() == "eins");

        // A blank between key and locale leaves trailing whitespace on the key
        let err = KeyFile::parse("bad.desktop", "[G]\nName [de]=x\n".to_string()).unwrap_err();
        assert!(err.line() == Some(2));
    }

    #[test]
    fn test_only_blanks_are_trimmed() {
        let kf = parse("[G]\n\tName\t=\t\u{a0}kept\nOther=\u{2003}wide\n");
        assert!(kf.string("G", "Name").unwrap() == "\u{a0}kept");
        assert!(kf.string("G", "Other").unwrap() == "\u{2003}wide");
    }

    #[test]
    fn test_parse_errors_report_line() {
        let err = KeyFile::parse("bad.desktop", "[Desktop Entry]\nName=ok\nthis is junk\n".to_string())
            .unwrap_err();
        assert!(err.line() == Some(3));

        let err = KeyFile::parse("bad.desktop", "Name=orphan\n".to_string()).unwrap_err();
        assert!(err.line() == Some(1));
        assert!(err.to_string().contains("before the first group"));

        let err = KeyFile::parse("bad.desktop", "[Unterminated\n".to_string()).unwrap_err();
        assert!(err.line() == Some(1));

        let err = KeyFile::parse("bad.desktop", "[G]\nName[]=x\n".to_string()).unwrap_err();
        assert!(err.line() == Some(2));
    }

    #[test]
    fn test_load_missing_file() {
        let err = KeyFile::load("/nonexistent/path/to.desktop").unwrap_err();
        assert!(let KeyFileError::Io { .. } = err);
    }
}
