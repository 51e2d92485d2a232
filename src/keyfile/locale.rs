//! Locale selection for localized keys (`Name[de_DE]=...`)

/// Environment variables consulted for the message locale, highest priority first
const LOCALE_VARS: [&str; 4] = ["LANGUAGE", "LC_ALL", "LC_MESSAGES", "LANG"];

/// Preferred languages taken from the process environment
pub fn language_names_from_env() -> Vec<String> {
    language_names_with(|var| std::env::var(var).ok())
}

/// Preferred languages using a custom variable lookup
///
/// The first non-empty variable wins. `LANGUAGE` may hold a colon-separated
/// list; the `C` and `POSIX` locales never select a translation.
pub fn language_names_with(lookup: impl Fn(&str) -> Option<String>) -> Vec<String> {
    let Some(value) = LOCALE_VARS
        .iter()
        .filter_map(|var| lookup(var))
        .find(|value| !value.is_empty())
    else {
        return Vec::new();
    };

    value
        .split(':')
        .filter(|name| !name.is_empty() && *name != "C" && *name != "POSIX")
        .map(str::to_string)
        .collect()
}

/// Key suffixes to try for a locale name, most specific first
///
/// `lang_COUNTRY.ENCODING@MODIFIER` yields `lang_COUNTRY@MODIFIER`,
/// `lang_COUNTRY`, `lang@MODIFIER`, `lang`. The encoding never appears in keys.
pub fn variants(locale: &str) -> Vec<String> {
    let (rest, modifier) = match locale.split_once('@') {
        Some((rest, modifier)) => (rest, Some(modifier)),
        None => (locale, None),
    };
    let rest = rest.split_once('.').map_or(rest, |(rest, _encoding)| rest);
    let (lang, country) = match rest.split_once('_') {
        Some((lang, country)) => (lang, Some(country)),
        None => (rest, None),
    };

    if lang.is_empty() {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(4);
    if let (Some(country), Some(modifier)) = (country, modifier) {
        out.push(format!("{lang}_{country}@{modifier}"));
    }
    if let Some(country) = country {
        out.push(format!("{lang}_{country}"));
    }
    if let Some(modifier) = modifier {
        out.push(format!("{lang}@{modifier}"));
    }
    out.push(lang.to_string());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::assert;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_variants_full_locale() {
        assert!(
            variants("sr_RS.UTF-8@latin")
                == vec!["sr_RS@latin", "sr_RS", "sr@latin", "sr"]
        );
    }

    #[test]
    fn test_variants_simple() {
        assert!(variants("de_DE.UTF-8") == vec!["de_DE", "de"]);
        assert!(variants("fr") == vec!["fr"]);
        assert!(variants("").is_empty());
    }

    #[test]
    fn test_language_priority() {
        let names = language_names_with(env(&[("LANG", "en_US.UTF-8"), ("LC_ALL", "de_DE")]));
        assert!(names == vec!["de_DE"]);
    }

    #[test]
    fn test_language_list_and_c_locale() {
        let names = language_names_with(env(&[("LANGUAGE", "pt_BR:pt:C")]));
        assert!(names == vec!["pt_BR", "pt"]);

        let names = language_names_with(env(&[("LANGUAGE", ""), ("LANG", "C")]));
        assert!(names.is_empty());
    }
}
