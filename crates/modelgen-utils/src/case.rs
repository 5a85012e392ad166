use convert_case::{Case, Casing};

///
/// FIXED_NAMES
///
/// Acronym-style class names whose underscore and table forms are pinned.
/// Both forms are the same and are never pluralized.
///

const FIXED_NAMES: &[(&str, &str)] = &[
    ("DB2", "db2"),
    ("DHCP", "dhcp"),
    ("DNS", "dns"),
    ("EPON", "epon"),
    ("FTP", "ftp"),
    ("HTTP", "http"),
    ("IIS", "iis"),
    ("IMAP", "imap"),
    ("LDAP", "ldap"),
    ("MplsCE", "mpls_ce"),
    ("MplsPE", "mpls_pe"),
    ("POP3", "pop3"),
    ("SMTP", "smtp"),
    ("TCP", "tcp"),
];

fn fixed_name(name: &str) -> Option<&'static str> {
    FIXED_NAMES
        .iter()
        .find(|(class, _)| *class == name)
        .map(|(_, fixed)| *fixed)
}

/// Convert a class name into its underscore (snake case) form.
#[must_use]
pub fn underscore(name: &str) -> String {
    if let Some(fixed) = fixed_name(name) {
        return fixed.to_string();
    }

    name.to_case(Case::Snake)
}

/// Pluralize the last underscore-separated segment of `word`.
#[must_use]
pub fn pluralize(word: &str) -> String {
    match word.rsplit_once('_') {
        Some((head, last)) => format!("{head}_{}", pluralize_segment(last)),
        None => pluralize_segment(word),
    }
}

/// Table form of a class name: the pluralized underscore name.
#[must_use]
pub fn tableize(name: &str) -> String {
    if let Some(fixed) = fixed_name(name) {
        return fixed.to_string();
    }

    pluralize(&underscore(name))
}

// Inflection rules, irregulars and uncountables come from `pluralizer`.
fn pluralize_segment(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }

    pluralizer::pluralize(word, 2, false)
}
