//! Repository locator normalization.
//!
//! Turns the many shorthand forms found in package descriptors into a full
//! URI string. Rules are checked top to bottom and the first match wins:
//!
//! | Input                     | Output                                  |
//! |---------------------------|-----------------------------------------|
//! | `scheme://...`            | unchanged                               |
//! | `gist:id`                 | `https://gist.github.com/id.git`        |
//! | `bitbucket:o/r`           | `https://bitbucket.org/o/r.git`         |
//! | `gitlab:o/r`              | `https://gitlab.com/o/r.git`            |
//! | `host:/abs/path`          | `ssh://host:/abs/path`                  |
//! | `host:rel/path`           | `ssh://host/rel/path`                   |
//! | `owner/repo`              | `https://github.com/owner/repo.git`     |
//! | anything else             | unchanged                               |

const SHORTHAND_HOSTS: [(&str, &str); 3] = [
    ("gist:", "https://gist.github.com/"),
    ("bitbucket:", "https://bitbucket.org/"),
    ("gitlab:", "https://gitlab.com/"),
];

/// Normalize a repository locator into a canonical URI string.
///
/// Total and pure: every input maps to exactly one output.
pub fn normalize(locator: &str) -> String {
    if locator.contains("://") {
        return locator.to_string();
    }

    for (prefix, base) in SHORTHAND_HOSTS {
        if let Some(rest) = locator.strip_prefix(prefix) {
            return format!("{}{}.git", base, rest);
        }
    }

    if locator.contains(":/") {
        return format!("ssh://{}", locator);
    }

    if locator.contains(':') {
        return format!("ssh://{}", locator.replacen(':', "/", 1));
    }

    if locator.contains('/') {
        return format!("https://github.com/{}.git", locator);
    }

    locator.to_string()
}
