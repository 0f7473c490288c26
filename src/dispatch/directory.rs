//! Directory-change detection for dispatched commands.
//!
//! Every command runs in a fresh shell process, so a `cd` cannot change
//! the directory of the next command by itself. The dispatcher instead
//! recognizes `cd <target>` and tracks the resulting directory per session.

use std::path::{Component, Path, PathBuf};

/// Extract the target of a `cd` command.
///
/// Matches when the trimmed command starts with the literal token `cd`
/// followed by whitespace; a bare `cd` is not treated as a directory
/// change. A single quoted target is unquoted.
pub fn parse_cd_target(command: &str) -> Option<String> {
    let rest = command.trim().strip_prefix("cd")?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let raw = rest.trim();
    if raw.is_empty() {
        return None;
    }

    if raw.starts_with(['"', '\'']) {
        if let Some(mut words) = shlex::split(raw) {
            if words.len() == 1 {
                return words.pop();
            }
        }
    }
    Some(raw.to_string())
}

/// Resolve a `cd` target against the current directory.
///
/// `..` goes to the parent (the root stays where it is), relative paths
/// are joined onto `current`, absolute paths are kept. The result is
/// normalized lexically without touching the filesystem.
pub fn resolve_cd_target(current: &Path, target: &str) -> PathBuf {
    if target == ".." {
        let current = normalize(current);
        return current.parent().map(Path::to_path_buf).unwrap_or(current);
    }
    let target = Path::new(target);
    if target.is_absolute() {
        normalize(target)
    } else {
        normalize(&current.join(target))
    }
}

/// Lexically remove `.` and `..` components.
pub(crate) fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                } else if !out.has_root() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_target() {
        assert_eq!(parse_cd_target("cd sub"), Some("sub".to_string()));
        assert_eq!(parse_cd_target("  cd   ..  "), Some("..".to_string()));
        assert_eq!(parse_cd_target("cd\t/var/log"), Some("/var/log".to_string()));
    }

    #[test]
    fn test_parse_rejects_non_cd() {
        assert_eq!(parse_cd_target("cd"), None);
        assert_eq!(parse_cd_target("cd   "), None);
        assert_eq!(parse_cd_target("cdrom"), None);
        assert_eq!(parse_cd_target("CD sub"), None);
        assert_eq!(parse_cd_target("echo cd sub"), None);
        assert_eq!(parse_cd_target("ls"), None);
    }

    #[test]
    fn test_parse_quoted_target() {
        assert_eq!(parse_cd_target("cd \"My Documents\""), Some("My Documents".to_string()));
        assert_eq!(parse_cd_target("cd 'a b'"), Some("a b".to_string()));
    }

    #[test]
    fn test_parse_unquoted_keeps_remainder() {
        assert_eq!(parse_cd_target("cd a b"), Some("a b".to_string()));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_parent() {
        assert_eq!(resolve_cd_target(Path::new("/home/user"), ".."), PathBuf::from("/home"));
        assert_eq!(resolve_cd_target(Path::new("/"), ".."), PathBuf::from("/"));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_parent_of_unnormalized_dir() {
        assert_eq!(resolve_cd_target(Path::new("/srv/a/../b"), ".."), PathBuf::from("/srv"));
        assert_eq!(resolve_cd_target(Path::new("/srv/b/."), ".."), PathBuf::from("/srv"));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_relative_and_absolute() {
        assert_eq!(
            resolve_cd_target(Path::new("/home/user"), "projects/app"),
            PathBuf::from("/home/user/projects/app")
        );
        assert_eq!(resolve_cd_target(Path::new("/home/user"), "/etc"), PathBuf::from("/etc"));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_normalizes() {
        assert_eq!(
            resolve_cd_target(Path::new("/home/user"), "./a/../b/."),
            PathBuf::from("/home/user/b")
        );
        assert_eq!(resolve_cd_target(Path::new("/home"), "../../.."), PathBuf::from("/"));
        assert_eq!(resolve_cd_target(Path::new("/srv"), "/usr/./lib/../bin"), PathBuf::from("/usr/bin"));
    }
}
