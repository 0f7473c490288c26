//! Platform shell selection.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// The command interpreter used to run a command line.
///
/// Each command runs as a single `<program> <flag> <command line>`
/// invocation; nothing is kept alive between commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shell {
    /// `/bin/sh -c`.
    Posix,
    /// `cmd.exe /C`.
    Cmd,
    /// `powershell.exe -NoProfile -Command`.
    PowerShell,
    /// Any other POSIX-compatible shell, invoked with `-c`.
    Custom(PathBuf),
}

impl Shell {
    /// The native shell for the host platform.
    pub fn platform_default() -> Self {
        if cfg!(windows) {
            Shell::Cmd
        } else {
            Shell::Posix
        }
    }

    /// Program to spawn.
    pub fn program(&self) -> &Path {
        match self {
            Shell::Posix => Path::new("/bin/sh"),
            Shell::Cmd => Path::new("cmd.exe"),
            Shell::PowerShell => Path::new("powershell.exe"),
            Shell::Custom(path) => path,
        }
    }

    /// Arguments that precede the command line.
    pub fn leading_args(&self) -> &'static [&'static str] {
        match self {
            Shell::Posix | Shell::Custom(_) => &["-c"],
            Shell::Cmd => &["/C"],
            Shell::PowerShell => &["-NoProfile", "-NonInteractive", "-Command"],
        }
    }

    /// Full argument vector (excluding the program) for `command_line`.
    pub fn args_for(&self, command_line: &str) -> Vec<String> {
        self.leading_args()
            .iter()
            .map(|arg| (*arg).to_string())
            .chain(std::iter::once(command_line.to_string()))
            .collect()
    }

    /// Build a tokio command that runs `command_line` in `working_dir`.
    pub fn command(&self, command_line: &str, working_dir: &Path) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(self.program());
        cmd.args(self.args_for(command_line)).current_dir(working_dir);
        cmd
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::platform_default()
    }
}

impl fmt::Display for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program().display())
    }
}

impl FromStr for Shell {
    type Err = std::convert::Infallible;

    /// Accepts `sh`, `posix`, `cmd`, `powershell`/`pwsh`, or a program path.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "" | "default" => Shell::platform_default(),
            "sh" | "posix" | "/bin/sh" => Shell::Posix,
            "cmd" | "cmd.exe" => Shell::Cmd,
            "powershell" | "powershell.exe" | "pwsh" => Shell::PowerShell,
            _ => Shell::Custom(PathBuf::from(s.trim())),
        })
    }
}

/// Root directory used when nothing better is available.
pub fn platform_root() -> PathBuf {
    if cfg!(windows) {
        PathBuf::from("C:\\")
    } else {
        PathBuf::from("/")
    }
}
