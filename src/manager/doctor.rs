use super::Manager;
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagStatus {
    Ok,
    Warn,
    Error,
}

impl fmt::Display for DiagStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            DiagStatus::Ok => "ok",
            DiagStatus::Warn => "warn",
            DiagStatus::Error => "error",
        };
        f.write_str(tag)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagResult {
    pub name: String,
    pub status: DiagStatus,
    pub message: String,
}

impl DiagResult {
    fn new(name: impl Into<String>, status: DiagStatus, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status,
            message: message.into(),
        }
    }
}

pub trait DiagReport {
    fn has_errors(&self) -> bool;
    fn has_warnings(&self) -> bool;
}

impl DiagReport for [DiagResult] {
    fn has_errors(&self) -> bool {
        self.iter().any(|r| r.status == DiagStatus::Error)
    }

    fn has_warnings(&self) -> bool {
        self.iter().any(|r| r.status == DiagStatus::Warn)
    }
}

fn check_dir(name: &str, dir: &Path) -> DiagResult {
    if dir.is_dir() {
        DiagResult::new(name, DiagStatus::Ok, dir.display().to_string())
    } else {
        DiagResult::new(
            name,
            DiagStatus::Error,
            format!("{} does not exist", dir.display()),
        )
    }
}

impl Manager {
    /// Inspects the installation without touching it. `search_path` is the
    /// raw `PATH` value to check for the activation directory.
    pub fn doctor(&self, search_path: &str) -> Vec<DiagResult> {
        let paths = &self.paths;
        let mut results = vec![
            check_dir("arsenal root", &paths.root),
            check_dir("versions directory", &paths.versions),
            check_dir("current directory", &paths.current),
        ];

        let current = paths.current.display().to_string();
        if search_path.contains(&current) {
            results.push(DiagResult::new("PATH", DiagStatus::Ok, "activation directory on PATH"));
        } else {
            results.push(DiagResult::new(
                "PATH",
                DiagStatus::Warn,
                format!("{current} is not on PATH (add `eval \"$(arsenal init-shell bash)\"` to your shell rc)"),
            ));
        }

        if let Ok(active) = self.current_all() {
            for (tool, version) in active {
                results.push(DiagResult::new(tool, DiagStatus::Ok, format!("active: {version}")));
            }
        }
        results
    }
}
