use std::fmt;

#[cfg(feature = "colorized_output")]
use console::style;

const TITLE: &str = "Result File Validation Report";
const ACROSS_HEADING: &str = "Across files";

/// Outcome of a single check
#[derive(Debug, Clone, PartialEq)]
pub enum CheckStatus {
    /// Check passed
    Ok,
    /// Usable, but some plots may be misleading
    Warning(String),
    /// Plots from these files would be wrong or fail
    Failed(String),
}

impl CheckStatus {
    fn is_ok(&self) -> bool {
        matches!(self, CheckStatus::Ok)
    }

    fn is_warning(&self) -> bool {
        matches!(self, CheckStatus::Warning(_))
    }

    fn is_failed(&self) -> bool {
        matches!(self, CheckStatus::Failed(_))
    }

    fn tone(&self) -> Tone {
        match self {
            CheckStatus::Ok => Tone::Passed,
            CheckStatus::Warning(_) => Tone::Warned,
            CheckStatus::Failed(_) => Tone::Failed,
        }
    }
}

/// What a check looked at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckScope {
    /// A single result file
    File(String),
    /// Agreement between all files
    AcrossFiles,
}

/// A named check and its outcome
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationCheck {
    /// File the check applies to, or the whole set
    pub scope: CheckScope,
    /// What was checked
    pub name: String,
    /// Outcome
    pub status: CheckStatus,
}

impl ValidationCheck {
    pub(crate) fn ok(name: impl Into<String>) -> Self {
        Self::with_status(name, CheckStatus::Ok)
    }

    pub(crate) fn warning(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_status(name, CheckStatus::Warning(message.into()))
    }

    pub(crate) fn failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_status(name, CheckStatus::Failed(message.into()))
    }

    fn with_status(name: impl Into<String>, status: CheckStatus) -> Self {
        Self {
            scope: CheckScope::AcrossFiles,
            name: name.into(),
            status,
        }
    }

    /// Attach the check to one file
    pub(crate) fn in_file(mut self, file: impl Into<String>) -> Self {
        self.scope = CheckScope::File(file.into());
        self
    }
}

/// All checks run over a set of result files
#[derive(Debug, Default)]
pub struct ValidationReport {
    /// Checks in the order they ran
    pub checks: Vec<ValidationCheck>,
    /// Files that were examined
    pub files: Vec<String>,
}

impl ValidationReport {
    /// Empty report over the given files
    pub fn new<I, S>(files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            checks: Vec::new(),
            files: files.into_iter().map(Into::into).collect(),
        }
    }

    /// Record a check
    pub fn add_check(&mut self, check: ValidationCheck) {
        self.checks.push(check);
    }

    /// Checks that looked at `file` alone
    pub fn file_checks<'a>(&'a self, file: &'a str) -> impl Iterator<Item = &'a ValidationCheck> {
        self.checks
            .iter()
            .filter(move |c| matches!(&c.scope, CheckScope::File(f) if f == file))
    }

    /// Checks comparing the files with each other
    pub fn cross_file_checks(&self) -> impl Iterator<Item = &ValidationCheck> {
        self.checks
            .iter()
            .filter(|c| c.scope == CheckScope::AcrossFiles)
    }

    /// True if any check failed
    pub fn has_failures(&self) -> bool {
        self.checks.iter().any(|c| c.status.is_failed())
    }

    /// True if any check warned
    pub fn has_warnings(&self) -> bool {
        self.checks.iter().any(|c| c.status.is_warning())
    }

    /// Number of passed checks
    pub fn success_count(&self) -> usize {
        self.checks.iter().filter(|c| c.status.is_ok()).count()
    }

    /// Number of warnings
    pub fn warning_count(&self) -> usize {
        self.checks.iter().filter(|c| c.status.is_warning()).count()
    }

    /// Number of failures
    pub fn failure_count(&self) -> usize {
        self.checks.iter().filter(|c| c.status.is_failed()).count()
    }

    /// Format the report with terminal colors when the `colorized_output`
    /// feature is enabled, plain text otherwise
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            self.layout(paint_colored)
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            self.to_string()
        }
    }

    /// Files in report order, followed by any file only named by a check
    fn sections(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.files.iter().map(String::as_str).collect();
        for check in &self.checks {
            if let CheckScope::File(file) = &check.scope {
                if !names.contains(&file.as_str()) {
                    names.push(file.as_str());
                }
            }
        }
        names
    }

    fn layout(&self, paint: fn(Tone, &str) -> String) -> String {
        let mut out = String::new();
        out.push_str(&paint(Tone::Heading, TITLE));
        out.push('\n');
        out.push_str(&paint(Tone::Heading, &"=".repeat(TITLE.len())));
        out.push('\n');

        for file in self.sections() {
            out.push('\n');
            out.push_str(&paint(Tone::Label, file));
            out.push('\n');
            for check in self.file_checks(file) {
                push_check(&mut out, check, paint);
            }
        }

        if self.files.len() > 1 {
            out.push('\n');
            out.push_str(&paint(Tone::Label, ACROSS_HEADING));
            out.push('\n');
            let mut any = false;
            for check in self.cross_file_checks() {
                push_check(&mut out, check, paint);
                any = true;
            }
            if !any {
                out.push_str("  skipped, not every file parsed\n");
            }
        }

        out.push('\n');
        out.push_str(&format!(
            "{}: {} passed, {} warnings, {} failed\n",
            paint(Tone::Label, "Summary"),
            paint(Tone::Passed, &self.success_count().to_string()),
            paint(Tone::Warned, &self.warning_count().to_string()),
            paint(Tone::Failed, &self.failure_count().to_string()),
        ));

        let (tone, verdict) = if self.has_failures() {
            (Tone::Failed, "Validation FAILED")
        } else if self.has_warnings() {
            (Tone::Warned, "Validation PASSED with warnings")
        } else {
            (Tone::Passed, "Validation PASSED")
        };
        out.push_str(&paint(tone, verdict));
        out.push('\n');
        out
    }
}

/// Role of a piece of report text, mapped to a style by the painter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Heading,
    Label,
    Passed,
    Warned,
    Failed,
}

fn push_check(out: &mut String, check: &ValidationCheck, paint: fn(Tone, &str) -> String) {
    let tone = check.status.tone();
    let symbol = match check.status {
        CheckStatus::Ok => "✓",
        CheckStatus::Warning(_) => "⚠",
        CheckStatus::Failed(_) => "✗",
    };
    out.push_str(&format!("  [{}] {}", paint(tone, symbol), check.name));
    match &check.status {
        CheckStatus::Ok => {}
        CheckStatus::Warning(msg) => {
            out.push_str(&format!(" - {}: {}", paint(tone, "WARNING"), msg))
        }
        CheckStatus::Failed(msg) => out.push_str(&format!(" - {}: {}", paint(tone, "FAILED"), msg)),
    }
    out.push('\n');
}

fn paint_plain(_: Tone, text: &str) -> String {
    text.to_string()
}

#[cfg(feature = "colorized_output")]
fn paint_colored(tone: Tone, text: &str) -> String {
    let styled = style(text);
    match tone {
        Tone::Heading => styled.bold().cyan(),
        Tone::Label => styled.bold(),
        Tone::Passed => styled.green(),
        Tone::Warned => styled.yellow(),
        Tone::Failed => styled.red().bold(),
    }
    .to_string()
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.layout(paint_plain))
    }
}
