use crate::engine::TriggerSpec;
use crate::engine::config::Target;
use crate::foundation::error::UnveilResult;
use crate::manifest::model::{ManifestDef, TriggerDef};
use std::fmt;

/// Manifest format version this crate reads.
pub const MANIFEST_VERSION: &str = "1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PathElem {
    Field(&'static str),
    Index(usize),
}

#[derive(Debug, Clone)]
pub(crate) struct ManifestIssue {
    pub(crate) path: Vec<PathElem>,
    pub(crate) message: String,
}

impl ManifestIssue {
    fn at(path: &[PathElem], message: impl Into<String>) -> Self {
        Self {
            path: path.to_vec(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ManifestIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            return write!(f, "{}", self.message);
        }
        write!(f, "{}: {}", format_path(&self.path), self.message)
    }
}

fn format_path(path: &[PathElem]) -> String {
    let mut s = String::from("$");
    for p in path {
        match *p {
            PathElem::Field(name) => {
                s.push('.');
                s.push_str(name);
            }
            PathElem::Index(i) => {
                s.push('[');
                s.push_str(&i.to_string());
                s.push(']');
            }
        }
    }
    s
}

#[derive(Debug, Clone)]
pub(crate) struct ManifestIssues {
    pub(crate) issues: Vec<ManifestIssue>,
}

impl fmt::Display for ManifestIssues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.issues.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ManifestIssues {}

/// Check every section, collecting all issues instead of stopping at the first.
pub(crate) fn validate_manifest(def: &ManifestDef) -> Result<(), ManifestIssues> {
    let mut issues = Vec::new();

    if def.version != MANIFEST_VERSION {
        issues.push(ManifestIssue::at(
            &[PathElem::Field("version")],
            format!("version must be \"{MANIFEST_VERSION}\""),
        ));
    }
    if def.page_class.as_deref().is_some_and(|c| c.trim().is_empty()) {
        issues.push(ManifestIssue::at(
            &[PathElem::Field("page_class")],
            "page_class must not be empty",
        ));
    }
    if def.options.reduced_motion_query.trim().is_empty() {
        issues.push(ManifestIssue::at(
            &[PathElem::Field("options"), PathElem::Field("reduced_motion_query")],
            "reduced_motion_query must not be empty",
        ));
    }

    for (i, t) in def.triggers.iter().enumerate() {
        let path = [PathElem::Field("triggers"), PathElem::Index(i)];
        validate_trigger(t, &path, &mut issues);
    }

    let mut section = |name: &'static str, res: UnveilResult<()>| {
        if let Err(e) = res {
            issues.push(ManifestIssue::at(&[PathElem::Field(name)], e.to_string()));
        }
    };
    if let Some(h) = &def.header {
        section("header", h.validate());
    }
    if let Some(s) = &def.spy {
        section("spy", s.validate());
    }

    for (i, m) in def.modals.iter().enumerate() {
        if m.dialog.trim().is_empty() {
            issues.push(ManifestIssue::at(
                &[
                    PathElem::Field("modals"),
                    PathElem::Index(i),
                    PathElem::Field("dialog"),
                ],
                "dialog selector must not be empty",
            ));
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(ManifestIssues { issues })
    }
}

fn validate_trigger(t: &TriggerDef, path: &[PathElem], issues: &mut Vec<ManifestIssue>) {
    if t.target.trim().is_empty() {
        let mut p = path.to_vec();
        p.push(PathElem::Field("target"));
        issues.push(ManifestIssue::at(&p, "target selector must not be empty"));
    }
    let spec = match t.to_spec(t.trigger.as_deref().map(Target::from)) {
        Ok(spec) => spec,
        Err(e) => {
            issues.push(ManifestIssue::at(path, e.to_string()));
            return;
        }
    };
    let res = match &spec {
        TriggerSpec::Reveal(c) => c.validate(),
        TriggerSpec::Group(c) => c.validate(),
        TriggerSpec::Scrub(c) => c.validate(),
    };
    if let Err(e) = res {
        issues.push(ManifestIssue::at(path, e.to_string()));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/manifest/validate.rs"]
mod tests;
