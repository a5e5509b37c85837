//! Contract checks for the Download Artifact composite action.
//!
//! Each check is a pure function of the repository root: it re-invokes the
//! locator, inspects the manifest, and reports pass, fail, or skip. Raw-text
//! checks need no parser and catch formatting regressions a structural parser
//! would normalize away; structured checks branch on [`yaml_parser_available`]
//! and degrade to skipped when the parser is not compiled in.

use std::fmt;
use std::path::Path;

use crate::locate::locate_action;
use crate::report::Report;

/// Exact pin the manifest must carry for the wrapped action.
pub const PINNED_USES: &str = "actions/download-artifact@v4.1.7";

/// Identifier prefix used to find the download step among `runs.steps`.
pub const USES_PREFIX: &str = "actions/download-artifact@";

/// Verbatim `with:` pass-through lines required in the raw text.
pub const WITH_NAME_PASSTHROUGH: &str = "name: ${{ inputs.name }}";
pub const WITH_PATH_PASSTHROUGH: &str = "path: ${{ inputs.path }}";

/// Expression values required in the download step's `with` mapping.
pub const NAME_EXPR: &str = "${{ inputs.name }}";
pub const PATH_EXPR: &str = "${{ inputs.path }}";

/// Predicates the step condition must reference.
pub const FORCE_FLAG_REF: &str = "inputs.force-use-github";
pub const RUNNER_ENV_PREDICATE: &str = "runner.environment == 'github-hosted'";
pub const TRUE_LITERAL_COMPARISON: &str = "== 'true'";

const NOT_FOUND: &str = "composite action 'Download Artifact' not found under the search root";

/// Outcome of a single contract check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// The manifest satisfies the clause.
    Pass,
    /// The manifest violates the clause named in the reason.
    Fail { reason: String },
    /// A precondition (manifest or parser) is absent; distinct from pass and fail.
    Skip { reason: String },
}

impl CheckOutcome {
    pub fn fail(reason: impl Into<String>) -> Self {
        CheckOutcome::Fail {
            reason: reason.into(),
        }
    }

    pub fn skip(reason: impl Into<String>) -> Self {
        CheckOutcome::Skip {
            reason: reason.into(),
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, CheckOutcome::Pass)
    }

    pub fn is_fail(&self) -> bool {
        matches!(self, CheckOutcome::Fail { .. })
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, CheckOutcome::Skip { .. })
    }

    /// Lowercase status label used in JSON reports.
    pub fn label(&self) -> &'static str {
        match self {
            CheckOutcome::Pass => "pass",
            CheckOutcome::Fail { .. } => "fail",
            CheckOutcome::Skip { .. } => "skip",
        }
    }
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckOutcome::Pass => write!(f, "PASS"),
            CheckOutcome::Fail { reason } => write!(f, "FAIL: {reason}"),
            CheckOutcome::Skip { reason } => write!(f, "SKIP: {reason}"),
        }
    }
}

/// The full check registry, in reporting order.
pub const CHECKS: &[(&str, &str, fn(&Path) -> CheckOutcome)] = &[
    (
        "artifact-located",
        "composite action manifest is discoverable",
        artifact_located,
    ),
    (
        "pinned-version-text",
        "pinned version and input pass-throughs appear verbatim",
        pinned_version_and_passthrough_text,
    ),
    (
        "condition-text",
        "step condition references the expected predicates",
        condition_predicates_text,
    ),
    (
        "top-level-metadata",
        "top-level metadata and composite runner",
        top_level_metadata,
    ),
    (
        "inputs-schema",
        "input declarations, defaults, and boolean types",
        inputs_schema,
    ),
    (
        "download-step",
        "download step pin, condition, and with block",
        download_step,
    ),
];

/// Run every registered check against `root` and collect a report.
pub fn run_all(root: &Path) -> Report {
    let mut report = Report::default();
    for (id, title, check) in CHECKS {
        report.push(id, title, check(root));
    }
    report
}

/// Probe for the structured YAML parser.
///
/// Structured checks branch on this instead of failing, so a build without
/// the parser still runs the raw-text checks and reports the rest skipped.
pub fn yaml_parser_available() -> bool {
    cfg!(feature = "structured-yaml")
}

/// The locator itself, surfaced as a check: skipped, never failed, when no
/// qualifying manifest exists in the checkout.
pub fn artifact_located(root: &Path) -> CheckOutcome {
    match locate_action(root) {
        Some(_) => CheckOutcome::Pass,
        None => CheckOutcome::skip(NOT_FOUND),
    }
}

/// Raw-text check: the exact pin and both `with:` pass-through lines must
/// appear verbatim in the manifest.
pub fn pinned_version_and_passthrough_text(root: &Path) -> CheckOutcome {
    let Some(action) = locate_action(root) else {
        return CheckOutcome::skip(NOT_FOUND);
    };
    for (needle, clause) in [
        (PINNED_USES, "manifest must pin actions/download-artifact to v4.1.7"),
        (WITH_NAME_PASSTHROUGH, "`with.name` must reference inputs.name"),
        (WITH_PATH_PASSTHROUGH, "`with.path` must reference inputs.path"),
    ] {
        if !action.text.contains(needle) {
            return CheckOutcome::fail(format!("{clause} (expected `{needle}` verbatim)"));
        }
    }
    CheckOutcome::Pass
}

/// Raw-text check: the condition text must reference the force flag, the
/// runner-environment equality, and a comparison against the string 'true'.
pub fn condition_predicates_text(root: &Path) -> CheckOutcome {
    let Some(action) = locate_action(root) else {
        return CheckOutcome::skip(NOT_FOUND);
    };
    for (needle, clause) in [
        (FORCE_FLAG_REF, "`if` must check inputs.force-use-github"),
        (
            RUNNER_ENV_PREDICATE,
            "`if` must check runner.environment == 'github-hosted'",
        ),
        (
            TRUE_LITERAL_COMPARISON,
            "`if` must compare against the string 'true'",
        ),
    ] {
        if !action.text.contains(needle) {
            return CheckOutcome::fail(format!("{clause} (expected `{needle}`)"));
        }
    }
    CheckOutcome::Pass
}

/// Structured check: top-level keys, action name, description, and the
/// composite runner declaration.
pub fn top_level_metadata(root: &Path) -> CheckOutcome {
    let Some(action) = locate_action(root) else {
        return CheckOutcome::skip(NOT_FOUND);
    };
    structured::top_level_metadata(&action)
}

/// Structured check: input declarations, defaults, and boolean typing.
pub fn inputs_schema(root: &Path) -> CheckOutcome {
    let Some(action) = locate_action(root) else {
        return CheckOutcome::skip(NOT_FOUND);
    };
    structured::inputs_schema(&action)
}

/// Structured check: the download step's pin, condition, and `with` block.
pub fn download_step(root: &Path) -> CheckOutcome {
    let Some(action) = locate_action(root) else {
        return CheckOutcome::skip(NOT_FOUND);
    };
    structured::download_step(&action)
}

#[cfg(feature = "structured-yaml")]
mod structured {
    use serde_yaml_bw as serde_yaml;
    use serde_yaml_bw::Value;

    use super::{
        CheckOutcome, FORCE_FLAG_REF, NAME_EXPR, PATH_EXPR, PINNED_USES, RUNNER_ENV_PREDICATE,
        USES_PREFIX,
    };
    use crate::locate::LocatedAction;

    fn parse(action: &LocatedAction) -> Result<Value, CheckOutcome> {
        serde_yaml::from_str(&action.text)
            .map_err(|err| CheckOutcome::fail(format!("manifest is not valid YAML: {err}")))
    }

    fn entry<'a>(map: &'a serde_yaml::Mapping, key: &str) -> Option<&'a Value> {
        map.get(Value::String(key.to_string(), None))
    }

    fn describe(value: &Value) -> &'static str {
        if value.as_bool().is_some() {
            "a boolean"
        } else if value.as_str().is_some() {
            "a string"
        } else if value.as_mapping().is_some() {
            "a mapping"
        } else if value.as_sequence().is_some() {
            "a sequence"
        } else {
            "another scalar"
        }
    }

    fn type_mismatch(field: &str, expected: &str, got: &Value) -> CheckOutcome {
        CheckOutcome::fail(format!(
            "`{field}` must be {expected}, got {}",
            describe(got)
        ))
    }

    pub(super) fn top_level_metadata(action: &LocatedAction) -> CheckOutcome {
        let doc = match parse(action) {
            Ok(doc) => doc,
            Err(outcome) => return outcome,
        };
        let Some(map) = doc.as_mapping() else {
            return CheckOutcome::fail("manifest document must be a mapping");
        };
        for key in ["name", "description", "inputs", "runs"] {
            if entry(map, key).is_none() {
                return CheckOutcome::fail(format!("top-level key `{key}` must be present"));
            }
        }
        if entry(map, "name").and_then(|v| v.as_str()) != Some("Download Artifact") {
            return CheckOutcome::fail("action name must be 'Download Artifact'");
        }
        match entry(map, "description").and_then(|v| v.as_str()) {
            Some(description) if !description.trim().is_empty() => {}
            _ => return CheckOutcome::fail("`description` must be a non-empty string"),
        }
        let Some(runs) = entry(map, "runs").and_then(|v| v.as_mapping()) else {
            return CheckOutcome::fail("`runs` must be a mapping");
        };
        if entry(runs, "using").and_then(|v| v.as_str()) != Some("composite") {
            return CheckOutcome::fail("`runs.using` must be 'composite'");
        }
        match entry(runs, "steps").and_then(|v| v.as_sequence()) {
            Some(steps) if !steps.is_empty() => {}
            _ => return CheckOutcome::fail("`runs.steps` must be a non-empty sequence"),
        }
        CheckOutcome::Pass
    }

    pub(super) fn inputs_schema(action: &LocatedAction) -> CheckOutcome {
        let doc = match parse(action) {
            Ok(doc) => doc,
            Err(outcome) => return outcome,
        };
        let Some(map) = doc.as_mapping() else {
            return CheckOutcome::fail("manifest document must be a mapping");
        };
        let Some(inputs) = entry(map, "inputs").and_then(|v| v.as_mapping()) else {
            return CheckOutcome::fail("`inputs` must be a mapping");
        };
        for key in ["name", "path", "force-use-github"] {
            if entry(inputs, key).is_none() {
                return CheckOutcome::fail(format!("missing input `{key}`"));
            }
        }

        let Some(name_input) = entry(inputs, "name").and_then(|v| v.as_mapping()) else {
            return CheckOutcome::fail("`inputs.name` must be a mapping");
        };
        if entry(name_input, "default").and_then(|v| v.as_str()) != Some("artifact") {
            return CheckOutcome::fail("`inputs.name.default` must be 'artifact'");
        }

        let Some(path_input) = entry(inputs, "path").and_then(|v| v.as_mapping()) else {
            return CheckOutcome::fail("`inputs.path` must be a mapping");
        };
        match entry(path_input, "required") {
            Some(required) if required.as_bool() == Some(true) => {}
            Some(required) => {
                return type_mismatch("inputs.path.required", "the boolean true", required);
            }
            None => return CheckOutcome::fail("`inputs.path.required` must be present"),
        }

        let Some(force) = entry(inputs, "force-use-github").and_then(|v| v.as_mapping()) else {
            return CheckOutcome::fail("`inputs.force-use-github` must be a mapping");
        };
        match entry(force, "default") {
            Some(default) if default.as_bool() == Some(false) => {}
            Some(default) => {
                return type_mismatch("inputs.force-use-github.default", "the boolean false", default);
            }
            None => return CheckOutcome::fail("`inputs.force-use-github.default` must be present"),
        }
        // An absent `required` flag is acceptable here; when present it must
        // be the boolean false.
        if let Some(required) = entry(force, "required") {
            if required.as_bool() != Some(false) {
                return type_mismatch("inputs.force-use-github.required", "the boolean false", required);
            }
        }
        CheckOutcome::Pass
    }

    pub(super) fn download_step(action: &LocatedAction) -> CheckOutcome {
        let doc = match parse(action) {
            Ok(doc) => doc,
            Err(outcome) => return outcome,
        };
        let Some(steps) = doc
            .as_mapping()
            .and_then(|map| entry(map, "runs"))
            .and_then(|runs| runs.as_mapping())
            .and_then(|runs| entry(runs, "steps"))
            .and_then(|steps| steps.as_sequence())
        else {
            return CheckOutcome::fail("`runs.steps` must be a sequence");
        };
        let Some(step) = steps.iter().filter_map(|step| step.as_mapping()).find(|step| {
            entry(step, "uses")
                .and_then(|uses| uses.as_str())
                .is_some_and(|uses| uses.starts_with(USES_PREFIX))
        }) else {
            return CheckOutcome::fail(format!("expected a step using `{USES_PREFIX}`"));
        };

        if entry(step, "uses").and_then(|uses| uses.as_str()) != Some(PINNED_USES) {
            return CheckOutcome::fail(format!("download step must pin `{PINNED_USES}`"));
        }

        let Some(condition) = entry(step, "if")
            .and_then(|cond| cond.as_str())
            .filter(|cond| !cond.is_empty())
        else {
            return CheckOutcome::fail("download step must carry a non-empty `if` condition");
        };
        if !condition.contains(FORCE_FLAG_REF) {
            return CheckOutcome::fail(format!("`if` must reference {FORCE_FLAG_REF}"));
        }
        if !condition.contains(RUNNER_ENV_PREDICATE) {
            return CheckOutcome::fail(format!("`if` must check {RUNNER_ENV_PREDICATE}"));
        }

        let Some(with) = entry(step, "with").and_then(|with| with.as_mapping()) else {
            return CheckOutcome::fail("download step must carry a `with` mapping");
        };
        if entry(with, "name").and_then(|name| name.as_str()) != Some(NAME_EXPR) {
            return CheckOutcome::fail(format!("`with.name` must pass through {NAME_EXPR}"));
        }
        if entry(with, "path").and_then(|path| path.as_str()) != Some(PATH_EXPR) {
            return CheckOutcome::fail(format!("`with.path` must pass through {PATH_EXPR}"));
        }
        CheckOutcome::Pass
    }
}

#[cfg(not(feature = "structured-yaml"))]
mod structured {
    use super::CheckOutcome;
    use crate::locate::LocatedAction;

    const NO_PARSER: &str = "structured YAML checks need the structured-yaml feature";

    pub(super) fn top_level_metadata(_action: &LocatedAction) -> CheckOutcome {
        CheckOutcome::skip(NO_PARSER)
    }

    pub(super) fn inputs_schema(_action: &LocatedAction) -> CheckOutcome {
        CheckOutcome::skip(NO_PARSER)
    }

    pub(super) fn download_step(_action: &LocatedAction) -> CheckOutcome {
        CheckOutcome::skip(NO_PARSER)
    }
}
