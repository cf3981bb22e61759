use std::fmt;
use std::path::Path;

use crate::config::{SporecartConfig, load_config, resolve_config_path};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Pass,
    Fail,
}

impl fmt::Display for CheckState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Fail => write!(f, "FAIL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorCheck {
    pub name: String,
    pub state: CheckState,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorReport {
    pub checks: Vec<DoctorCheck>,
}

impl DoctorReport {
    pub fn has_failures(&self) -> bool {
        self.checks
            .iter()
            .any(|check| check.state == CheckState::Fail)
    }

    pub fn summary(&self) -> String {
        let passed = self
            .checks
            .iter()
            .filter(|check| check.state == CheckState::Pass)
            .count();
        let failed = self.checks.len().saturating_sub(passed);
        format!("{passed} passed, {failed} failed")
    }
}

const CONFIG_DEPENDENT_CHECKS: &[&str] = &[
    "config parses and validates",
    "flow rate policies",
    "media host configured",
];

pub fn run_doctor() -> DoctorReport {
    match resolve_config_path() {
        Ok(config_path) => run_doctor_at(&config_path),
        Err(error) => {
            let mut checks = vec![fail_check("config path resolves", error.to_string())];
            checks.push(skipped_check(
                "config file exists",
                "config path could not be resolved",
            ));
            push_skipped_checks(
                &mut checks,
                CONFIG_DEPENDENT_CHECKS,
                "config path could not be resolved",
            );
            DoctorReport { checks }
        }
    }
}

pub fn run_doctor_at(config_path: &Path) -> DoctorReport {
    let mut checks = vec![pass_check(
        "config path resolves",
        config_path.display().to_string(),
    )];

    if !config_path.exists() {
        checks.push(fail_check(
            "config file exists",
            format!("expected at {}", config_path.display()),
        ));
        push_skipped_checks(&mut checks, CONFIG_DEPENDENT_CHECKS, "config file is missing");
        return DoctorReport { checks };
    }

    checks.push(pass_check(
        "config file exists",
        format!("found at {}", config_path.display()),
    ));

    match load_config(config_path) {
        Ok(config) => {
            checks.push(pass_check("config parses and validates", "config is valid"));
            checks.push(check_flow_policies(&config));
            checks.push(check_media_host(&config));
        }
        Err(error) => {
            checks.push(fail_check("config parses and validates", error.to_string()));
            push_skipped_checks(&mut checks, &CONFIG_DEPENDENT_CHECKS[1..], "config is invalid");
        }
    }

    DoctorReport { checks }
}

fn check_flow_policies(config: &SporecartConfig) -> DoctorCheck {
    pass_check(
        "flow rate policies",
        format!(
            "checkout={}, returns={}",
            config.checkout.default_rate.label(),
            config.returns.default_rate.label()
        ),
    )
}

fn check_media_host(config: &SporecartConfig) -> DoctorCheck {
    match &config.api.media_base_url {
        Some(media) => pass_check("media host configured", media.clone()),
        None => pass_check(
            "media host configured",
            format!("falling back to api.base_url ({})", config.api.base_url),
        ),
    }
}

fn pass_check(name: &str, details: impl Into<String>) -> DoctorCheck {
    DoctorCheck {
        name: name.to_string(),
        state: CheckState::Pass,
        details: details.into(),
    }
}

fn fail_check(name: &str, details: impl Into<String>) -> DoctorCheck {
    DoctorCheck {
        name: name.to_string(),
        state: CheckState::Fail,
        details: details.into(),
    }
}

fn skipped_check(name: &str, reason: &str) -> DoctorCheck {
    fail_check(name, format!("skipped because {reason}"))
}

fn push_skipped_checks(checks: &mut Vec<DoctorCheck>, names: &[&str], reason: &str) {
    checks.extend(
        names
            .iter()
            .copied()
            .map(|name| skipped_check(name, reason)),
    );
}
