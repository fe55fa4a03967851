//! One pass over the page: match every form control to a profile field and
//! write its value.

use crate::driver::{DriverError, ElementKind, FormDriver};
use crate::dropdown::{pick_option, DEFAULT_THRESHOLD};
use crate::matcher::{match_key, metadata_string};
use crate::profile::Profile;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Tunables for a fill pass.
#[derive(Debug, Clone, PartialEq)]
pub struct FillConfig {
    /// Similarity a dropdown option must exceed to be selected.
    pub threshold: f64,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// How a value got into a field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum FillMethod {
    /// Dropdown option chosen by similarity.
    Select { option: String },
    /// Cleared, then entered as keystrokes.
    Typed,
    /// Written straight to the `value` property.
    Assigned,
}

/// What happened to a single form control.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FieldOutcome {
    Filled {
        key: String,
        #[serde(flatten)]
        method: FillMethod,
    },
    /// Dropdown whose options were all too far from the value.
    NoOption { key: String },
    /// Matched a field the profile has no value for.
    NoValue { key: String },
    Failed {
        #[serde(skip_serializing_if = "Option::is_none")]
        key: Option<String>,
        error: String,
    },
    Unmatched,
}

impl FieldOutcome {
    pub fn key(&self) -> Option<&str> {
        match self {
            FieldOutcome::Filled { key, .. }
            | FieldOutcome::NoOption { key }
            | FieldOutcome::NoValue { key } => Some(key),
            FieldOutcome::Failed { key, .. } => key.as_deref(),
            FieldOutcome::Unmatched => None,
        }
    }
}

/// Outcome of a control, together with what identified it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldReport {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    pub metadata: String,
    #[serde(flatten)]
    pub outcome: FieldOutcome,
}

/// Everything one fill pass did, in document order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FillReport {
    pub fields: Vec<FieldReport>,
}

impl FillReport {
    pub fn filled(&self) -> usize {
        self.count(|o| matches!(o, FieldOutcome::Filled { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, FieldOutcome::Failed { .. }))
    }

    /// Controls left alone without an error.
    pub fn skipped(&self) -> usize {
        self.fields.len() - self.filled() - self.failed()
    }

    /// Keys that were filled, in document order.
    pub fn filled_keys(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| matches!(f.outcome, FieldOutcome::Filled { .. }))
            .filter_map(|f| f.outcome.key())
            .collect()
    }

    pub fn outcome_for(&self, index: usize) -> Option<&FieldOutcome> {
        self.fields.iter().find(|f| f.index == index).map(|f| &f.outcome)
    }

    fn count(&self, pred: impl Fn(&FieldOutcome) -> bool) -> usize {
        self.fields.iter().filter(|f| pred(&f.outcome)).count()
    }
}

/// Fill every recognizable control on the current page.
///
/// A control that cannot be read or written is recorded as failed and the
/// pass moves on; only failing to list the controls at all is an error.
pub fn smart_fill<D: FormDriver>(
    driver: &mut D,
    profile: &Profile,
    config: &FillConfig,
) -> Result<FillReport, DriverError> {
    info!("smart fill started");

    let elements = driver.form_elements()?;
    let mut report = FillReport::default();

    for (index, element) in elements.iter().enumerate() {
        let mut field = FieldReport {
            index,
            tag: None,
            metadata: String::new(),
            outcome: FieldOutcome::Unmatched,
        };
        let mut matched: Option<String> = None;

        if let Err(e) = fill_one(driver, element, profile, config, &mut field, &mut matched) {
            let key = matched.as_deref().unwrap_or("");
            warn!(index, key, error = %e, "could not fill field");
            field.outcome = FieldOutcome::Failed {
                key: matched,
                error: e.to_string(),
            };
        }
        report.fields.push(field);
    }

    info!(
        filled = report.filled(),
        failed = report.failed(),
        skipped = report.skipped(),
        "smart fill completed"
    );
    Ok(report)
}

fn fill_one<D: FormDriver>(
    driver: &mut D,
    element: &D::Element,
    profile: &Profile,
    config: &FillConfig,
    field: &mut FieldReport,
    matched: &mut Option<String>,
) -> Result<(), DriverError> {
    let tag = driver.tag_name(element)?.to_lowercase();
    field.tag = Some(tag.clone());

    let name = driver.attribute(element, "name")?;
    let id = driver.attribute(element, "id")?;
    let placeholder = driver.attribute(element, "placeholder")?;
    let aria_label = driver.attribute(element, "aria-label")?;
    field.metadata = metadata_string(
        name.as_deref(),
        id.as_deref(),
        placeholder.as_deref(),
        aria_label.as_deref(),
    );

    let Some(key) = match_key(&field.metadata, profile.aliases()) else {
        debug!(index = field.index, metadata = %field.metadata, "no field matched");
        return Ok(());
    };
    *matched = Some(key.to_string());

    let Some(value) = profile.value_for(key) else {
        debug!(index = field.index, key, "no value for field");
        field.outcome = FieldOutcome::NoValue { key: key.to_string() };
        return Ok(());
    };

    let input_type = if tag == "select" {
        None
    } else {
        driver.attribute(element, "type")?
    };

    field.outcome = match ElementKind::classify(&tag, input_type.as_deref()) {
        ElementKind::Select => {
            let options = driver.option_texts(element)?;
            match pick_option(value, &options, config.threshold) {
                Some(i) => {
                    let option = options[i].clone();
                    driver.select_option(element, i)?;
                    debug!(key, option = %option, "filled field");
                    FieldOutcome::Filled {
                        key: key.to_string(),
                        method: FillMethod::Select { option },
                    }
                }
                None => {
                    debug!(key, "no dropdown option close enough");
                    FieldOutcome::NoOption { key: key.to_string() }
                }
            }
        }
        ElementKind::Password => {
            driver.set_value(element, value)?;
            debug!(key, "filled field");
            FieldOutcome::Filled {
                key: key.to_string(),
                method: FillMethod::Assigned,
            }
        }
        ElementKind::Text => {
            driver.clear(element)?;
            driver.type_text(element, value)?;
            debug!(key, "filled field");
            FieldOutcome::Filled {
                key: key.to_string(),
                method: FillMethod::Typed,
            }
        }
    };
    Ok(())
}
