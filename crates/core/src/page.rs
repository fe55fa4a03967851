//! An in-memory page: parsed HTML whose form controls can be filled without a
//! browser. Mirrors the rules a real browser enforces closely enough to
//! preview what a fill pass would do.

use crate::dom::{self, DomNode};
use crate::driver::{DriverError, FormDriver};
use serde::Serialize;
use std::collections::HashMap;

/// Handle to a form control on a [`Page`]: its position in document order.
pub type ControlId = usize;

#[derive(Debug, Clone)]
struct Control {
    tag: String,
    attributes: HashMap<String, String>,
    options: Vec<String>,
    initial_value: Option<String>,
}

impl Control {
    fn from_node(node: &DomNode) -> Self {
        let options: Vec<String> = if node.tag == "select" {
            node.find_all("option").iter().map(|o| o.text_content()).collect()
        } else {
            Vec::new()
        };
        let initial_value = match node.tag.as_str() {
            "textarea" => Some(node.text_content()).filter(|t| !t.is_empty()),
            "select" => node
                .find_all("option")
                .iter()
                .find(|o| o.has_attr("selected"))
                .map(|o| o.text_content())
                .or_else(|| options.first().cloned()),
            _ => node.get_attr("value").map(|v| v.to_string()),
        };
        Self {
            tag: node.tag.clone(),
            attributes: node.attributes.clone(),
            options,
            initial_value,
        }
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    fn is_disabled(&self) -> bool {
        self.attributes.contains_key("disabled")
    }

    fn is_hidden(&self) -> bool {
        self.attributes.contains_key("hidden")
            || self.attr("type").is_some_and(|t| t.eq_ignore_ascii_case("hidden"))
    }

    fn is_readonly(&self) -> bool {
        self.attributes.contains_key("readonly")
    }
}

/// Value of one control after filling, for reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlValue {
    pub id: ControlId,
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Parsed page holding the current value of every form control.
#[derive(Debug, Clone)]
pub struct Page {
    url: String,
    controls: Vec<Control>,
    values: HashMap<ControlId, String>,
}

impl Page {
    pub fn from_html(html: &str, url: &str) -> Self {
        let tree = dom::parse_html(html);
        let controls = tree.form_controls().into_iter().map(Control::from_node).collect();
        Self {
            url: url.to_string(),
            controls,
            values: HashMap::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    /// Current value of a control: whatever was filled in, else what the
    /// markup started with.
    pub fn value(&self, id: ControlId) -> Option<&str> {
        self.values
            .get(&id)
            .map(|s| s.as_str())
            .or_else(|| self.controls.get(id)?.initial_value.as_deref())
    }

    /// Current value of the first control with the given `name` attribute.
    pub fn value_by_name(&self, name: &str) -> Option<&str> {
        let id = self.controls.iter().position(|c| c.attr("name") == Some(name))?;
        self.value(id)
    }

    pub fn values(&self) -> Vec<ControlValue> {
        self.controls
            .iter()
            .enumerate()
            .map(|(id, c)| ControlValue {
                id,
                tag: c.tag.clone(),
                name: c.attr("name").map(|s| s.to_string()),
                value: self.value(id).map(|s| s.to_string()),
            })
            .collect()
    }

    fn control(&self, id: ControlId) -> Result<&Control, DriverError> {
        self.controls.get(id).ok_or(DriverError::StaleElement)
    }

    fn require_editable(&self, id: ControlId) -> Result<(), DriverError> {
        let control = self.control(id)?;
        if control.tag != "input" && control.tag != "textarea" {
            return Err(DriverError::NotInteractable(format!(
                "element {} ({}) is not a text input",
                id, control.tag
            )));
        }
        if control.is_hidden() {
            return Err(DriverError::NotInteractable(format!("element {} is hidden", id)));
        }
        if control.is_disabled() || control.is_readonly() {
            return Err(DriverError::NotInteractable(format!(
                "element {} is disabled or read-only",
                id
            )));
        }
        Ok(())
    }
}

impl FormDriver for Page {
    type Element = ControlId;

    fn form_elements(&mut self) -> Result<Vec<ControlId>, DriverError> {
        Ok((0..self.controls.len()).collect())
    }

    fn tag_name(&mut self, element: &ControlId) -> Result<String, DriverError> {
        Ok(self.control(*element)?.tag.clone())
    }

    fn attribute(
        &mut self,
        element: &ControlId,
        name: &str,
    ) -> Result<Option<String>, DriverError> {
        Ok(self.control(*element)?.attr(name).map(|s| s.to_string()))
    }

    fn option_texts(&mut self, element: &ControlId) -> Result<Vec<String>, DriverError> {
        Ok(self.control(*element)?.options.clone())
    }

    fn select_option(&mut self, element: &ControlId, index: usize) -> Result<(), DriverError> {
        let control = self.control(*element)?;
        if control.tag != "select" {
            return Err(DriverError::NotInteractable(format!(
                "element {} ({}) is not a select",
                element, control.tag
            )));
        }
        if control.is_disabled() {
            return Err(DriverError::NotInteractable(format!("select {} is disabled", element)));
        }
        let option = control
            .options
            .get(index)
            .cloned()
            .ok_or(DriverError::NoSuchOption(index))?;
        self.values.insert(*element, option);
        Ok(())
    }

    fn clear(&mut self, element: &ControlId) -> Result<(), DriverError> {
        self.require_editable(*element)?;
        self.values.insert(*element, String::new());
        Ok(())
    }

    fn type_text(&mut self, element: &ControlId, text: &str) -> Result<(), DriverError> {
        self.require_editable(*element)?;
        let mut current = self.value(*element).unwrap_or_default().to_string();
        current.push_str(text);
        self.values.insert(*element, current);
        Ok(())
    }

    fn set_value(&mut self, element: &ControlId, value: &str) -> Result<(), DriverError> {
        self.control(*element)?;
        self.values.insert(*element, value.to_string());
        Ok(())
    }
}
