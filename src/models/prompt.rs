//! Prompt (global filter) records

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Width or height override with its unit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomSize {
    pub size: String,
    pub using: String,
}

/// Input control of a prompt
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptUiControl {
    pub control_type: String,
    pub max_choices: String,
    pub include_all_choices: String,
    /// All control attributes except the type
    pub attributes: Map<String, Value>,
    pub custom_width: Option<CustomSize>,
    pub custom_height: Option<CustomSize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptDefaultValues {
    pub values_type: String,
    pub using_code_value: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstrainPrompt {
    pub constrain_type: String,
    pub auto_select_value: String,
}

/// Presentation or request variable set by a prompt
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptVariable {
    pub location: String,
    pub variable_type: String,
    pub formula: String,
}

/// Where the prompt's choice list comes from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptSource {
    pub source_type: String,
    /// Only set for SQL sources
    pub source_formula: String,
    /// Only set for fixed choice lists
    pub choices: Vec<String>,
    /// All source attributes except the type
    pub attributes: Map<String, Value>,
}

/// One prompt of a prompt document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptDefinition {
    pub prompt_type: String,
    pub prompt_name: String,
    pub column_id: String,
    pub required: String,
    /// Prompted formula; for column expressions the display formula
    pub formula: String,
    pub operator: String,
    pub table_name: String,
    pub column_name: String,
    pub ui_control: Option<PromptUiControl>,
    pub default_values: Option<PromptDefaultValues>,
    pub constrain: Option<ConstrainPrompt>,
    pub variables: Vec<PromptVariable>,
    pub source: Option<PromptSource>,
}

impl PromptDefinition {
    /// Control attributes as a style map.
    pub fn style(&self) -> Map<String, Value> {
        self.ui_control
            .as_ref()
            .map(|c| c.attributes.clone())
            .unwrap_or_default()
    }

    /// Control and step size overrides.
    pub fn layout(&self, step_width: Option<&CustomSize>) -> Map<String, Value> {
        let mut layout = Map::new();
        if let Some(control) = &self.ui_control {
            if let Some(width) = &control.custom_width {
                insert_size(&mut layout, "customWidth", width);
            }
            if let Some(height) = &control.custom_height {
                insert_size(&mut layout, "customHeight", height);
            }
        }
        if let Some(width) = step_width {
            insert_size(&mut layout, "stepCustomWidth", width);
        }
        layout
    }

    /// Source attributes as a display map.
    pub fn display(&self) -> Map<String, Value> {
        self.source
            .as_ref()
            .map(|s| s.attributes.clone())
            .unwrap_or_default()
    }

    pub fn default_values_joined(&self) -> String {
        self.default_values
            .as_ref()
            .map(|d| d.values.join("|"))
            .unwrap_or_default()
    }
}

fn insert_size(map: &mut Map<String, Value>, key: &str, size: &CustomSize) {
    map.insert(key.to_string(), Value::String(size.size.clone()));
    map.insert(format!("{}Using", key), Value::String(size.using.clone()));
}

/// Everything extracted from one prompt document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptDocument {
    /// Root `xsi:type`, e.g. `globalFilterPrompt`
    pub view_type: String,
    /// Subject area with quotes removed
    pub subject_area: String,
    pub instruction: String,
    pub step_custom_width: Option<CustomSize>,
    pub prompts: Vec<PromptDefinition>,
}
