//! Prompt importer
//!
//! Parses standalone prompt documents (global filters). A document that parses
//! but declares no prompts is a valid, empty [`PromptDocument`]; the batch
//! driver then treats the file as a report candidate instead.

use tracing::{debug, info};

use super::ImportError;
use super::identifiers::{first_quoted_identifier, strip_quotes};
use crate::models::{
    ConstrainPrompt, CustomSize, PromptDefaultValues, PromptDefinition, PromptDocument,
    PromptSource, PromptUiControl, PromptVariable,
};
use crate::xml::{self, Document, Element};

/// Prompt Importer
#[derive(Debug, Default, Clone, Copy)]
pub struct PromptImporter;

impl PromptImporter {
    pub fn new() -> Self {
        Self
    }

    /// Import a prompt document.
    pub fn import(&self, xml_content: &str) -> Result<PromptDocument, ImportError> {
        let document = Document::parse(xml_content)?;
        let root = &document.root;

        let step = root.find(".//saw:promptStep");
        let prompts: Vec<PromptDefinition> = root
            .find_all(".//saw:prompt")
            .into_iter()
            .map(|prompt| self.extract_prompt(prompt))
            .collect();

        info!("Prompt document parsed: {} prompts", prompts.len());

        Ok(PromptDocument {
            view_type: root.local_type(),
            subject_area: strip_quotes(&xml::attr(root.find("saw:prompts"), "subjectArea"))
                .to_string(),
            instruction: xml::text(step.and_then(|s| s.find("saw:instruction/saw:caption/saw:text"))),
            step_custom_width: step
                .and_then(|s| s.find("saw:customWidth"))
                .map(|w| custom_size(w, "width")),
            prompts,
        })
    }

    fn extract_prompt(&self, prompt: &Element) -> PromptDefinition {
        let formula = prompt_formula(prompt);
        let (table_name, column_name) = first_quoted_identifier(&formula);

        let definition = PromptDefinition {
            prompt_type: prompt.local_type(),
            prompt_name: xml::text(prompt.find("saw:label/saw:caption/saw:text")),
            column_id: prompt.attr("columnID"),
            required: xml::attr_or(Some(prompt), "required", "false"),
            operator: xml::attr(prompt.find("saw:promptOperator"), "op"),
            table_name,
            column_name,
            ui_control: prompt.find("saw:promptUIControl").map(ui_control),
            default_values: prompt
                .find("saw:promptDefaultValues")
                .map(|defaults| PromptDefaultValues {
                    values_type: defaults.attr("type"),
                    using_code_value: defaults.attr("usingCodeValue"),
                    values: defaults
                        .find_all("saw:promptDefaultValue")
                        .into_iter()
                        .map(Element::text)
                        .collect(),
                }),
            constrain: prompt
                .find("saw:constrainPrompt")
                .map(|constrain| ConstrainPrompt {
                    constrain_type: constrain.attr("type"),
                    auto_select_value: constrain.attr("autoSelectValue"),
                }),
            variables: prompt
                .find_all("saw:setPromptVariables/saw:setPromptVariable")
                .into_iter()
                .map(|var| PromptVariable {
                    location: var.attr("location"),
                    variable_type: var.attr("type"),
                    formula: var.attr("variableFormula"),
                })
                .collect(),
            source: prompt.find("saw:promptSource").map(prompt_source),
            formula,
        };

        if let Some(source) = &definition.source
            && !source.choices.is_empty()
        {
            debug!(
                "Prompt '{}' has {} fixed choices",
                definition.prompt_name,
                source.choices.len()
            );
        }
        definition
    }
}

/// Formula of a prompt; for column expressions the display formula.
fn prompt_formula(prompt: &Element) -> String {
    if let Some(expr) = prompt.find("saw:formula/sawx:expr") {
        if expr.local_type() == "columnExpression"
            && let Some(display) =
                expr.find(r#"saw:columnFormula[@formulaUse="display"]/sawx:expr"#)
        {
            return display.text();
        }
        return expr.text();
    }
    prompt
        .find("saw:formula")
        .and_then(|formula| formula.child_elements().next())
        .map(Element::text)
        .unwrap_or_default()
}

fn custom_size(element: &Element, size_attr: &str) -> CustomSize {
    CustomSize {
        size: element.attr(size_attr),
        using: element.attr("using"),
    }
}

fn ui_control(control: &Element) -> PromptUiControl {
    PromptUiControl {
        control_type: control.local_type(),
        max_choices: control.attr("maxChoices"),
        include_all_choices: control.attr("includeAllChoices"),
        attributes: control.attribute_map(&["type"]),
        custom_width: control.find("saw:customWidth").map(|w| custom_size(w, "width")),
        custom_height: control
            .find("saw:customHeight")
            .map(|h| custom_size(h, "height")),
    }
}

fn prompt_source(source: &Element) -> PromptSource {
    let source_type = source.local_type();
    let source_formula = if source_type == "sqlPromptSource" {
        source.attr("sourceFormula")
    } else {
        String::new()
    };
    let choices = if source_type == "specificChoices" || source_type == "choiceList" {
        source
            .find_all(".//saw:promptChoice")
            .into_iter()
            .map(choice_text)
            .filter(|choice| !choice.is_empty())
            .collect()
    } else {
        Vec::new()
    };

    PromptSource {
        attributes: source.attribute_map(&["type"]),
        source_type,
        source_formula,
        choices,
    }
}

fn choice_text(choice: &Element) -> String {
    let caption = xml::text(choice.find(".//saw:caption/saw:text"));
    if !caption.is_empty() {
        return caption;
    }
    match choice.find(".//saw:value") {
        Some(value) => value.text(),
        None => choice.text(),
    }
}
