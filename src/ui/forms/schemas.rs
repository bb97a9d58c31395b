//! Form layouts for each record kind

use super::{
    ButtonGroup, CheckboxList, ChipSelect, DateInput, FormPage, InputAdapter, NumericBounds,
    SelectInput, SubmitButton, SwitchInput, TextInput, Visibility,
};
use crate::backend::{Backend, RecordOptionLoader, RecordSubmitHandler};
use crate::config::AdminConfig;
use crate::state::{
    lowercase, parse_iso_date, slugify_typing, FieldValue, FormContext, FormValues, Record,
    RecordKind, SelectOption,
};
use chrono::Local;
use std::sync::Arc;

const SAVE_LABEL: &str = "Save";

fn locales() -> Vec<SelectOption> {
    vec![
        SelectOption::new("en", "English"),
        SelectOption::new("pt", "Portuguese"),
        SelectOption::new("es", "Spanish"),
        SelectOption::new("fr", "French"),
        SelectOption::new("de", "German"),
    ]
}

fn employment_types() -> Vec<SelectOption> {
    vec![
        SelectOption::new("full_time", "Full-time"),
        SelectOption::new("part_time", "Part-time"),
        SelectOption::new("contract", "Contract"),
        SelectOption::new("freelance", "Freelance"),
    ]
}

fn skill_categories() -> Vec<SelectOption> {
    vec![
        SelectOption::new("languages", "Languages"),
        SelectOption::new("frameworks", "Frameworks"),
        SelectOption::new("tools", "Tools"),
        SelectOption::new("databases", "Databases"),
        SelectOption::new("cloud", "Cloud"),
    ]
}

fn language_levels() -> Vec<SelectOption> {
    vec![
        SelectOption::new("basic", "Basic"),
        SelectOption::new("intermediate", "Intermediate"),
        SelectOption::new("fluent", "Fluent"),
        SelectOption::new("native", "Native"),
    ]
}

/// Values a new record starts from
fn defaults(kind: RecordKind, config: &AdminConfig) -> FormValues {
    let mut values = FormValues::new();
    match kind {
        RecordKind::Company => {}
        RecordKind::Experience => {
            values.insert("employment_type", "full_time");
            values.insert("current", false);
            values.insert("skill_ids", FieldValue::List(Vec::new()));
        }
        RecordKind::Skill => {
            values.insert("proficiency", 3i64);
            values.insert("featured", false);
        }
        RecordKind::Language => {
            values.insert("proficiency", "intermediate");
        }
        RecordKind::CvSection => {
            values.insert("locale", config.locale());
            values.insert("skill_ids", FieldValue::List(Vec::new()));
            values.insert("visible", true);
            values.insert("order", 0i64);
        }
    }
    values
}

/// An edited experience cannot end before it started
fn end_date_input(existing: Option<&Record>) -> DateInput {
    let input = DateInput::new("end_date", "End date").placeholder("present");
    match existing.and_then(|r| parse_iso_date(r.values.text("start_date"))) {
        Some(start) => input.min(start),
        None => input,
    }
}

/// Build the form for `kind`, editing `existing` when given
pub fn build_form(
    kind: RecordKind,
    backend: Arc<dyn Backend>,
    existing: Option<&Record>,
    config: &AdminConfig,
) -> FormPage {
    let initial = existing
        .map(|r| r.values.clone())
        .unwrap_or_else(|| defaults(kind, config));
    let ctx = FormContext::new(initial, existing.is_some());
    let handler = Arc::new(RecordSubmitHandler::new(
        Arc::clone(&backend),
        kind,
        existing.map(|r| r.id),
    ));
    let page = FormPage::new(kind.label(), ctx, handler);
    let loader = |of: RecordKind| Arc::new(RecordOptionLoader::new(Arc::clone(&backend), of));

    match kind {
        RecordKind::Company => page
            .with(TextInput::new("name", "Name").placeholder("Acme Corp"))
            .with(
                TextInput::new("slug", "Slug")
                    .transform(Arc::new(slugify_typing))
                    .placeholder("derived from the name when empty")
                    .visibility(Visibility::CreateOnly),
            )
            .with(
                TextInput::new("website", "Website")
                    .transform(Arc::new(lowercase))
                    .placeholder("https://"),
            )
            .with(TextInput::new("logo_url", "Logo URL"))
            .with(TextInput::new("description", "Description").multiline())
            .with(SubmitButton::new(SAVE_LABEL)),
        RecordKind::Experience => page
            .with(
                SelectInput::lazy("company_id", "Company", loader(RecordKind::Company))
                    .none_label("Select a company")
                    .none_disabled(),
            )
            .with(TextInput::new("title", "Title"))
            .with(ButtonGroup::new("employment_type", "Employment type", employment_types()))
            .with(DateInput::new("start_date", "Start date").max(Local::now().date_naive()))
            .with(end_date_input(existing))
            .with(SwitchInput::new("current", "Current role"))
            .with(ChipSelect::lazy("skill_ids", "Skills", loader(RecordKind::Skill)))
            .with(TextInput::new("description", "Description").multiline())
            .with(SubmitButton::new(SAVE_LABEL)),
        RecordKind::Skill => page
            .with(TextInput::new("name", "Name"))
            .with(SelectInput::new("category", "Category", skill_categories()))
            .with(TextInput::number(
                "proficiency",
                "Proficiency (1-5)",
                NumericBounds::integer(Some(1), Some(5)),
            ))
            .with(TextInput::number(
                "years",
                "Years of experience",
                NumericBounds::decimal(Some(0.0), Some(60.0), 0.5),
            ))
            .with(SwitchInput::new("featured", "Featured"))
            .with(SubmitButton::new(SAVE_LABEL)),
        RecordKind::Language => page
            .with(
                SelectInput::new("language", "Language", locales())
                    .none_label("Select a language")
                    .none_disabled(),
            )
            .with(ButtonGroup::new("proficiency", "Proficiency", language_levels()))
            .with(SubmitButton::new(SAVE_LABEL)),
        RecordKind::CvSection => page
            .with(TextInput::new("title", "Title"))
            .with(SelectInput::new("locale", "Locale", locales()).none_disabled())
            .with(CheckboxList::lazy(
                "skill_ids",
                "Included skills",
                loader(RecordKind::Skill),
            ))
            .with(SwitchInput::new("visible", "Visible"))
            .with(TextInput::number(
                "order",
                "Order",
                NumericBounds::integer(Some(0), Some(99)),
            ))
            .with(SubmitButton::new(SAVE_LABEL)),
    }
}
