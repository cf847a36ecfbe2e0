use clap::Args;
use serde_json::{Value, json};

use promcon_client::loader::{FormSchemaLoader, LoadState};
use promcon_client::render::{FieldWidget, FormMode, RenderedField, render_form};

use crate::util::{EXIT_APP_ERROR, EXIT_OK, exit_error, print_json};

#[derive(Args)]
pub struct FormArgs {
    /// Monitoring category, e.g. "blackbox"
    pub category: String,
    /// Type id within the category, e.g. "http"
    pub type_id: String,
    /// Form mode: create or edit
    #[arg(long, default_value = "create")]
    pub mode: String,
}

/// Fetch a type's form schema and print the resolved render plan: which
/// widget each field maps to and which validation rules it carries.
pub async fn run(loader: &FormSchemaLoader, args: FormArgs) -> i32 {
    let mode = match args.mode.as_str() {
        "create" => FormMode::Create,
        "edit" => FormMode::Edit,
        other => exit_error(
            &format!("Unknown form mode: {other}"),
            Some("Supported modes: create, edit"),
        ),
    };

    loader.load().await;
    match loader.state() {
        LoadState::Loaded(schema) => {
            let rendered = render_form(&schema, mode);
            let fields: Vec<Value> = rendered.iter().map(field_json).collect();
            print_json(&json!({
                "category": args.category,
                "type_id": args.type_id,
                "title": schema.title,
                "fields": fields,
            }));
            EXIT_OK
        }
        LoadState::Error(message) => {
            eprintln!(
                "{}",
                serde_json::to_string_pretty(&json!({"error": "load_failed", "message": message}))
                    .unwrap_or_default()
            );
            EXIT_APP_ERROR
        }
        _ => EXIT_APP_ERROR,
    }
}

fn field_json(field: &RenderedField) -> Value {
    json!({
        "name": field.name,
        "display_name": field.display_name,
        "widget": widget_json(&field.widget),
        "rules": field.rules.iter().map(|r| r.describe()).collect::<Vec<_>>(),
        "required": field.required,
        "read_only": field.read_only,
        "placeholder": field.placeholder,
        "help": field.help,
    })
}

fn widget_json(widget: &FieldWidget) -> Value {
    match widget {
        FieldWidget::Autocomplete { registry_field } => {
            json!({"kind": "autocomplete", "registry_field": registry_field})
        }
        FieldWidget::Select { options } => json!({"kind": "select", "options": options}),
        FieldWidget::TextArea => json!({"kind": "textarea"}),
        FieldWidget::Number { min } => json!({"kind": "number", "min": min}),
        FieldWidget::TextInput { url } => json!({"kind": "text", "url": url}),
    }
}
