use crate::resolver::ResolvedFile;

#[derive(Debug, Clone, Copy, Default, PartialEq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub trait OutputFormatter {
    fn format(&self, files: &[ResolvedFile]) -> String;
}

/// One path per line, in resolution order.
pub struct TextFormatter;

impl OutputFormatter for TextFormatter {
    fn format(&self, files: &[ResolvedFile]) -> String {
        files
            .iter()
            .map(|f| format!("{}\n", f.path.display()))
            .collect()
    }
}

pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format(&self, files: &[ResolvedFile]) -> String {
        serde_json::to_string_pretty(files).unwrap_or_else(|e| {
            let escaped = serde_json::to_string(&e.to_string())
                .unwrap_or_else(|_| "\"serialization error\"".to_string());
            format!("{{\"error\": {}}}", escaped)
        })
    }
}

pub fn formatter_for(format: OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}
