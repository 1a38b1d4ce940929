use handlebars::Handlebars;
use serde::Serialize;
use shared::{MessageGroups, NotificationRecord};
use std::path::PathBuf;
use thiserror::Error;

use crate::llm::{GenerationError, TextGenerator};

const PROMPT_TEMPLATE: &str = "\
You are an assistant tasked with generating concise and actionable notifications based on provided email communications. Your role is to summarize the key points of the email and suggest the appropriate next steps, such as replying to an email, booking a flight, scheduling a meeting on the calendar, or other relevant actions.

Using the provided email details:
- **Subject:** {{subject}}
- **Body:** {{body}}

Identify one of the following actions to take:
1. **Summary**
2. **Book Flight**
3. **Book Meeting on Calendar**
4. **Others**

Based on the chosen action, create a one-line notification in the following format:
```
- action: chosen action,
- inputs_for_action: required inputs to take that action,
- notification: notification line
```

Ensure the notification is professional, clear, and easy to act upon.
";

const PROMPT_TEMPLATE_NAME: &str = "notification";

const EXPORT_HEADER: [&str; 2] = ["Subject", "Notification"];

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Failed to write notification export: {0}")]
    Export(#[from] csv::Error),

    #[error("Failed to flush notification export: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid prompt template: {0}")]
    Template(#[from] handlebars::TemplateError),

    #[error("Failed to render prompt: {0}")]
    Render(#[from] handlebars::RenderError),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

#[derive(Debug, Serialize)]
struct PromptContext<'a> {
    subject: &'a str,
    body: &'a str,
}

/// The notification prompt, registered once and filled per group
pub struct PromptRenderer {
    handlebars: Handlebars<'static>,
}

impl PromptRenderer {
    pub fn new() -> Result<Self, NotifyError> {
        let mut handlebars = Handlebars::new();

        // Prompts are plain text, not HTML
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.register_template_string(PROMPT_TEMPLATE_NAME, PROMPT_TEMPLATE)?;

        Ok(Self { handlebars })
    }

    /// Fill the prompt with one group's subject and joined members
    pub fn render(&self, subject: &str, body: &str) -> Result<String, NotifyError> {
        let prompt = self
            .handlebars
            .render(PROMPT_TEMPLATE_NAME, &PromptContext { subject, body })?;

        Ok(prompt)
    }
}

/// Generates one notification per subject group and writes them to a CSV export
pub struct Notifier<'a> {
    generator: &'a dyn TextGenerator,
    prompts: PromptRenderer,
    export_path: PathBuf,
}

impl<'a> Notifier<'a> {
    pub fn new(
        generator: &'a dyn TextGenerator,
        export_path: impl Into<PathBuf>,
    ) -> Result<Self, NotifyError> {
        Ok(Self {
            generator,
            prompts: PromptRenderer::new()?,
            export_path: export_path.into(),
        })
    }

    /// Rewrite the export from scratch with a row per non-empty group.
    ///
    /// Groups are summarized one at a time in order. The first generation
    /// failure aborts the run and is returned.
    pub async fn export(
        &self,
        groups: &MessageGroups,
    ) -> Result<Vec<NotificationRecord>, NotifyError> {
        let mut writer = csv::Writer::from_path(&self.export_path)?;
        writer.write_record(EXPORT_HEADER)?;

        if groups.is_empty() {
            tracing::info!("No grouped email data provided for notification generation");
        }

        let mut records = Vec::new();
        for group in groups.iter().filter(|g| !g.members.is_empty()) {
            let subject = group.display_subject();
            let prompt = self.prompts.render(subject, &group.joined_members())?;
            let notification = self.generator.generate(&prompt).await?;

            writer.write_record([subject, notification.as_str()])?;
            tracing::info!("Notification for '{}':\n{}", subject, notification);

            records.push(NotificationRecord {
                subject: subject.to_string(),
                notification,
            });
        }

        writer.flush()?;
        tracing::debug!(
            "Wrote {} notifications to {}",
            records.len(),
            self.export_path.display()
        );

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use shared::NO_SUBJECT;
    use std::path::Path;
    use std::sync::Mutex;

    /// Echoes a numbered reply and remembers every prompt
    struct ScriptedGenerator {
        prompts: Mutex<Vec<String>>,
        fail_on: Option<usize>,
    }

    impl ScriptedGenerator {
        fn new() -> Self {
            Self {
                prompts: Mutex::new(Vec::new()),
                fail_on: None,
            }
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
            let mut prompts = self.prompts.lock().unwrap();
            prompts.push(prompt.to_string());
            let call = prompts.len();
            if self.fail_on == Some(call) {
                return Err(GenerationError::Api {
                    status: 500,
                    message: "model overloaded".to_string(),
                });
            }
            Ok(format!("- action: Summary, notification: reply {}", call))
        }
    }

    fn read_rows(path: &Path) -> Vec<Vec<String>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(path)
            .unwrap();
        reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    fn render(subject: &str, body: &str) -> String {
        PromptRenderer::new().unwrap().render(subject, body).unwrap()
    }

    #[test]
    fn test_render_prompt_fills_both_fields() {
        let prompt = render("Trip", "Flight info");
        assert!(prompt.contains("- **Subject:** Trip"));
        assert!(prompt.contains("- **Body:** Flight info"));
        assert!(!prompt.contains("{{"));
        assert!(prompt.contains("```\n- action: chosen action,"));
    }

    #[test]
    fn test_placeholder_text_in_subject_is_not_substituted() {
        let prompt = render("Re: {body} and {subject} template", "ACTUAL BODY");
        assert!(prompt.contains("- **Subject:** Re: {body} and {subject} template\n"));
        assert!(prompt.contains("- **Body:** ACTUAL BODY\n"));
    }

    #[test]
    fn test_template_syntax_in_fields_is_left_verbatim() {
        let prompt = render("{{body}} <b>&</b>", "literal {{subject}} text");
        assert!(prompt.contains("- **Subject:** {{body}} <b>&</b>\n"));
        assert!(prompt.contains("- **Body:** literal {{subject}} text\n"));
    }

    #[tokio::test]
    async fn test_empty_groups_write_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notifications.csv");
        let generator = ScriptedGenerator::new();

        let records = Notifier::new(&generator, &path)
            .unwrap()
            .export(&MessageGroups::new())
            .await
            .unwrap();

        assert!(records.is_empty());
        assert_eq!(read_rows(&path), vec![vec!["Subject", "Notification"]]);
        assert!(generator.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_one_row_per_group_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notifications.csv");
        let generator = ScriptedGenerator::new();

        let mut groups = MessageGroups::new();
        groups.push(Some("Trip".to_string()), "Flight info".to_string());
        groups.push(None, "orphan".to_string());
        groups.push(Some("Trip".to_string()), "Hotel info".to_string());

        let records = Notifier::new(&generator, &path)
            .unwrap()
            .export(&groups)
            .await
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].subject, NO_SUBJECT);

        let rows = read_rows(&path);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1][0], "Trip");
        assert_eq!(rows[1][1], "- action: Summary, notification: reply 1");
        assert_eq!(rows[2][0], "No Subject");

        let prompts = generator.prompts.lock().unwrap();
        assert!(prompts[0].contains("Flight info\nHotel info"));
    }

    #[tokio::test]
    async fn test_export_overwrites_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notifications.csv");
        std::fs::write(&path, "stale,data\nmore,stale\nrows,here\n").unwrap();
        let generator = ScriptedGenerator::new();

        Notifier::new(&generator, &path)
            .unwrap()
            .export(&MessageGroups::new())
            .await
            .unwrap();

        assert_eq!(read_rows(&path).len(), 1);
    }

    #[tokio::test]
    async fn test_generation_failure_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notifications.csv");
        let generator = ScriptedGenerator {
            prompts: Mutex::new(Vec::new()),
            fail_on: Some(2),
        };

        let mut groups = MessageGroups::new();
        groups.push(Some("a".to_string()), "1".to_string());
        groups.push(Some("b".to_string()), "2".to_string());
        groups.push(Some("c".to_string()), "3".to_string());

        let result = Notifier::new(&generator, &path)
            .unwrap()
            .export(&groups)
            .await;

        assert!(matches!(result, Err(NotifyError::Generation(_))));
        assert_eq!(generator.prompts.lock().unwrap().len(), 2);
    }
}
