//! Generative search: ask the server's generative module to produce text
//! per result object or once for the whole result set.

use crate::rpc::pb;
use crate::text;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerativeSearch {
    single_prompt: Option<String>,
    grouped_task: Option<String>,
    grouped_properties: Vec<String>,
}

impl GenerativeSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prompt evaluated once per object; `{property}` placeholders are
    /// substituted server-side.
    pub fn with_single_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.single_prompt = Some(prompt.into());
        self
    }

    /// Task evaluated once over all results.
    pub fn with_grouped_task(mut self, task: impl Into<String>) -> Self {
        self.grouped_task = Some(task.into());
        self
    }

    pub fn with_grouped_properties<I, S>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.grouped_properties = properties.into_iter().map(Into::into).collect();
        self
    }

    /// `_additional{generate(...){singleResult groupedResult error}}`
    pub fn to_text(&self) -> String {
        let mut args = Vec::new();
        let mut results = Vec::new();
        if let Some(prompt) = &self.single_prompt {
            args.push(format!("singleResult:{{prompt:{}}}", text::block_string(prompt)));
            results.push("singleResult");
        }
        if let Some(task) = &self.grouped_task {
            let mut grouped = vec![format!("task:{}", text::block_string(task))];
            if !self.grouped_properties.is_empty() {
                grouped.push(format!(
                    "properties:{}",
                    text::string_array(&self.grouped_properties)
                ));
            }
            args.push(format!("groupedResult:{{{}}}", grouped.join(" ")));
            results.push("groupedResult");
        }
        results.push("error");
        format!(
            "_additional{{generate({}){{{}}}}}",
            args.join(" "),
            results.join(" ")
        )
    }

    pub fn to_rpc(&self) -> pb::GenerativeSearch {
        pb::GenerativeSearch {
            single_response_prompt: self.single_prompt.clone().unwrap_or_default(),
            grouped_response_task: self.grouped_task.clone().unwrap_or_default(),
            grouped_properties: self.grouped_properties.clone(),
        }
    }
}
