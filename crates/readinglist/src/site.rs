use std::path::PathBuf;

use chrono::{NaiveDate, Utc};
use thiserror::Error;
use tracing::{debug, info};

use crate::content::{group_entries_by_month, Entry, LoadEntriesError};
use crate::html::PreEscaped;
use crate::render::{render_heading, render_listing};
use crate::storage::{DiskStorage, Store};
use crate::template::{PageContext, PageTemplate, TemplateError};
use crate::{ConfigError, SiteConfig};

#[derive(Error, Debug)]
pub enum GenerateSiteError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to load entries: {0}")]
    Load(#[from] LoadEntriesError),

    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    #[error("render error: {0}")]
    Render(#[from] std::fmt::Error),

    #[error("storage error: {0}")]
    Storage(String),
}

pub struct Site {
    config: SiteConfig,
}

impl Site {
    pub fn new(config: SiteConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Loads the entries, renders the page and writes it to the output
    /// directory, returning the path of the written page.
    pub fn generate(&self) -> Result<PathBuf, GenerateSiteError> {
        let generated_on = Utc::now()
            .with_timezone(&self.config.timezone()?)
            .date_naive();

        let storage = DiskStorage::new(self.config.output_dir.clone());
        self.generate_to(&storage, generated_on)?;

        Ok(storage.output_path().join(&self.config.output_file))
    }

    pub fn generate_to(
        &self,
        storage: &impl Store,
        generated_on: NaiveDate,
    ) -> Result<(), GenerateSiteError> {
        let entries = Entry::load_all(&self.config.input_path)?;
        info!(
            count = entries.len(),
            path = %self.config.input_path.display(),
            "loaded entries"
        );

        let page = self.render(entries, generated_on)?;

        storage
            .store_page(&self.config.output_file, &page)
            .map_err(|err| GenerateSiteError::Storage(err.to_string()))?;
        info!(path = %self.config.output_path().display(), "wrote page");

        Ok(())
    }

    /// Renders the complete page for the given entries.
    pub fn render(
        &self,
        entries: Vec<Entry>,
        generated_on: NaiveDate,
    ) -> Result<String, GenerateSiteError> {
        let custom_template;
        let template = match &self.config.template {
            Some(path) => {
                custom_template = PageTemplate::from_path(path)?;
                &custom_template
            }
            None => PageTemplate::embedded()?,
        };

        let groups = group_entries_by_month(entries);
        debug!(groups = groups.len(), "grouped entries by month");

        let heading = render_heading(&self.config, groups.entry_count(), generated_on)
            .render_to_fragment()?;
        let listing = render_listing(&self.config, &groups).render_to_fragment()?;
        let extra_head_content = PreEscaped::new(self.config.extra_head_content.as_str());

        let page = template.render(&PageContext {
            title: &self.config.title,
            page_title_bar: &heading,
            content: &listing,
            extra_head_content: &extra_head_content,
        })?;

        Ok(page)
    }
}
