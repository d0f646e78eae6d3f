//! Event compilations.

use std::collections::BTreeSet;

use ewm_types::Page;

use super::{next, EwmStore, Tables};
use crate::{
    validation::validate, Compilation, CompilationDetails, CompilationUpdate, NewCompilation,
    Result,
};

impl Tables {
    /// Drops ids that name no event.
    fn known_events(&self, ids: BTreeSet<u64>) -> BTreeSet<u64> {
        ids.into_iter()
            .filter(|id| self.events.contains_key(id))
            .collect()
    }
}

impl EwmStore {
    /// Creates a compilation; unknown event ids are ignored.
    pub fn create_compilation(&self, input: NewCompilation) -> Result<CompilationDetails> {
        validate(&input)?;

        let mut tables = self.tables.write();
        let compilation = Compilation {
            id: next(&mut tables.seq.compilation),
            title: input.title,
            pinned: input.pinned,
            events: tables.known_events(input.events),
        };
        let details = tables.compilation_details(&compilation)?;
        tables.compilations.insert(compilation.id, compilation);

        tracing::info!(
            compilation_id = details.compilation.id,
            events = details.events.len(),
            "compilation created"
        );
        Ok(details)
    }

    /// Applies the fields present in `update`. A non-empty event list
    /// replaces the current one.
    pub fn update_compilation(
        &self,
        id: u64,
        update: CompilationUpdate,
    ) -> Result<CompilationDetails> {
        validate(&update)?;

        let mut tables = self.tables.write();
        let mut compilation = tables.compilation(id)?.clone();
        if let Some(title) = update.title {
            compilation.title = title;
        }
        if let Some(pinned) = update.pinned {
            compilation.pinned = pinned;
        }
        if let Some(events) = update.events.filter(|e| !e.is_empty()) {
            compilation.events = tables.known_events(events);
        }

        let details = tables.compilation_details(&compilation)?;
        tables.compilations.insert(id, compilation);

        tracing::info!(compilation_id = id, "compilation updated");
        Ok(details)
    }

    /// Deletes a compilation.
    pub fn delete_compilation(&self, id: u64) -> Result<()> {
        let mut tables = self.tables.write();
        tables.compilation(id)?;
        tables.compilations.remove(&id);

        tracing::info!(compilation_id = id, "compilation deleted");
        Ok(())
    }

    pub fn get_compilation(&self, id: u64) -> Result<CompilationDetails> {
        let tables = self.tables.read();
        tables.compilation_details(tables.compilation(id)?)
    }

    /// Lists compilations newest first, optionally only pinned or unpinned.
    pub fn list_compilations(
        &self,
        pinned: Option<bool>,
        page: Page,
    ) -> Result<Vec<CompilationDetails>> {
        let tables = self.tables.read();
        page.apply(
            tables
                .compilations
                .values()
                .rev()
                .filter(|c| pinned.is_none_or(|p| c.pinned == p)),
        )
        .into_iter()
        .map(|c| tables.compilation_details(c))
        .collect()
    }
}
