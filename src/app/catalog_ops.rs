use tracing::{debug, info};

use crate::catalog::{CategoryFilter, FetchOrigin, FetchedCatalog};
use crate::command::{ActionId, apply_catalog_view};
use crate::nav::Ticket;

use super::core::App;

impl App {
    /// Pops the next requested fetch together with the ticket its result
    /// must present. A newer request supersedes any fetch still in flight.
    pub(crate) fn next_catalog_fetch(&mut self) -> Option<(Ticket<()>, bool)> {
        let force_refresh = self.pending.catalog_fetches.pop_front()?;
        Some((self.catalog_guard.issue(()), force_refresh))
    }

    /// Installs a fetched catalog. Returns false for a superseded fetch.
    ///
    /// The selected category survives a refresh when it still exists; the
    /// viewer then restarts on the filtered subset.
    pub fn apply_fetched_catalog(&mut self, ticket: Ticket<()>, fetched: FetchedCatalog) -> bool {
        if !self.catalog_guard.is_current(&ticket) {
            debug!(generation = ticket.generation, "superseded catalog fetch discarded");
            return false;
        }
        self.catalog_guard.invalidate();

        let catalog = &mut self.state.catalog;
        catalog.loading = !self.pending.catalog_fetches.is_empty();
        let selected = catalog
            .preferred_category
            .take()
            .unwrap_or_else(|| catalog.filter.selected().to_string());
        catalog.filter = CategoryFilter::from_stories(&fetched.stories);
        catalog.filter.select(&selected);
        catalog.all = fetched.stories;
        info!(
            stories = catalog.all.len(),
            origin = ?fetched.origin,
            category = catalog.filter.selected(),
            "catalog installed"
        );

        apply_catalog_view(&mut self.command_context());
        self.state.status.last_action_id = Some(ActionId::Catalog);
        if fetched.origin == FetchOrigin::Failed {
            self.state.status.message = "catalog unavailable".to_string();
        }
        true
    }
}
