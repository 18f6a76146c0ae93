use super::*;
use crate::pagination::PageInfo;

impl TableRuntime {
    pub fn pagination(&self) -> &PaginationState {
        &self.pagination
    }

    pub fn page_info(&self) -> PageInfo {
        self.pagination.info()
    }

    pub fn set_page(&mut self, page_index: usize) -> bool {
        let changed = self.pagination.go_to_page(page_index);
        self.page_changed(changed)
    }

    pub fn next_page(&mut self) -> bool {
        let changed = self.pagination.go_next();
        self.page_changed(changed)
    }

    pub fn previous_page(&mut self) -> bool {
        let changed = self.pagination.go_prev();
        self.page_changed(changed)
    }

    pub fn first_page(&mut self) -> bool {
        let changed = self.pagination.go_first();
        self.page_changed(changed)
    }

    pub fn last_page(&mut self) -> bool {
        let changed = self.pagination.go_last();
        self.page_changed(changed)
    }

    /// Change the page size; always returns to the first page
    pub fn set_page_size(&mut self, page_size: usize) -> bool {
        let changed = self.pagination.set_page_size(page_size);
        self.page_changed(changed)
    }

    fn page_changed(&mut self, changed: bool) -> bool {
        if changed {
            self.emit(TableEvent::PageChange(self.pagination.info()));
        }
        changed
    }
}
