//! Shared context and per-page UI state.

use std::sync::Arc;

use crate::chain::{ConfiguredWallet, RpcClient};

/// Endpoint used by every contract handle.
pub type SharedEndpoint = Arc<RpcClient>;

/// The configured signer, if any.
pub type SharedWallet = Arc<ConfiguredWallet>;

/// Blocking message shown over the whole app until dismissed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AlertState {
    pub message: Option<String>,
}

/// Whether the owner controls of a page are showing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EditMode {
    #[default]
    Viewing,
    Editing,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ModalState {
    #[default]
    Closed,
    Open,
}

/// {viewing, editing} × {modal closed, modal open}, one per page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PageState {
    pub mode: EditMode,
    pub modal: ModalState,
}

impl PageState {
    /// Enter or leave edit mode. Entering needs `may_edit`; leaving closes
    /// any open modal.
    pub fn toggle_edit(&mut self, may_edit: bool) {
        match self.mode {
            EditMode::Viewing if may_edit => self.mode = EditMode::Editing,
            EditMode::Viewing => {}
            EditMode::Editing => {
                self.mode = EditMode::Viewing;
                self.modal = ModalState::Closed;
            }
        }
    }

    pub fn open_modal(&mut self) {
        self.modal = ModalState::Open;
    }

    pub fn close_modal(&mut self) {
        self.modal = ModalState::Closed;
    }

    pub fn is_editing(&self) -> bool {
        self.mode == EditMode::Editing
    }

    pub fn modal_open(&self) -> bool {
        self.modal == ModalState::Open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_owner_enters_edit_mode() {
        let mut page = PageState::default();
        page.toggle_edit(false);
        assert_eq!(page.mode, EditMode::Viewing);
        page.toggle_edit(true);
        assert!(page.is_editing());
    }

    #[test]
    fn test_leaving_edit_mode_closes_modal() {
        let mut page = PageState::default();
        page.toggle_edit(true);
        page.open_modal();
        assert!(page.modal_open());
        page.toggle_edit(true);
        assert_eq!(page, PageState::default());
    }

    #[test]
    fn test_modal_independent_of_mode() {
        let mut page = PageState::default();
        page.open_modal();
        assert!(page.modal_open() && !page.is_editing());
        page.close_modal();
        assert!(!page.modal_open());
    }
}
